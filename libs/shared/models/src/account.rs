use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// A registered account. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
}

impl Account {
    pub fn has_role(&self, role: Role) -> bool {
        self.role.satisfies(role)
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}
