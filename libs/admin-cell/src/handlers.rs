use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use tracing::debug;

use shared_database::repository::{accounts, appointments, doctors};
use shared_database::DatabaseError;
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_models::{Account, AccountProfile, Appointment};
use shared_utils::{ensure_role, AppState};

use crate::models::AdminStats;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
) -> Result<Json<Vec<AccountProfile>>, AppError> {
    ensure_role(&account, Role::Admin)?;

    let users = state.db.call(|conn| accounts::list_accounts(conn)).await?;
    Ok(Json(users.iter().map(Account::profile).collect()))
}

pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    ensure_role(&account, Role::Admin)?;

    let all = state.db.call(|conn| appointments::list_appointments(conn)).await?;
    Ok(Json(all))
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(account): Extension<Account>,
) -> Result<Json<AdminStats>, AppError> {
    ensure_role(&account, Role::Admin)?;

    let stats = state
        .db
        .call(|conn| {
            Ok::<_, DatabaseError>(AdminStats {
                users: accounts::count_accounts(conn)?,
                doctors: doctors::count_doctors(conn)?,
                appointments: appointments::count_appointments(conn)?,
            })
        })
        .await?;

    debug!("Admin stats: {:?}", stats);
    Ok(Json(stats))
}
