pub mod error;
pub mod repository;
pub mod sqlite;

pub use error::DatabaseError;
pub use sqlite::Database;
