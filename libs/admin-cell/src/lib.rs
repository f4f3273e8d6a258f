pub mod handlers;
pub mod models;
pub mod router;

pub use models::AdminStats;
pub use router::admin_routes;
