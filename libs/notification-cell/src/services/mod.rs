pub mod dispatcher;
pub mod sweeper;
pub mod worker;

pub use dispatcher::NotificationDispatcher;
pub use sweeper::DispatchSweeper;
pub use worker::EmailWorker;
