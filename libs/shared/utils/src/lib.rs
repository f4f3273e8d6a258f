pub mod extractor;
pub mod jwt;
pub mod mailer;
pub mod password;
pub mod state;
pub mod test_utils;

pub use extractor::{auth_middleware, ensure_any_role, ensure_role, AppJson, IdentityResolver};
pub use mailer::{EmailMessage, EmailQueue, EmailReceiver, EmailSender, LogEmailSender};
pub use password::PasswordService;
pub use state::AppState;
