use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, instrument, warn};

use shared_config::AppConfig;
use shared_utils::{EmailMessage, EmailReceiver, EmailSender};

/// Consumes the email queue, retrying each message with linear back-off.
pub struct EmailWorker {
    mailer: Arc<dyn EmailSender>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl EmailWorker {
    pub fn new(mailer: Arc<dyn EmailSender>, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            mailer,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub fn from_config(config: &AppConfig, mailer: Arc<dyn EmailSender>) -> Self {
        Self::new(
            mailer,
            config.email_max_attempts,
            Duration::from_millis(config.email_retry_delay_ms),
        )
    }

    pub fn spawn(self, receiver: EmailReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }

    /// Runs until every queue handle is dropped.
    #[instrument(skip_all)]
    pub async fn run(self, mut receiver: EmailReceiver) {
        info!("Email worker started");

        while let Some(message) = receiver.recv().await {
            self.deliver(&message).await;
        }

        info!("Email queue closed, worker stopping");
    }

    pub async fn deliver(&self, message: &EmailMessage) -> bool {
        for attempt in 1..=self.max_attempts {
            match self.mailer.send(message).await {
                Ok(()) => {
                    debug!("Delivered email to {} on attempt {}", message.to, attempt);
                    return true;
                }
                Err(e) if attempt < self.max_attempts => {
                    warn!("Email to {} failed (attempt {}/{}): {}", message.to, attempt, self.max_attempts, e);
                    sleep(self.retry_delay.saturating_mul(attempt)).await;
                }
                Err(e) => {
                    error!("Giving up on email to {} after {} attempts: {}", message.to, attempt, e);
                }
            }
        }
        false
    }
}
