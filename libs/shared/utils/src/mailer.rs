use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Delivery backend for outbound mail.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Writes each message to the log instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        info!(to = %message.to, subject = %message.subject, "[EMAIL] {}", message.body);
        Ok(())
    }
}

pub type EmailReceiver = mpsc::UnboundedReceiver<EmailMessage>;

/// Fire-and-forget handle for scheduling mail off the request path.
#[derive(Clone)]
pub struct EmailQueue {
    tx: mpsc::UnboundedSender<EmailMessage>,
}

impl EmailQueue {
    pub fn new() -> (Self, EmailReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns false when no worker is left to drain the queue.
    pub fn schedule(&self, message: EmailMessage) -> bool {
        match self.tx.send(message) {
            Ok(()) => {
                debug!("Email scheduled");
                true
            }
            Err(mpsc::error::SendError(dropped)) => {
                warn!("Email queue is closed, dropping message to {}", dropped.to);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scheduled_message_reaches_receiver() {
        let (queue, mut rx) = EmailQueue::new();
        assert!(queue.schedule(EmailMessage::new("a@x.com", "Hi", "Body")));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.to, "a@x.com");
        assert_eq!(received.subject, "Hi");
    }

    #[tokio::test]
    async fn test_schedule_after_receiver_dropped() {
        let (queue, rx) = EmailQueue::new();
        drop(rx);
        assert!(!queue.schedule(EmailMessage::new("a@x.com", "Hi", "Body")));
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let sender = LogEmailSender;
        assert!(sender.send(&EmailMessage::new("a@x.com", "Hi", "Body")).await.is_ok());
    }
}
