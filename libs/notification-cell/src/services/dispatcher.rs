use std::sync::Arc;

use chrono::{Duration, Utc};
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use shared_database::repository::notifications::{self, ClaimedNotification};
use shared_database::{Database, DatabaseError};
use shared_models::Notification;
use shared_utils::{AppState, EmailMessage, EmailSender};

use crate::error::NotificationError;

pub const DISPATCH_SUBJECT: &str = "Notification";

/// Drains pending notification rows into the email sender.
#[derive(Clone)]
pub struct NotificationDispatcher {
    db: Database,
    mailer: Arc<dyn EmailSender>,
    claim_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(db: Database, mailer: Arc<dyn EmailSender>, claim_timeout: Duration) -> Self {
        Self {
            db,
            mailer,
            claim_timeout,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.db.clone(),
            state.mailer.clone(),
            Duration::seconds(state.config.notification_claim_timeout_seconds),
        )
    }

    /// Insert a pending notification on the caller's connection, so it commits
    /// or rolls back with the caller's transaction.
    pub fn enqueue(
        conn: &Connection,
        appointment_id: Option<i64>,
        message: &str,
    ) -> Result<Notification, DatabaseError> {
        notifications::insert_notification(conn, appointment_id, message, Utc::now())
    }

    /// Claim every deliverable row under a fresh run token, send each one and
    /// mark it sent. Rows without a resolvable recipient are marked without sending.
    #[instrument(skip(self))]
    pub async fn dispatch_pending(&self) -> Result<usize, NotificationError> {
        let claim_token = Uuid::new_v4().to_string();
        let claimed = self.claim(claim_token.clone()).await?;

        if claimed.is_empty() {
            debug!("No pending notifications");
            return Ok(0);
        }

        for row in &claimed {
            self.deliver(row).await;

            let id = row.notification.id;
            let token = claim_token.clone();
            let marked = self
                .db
                .call(move |conn| notifications::mark_sent(conn, id, &token))
                .await?;
            if !marked {
                warn!("Notification {} was reclaimed by another run before it was marked", id);
            }
        }

        info!("Dispatched {} notifications", claimed.len());
        Ok(claimed.len())
    }

    async fn claim(&self, claim_token: String) -> Result<Vec<ClaimedNotification>, DatabaseError> {
        let stale_before_offset = self.claim_timeout;

        self.db
            .call(move |conn| {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                let now = Utc::now();
                notifications::claim_pending(&tx, &claim_token, now, now - stale_before_offset)?;
                let rows = notifications::list_claimed(&tx, &claim_token)?;
                tx.commit()?;
                Ok(rows)
            })
            .await
    }

    async fn deliver(&self, row: &ClaimedNotification) {
        let Some(recipient) = row.recipient_email.as_deref() else {
            debug!("Notification {} has no recipient, skipping send", row.notification.id);
            return;
        };

        let message = EmailMessage::new(recipient, DISPATCH_SUBJECT, row.notification.message.clone());
        if let Err(e) = self.mailer.send(&message).await {
            warn!("Failed to send notification {}: {}", row.notification.id, e);
        }
    }
}
