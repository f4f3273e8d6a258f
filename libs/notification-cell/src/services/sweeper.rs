use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use crate::services::NotificationDispatcher;

/// Periodically runs `dispatch_pending` so rows are delivered without an operator call.
pub struct DispatchSweeper {
    dispatcher: NotificationDispatcher,
    period: Duration,
}

impl DispatchSweeper {
    pub fn new(dispatcher: NotificationDispatcher, period: Duration) -> Self {
        Self { dispatcher, period }
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    #[instrument(skip_all, fields(period_ms = self.period.as_millis() as u64))]
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("Dispatch sweeper started");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.dispatcher.dispatch_pending().await {
                        Ok(0) => debug!("Sweep found nothing to dispatch"),
                        Ok(count) => info!("Sweep dispatched {} notifications", count),
                        Err(e) => error!("Sweep failed: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Dispatch sweeper stopped");
    }
}
