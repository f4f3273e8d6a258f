use std::sync::Arc;

use anyhow::Context;
use axum::extract::Request;
use axum::ServiceExt;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_booking_api::create_app;
use notification_cell::{DispatchSweeper, EmailWorker, NotificationDispatcher};
use shared_config::AppConfig;
use shared_database::Database;
use shared_utils::{AppState, EmailQueue, EmailSender, LogEmailSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Clinic Booking API server");

    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("JWT_SECRET is not set; registration and login will fail");
    }
    let bind_address = config.bind_address();

    let db = Database::from_config(&config).context("failed to open database")?;

    let mailer: Arc<dyn EmailSender> = Arc::new(LogEmailSender);
    let (email_queue, email_rx) = EmailQueue::new();
    let email_worker = EmailWorker::from_config(&config, mailer.clone()).spawn(email_rx);

    let sweep_period = config
        .is_dispatch_sweeper_enabled()
        .then(|| Duration::from_secs(config.notification_dispatch_interval_seconds));

    let state = Arc::new(
        AppState::new(config, db, email_queue, mailer).context("failed to build application state")?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = sweep_period.map(|period| {
        info!("Notification sweeper running every {:?}", period);
        DispatchSweeper::new(NotificationDispatcher::from_state(&state), period).spawn(shutdown_rx)
    });

    let app = create_app(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    info!("Listening on {}", bind_address);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped, draining background tasks");
    let _ = shutdown_tx.send(true);
    if let Some(sweeper) = sweeper {
        let _ = sweeper.await;
    }
    // The worker exits once the last queue handle (held by the router) is gone.
    if tokio::time::timeout(Duration::from_secs(5), email_worker).await.is_err() {
        warn!("Email worker did not drain within 5s");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
