// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Serves `POST /api/contact` for the company website. Each submission is
//! rate-limited per client, validated, and handed to a notifier that either
//! logs it or emails it to the company inbox.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables, after reading an
//! optional `.env` file:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `COOLDOWN_MS`: Cooldown between accepted submissions per client (default: 60000)
//! - `NOTIFIER`: `log` or `email` (default: log)
//! - `RESEND_API_KEY`: API key, required for the email notifier
//! - `CONTACT_RECIPIENT`: Inbox that receives inquiries

use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{
    config::Config,
    handlers::{router, AppState},
    intake::ContactIntake,
    limiter::RateLimiter,
    metrics::IntakeMetrics,
    notifier,
    validator::ContactValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        cooldown_ms = config.rate_limit.cooldown_ms,
        notifier = ?config.notifier.kind,
        locale = ?config.notifier.locale,
        "Starting contact intake service"
    );

    // Create application state
    let intake = ContactIntake::new(
        RateLimiter::new(config.rate_limit.clone()),
        ContactValidator::new()?,
        notifier::from_config(&config.notifier)?,
    );

    let state = Arc::new(AppState {
        intake,
        metrics: IntakeMetrics::new()?,
        config: config.clone(),
    });

    // Spawn ledger sweep task
    let sweep_state = state.clone();
    let sweep_interval = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let limiter = sweep_state.intake.limiter();
            limiter.cleanup(Utc::now().timestamp_millis()).await;
            sweep_state.metrics.set_ledger_entries(limiter.len().await);
        }
    });

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
