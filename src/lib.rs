//! Finandash is a personal finance tracker.
//!
//! This library provides a JSON REST API for recording income and expenses,
//! splitting purchases into monthly installments, saving towards goals,
//! paying off debts and summarising it all in reports, insights and a
//! dashboard.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod calendar;
pub mod category;
mod dashboard;
pub mod database_id;
mod db;
pub mod debt;
mod endpoints;
mod error;
mod extract;
pub mod goal;
pub mod insight;
mod logging;
pub mod money;
mod password;
pub mod report;
mod routing;
mod timezone;
pub mod transaction;
pub mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use dashboard::{Dashboard, DashboardQuery, DashboardState, get_dashboard_endpoint};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use timezone::{get_local_offset, local_today};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
