//! Month-over-month advice about spending and saving.

mod endpoints;
mod generator;

pub use endpoints::{InsightQuery, get_insights_endpoint};
pub use generator::{
    ANNUAL_RETURN_RATE, INVESTMENT_BALANCE_THRESHOLD, Insight, InsightKind, PROJECTION_MONTHS,
    SPENDING_INCREASE_THRESHOLD_PERCENT, SUGGESTED_SAVINGS_RATE, generate_insights,
    projected_investment_value,
};

pub(crate) use endpoints::insights_for_user;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the insights endpoint.
#[derive(Debug, Clone)]
pub struct InsightState {
    /// The database connection for reading transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for InsightState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
