//! Monthly, annual and per-category reports over a user's transactions.

mod aggregation;
mod endpoints;

pub use aggregation::{
    AnnualSummary, CategoryBreakdown, MonthlySummary, Totals, UNKNOWN_CATEGORY_LABEL,
    annual_summary, category_breakdown, monthly_summary, spending_by_category, totals,
};
pub use endpoints::{
    ReportQuery, get_annual_report_endpoint, get_category_report_endpoint,
    get_monthly_report_endpoint,
};

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
