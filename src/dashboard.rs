//! This file defines the dashboard route: one response with everything the
//! overview page of the app shows.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error,
    app_state::lock_connection,
    calendar::month_date_range,
    debt::{DebtView, get_debts_by_user, upcoming_payments},
    extract::{QueryParams, USER_ID_REQUIRED, require},
    goal::{Goal, get_goals_by_user},
    insight::{Insight, insights_for_user},
    money::Currency,
    report::{MonthlySummary, monthly_summary},
    timezone::local_today,
    transaction::get_transactions_in_date_range,
    user::UserId,
};

/// The state needed for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's data.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// The user whose dashboard to show.
    pub user_id: Option<UserId>,
    /// The year of the summarised month, defaults to the current year.
    pub year: Option<i32>,
    /// The summarised month from 1 to 12, defaults to the current month.
    pub month: Option<u8>,
    /// How amounts are written in insights, defaults to [Currency::Brl].
    pub currency: Option<Currency>,
}

/// An overview of a user's finances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Income and expenses for the selected month.
    pub summary: MonthlySummary,
    /// Advice comparing the current month with the previous one.
    pub insights: Vec<Insight>,
    /// The user's savings goals, soonest deadline first.
    pub goals: Vec<Goal>,
    /// The user's debts with their status as of today.
    pub debts: Vec<DebtView>,
    /// The debts with an installment due in the next week.
    pub upcoming_payments: Vec<DebtView>,
}

/// A route handler for a user's dashboard.
///
/// Insights always compare the current month with the previous one, the
/// `year` and `month` query parameters only select the summarised month.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    QueryParams(query): QueryParams<DashboardQuery>,
) -> Result<Json<Dashboard>, Error> {
    let user_id = require(query.user_id, USER_ID_REQUIRED)?;
    let today = local_today(&state.local_timezone)?;
    let year = query.year.unwrap_or(today.year());
    let month = match query.month {
        Some(month) => Month::try_from(month).map_err(|_| Error::InvalidDate)?,
        None => today.month(),
    };
    let date_range = month_date_range(year, month).ok_or(Error::InvalidDate)?;

    let connection = lock_connection(&state.db_connection)?;

    let transactions = get_transactions_in_date_range(user_id, date_range, &connection)?;
    let insights = insights_for_user(
        user_id,
        today,
        query.currency.unwrap_or_default(),
        &connection,
    )?;
    let goals = get_goals_by_user(user_id, &connection)?;
    let debts: Vec<DebtView> = get_debts_by_user(user_id, &connection)?
        .into_iter()
        .map(|debt| DebtView::new(debt, today))
        .collect();
    let upcoming_payments = upcoming_payments(&debts, today);

    Ok(Json(Dashboard {
        summary: monthly_summary(year, month, &transactions),
        insights,
        goals,
        debts,
        upcoming_payments,
    }))
}
