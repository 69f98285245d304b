//! Defines the route handler for a user's insights.

use axum::{Json, extract::State};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    calendar::{first_day_of_previous_month, month_date_range},
    category::get_categories_by_user,
    extract::{QueryParams, USER_ID_REQUIRED, require},
    insight::{Insight, InsightState, generate_insights},
    money::Currency,
    timezone::local_today,
    transaction::get_transactions_in_date_range,
    user::UserId,
};

/// The query parameters for the insights endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightQuery {
    /// The user to generate insights for.
    pub user_id: Option<UserId>,
    /// How amounts are written in the messages, defaults to [Currency::Brl].
    pub currency: Option<Currency>,
}

/// A route handler for the insights of the current month.
pub async fn get_insights_endpoint(
    State(state): State<InsightState>,
    QueryParams(query): QueryParams<InsightQuery>,
) -> Result<Json<Vec<Insight>>, Error> {
    let user_id = require(query.user_id, USER_ID_REQUIRED)?;
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let insights = insights_for_user(
        user_id,
        today,
        query.currency.unwrap_or_default(),
        &connection,
    )?;

    Ok(Json(insights))
}

/// Load the transactions of the month containing `today` and the month before
/// it, then generate the insights for them.
pub(crate) fn insights_for_user(
    user_id: UserId,
    today: Date,
    currency: Currency,
    connection: &Connection,
) -> Result<Vec<Insight>, Error> {
    let start = first_day_of_previous_month(today);
    let this_month = month_date_range(today.year(), today.month()).ok_or(Error::InvalidDate)?;
    let end = *this_month.end();

    let transactions = get_transactions_in_date_range(user_id, start..=end, connection)?;
    let categories = get_categories_by_user(user_id, connection)?;

    Ok(generate_insights(today, &transactions, &categories, currency))
}
