//! Route handlers for the monthly, annual and category reports.

use axum::{Json, extract::State};
use serde::Deserialize;
use time::Month;

use crate::{
    Error,
    app_state::lock_connection,
    calendar::{month_date_range, year_date_range},
    category::get_categories_by_user,
    extract::{QueryParams, USER_ID_REQUIRED, require},
    report::{
        AnnualSummary, CategoryBreakdown, MonthlySummary, ReportState, annual_summary,
        category_breakdown, monthly_summary,
    },
    transaction::get_transactions_in_date_range,
    user::UserId,
};

/// The query parameters that choose whose report to make and for which period.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// The user to report on.
    pub user_id: Option<UserId>,
    /// The calendar year.
    pub year: Option<i32>,
    /// The month number, 1 for January through 12 for December.
    pub month: Option<u8>,
}

impl ReportQuery {
    fn user_id(&self) -> Result<UserId, Error> {
        require(self.user_id, USER_ID_REQUIRED)
    }

    fn year(&self) -> Result<i32, Error> {
        require(self.year, "Year is required")
    }

    fn year_and_month(&self) -> Result<(i32, Month), Error> {
        let year = require(self.year, "Year and month are required")?;
        let month = require(self.month, "Year and month are required")?;
        let month = Month::try_from(month).map_err(|_| Error::InvalidDate)?;

        Ok((year, month))
    }
}

/// A route handler for the income and expense totals of one month.
pub async fn get_monthly_report_endpoint(
    State(state): State<ReportState>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Result<Json<MonthlySummary>, Error> {
    let user_id = query.user_id()?;
    let (year, month) = query.year_and_month()?;
    let date_range = month_date_range(year, month).ok_or(Error::InvalidDate)?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_date_range(user_id, date_range, &connection)?;

    Ok(Json(monthly_summary(year, month, &transactions)))
}

/// A route handler for the income and expense totals of one year, month by month.
pub async fn get_annual_report_endpoint(
    State(state): State<ReportState>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Result<Json<AnnualSummary>, Error> {
    let user_id = query.user_id()?;
    let year = query.year()?;
    let date_range = year_date_range(year).ok_or(Error::InvalidDate)?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_date_range(user_id, date_range, &connection)?;

    Ok(Json(annual_summary(year, &transactions)))
}

/// A route handler for the expenses of one month broken down by category.
pub async fn get_category_report_endpoint(
    State(state): State<ReportState>,
    QueryParams(query): QueryParams<ReportQuery>,
) -> Result<Json<Vec<CategoryBreakdown>>, Error> {
    let user_id = query.user_id()?;
    let (year, month) = query.year_and_month()?;
    let date_range = month_date_range(year, month).ok_or(Error::InvalidDate)?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_in_date_range(user_id, date_range, &connection)?;
    let categories = get_categories_by_user(user_id, &connection)?;

    Ok(Json(category_breakdown(&transactions, &categories)))
}
