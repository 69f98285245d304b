//! Route handlers for debts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    database_id::{CategoryId, DebtId},
    debt::{
        DebtChanges, DebtPayment, DebtState, DebtType, DebtView, NewDebt, create_debt,
        delete_debt, get_debts_by_user, pay_installment, update_debt, upcoming_payments,
    },
    extract::{JsonBody, QueryParams, UserQuery, require, require_text, validate_amount},
    timezone::local_today,
    transaction::MAX_INSTALLMENTS,
    user::UserId,
};

fn validate_installments(installments: i64) -> Result<u32, Error> {
    match u32::try_from(installments) {
        Ok(count) if (1..=MAX_INSTALLMENTS).contains(&count) => Ok(count),
        _ => Err(Error::InvalidInstallmentCount),
    }
}

fn validate_paid_installments(paid_installments: i64) -> Result<u32, Error> {
    u32::try_from(paid_installments).map_err(|_| Error::TooManyPaidInstallments)
}

fn validate_paid_amount(paid_amount: f64) -> Result<f64, Error> {
    if paid_amount.is_finite() && paid_amount >= 0.0 {
        Ok(paid_amount)
    } else {
        Err(Error::InvalidAmount)
    }
}

/// A route handler for listing the debts of the user given by the `userId`
/// query parameter, with their status as of today.
pub async fn get_debts_endpoint(
    State(state): State<DebtState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Vec<DebtView>>, Error> {
    let user_id = query.user_id()?;
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let views = get_debts_by_user(user_id, &connection)?
        .into_iter()
        .map(|debt| DebtView::new(debt, today))
        .collect();

    Ok(Json(views))
}

/// A route handler for listing the debts of a user with an installment due in the next week.
pub async fn get_debt_alerts_endpoint(
    State(state): State<DebtState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Vec<DebtView>>, Error> {
    let user_id = query.user_id()?;
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let views: Vec<DebtView> = get_debts_by_user(user_id, &connection)?
        .into_iter()
        .map(|debt| DebtView::new(debt, today))
        .collect();

    Ok(Json(upcoming_payments(&views, today)))
}

/// The request body for creating a debt.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtForm {
    /// The user who owes the debt.
    pub user_id: Option<UserId>,
    /// A name for the debt.
    pub name: Option<String>,
    /// The kind of debt.
    #[serde(rename = "type")]
    pub debt_type: Option<DebtType>,
    /// The amount owed in total.
    pub total_amount: Option<f64>,
    /// The number of monthly installments.
    pub installments: Option<i64>,
    /// When the first installment is due.
    pub start_date: Option<Date>,
    /// The amount already paid, defaults to zero.
    pub paid_amount: Option<f64>,
    /// The number of installments already paid, defaults to zero.
    pub paid_installments: Option<i64>,
}

/// A route handler for creating a debt, responds with the debt and status 201.
pub async fn create_debt_endpoint(
    State(state): State<DebtState>,
    JsonBody(form): JsonBody<CreateDebtForm>,
) -> Result<(StatusCode, Json<DebtView>), Error> {
    const REQUIRED: &str = "All fields are required";
    let new_debt = NewDebt {
        user_id: require(form.user_id, REQUIRED)?,
        name: require_text(form.name, REQUIRED)?,
        debt_type: require(form.debt_type, REQUIRED)?,
        total_amount: validate_amount(require(form.total_amount, REQUIRED)?)?,
        installments: validate_installments(require(form.installments, REQUIRED)?)?,
        start_date: require(form.start_date, REQUIRED)?,
        paid_amount: validate_paid_amount(form.paid_amount.unwrap_or(0.0))?,
        paid_installments: validate_paid_installments(form.paid_installments.unwrap_or(0))?,
    };
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let debt = create_debt(new_debt, &connection)?;

    Ok((StatusCode::CREATED, Json(DebtView::new(debt, today))))
}

/// The request body for editing a debt. Missing fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebtForm {
    /// The new name.
    pub name: Option<String>,
    /// The new kind of debt.
    #[serde(rename = "type")]
    pub debt_type: Option<DebtType>,
    /// The new total.
    pub total_amount: Option<f64>,
    /// The new amount paid.
    pub paid_amount: Option<f64>,
    /// The new number of installments.
    pub installments: Option<i64>,
    /// The new number of paid installments.
    pub paid_installments: Option<i64>,
    /// The new start date.
    pub start_date: Option<Date>,
}

impl UpdateDebtForm {
    fn validate(self) -> Result<DebtChanges, Error> {
        let name = match self.name {
            Some(name) if name.trim().is_empty() => return Err(Error::EmptyName("Debt name")),
            Some(name) => Some(name.trim().to_owned()),
            None => None,
        };

        Ok(DebtChanges {
            name,
            debt_type: self.debt_type,
            total_amount: self.total_amount.map(validate_amount).transpose()?,
            paid_amount: self.paid_amount.map(validate_paid_amount).transpose()?,
            installments: self.installments.map(validate_installments).transpose()?,
            paid_installments: self
                .paid_installments
                .map(validate_paid_installments)
                .transpose()?,
            start_date: self.start_date,
        })
    }
}

/// A route handler for editing some or all fields of a debt.
pub async fn update_debt_endpoint(
    State(state): State<DebtState>,
    Path(debt_id): Path<DebtId>,
    JsonBody(form): JsonBody<UpdateDebtForm>,
) -> Result<Json<DebtView>, Error> {
    let changes = form.validate()?;
    let today = local_today(&state.local_timezone)?;

    let connection = lock_connection(&state.db_connection)?;
    let debt = update_debt(debt_id, changes, &connection)?;

    Ok(Json(DebtView::new(debt, today)))
}

/// The request body for paying an installment.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentForm {
    /// The expense category to record the payment in.
    pub category_id: Option<CategoryId>,
    /// The date of the payment, defaults to today.
    pub date: Option<Date>,
}

/// A route handler for paying the next installment of a debt.
///
/// Responds with the updated debt and the expense transaction recorded for the payment.
pub async fn pay_installment_endpoint(
    State(state): State<DebtState>,
    Path(debt_id): Path<DebtId>,
    JsonBody(form): JsonBody<PayInstallmentForm>,
) -> Result<Json<DebtPayment>, Error> {
    let category_id = require(form.category_id, "Category is required")?;
    let today = local_today(&state.local_timezone)?;
    let date = form.date.unwrap_or(today);

    let mut connection = lock_connection(&state.db_connection)?;
    let (debt, transaction) = pay_installment(debt_id, category_id, date, &mut connection)?;

    tracing::info!(
        "paid installment {}/{} of debt {debt_id}",
        debt.paid_installments,
        debt.installments
    );

    Ok(Json(DebtPayment {
        debt: DebtView::new(debt, today),
        transaction,
    }))
}

/// A route handler for deleting a debt, responds with status 204.
///
/// Expenses already recorded for paid installments are kept.
pub async fn delete_debt_endpoint(
    State(state): State<DebtState>,
    Path(debt_id): Path<DebtId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let rows_affected = delete_debt(debt_id, &connection)?;

    if rows_affected == 0 {
        tracing::debug!("debt {debt_id} was already deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
