//! Defines the endpoint for creating transactions, including installment purchases.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    app_state::lock_connection,
    database_id::CategoryId,
    extract::{JsonBody, validate_amount},
    transaction::{
        Transaction, TransactionState, TransactionType, TransactionUpdate, create_transactions,
    },
    user::UserId,
};

/// The transaction fields sent by the client when creating or editing a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    /// The amount of the transaction, or of one installment.
    pub amount: Option<f64>,
    /// The category of the transaction.
    pub category_id: Option<CategoryId>,
    /// What the transaction was for.
    pub description: Option<String>,
    /// When the transaction happened, or the first installment is due.
    pub date: Option<Date>,
    /// Whether the purchase should be split into installments.
    #[serde(default)]
    pub is_installment: bool,
}

impl TransactionData {
    /// Check that the required fields are present and the amount is positive.
    pub(crate) fn validate(self) -> Result<TransactionUpdate, Error> {
        let (Some(transaction_type), Some(amount), Some(category_id), Some(date)) =
            (self.transaction_type, self.amount, self.category_id, self.date)
        else {
            return Err(Error::MissingField(
                "Type, amount, category and date are required".to_owned(),
            ));
        };

        Ok(TransactionUpdate {
            transaction_type,
            amount: validate_amount(amount)?,
            category_id,
            description: self.description.unwrap_or_default().trim().to_owned(),
            date,
        })
    }
}

/// The request body for creating transactions.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionForm {
    /// The transaction, or the first installment of a purchase.
    pub transaction_data: Option<TransactionData>,
    /// How many monthly installments to split the purchase into.
    ///
    /// Missing, zero or negative counts create a single transaction.
    pub installments: Option<i64>,
    /// The user the transactions belong to.
    pub user_id: Option<UserId>,
}

/// A route handler for creating a transaction or a series of installments.
///
/// Responds with status 201 and every created transaction in installment order.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    JsonBody(form): JsonBody<CreateTransactionForm>,
) -> Result<(StatusCode, Json<Vec<Transaction>>), Error> {
    let (Some(data), Some(user_id)) = (form.transaction_data, form.user_id) else {
        return Err(Error::MissingField(
            "Transaction data and User ID are required".to_owned(),
        ));
    };

    let is_installment = data.is_installment;
    let fields = data.validate()?;
    let installments = u32::try_from(form.installments.unwrap_or(1).max(1))
        .map_err(|_| Error::InvalidInstallmentCount)?;

    let template = Transaction::build(
        user_id,
        fields.transaction_type,
        fields.amount,
        fields.category_id,
        fields.date,
        &fields.description,
    )
    .is_installment(is_installment);

    let mut connection = lock_connection(&state.db_connection)?;
    let created = create_transactions(template, installments, &mut connection)
        .inspect_err(|error| tracing::error!("could not create transactions: {error}"))?;

    tracing::debug!(
        "created {} transaction(s) for user {user_id}",
        created.len()
    );

    Ok((StatusCode::CREATED, Json(created)))
}
