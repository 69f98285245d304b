//! Defines the endpoint for editing a transaction.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::lock_connection,
    database_id::TransactionId,
    extract::JsonBody,
    transaction::{Transaction, TransactionData, TransactionState, update_transaction},
};

/// A route handler for replacing the type, amount, category, description and
/// date of a single transaction.
///
/// Editing one installment does not change its siblings.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    JsonBody(data): JsonBody<TransactionData>,
) -> Result<Json<Transaction>, Error> {
    let update = data.validate()?;

    let connection = lock_connection(&state.db_connection)?;
    let transaction = update_transaction(transaction_id, update, &connection)?;

    Ok(Json(transaction))
}
