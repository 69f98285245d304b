//! Defines the endpoint for deleting a transaction or a whole series of installments.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    app_state::lock_connection,
    database_id::TransactionId,
    extract::QueryParams,
    transaction::{TransactionState, delete_installment_group, delete_transaction},
};

/// The query parameters for deleting a transaction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTransactionQuery {
    /// When given, every installment sharing this parent ID is deleted instead
    /// of just the transaction in the path.
    pub installment_parent_id: Option<String>,
}

impl DeleteTransactionQuery {
    /// The installment group to delete, if any.
    ///
    /// Empty strings and the literal strings "null" and "undefined" that
    /// clients send for a missing parent ID count as no group.
    pub fn installment_group(&self) -> Option<&str> {
        self.installment_parent_id
            .as_deref()
            .filter(|parent_id| !matches!(*parent_id, "" | "null" | "undefined"))
    }
}

/// A route handler for deleting a transaction, responds with status 204.
///
/// If an installment parent ID is given, the whole group of installments is
/// deleted. Otherwise only the transaction `transaction_id` is deleted.
/// Deleting something that is already gone still succeeds.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<TransactionId>,
    QueryParams(query): QueryParams<DeleteTransactionQuery>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let rows_affected = match query.installment_group() {
        Some(parent_id) => delete_installment_group(parent_id, &connection),
        None => delete_transaction(transaction_id, &connection),
    }
    .inspect_err(|error| {
        tracing::error!("Could not delete transaction {transaction_id}: {error}")
    })?;

    tracing::debug!("deleted {rows_affected} transaction(s) for request on {transaction_id}");

    Ok(StatusCode::NO_CONTENT)
}
