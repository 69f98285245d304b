//! Transaction management for the budgeting application.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Splitting installment purchases into linked monthly transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction REST endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod installments;
mod list_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionStatus, TransactionType, TransactionUpdate,
    create_transaction, create_transaction_table, delete_installment_group, delete_transaction,
    get_transaction, get_transactions_by_user, get_transactions_in_date_range,
    map_transaction_row, update_transaction,
};
pub use create_endpoint::{CreateTransactionForm, TransactionData, create_transaction_endpoint};
pub use delete_endpoint::{DeleteTransactionQuery, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use installments::{MAX_INSTALLMENTS, create_transactions, expand_installments};
pub use list_endpoint::get_transactions_endpoint;

#[cfg(test)]
pub use core::count_transactions;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
