//! Debts paid off in monthly installments, with their derived repayment status.

mod amortization;
mod core;
mod endpoints;
mod payment;

pub use amortization::{
    DebtStatus, DebtView, UPCOMING_PAYMENT_WINDOW_DAYS, debt_status, installment_amount,
    next_due_date, upcoming_payments,
};
pub use core::{
    Debt, DebtChanges, DebtType, NewDebt, create_debt, create_debt_table, delete_debt, get_debt,
    get_debts_by_user, update_debt,
};
pub use endpoints::{
    CreateDebtForm, PayInstallmentForm, UpdateDebtForm, create_debt_endpoint,
    delete_debt_endpoint, get_debt_alerts_endpoint, get_debts_endpoint,
    pay_installment_endpoint, update_debt_endpoint,
};
pub use payment::{DebtPayment, pay_installment};

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the debt endpoints.
#[derive(Debug, Clone)]
pub struct DebtState {
    /// The database connection for managing debts.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DebtState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}
