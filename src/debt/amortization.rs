//! Derives the repayment state of a debt from its stored facts.
//!
//! None of this is stored: a debt's status and next due date are recomputed
//! from its start date and paid installments every time it is viewed.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{calendar::add_months, debt::Debt};

/// How many days ahead a payment must be due to show up as upcoming.
pub const UPCOMING_PAYMENT_WINDOW_DAYS: i64 = 7;

/// Where a debt stands relative to its repayment schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    /// The next installment is due today or later.
    Active,
    /// The next installment was due before today.
    Overdue,
    /// Every installment has been paid.
    PaidOff,
}

/// The date the next unpaid installment is due.
///
/// Installment `k` (counting from zero) is due `k` months after the start
/// date, so the next one is `paid_installments` months after it. Days past
/// the end of a shorter month fall on its last day.
pub fn next_due_date(debt: &Debt) -> Option<Date> {
    add_months(debt.start_date, debt.paid_installments)
}

/// The value of one installment, the total split equally.
pub fn installment_amount(debt: &Debt) -> f64 {
    if debt.installments == 0 {
        return 0.0;
    }

    debt.total_amount / f64::from(debt.installments)
}

/// Derive the status of `debt` on the day `today`.
///
/// A debt with every installment paid is paid off regardless of dates.
pub fn debt_status(debt: &Debt, today: Date) -> DebtStatus {
    if debt.paid_installments >= debt.installments {
        return DebtStatus::PaidOff;
    }

    match next_due_date(debt) {
        Some(due_date) if due_date < today => DebtStatus::Overdue,
        _ => DebtStatus::Active,
    }
}

/// A debt together with its derived repayment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtView {
    /// The stored debt.
    #[serde(flatten)]
    pub debt: Debt,
    /// The status on the day the view was made.
    pub status: DebtStatus,
    /// When the next installment is due, `None` once the debt is paid off.
    pub next_due_date: Option<Date>,
    /// The value of one installment.
    pub installment_amount: f64,
}

impl DebtView {
    /// Derive the repayment state of `debt` on the day `today`.
    pub fn new(debt: Debt, today: Date) -> Self {
        let status = debt_status(&debt, today);
        let next_due_date = match status {
            DebtStatus::PaidOff => None,
            DebtStatus::Active | DebtStatus::Overdue => next_due_date(&debt),
        };
        let installment_amount = installment_amount(&debt);

        Self {
            debt,
            status,
            next_due_date,
            installment_amount,
        }
    }

    /// Whether the next installment is due within the next week, today included.
    pub fn is_payment_upcoming(&self, today: Date) -> bool {
        let window_end = today.saturating_add(Duration::days(UPCOMING_PAYMENT_WINDOW_DAYS));

        self.status != DebtStatus::PaidOff
            && self
                .next_due_date
                .is_some_and(|due_date| today <= due_date && due_date <= window_end)
    }
}

/// The debts from `views` with an installment due between `today` and a week from today.
pub fn upcoming_payments(views: &[DebtView], today: Date) -> Vec<DebtView> {
    views
        .iter()
        .filter(|view| view.is_payment_upcoming(today))
        .cloned()
        .collect()
}
