//! Totals and breakdowns of transactions for the monthly and annual reports.
//!
//! Every function here is a pure reduction over transactions that have already
//! been loaded for the period being reported on.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    calendar::is_in_month,
    category::Category,
    database_id::CategoryId,
    transaction::{Transaction, TransactionType},
};

/// The label used for spending in a category that no longer exists.
pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown";

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of income.
    pub income: f64,
    /// The sum of expenses.
    pub expense: f64,
    /// Income minus expenses.
    pub balance: f64,
    /// How many transactions were summed.
    pub transaction_count: usize,
}

/// Sum the income and expenses in `transactions`.
///
/// # Returns
/// The totals, with `balance` equal to `income - expense`. An empty slice
/// gives all zeros.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut totals = transactions
        .iter()
        .fold(Totals::default(), |mut totals, transaction| {
            match transaction.transaction_type {
                TransactionType::Income => totals.income += transaction.amount,
                TransactionType::Expense => totals.expense += transaction.amount,
            }
            totals.transaction_count += 1;
            totals
        });

    totals.balance = totals.income - totals.expense;
    totals
}

/// Sum the expenses in `transactions` per category.
///
/// Income is ignored. Categories without expenses are absent from the map.
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<CategoryId, f64> {
    let mut spending = BTreeMap::new();

    for transaction in transactions {
        if transaction.transaction_type == TransactionType::Expense {
            *spending.entry(transaction.category_id).or_insert(0.0) += transaction.amount;
        }
    }

    spending
}

/// The expenses of one category as a share of all expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// The category the expenses were filed under.
    pub category_id: CategoryId,
    /// The name of the category, or [UNKNOWN_CATEGORY_LABEL] if it was deleted.
    pub category_name: String,
    /// The sum of expenses in the category.
    pub amount: f64,
    /// `amount` as a percentage of all expenses, between 0 and 100.
    pub percentage: f64,
}

/// Break the expenses in `transactions` down by category.
///
/// # Arguments
/// * `transactions` - The transactions to break down, income is ignored.
/// * `categories` - The categories used to look up names.
///
/// # Returns
/// One entry per category with expenses, largest amount first. Ties are
/// ordered by category ID. Empty if there are no expenses.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryBreakdown> {
    let spending = spending_by_category(transactions);
    let total_expenses: f64 = spending.values().sum();

    if total_expenses <= 0.0 {
        return Vec::new();
    }

    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let mut breakdown: Vec<_> = spending
        .into_iter()
        .map(|(category_id, amount)| CategoryBreakdown {
            category_id,
            category_name: names
                .get(&category_id)
                .copied()
                .unwrap_or(UNKNOWN_CATEGORY_LABEL)
                .to_owned(),
            amount,
            percentage: amount / total_expenses * 100.0,
        })
        .collect();

    // The map iterates in ID order and the sort is stable, so ties stay in ID order.
    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    breakdown
}

/// The totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    /// The totals for the month.
    #[serde(flatten)]
    pub totals: Totals,
}

/// Summarise the transactions in `transactions` that fall in `month` of `year`.
///
/// Transactions outside the month are ignored.
pub fn monthly_summary(year: i32, month: Month, transactions: &[Transaction]) -> MonthlySummary {
    let in_month: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| is_in_month(transaction.date, year, month))
        .cloned()
        .collect();

    MonthlySummary {
        year,
        month: month as u8,
        totals: totals(&in_month),
    }
}

/// The totals for one calendar year and each of its months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSummary {
    /// The calendar year.
    pub year: i32,
    /// The totals for the whole year.
    #[serde(flatten)]
    pub totals: Totals,
    /// January through December, months without transactions included.
    pub months: Vec<MonthlySummary>,
}

/// Summarise the transactions in `transactions` that fall in `year`.
pub fn annual_summary(year: i32, transactions: &[Transaction]) -> AnnualSummary {
    let in_year: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.date.year() == year)
        .cloned()
        .collect();

    let mut month = Month::January;
    let mut months = Vec::with_capacity(12);
    for _ in 0..12 {
        months.push(monthly_summary(year, month, &in_year));
        month = month.next();
    }

    AnnualSummary {
        year,
        totals: totals(&in_year),
        months,
    }
}
