//! Advice generated by comparing this month's transactions with last month's.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    calendar::{first_day_of_previous_month, is_in_month},
    category::Category,
    database_id::CategoryId,
    money::{Currency, format_currency},
    report::{UNKNOWN_CATEGORY_LABEL, spending_by_category, totals},
    transaction::Transaction,
};

/// Spending in a category must grow by more than this percentage to be flagged.
pub const SPENDING_INCREASE_THRESHOLD_PERCENT: f64 = 20.0;

/// The share of monthly income suggested as a savings goal.
pub const SUGGESTED_SAVINGS_RATE: f64 = 0.2;

/// The monthly balance above which an investment projection is shown.
pub const INVESTMENT_BALANCE_THRESHOLD: f64 = 100.0;

/// The yearly return assumed by the investment projection.
pub const ANNUAL_RETURN_RATE: f64 = 0.08;

/// How many monthly contributions the investment projection runs for.
pub const PROJECTION_MONTHS: i32 = 60;

/// The tone of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Good news.
    Info,
    /// Something the user may want to act on.
    Warning,
    /// An idea for the user to consider.
    Suggestion,
}

/// A piece of advice shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// Identifies the rule that produced the insight, e.g. "insight-savings-up".
    pub id: String,
    /// The tone of the insight.
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// The message shown to the user.
    pub text: String,
}

/// The value of investing `monthly_payment` at the end of every month for
/// [PROJECTION_MONTHS] months at [ANNUAL_RETURN_RATE] compounded monthly.
///
/// The monthly rate is the one that compounds to the annual rate over twelve
/// months, `(1 + annual)^(1/12) - 1`.
pub fn projected_investment_value(monthly_payment: f64) -> f64 {
    let monthly_rate = (1.0 + ANNUAL_RETURN_RATE).powf(1.0 / 12.0) - 1.0;

    monthly_payment * ((1.0 + monthly_rate).powi(PROJECTION_MONTHS) - 1.0) / monthly_rate
}

/// Generate the insights for the month containing `today`.
///
/// # Arguments
/// * `today` - Decides which month is the current one.
/// * `transactions` - The user's transactions. Only those in the current and
///   previous calendar months are used.
/// * `categories` - The user's categories, used to name categories in messages.
/// * `currency` - How amounts are written in messages.
///
/// # Returns
/// The insights of every rule that applies, in this order: spending spikes per
/// category (by category ID), the change in savings, a savings goal suggestion
/// and an investment projection.
pub fn generate_insights(
    today: Date,
    transactions: &[Transaction],
    categories: &[Category],
    currency: Currency,
) -> Vec<Insight> {
    let previous_month = first_day_of_previous_month(today);
    let (current, previous): (Vec<Transaction>, Vec<Transaction>) = transactions
        .iter()
        .filter(|transaction| {
            is_in_month(transaction.date, today.year(), today.month())
                || is_in_month(
                    transaction.date,
                    previous_month.year(),
                    previous_month.month(),
                )
        })
        .cloned()
        .partition(|transaction| is_in_month(transaction.date, today.year(), today.month()));

    let mut insights = spending_spikes(&current, &previous, categories);

    let current_totals = totals(&current);
    let previous_totals = totals(&previous);

    if current_totals.balance > previous_totals.balance {
        insights.push(Insight {
            id: "insight-savings-up".to_owned(),
            kind: InsightKind::Info,
            text: format!(
                "Well done! You saved {} more than last month.",
                format_currency(current_totals.balance - previous_totals.balance, currency)
            ),
        });
    } else if current_totals.balance < previous_totals.balance && !current.is_empty() {
        insights.push(Insight {
            id: "insight-savings-down".to_owned(),
            kind: InsightKind::Warning,
            text: format!(
                "You saved {} less this month than last month.",
                format_currency(previous_totals.balance - current_totals.balance, currency)
            ),
        });
    }

    if current_totals.income > 0.0 {
        insights.push(Insight {
            id: "insight-goal-suggestion".to_owned(),
            kind: InsightKind::Suggestion,
            text: format!(
                "How about a savings goal of {} this month? That is 20% of your income.",
                format_currency(current_totals.income * SUGGESTED_SAVINGS_RATE, currency)
            ),
        });
    }

    if current_totals.balance > INVESTMENT_BALANCE_THRESHOLD {
        insights.push(Insight {
            id: "insight-investment-sim".to_owned(),
            kind: InsightKind::Suggestion,
            text: format!(
                "Investing {} (this month's savings) every month at 8% a year, \
                 you could have about {} in 5 years.",
                format_currency(current_totals.balance, currency),
                format_currency(projected_investment_value(current_totals.balance), currency)
            ),
        });
    }

    insights
}

fn spending_spikes(
    current: &[Transaction],
    previous: &[Transaction],
    categories: &[Category],
) -> Vec<Insight> {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();
    let previous_spending = spending_by_category(previous);

    spending_by_category(current)
        .into_iter()
        .filter_map(|(category_id, current_amount)| {
            let previous_amount = previous_spending.get(&category_id).copied()?;
            if previous_amount <= 0.0 {
                return None;
            }

            let increase = (current_amount - previous_amount) / previous_amount * 100.0;
            if increase <= SPENDING_INCREASE_THRESHOLD_PERCENT {
                return None;
            }

            let name = names
                .get(&category_id)
                .copied()
                .unwrap_or(UNKNOWN_CATEGORY_LABEL);

            Some(Insight {
                id: format!("insight-spending-{category_id}"),
                kind: InsightKind::Warning,
                text: format!(
                    "Heads up! Your spending on {name} went up {:.0}% compared to last month.",
                    increase.round()
                ),
            })
        })
        .collect()
}

#[cfg(test)]
mod generate_insights_tests {
    use time::{Date, macros::date};

    use crate::{
        category::Category,
        insight::generator::{InsightKind, generate_insights, projected_investment_value},
        money::Currency,
        transaction::{Transaction, TransactionStatus, TransactionType},
        user::UserId,
    };

    const TODAY: Date = date!(2024 - 05 - 20);

    fn transaction(
        transaction_type: TransactionType,
        amount: f64,
        category_id: i64,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            user_id: UserId::new(1),
            transaction_type,
            amount,
            category_id,
            description: String::new(),
            date,
            status: TransactionStatus::Paid,
            is_installment: false,
            installment_parent_id: None,
        }
    }

    fn expense(amount: f64, category_id: i64, date: Date) -> Transaction {
        transaction(TransactionType::Expense, amount, category_id, date)
    }

    fn income(amount: f64, date: Date) -> Transaction {
        transaction(TransactionType::Income, amount, 1, date)
    }

    fn food() -> Category {
        Category {
            id: 2,
            user_id: UserId::new(1),
            name: "Food".to_owned(),
            icon: "Utensils".to_owned(),
            transaction_type: TransactionType::Expense,
        }
    }

    fn ids(transactions: &[Transaction], categories: &[Category]) -> Vec<String> {
        generate_insights(TODAY, transactions, categories, Currency::Usd)
            .into_iter()
            .map(|insight| insight.id)
            .collect()
    }

    #[test]
    fn no_transactions_no_insights() {
        assert!(generate_insights(TODAY, &[], &[], Currency::Brl).is_empty());
    }

    #[test]
    fn flags_category_spending_spike() {
        let transactions = vec![
            expense(100.0, 2, date!(2024 - 04 - 10)),
            expense(150.0, 2, date!(2024 - 05 - 10)),
        ];

        let insights = generate_insights(TODAY, &transactions, &[food()], Currency::Usd);

        let spike = &insights[0];
        assert_eq!(spike.id, "insight-spending-2");
        assert_eq!(spike.kind, InsightKind::Warning);
        assert!(spike.text.contains("Food"));
        assert!(spike.text.contains("50%"));
    }

    #[test]
    fn spike_percentage_is_rounded() {
        let transactions = vec![
            expense(300.0, 2, date!(2024 - 04 - 10)),
            expense(400.0, 2, date!(2024 - 05 - 10)),
        ];

        let insights = generate_insights(TODAY, &transactions, &[food()], Currency::Usd);

        assert!(insights[0].text.contains("went up 33%"));
    }

    #[test]
    fn increase_of_exactly_twenty_percent_is_not_flagged() {
        let transactions = vec![
            expense(100.0, 2, date!(2024 - 04 - 10)),
            expense(120.0, 2, date!(2024 - 05 - 10)),
        ];

        assert!(!ids(&transactions, &[food()]).contains(&"insight-spending-2".to_owned()));
    }

    #[test]
    fn new_category_spending_is_not_flagged() {
        let transactions = vec![expense(500.0, 2, date!(2024 - 05 - 10))];

        assert!(!ids(&transactions, &[food()]).contains(&"insight-spending-2".to_owned()));
    }

    #[test]
    fn spike_in_deleted_category_is_named_unknown() {
        let transactions = vec![
            expense(100.0, 9, date!(2024 - 04 - 10)),
            expense(200.0, 9, date!(2024 - 05 - 10)),
        ];

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Usd);

        assert!(insights[0].text.contains("Unknown"));
    }

    #[test]
    fn months_before_last_month_are_ignored() {
        let transactions = vec![
            expense(100.0, 2, date!(2024 - 03 - 10)),
            expense(500.0, 2, date!(2024 - 05 - 10)),
        ];

        assert!(!ids(&transactions, &[food()]).contains(&"insight-spending-2".to_owned()));
    }

    #[test]
    fn reports_improved_savings() {
        let transactions = vec![
            income(1000.0, date!(2024 - 04 - 01)),
            income(1500.0, date!(2024 - 05 - 01)),
        ];

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Usd);

        assert_eq!(insights[0].id, "insight-savings-up");
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert!(insights[0].text.contains("$500.00"));
    }

    #[test]
    fn warns_about_lower_savings() {
        let transactions = vec![
            income(1000.0, date!(2024 - 04 - 01)),
            expense(50.0, 2, date!(2024 - 05 - 01)),
        ];

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Usd);

        assert_eq!(insights[0].id, "insight-savings-down");
        assert!(insights[0].text.contains("$1,050.00"));
    }

    #[test]
    fn no_savings_warning_without_transactions_this_month() {
        let transactions = vec![income(1000.0, date!(2024 - 04 - 01))];

        assert!(ids(&transactions, &[]).is_empty());
    }

    #[test]
    fn equal_savings_say_nothing() {
        let transactions = vec![
            income(50.0, date!(2024 - 04 - 01)),
            income(50.0, date!(2024 - 05 - 01)),
        ];

        assert_eq!(ids(&transactions, &[]), vec!["insight-goal-suggestion"]);
    }

    #[test]
    fn suggests_saving_a_fifth_of_income() {
        let transactions = vec![income(3000.0, date!(2024 - 05 - 05))];

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Usd);

        let suggestion = insights
            .iter()
            .find(|insight| insight.id == "insight-goal-suggestion")
            .expect("no goal suggestion");
        assert_eq!(suggestion.kind, InsightKind::Suggestion);
        assert!(suggestion.text.contains("$600.00"));
    }

    #[test]
    fn projects_investment_of_large_balance() {
        let transactions = vec![income(3000.0, date!(2024 - 05 - 05))];
        let expected = crate::money::format_currency(projected_investment_value(3000.0), Currency::Brl);

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Brl);

        assert_eq!(
            ids(&transactions, &[]),
            vec![
                "insight-savings-up",
                "insight-goal-suggestion",
                "insight-investment-sim"
            ]
        );
        let projection = insights.last().unwrap();
        assert!(projection.text.contains("R$ 3.000,00"));
        assert!(projection.text.contains(&expected));
    }

    #[test]
    fn no_projection_at_or_below_threshold() {
        let transactions = vec![income(100.0, date!(2024 - 05 - 05))];

        assert!(!ids(&transactions, &[]).contains(&"insight-investment-sim".to_owned()));
    }

    #[test]
    fn projection_matches_annuity_formula() {
        let monthly_rate = 1.08_f64.powf(1.0 / 12.0) - 1.0;
        let expected = 1000.0 * ((1.0 + monthly_rate).powi(60) - 1.0) / monthly_rate;

        let value = projected_investment_value(1000.0);

        assert!((value - expected).abs() < 1e-6);
        assert!((value - 72_945.0).abs() < 5.0, "got {value}");
    }

    #[test]
    fn insights_serialize_with_type() {
        let transactions = vec![income(3000.0, date!(2024 - 05 - 05))];

        let insights = generate_insights(TODAY, &transactions, &[], Currency::Usd);
        let json = serde_json::to_value(&insights[1]).unwrap();

        assert_eq!(json["id"], "insight-goal-suggestion");
        assert_eq!(json["type"], "suggestion");
    }
}
