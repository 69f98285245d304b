//! Paying one installment of a debt.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, DebtId},
    debt::{Debt, DebtView, get_debt, installment_amount},
    transaction::{Transaction, TransactionType, create_transaction},
};

/// The result of paying an installment: the updated debt and the expense recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayment {
    /// The debt after the payment.
    pub debt: DebtView,
    /// The expense transaction recording the payment.
    pub transaction: Transaction,
}

/// Pay the next installment of the debt `debt_id` on `date`.
///
/// One installment's value is added to the amount paid, the paid installment
/// count goes up by one and an expense "<debt name> (k/n)" is recorded in
/// `category_id`. All of this happens in one SQL transaction.
///
/// # Errors
/// Returns a:
/// - [Error::UpdateMissingDebt] if the debt does not exist,
/// - [Error::DebtPaidOff] if every installment has already been paid,
/// - [Error::InvalidCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn pay_installment(
    debt_id: DebtId,
    category_id: CategoryId,
    date: Date,
    connection: &mut Connection,
) -> Result<(Debt, Transaction), Error> {
    let sql_transaction = connection.transaction()?;

    let debt = match get_debt(debt_id, &sql_transaction) {
        Ok(debt) => debt,
        Err(Error::NotFound) => return Err(Error::UpdateMissingDebt),
        Err(error) => return Err(error),
    };

    if debt.paid_installments >= debt.installments {
        return Err(Error::DebtPaidOff);
    }

    let amount = installment_amount(&debt);

    sql_transaction.execute(
        "UPDATE debt
         SET paid_installments = paid_installments + 1, paid_amount = paid_amount + ?1
         WHERE id = ?2",
        (amount, debt_id),
    )?;

    let description = format!(
        "{} ({}/{})",
        debt.name,
        debt.paid_installments + 1,
        debt.installments
    );
    let transaction = create_transaction(
        Transaction::build(
            debt.user_id,
            TransactionType::Expense,
            amount,
            category_id,
            date,
            &description,
        ),
        &sql_transaction,
    )?;

    let debt = get_debt(debt_id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok((debt, transaction))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::Category,
        debt::{Debt, DebtType, NewDebt, create_debt, get_debt},
        test_utils::{create_test_category, create_test_user, get_test_connection},
        transaction::{TransactionType, count_transactions},
    };

    use super::pay_installment;

    fn setup(installments: u32, paid_installments: u32) -> (Connection, Debt, Category) {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let category =
            create_test_category("Debts", TransactionType::Expense, user.id, &connection);
        let debt = create_debt(
            NewDebt {
                user_id: user.id,
                name: "Notebook".to_owned(),
                debt_type: DebtType::CreditCard,
                total_amount: 6000.0,
                paid_amount: 500.0 * f64::from(paid_installments),
                installments,
                paid_installments,
                start_date: date!(2024 - 01 - 05),
            },
            &connection,
        )
        .unwrap();

        (connection, debt, category)
    }

    #[test]
    fn paying_records_installment_and_expense() {
        let (mut connection, debt, category) = setup(12, 6);

        let (paid_debt, transaction) =
            pay_installment(debt.id, category.id, date!(2024 - 07 - 05), &mut connection)
                .expect("Could not pay installment");

        assert_eq!(paid_debt.paid_installments, 7);
        assert_eq!(paid_debt.paid_amount, 3500.0);
        assert_eq!(transaction.amount, 500.0);
        assert_eq!(transaction.description, "Notebook (7/12)");
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.category_id, category.id);
        assert_eq!(transaction.date, date!(2024 - 07 - 05));
    }

    #[test]
    fn paying_paid_off_debt_fails() {
        let (mut connection, debt, category) = setup(12, 12);

        let result = pay_installment(debt.id, category.id, date!(2025 - 01 - 05), &mut connection);

        assert_eq!(result, Err(Error::DebtPaidOff));
        assert_eq!(count_transactions(&connection), Ok(0));
    }

    #[test]
    fn failed_payment_changes_nothing() {
        let (mut connection, debt, _) = setup(12, 6);

        let result = pay_installment(debt.id, 999, date!(2024 - 07 - 05), &mut connection);

        assert_eq!(result, Err(Error::InvalidCategory(999)));
        assert_eq!(get_debt(debt.id, &connection), Ok(debt));
    }

    #[test]
    fn paying_missing_debt_fails() {
        let (mut connection, _, category) = setup(12, 0);

        let result = pay_installment(999, category.id, date!(2024 - 07 - 05), &mut connection);

        assert_eq!(result, Err(Error::UpdateMissingDebt));
    }
}
