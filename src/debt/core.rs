//! The debt model and its database queries.

use std::str::FromStr;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::DebtId,
    db::{UnknownVariant, is_foreign_key_violation, parse_text_column},
    user::UserId,
};

/// The kind of obligation a debt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtType {
    /// A purchase split over credit card bills.
    CreditCard,
    /// Financing of a car, house, etc.
    Financing,
    /// A personal or bank loan.
    Loan,
    /// Anything else.
    Other,
}

impl DebtType {
    fn as_str(&self) -> &'static str {
        match self {
            DebtType::CreditCard => "credit_card",
            DebtType::Financing => "financing",
            DebtType::Loan => "loan",
            DebtType::Other => "other",
        }
    }
}

impl FromStr for DebtType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(DebtType::CreditCard),
            "financing" => Ok(DebtType::Financing),
            "loan" => Ok(DebtType::Loan),
            "other" => Ok(DebtType::Other),
            other => Err(UnknownVariant {
                kind: "debt type",
                value: other.to_owned(),
            }),
        }
    }
}

impl ToSql for DebtType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for DebtType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text_column(value)
    }
}

/// An obligation paid off in equal monthly installments.
///
/// Only the facts about the debt are stored, its status and next due date are
/// derived with [crate::debt::DebtView].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    /// The ID of the debt.
    pub id: DebtId,
    /// The user who owes the debt.
    pub user_id: UserId,
    /// A name for the debt, e.g. "Car financing".
    pub name: String,
    /// The kind of debt.
    #[serde(rename = "type")]
    pub debt_type: DebtType,
    /// The amount owed in total.
    pub total_amount: f64,
    /// The amount paid so far.
    pub paid_amount: f64,
    /// The number of monthly installments.
    pub installments: u32,
    /// The number of installments paid so far.
    pub paid_installments: u32,
    /// When the first installment is due.
    pub start_date: Date,
}

/// The data for creating a debt.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDebt {
    /// The user who owes the debt.
    pub user_id: UserId,
    /// A name for the debt.
    pub name: String,
    /// The kind of debt.
    pub debt_type: DebtType,
    /// The amount owed in total.
    pub total_amount: f64,
    /// The amount already paid.
    pub paid_amount: f64,
    /// The number of monthly installments.
    pub installments: u32,
    /// The number of installments already paid.
    pub paid_installments: u32,
    /// When the first installment is due.
    pub start_date: Date,
}

/// A partial edit of a debt, `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtChanges {
    /// The new name.
    pub name: Option<String>,
    /// The new kind of debt.
    pub debt_type: Option<DebtType>,
    /// The new total.
    pub total_amount: Option<f64>,
    /// The new amount paid.
    pub paid_amount: Option<f64>,
    /// The new number of installments.
    pub installments: Option<u32>,
    /// The new number of paid installments.
    pub paid_installments: Option<u32>,
    /// The new start date.
    pub start_date: Option<Date>,
}

pub(super) const DEBT_COLUMNS: &str = "id, user_id, name, type, total_amount, paid_amount, \
                                       installments, paid_installments, start_date";

/// Create a debt.
///
/// # Errors
/// Returns a:
/// - [Error::TooManyPaidInstallments] if more installments are paid than exist,
/// - [Error::InvalidUser] if the user does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_debt(new_debt: NewDebt, connection: &Connection) -> Result<Debt, Error> {
    if new_debt.paid_installments > new_debt.installments {
        return Err(Error::TooManyPaidInstallments);
    }

    connection
        .prepare(&format!(
            "INSERT INTO debt (user_id, name, type, total_amount, paid_amount, installments, \
                               paid_installments, start_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {DEBT_COLUMNS}"
        ))?
        .query_row(
            (
                new_debt.user_id,
                &new_debt.name,
                new_debt.debt_type,
                new_debt.total_amount,
                new_debt.paid_amount,
                new_debt.installments,
                new_debt.paid_installments,
                new_debt.start_date,
            ),
            map_debt_row,
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidUser(new_debt.user_id.as_i64())
            } else {
                error.into()
            }
        })
}

/// Retrieve a debt by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no debt with `debt_id`.
pub fn get_debt(debt_id: DebtId, connection: &Connection) -> Result<Debt, Error> {
    connection
        .prepare(&format!("SELECT {DEBT_COLUMNS} FROM debt WHERE id = :id"))?
        .query_row(&[(":id", &debt_id)], map_debt_row)
        .map_err(|error| error.into())
}

/// Retrieve a user's debts, oldest first.
pub fn get_debts_by_user(user_id: UserId, connection: &Connection) -> Result<Vec<Debt>, Error> {
    connection
        .prepare(&format!(
            "SELECT {DEBT_COLUMNS} FROM debt WHERE user_id = :user_id ORDER BY start_date ASC, id ASC"
        ))?
        .query_map(&[(":user_id", &user_id)], map_debt_row)?
        .map(|maybe_debt| maybe_debt.map_err(|error| error.into()))
        .collect()
}

/// Apply `changes` to the debt `debt_id`, keeping the fields that are not given.
///
/// # Errors
/// Returns a:
/// - [Error::UpdateMissingDebt] if the debt does not exist,
/// - [Error::TooManyPaidInstallments] if the edit leaves more installments paid than exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_debt(
    debt_id: DebtId,
    changes: DebtChanges,
    connection: &Connection,
) -> Result<Debt, Error> {
    let debt = match get_debt(debt_id, connection) {
        Ok(debt) => debt,
        Err(Error::NotFound) => return Err(Error::UpdateMissingDebt),
        Err(error) => return Err(error),
    };

    let installments = changes.installments.unwrap_or(debt.installments);
    let paid_installments = changes.paid_installments.unwrap_or(debt.paid_installments);

    if paid_installments > installments {
        return Err(Error::TooManyPaidInstallments);
    }

    connection.execute(
        "UPDATE debt
         SET name = ?1, type = ?2, total_amount = ?3, paid_amount = ?4, installments = ?5,
             paid_installments = ?6, start_date = ?7
         WHERE id = ?8",
        (
            changes.name.unwrap_or(debt.name),
            changes.debt_type.unwrap_or(debt.debt_type),
            changes.total_amount.unwrap_or(debt.total_amount),
            changes.paid_amount.unwrap_or(debt.paid_amount),
            installments,
            paid_installments,
            changes.start_date.unwrap_or(debt.start_date),
            debt_id,
        ),
    )?;

    get_debt(debt_id, connection)
}

/// Delete the debt `debt_id`, returning the number of rows deleted.
pub fn delete_debt(debt_id: DebtId, connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM debt WHERE id = ?1", [debt_id])
        .map_err(|error| error.into())
}

/// Create the debt table.
pub fn create_debt_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS debt (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                total_amount REAL NOT NULL,
                paid_amount REAL NOT NULL DEFAULT 0,
                installments INTEGER NOT NULL,
                paid_installments INTEGER NOT NULL DEFAULT 0,
                start_date TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
                )",
        (),
    )?;

    Ok(())
}

pub(super) fn map_debt_row(row: &Row) -> Result<Debt, rusqlite::Error> {
    Ok(Debt {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        debt_type: row.get(3)?,
        total_amount: row.get(4)?,
        paid_amount: row.get(5)?,
        installments: row.get(6)?,
        paid_installments: row.get(7)?,
        start_date: row.get(8)?,
    })
}

#[cfg(test)]
mod debt_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        debt::{
            DebtChanges, DebtType, NewDebt, create_debt, delete_debt, get_debt, get_debts_by_user,
            update_debt,
        },
        test_utils::{create_test_user, get_test_connection},
        user::UserId,
    };

    fn car_financing(user_id: UserId) -> NewDebt {
        NewDebt {
            user_id,
            name: "Car financing".to_owned(),
            debt_type: DebtType::Financing,
            total_amount: 45_000.0,
            paid_amount: 15_000.0,
            installments: 36,
            paid_installments: 12,
            start_date: date!(2024 - 03 - 05),
        }
    }

    fn setup() -> (Connection, UserId) {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        (connection, user.id)
    }

    #[test]
    fn create_debt_succeeds() {
        let (connection, user_id) = setup();

        let debt = create_debt(car_financing(user_id), &connection).expect("Could not create debt");

        assert!(debt.id > 0);
        assert_eq!(debt.debt_type, DebtType::Financing);
        assert_eq!(debt.paid_installments, 12);
        assert_eq!(get_debt(debt.id, &connection), Ok(debt));
    }

    #[test]
    fn create_debt_rejects_too_many_paid_installments() {
        let (connection, user_id) = setup();

        let result = create_debt(
            NewDebt {
                paid_installments: 37,
                ..car_financing(user_id)
            },
            &connection,
        );

        assert_eq!(result, Err(Error::TooManyPaidInstallments));
    }

    #[test]
    fn debts_are_listed_per_user() {
        let (connection, user_id) = setup();
        let other_user = create_test_user("other@example.com", &connection);
        let debt = create_debt(car_financing(user_id), &connection).unwrap();
        create_debt(car_financing(other_user.id), &connection).unwrap();

        assert_eq!(get_debts_by_user(user_id, &connection), Ok(vec![debt]));
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let (connection, user_id) = setup();
        let debt = create_debt(car_financing(user_id), &connection).unwrap();

        let updated = update_debt(
            debt.id,
            DebtChanges {
                name: Some("Car".to_owned()),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.name, "Car");
        assert_eq!(updated.total_amount, debt.total_amount);
        assert_eq!(updated.start_date, debt.start_date);
    }

    #[test]
    fn update_rejects_fewer_installments_than_paid() {
        let (connection, user_id) = setup();
        let debt = create_debt(car_financing(user_id), &connection).unwrap();

        let result = update_debt(
            debt.id,
            DebtChanges {
                installments: Some(6),
                ..Default::default()
            },
            &connection,
        );

        assert_eq!(result, Err(Error::TooManyPaidInstallments));
    }

    #[test]
    fn update_missing_debt_fails() {
        let (connection, _) = setup();

        assert_eq!(
            update_debt(999, DebtChanges::default(), &connection),
            Err(Error::UpdateMissingDebt)
        );
    }

    #[test]
    fn delete_debt_removes_row() {
        let (connection, user_id) = setup();
        let debt = create_debt(car_financing(user_id), &connection).unwrap();

        assert_eq!(delete_debt(debt.id, &connection), Ok(1));
        assert_eq!(get_debt(debt.id, &connection), Err(Error::NotFound));
    }
}
