//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, ops::RangeInclusive, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{CategoryId, TransactionId},
    db::{UnknownVariant, is_foreign_key_violation, parse_text_column},
    user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(UnknownVariant {
                kind: "transaction type",
                value: other.to_owned(),
            }),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text_column(value)
    }
}

/// Whether a transaction has been settled.
///
/// Every transaction created through the API is paid, pending is kept for
/// data entered by other means.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The money has moved.
    #[default]
    Paid,
    /// The money has not moved yet.
    Pending,
}

impl TransactionStatus {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::Pending => "pending",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(TransactionStatus::Paid),
            "pending" => Ok(TransactionStatus::Pending),
            other => Err(UnknownVariant {
                kind: "transaction status",
                value: other.to_owned(),
            }),
        }
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text_column(value)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user the transaction belongs to.
    pub user_id: UserId,
    /// Whether money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned, always positive.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category_id: CategoryId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// Whether the transaction has been settled.
    pub status: TransactionStatus,
    /// Whether this transaction is one payment of a purchase split into installments.
    pub is_installment: bool,
    /// The identifier shared by every installment of the same purchase.
    pub installment_parent_id: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        user_id: UserId,
        transaction_type: TransactionType,
        amount: f64,
        category_id: CategoryId,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            user_id,
            transaction_type,
            amount,
            category_id,
            description: description.to_owned(),
            date,
            status: TransactionStatus::Paid,
            is_installment: false,
            installment_parent_id: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Once all fields are set, pass the builder to [create_transaction] to
/// insert the transaction and get back a [Transaction] with its ID.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, TransactionType};
///
/// let builder = Transaction::build(
///         user_id,
///         TransactionType::Expense,
///         45.99,
///         groceries_id,
///         date!(2025-01-15),
///         "Supermarket",
///     )
///     .is_installment(true);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The user the transaction belongs to.
    pub user_id: UserId,

    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,

    /// The amount of money spent or earned.
    ///
    /// Amounts are always positive, the direction is given by
    /// `transaction_type`. For an installment purchase this is the value of
    /// one installment, not the total.
    pub amount: f64,

    /// The category of the transaction, e.g. "Groceries", "Salary".
    pub category_id: CategoryId,

    /// A human-readable description of the transaction.
    ///
    /// Installments get their position appended, e.g. "Notebook (2/3)".
    pub description: String,

    /// The date when the transaction occurred.
    pub date: Date,

    /// Whether the transaction has been settled.
    pub status: TransactionStatus,

    /// Whether the transaction was entered as an installment purchase.
    pub is_installment: bool,

    /// The identifier linking sibling installments.
    ///
    /// - `Some(id)` - one of several installments sharing `id`
    /// - `None` - a one-off transaction
    pub installment_parent_id: Option<String>,
}

impl TransactionBuilder {
    /// Set the status of the transaction.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Flag the transaction as an installment purchase.
    pub fn is_installment(mut self, is_installment: bool) -> Self {
        self.is_installment = is_installment;
        self
    }

    /// Link the transaction to its sibling installments.
    pub fn installment_parent_id(mut self, installment_parent_id: Option<String>) -> Self {
        self.installment_parent_id = installment_parent_id;
        self
    }
}

/// The fields of a transaction that can be edited after it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionUpdate {
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The category of the transaction.
    pub category_id: CategoryId,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, user_id, type, amount, category_id, description, date, \
                                   status, is_installment, installment_parent_id";

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidUser] if the user ID does not refer to a registered user,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (user_id, type, amount, category_id, description, date, \
                                         status, is_installment, installment_parent_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.user_id,
                builder.transaction_type,
                builder.amount,
                builder.category_id,
                &builder.description,
                builder.date,
                builder.status,
                builder.is_installment,
                &builder.installment_parent_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                foreign_key_error(builder.user_id, builder.category_id, connection)
            } else {
                error.into()
            }
        })
}

/// Work out which reference of a rejected insert or update is dangling.
fn foreign_key_error(user_id: UserId, category_id: CategoryId, connection: &Connection) -> Error {
    let user_exists = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM user WHERE id = ?1)",
        [user_id],
        |row| row.get::<_, bool>(0),
    );

    match user_exists {
        Ok(false) => Error::InvalidUser(user_id.as_i64()),
        Ok(true) => Error::InvalidCategory(category_id),
        Err(error) => error.into(),
    }
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction of a user, newest first.
///
/// Transactions on the same day are ordered by descending ID so that
/// installments and same-day entries keep a stable order.
pub fn get_transactions_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &user_id)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions of a user dated within `date_range`, oldest first.
pub fn get_transactions_in_date_range(
    user_id: UserId,
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id AND date BETWEEN :start AND :end
             ORDER BY date ASC, id ASC"
        ))?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id,
                ":start": date_range.start(),
                ":end": date_range.end(),
            },
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the editable fields of the transaction `id`.
///
/// The owner and installment links of the transaction are left unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - [Error::InvalidCategory] if the new category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET type = ?1, amount = ?2, category_id = ?3, description = ?4, date = ?5
             WHERE id = ?6",
            (
                update.transaction_type,
                update.amount,
                update.category_id,
                &update.description,
                update.date,
                id,
            ),
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidCategory(update.category_id)
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    get_transaction(id, connection)
}

type RowsAffected = usize;

/// Delete the single transaction `id`.
///
/// Deleting a transaction that does not exist is not an error, zero rows are reported instead.
pub fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Delete every installment sharing `installment_parent_id`.
pub fn delete_installment_group(
    installment_parent_id: &str,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE installment_parent_id = :parent_id",
            &[(":parent_id", installment_parent_id)],
        )
        .map_err(|error| error.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// Categories cannot be deleted while a transaction refers to them.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                type TEXT NOT NULL,
                amount REAL NOT NULL,
                category_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'paid',
                is_installment INTEGER NOT NULL DEFAULT 0,
                installment_parent_id TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id)
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_installment_parent
            ON \"transaction\"(installment_parent_id);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        transaction_type: row.get(2)?,
        amount: row.get(3)?,
        category_id: row.get(4)?,
        description: row.get(5)?,
        date: row.get(6)?,
        status: row.get(7)?,
        is_installment: row.get(8)?,
        installment_parent_id: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
