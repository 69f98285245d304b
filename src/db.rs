//! Database initialization and helpers shared by the domain modules.

use rusqlite::{
    Connection,
    types::{FromSqlError, FromSqlResult, ValueRef},
};

use crate::{
    Error, category::create_category_table, debt::create_debt_table, goal::create_goal_table,
    transaction::create_transaction_table, user::create_user_table,
};

/// Create the application's tables if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, which the
/// category and transaction tables rely on to reject deleting categories that
/// are still in use.
///
/// # Errors
/// Returns an error if the tables cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Exclusive,
    )?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_debt_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a text column into a type that parses from a string, e.g. an enum stored by name.
pub(crate) fn parse_text_column<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .as_str()?
        .parse()
        .map_err(|error| FromSqlError::Other(Box::new(error)))
}

/// Whether `error` is SQLite rejecting a statement that would break a foreign key.
pub(crate) fn is_foreign_key_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                ..
            },
            _,
        )
    )
}

/// The error produced when a stored enum name is not recognised.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    /// The name of the enum, e.g. "transaction type".
    pub kind: &'static str,
    /// The text that could not be parsed.
    pub value: String,
}
