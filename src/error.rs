//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing from the request.
    ///
    /// The string should be a message suitable for the client, e.g. "User ID is required".
    #[error("{0}")]
    MissingField(String),

    /// The request body could not be parsed.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A monetary amount was zero, negative or not a number.
    #[error("the amount must be a positive number")]
    InvalidAmount,

    /// An installment count that cannot be used to build a schedule.
    #[error("the number of installments must be between 1 and 600")]
    InvalidInstallmentCount,

    /// A debt was given more paid installments than it has installments.
    #[error("the paid installments cannot exceed the number of installments")]
    TooManyPaidInstallments,

    /// The email address is not a valid email address.
    #[error("\"{0}\" is not a valid e-mail address")]
    InvalidEmail(String),

    /// A name field was empty or only whitespace.
    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    /// A date could not be computed, e.g. advancing a date far past the supported calendar range.
    #[error("the date is outside the supported range")]
    InvalidDate,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email and password combination did not match a registered user.
    ///
    /// Unknown emails and wrong passwords share this variant so that clients
    /// cannot tell which emails are registered.
    #[error("Invalid e-mail or password.")]
    InvalidCredentials,

    /// The current password supplied when changing a password was wrong.
    #[error("Incorrect current password.")]
    IncorrectPassword,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email is already used by another user.
    #[error("This e-mail is already in use.")]
    DuplicateEmail,

    /// Tried to delete a category that transactions still refer to.
    #[error("Cannot delete category as it is currently in use by one or more transactions.")]
    CategoryInUse,

    /// The category ID used to create a transaction did not match a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(i64),

    /// The user ID used to create a record did not match a registered user.
    #[error("the user ID {0} does not refer to a registered user")]
    InvalidUser(i64),

    /// Tried to pay an installment of a debt that has already been paid off.
    #[error("This debt has already been paid off.")]
    DebtPaidOff,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a user that does not exist
    #[error("User not found.")]
    UpdateMissingUser,

    /// Tried to update a category that does not exist
    #[error("Category not found.")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("Category not found.")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("Transaction not found.")]
    UpdateMissingTransaction,

    /// Tried to update a goal that does not exist
    #[error("Goal not found.")]
    UpdateMissingGoal,

    /// Tried to update a debt that does not exist
    #[error("Debt not found.")]
    UpdateMissingDebt,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes the error class.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidAmount
            | Error::InvalidInstallmentCount
            | Error::TooManyPaidInstallments
            | Error::InvalidEmail(_)
            | Error::EmptyName(_)
            | Error::InvalidDate
            | Error::TooWeak(_)
            | Error::InvalidCategory(_)
            | Error::InvalidUser(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::IncorrectPassword => StatusCode::UNAUTHORIZED,
            Error::NotFound
            | Error::UpdateMissingUser
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::UpdateMissingGoal
            | Error::UpdateMissingDebt => StatusCode::NOT_FOUND,
            Error::DuplicateEmail | Error::CategoryInUse | Error::DebtPaidOff => {
                StatusCode::CONFLICT
            }
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Details of server-side errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else if self == Error::NotFound {
            "The requested resource could not be found.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
