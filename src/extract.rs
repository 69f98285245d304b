//! Request extractors that report rejections in the app's JSON error format.

use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, QueryRejection},
};
use serde::Deserialize;

use crate::{Error, user::UserId};

/// A JSON body extractor whose rejection is an [Error::InvalidRequestBody].
///
/// Axum's own `Json` rejects bodies with a plain text response, which clients
/// expecting `{"message": ...}` cannot display.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("rejected JSON body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// A query string extractor whose rejection is an [Error::InvalidRequestBody].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("rejected query string: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    }
}

/// The `userId` query parameter that scopes list endpoints to one user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// The user whose records should be returned.
    pub user_id: Option<UserId>,
}

impl UserQuery {
    /// The requested user, or [Error::MissingField] if `userId` was not given.
    pub fn user_id(&self) -> Result<UserId, Error> {
        require(self.user_id, USER_ID_REQUIRED)
    }
}

/// The message for requests that do not say which user they are for.
pub(crate) const USER_ID_REQUIRED: &str = "User ID is required";

/// Unwrap a required request field, or fail with [Error::MissingField] carrying `message`.
pub(crate) fn require<T>(value: Option<T>, message: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::MissingField(message.to_owned()))
}

/// Unwrap a required text field, treating blank text as missing.
///
/// The returned text is trimmed.
pub(crate) fn require_text(value: Option<String>, message: &str) -> Result<String, Error> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_owned()),
        _ => Err(Error::MissingField(message.to_owned())),
    }
}

/// Check that `amount` is a finite number greater than zero.
pub(crate) fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount)
    }
}
