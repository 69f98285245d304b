//! Defines the endpoint for logging in a user.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{
    Error,
    app_state::lock_connection,
    extract::{JsonBody, require_text},
    user::{UserProfile, UserState, get_user_by_email},
};

/// The credentials for logging in.
#[derive(Debug, Default, Deserialize)]
pub struct LogInForm {
    /// The email the user registered with.
    pub email: Option<String>,
    /// The user's password.
    pub password: Option<String>,
}

/// A route handler for logging in a user.
///
/// Responds with the user's profile if the email and password match a
/// registered user. An unknown email and a wrong password produce the same
/// [Error::InvalidCredentials] response.
pub async fn log_in_endpoint(
    State(state): State<UserState>,
    JsonBody(form): JsonBody<LogInForm>,
) -> Result<Json<UserProfile>, Error> {
    const REQUIRED: &str = "E-mail and password are required";
    let email = require_text(form.email, REQUIRED)?;
    let password = form
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| Error::MissingField(REQUIRED.to_owned()))?;

    let connection = lock_connection(&state.db_connection)?;

    let user = match get_user_by_email(&email, &connection) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            tracing::debug!("log in attempt for unknown email");
            return Err(Error::InvalidCredentials);
        }
        Err(error) => return Err(error),
    };

    if !user.password_hash.verify(&password)? {
        tracing::debug!("log in attempt with wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("user {} logged in", user.id);

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use axum::extract::State;

    use crate::{
        Error,
        extract::JsonBody,
        test_utils::{TEST_PASSWORD, create_test_user_with_password, get_test_app_state},
        user::UserState,
    };

    use super::{LogInForm, log_in_endpoint};

    fn get_state_with_user() -> UserState {
        let app_state = get_test_app_state();
        create_test_user_with_password(
            "test@example.com",
            TEST_PASSWORD,
            &app_state.db_connection.lock().unwrap(),
        );

        UserState {
            db_connection: app_state.db_connection,
            password_hash_cost: app_state.password_hash_cost,
        }
    }

    fn form(email: &str, password: &str) -> JsonBody<LogInForm> {
        JsonBody(LogInForm {
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        })
    }

    #[tokio::test]
    async fn logs_in_with_correct_password() {
        let state = get_state_with_user();

        let profile = log_in_endpoint(State(state), form("test@example.com", TEST_PASSWORD))
            .await
            .expect("log in failed");

        assert_eq!(profile.email, "test@example.com");
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let state = get_state_with_user();

        let unknown_email =
            log_in_endpoint(State(state.clone()), form("nobody@example.com", TEST_PASSWORD)).await;
        let wrong_password =
            log_in_endpoint(State(state), form("test@example.com", "not the password")).await;

        assert_eq!(unknown_email.map(|_| ()), Err(Error::InvalidCredentials));
        assert_eq!(wrong_password.map(|_| ()), Err(Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn requires_email_and_password() {
        let state = get_state_with_user();

        let result = log_in_endpoint(
            State(state),
            JsonBody(LogInForm {
                email: Some("test@example.com".to_owned()),
                password: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::MissingField(_))));
    }
}
