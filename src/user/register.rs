//! Defines the endpoint for registering a new user.

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error, PasswordHash, ValidatedPassword,
    app_state::lock_connection,
    extract::{JsonBody, require_text},
    user::{
        NewUser, SubscriptionPlan, UserProfile, UserState, create_user, default_profile_picture,
    },
};

/// The data for registering a user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// The user's full name.
    pub full_name: Option<String>,
    /// The email address to log in with.
    pub email: Option<String>,
    /// The password to log in with.
    pub password: Option<String>,
    /// The plan to subscribe to, defaults to the free plan.
    pub subscription_plan: Option<SubscriptionPlan>,
}

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// A route handler for registering a new user.
///
/// Responds with the new user's profile and status 201, the password hash is never returned.
pub async fn register_endpoint(
    State(state): State<UserState>,
    JsonBody(form): JsonBody<RegisterForm>,
) -> Result<(StatusCode, Json<UserProfile>), Error> {
    let full_name = require_text(form.full_name, ALL_FIELDS_REQUIRED)?;
    let email = require_text(form.email, ALL_FIELDS_REQUIRED)?;
    let password = form
        .password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| Error::MissingField(ALL_FIELDS_REQUIRED.to_owned()))?;

    if !EmailAddress::is_valid(&email) {
        return Err(Error::InvalidEmail(email));
    }

    let validated_password = ValidatedPassword::new(&password, &[&full_name, &email])?;
    let password_hash = PasswordHash::new(validated_password, state.password_hash_cost)?;

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(
        NewUser {
            profile_picture: default_profile_picture(&full_name),
            full_name,
            email,
            password_hash,
            subscription_plan: form.subscription_plan.unwrap_or_default(),
        },
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not register user: {error}"))?;

    tracing::info!("registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}
