//! Endpoints for updating a user's profile, password and avatar.

use axum::{
    Json,
    extract::{Path, State},
};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error, PasswordHash, ValidatedPassword,
    app_state::lock_connection,
    extract::{JsonBody, require_text},
    user::{
        UserId, UserProfile, UserState, get_user_by_id, update_password, update_profile,
        update_profile_picture,
    },
};

/// The fields for updating a user's profile.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    /// The new full name.
    pub full_name: Option<String>,
    /// The new email address.
    pub email: Option<String>,
}

/// A route handler for replacing the name and email of a user.
pub async fn update_profile_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
    JsonBody(form): JsonBody<ProfileForm>,
) -> Result<Json<UserProfile>, Error> {
    const REQUIRED: &str = "Full name and email are required.";
    let full_name = require_text(form.full_name, REQUIRED)?;
    let email = require_text(form.email, REQUIRED)?;

    if !EmailAddress::is_valid(&email) {
        return Err(Error::InvalidEmail(email));
    }

    let connection = lock_connection(&state.db_connection)?;
    let user = update_profile(user_id, &full_name, &email, &connection)?;

    Ok(Json(user.into()))
}

/// The fields for changing a user's password.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    /// The password the user currently logs in with.
    pub current_password: Option<String>,
    /// The password to replace it with.
    pub new_password: Option<String>,
}

/// A route handler for changing a user's password.
///
/// The current password must be supplied and correct, otherwise
/// [Error::IncorrectPassword] is returned and the password is unchanged.
pub async fn update_password_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
    JsonBody(form): JsonBody<PasswordForm>,
) -> Result<Json<Value>, Error> {
    const REQUIRED: &str = "Current and new passwords are required.";
    let current_password = form
        .current_password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| Error::MissingField(REQUIRED.to_owned()))?;
    let new_password = form
        .new_password
        .filter(|password| !password.is_empty())
        .ok_or_else(|| Error::MissingField(REQUIRED.to_owned()))?;

    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection)?;

    if !user.password_hash.verify(&current_password)? {
        tracing::debug!("wrong current password given for user {user_id}");
        return Err(Error::IncorrectPassword);
    }

    let validated_password = ValidatedPassword::new(&new_password, &[&user.full_name, &user.email])?;
    let password_hash = PasswordHash::new(validated_password, state.password_hash_cost)?;
    update_password(user_id, &password_hash, &connection)?;

    tracing::info!("changed password for user {user_id}");

    Ok(Json(json!({ "message": "Password updated successfully." })))
}

/// The field for changing a user's avatar.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PictureForm {
    /// The URL of the new avatar image.
    pub profile_picture: Option<String>,
}

/// A route handler for replacing a user's avatar URL.
pub async fn update_profile_picture_endpoint(
    State(state): State<UserState>,
    Path(user_id): Path<UserId>,
    JsonBody(form): JsonBody<PictureForm>,
) -> Result<Json<UserProfile>, Error> {
    let profile_picture =
        require_text(form.profile_picture, "Profile picture URL is required.")?;

    let connection = lock_connection(&state.db_connection)?;
    let user = update_profile_picture(user_id, &profile_picture, &connection)?;

    Ok(Json(user.into()))
}
