//! User accounts: registration, logging in and profile management.

mod core;
mod log_in;
mod profile;
mod register;

pub use core::{
    NewUser, SubscriptionPlan, User, UserId, UserProfile, create_user, create_user_table,
    default_profile_picture, get_user_by_email, get_user_by_id, update_password,
    update_profile, update_profile_picture,
};
pub use log_in::log_in_endpoint;
pub use profile::{
    update_password_endpoint, update_profile_endpoint, update_profile_picture_endpoint,
};
pub use register::register_endpoint;

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

/// The state needed by the user account endpoints.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The bcrypt cost for hashing new passwords.
    pub password_hash_cost: u32,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            password_hash_cost: state.password_hash_cost,
        }
    }
}
