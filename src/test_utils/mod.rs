#![allow(missing_docs)]

use rusqlite::Connection;

use crate::{
    AppState, PasswordHash, ValidatedPassword,
    category::{Category, NewCategory, create_category},
    db::initialize,
    transaction::TransactionType,
    user::{NewUser, SubscriptionPlan, User, UserId, create_user, default_profile_picture},
};

pub(crate) mod http;

pub(crate) use http::{
    create_category_via_api, create_test_server, create_transaction_via_api, register_and_log_in,
};

pub(crate) const TEST_PASSWORD: &str = "gr33n-Tangerine-Orbit-42";

pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection, "Etc/UTC")
        .expect("Could not create app state")
        .with_password_hash_cost(4)
}

/// Insert a user whose password hash is not a real hash.
///
/// Use [create_test_user_with_password] when the test needs to log in.
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    create_user(
        NewUser {
            full_name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
            profile_picture: default_profile_picture("Test User"),
            subscription_plan: SubscriptionPlan::Free,
        },
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn create_test_user_with_password(
    email: &str,
    password: &str,
    connection: &Connection,
) -> User {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked(password), 4)
        .expect("Could not hash password");

    create_user(
        NewUser {
            full_name: "Test User".to_owned(),
            email: email.to_owned(),
            password_hash,
            profile_picture: default_profile_picture("Test User"),
            subscription_plan: SubscriptionPlan::Free,
        },
        connection,
    )
    .expect("Could not create test user")
}

pub(crate) fn create_test_category(
    name: &str,
    transaction_type: TransactionType,
    user_id: UserId,
    connection: &Connection,
) -> Category {
    create_category(
        NewCategory {
            user_id,
            name: name.to_owned(),
            icon: "HelpCircle".to_owned(),
            transaction_type,
        },
        connection,
    )
    .expect("Could not create test category")
}
