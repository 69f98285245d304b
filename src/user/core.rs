//! Defines the user model and the database queries for users.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash,
    db::{UnknownVariant, parse_text_column},
};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// The plan a user has subscribed to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    /// The default plan.
    #[default]
    Free,
    /// The paid plan.
    Premium,
}

impl SubscriptionPlan {
    fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Free => "free",
            SubscriptionPlan::Premium => "premium",
        }
    }
}

impl FromStr for SubscriptionPlan {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(SubscriptionPlan::Free),
            "premium" => Ok(SubscriptionPlan::Premium),
            other => Err(UnknownVariant {
                kind: "subscription plan",
                value: other.to_owned(),
            }),
        }
    }
}

impl ToSql for SubscriptionPlan {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for SubscriptionPlan {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_text_column(value)
    }
}

/// A user of the application.
///
/// This type holds the password hash and must never be sent to a client,
/// send a [UserProfile] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's full name.
    pub full_name: String,
    /// The user's email address, unique across users.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// URL of the user's avatar image.
    pub profile_picture: String,
    /// The plan the user has subscribed to.
    pub subscription_plan: SubscriptionPlan,
}

/// The public view of a [User], safe to return in responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The user's full name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// URL of the user's avatar image.
    pub profile_picture: String,
    /// The plan the user has subscribed to.
    pub subscription_plan: SubscriptionPlan,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            profile_picture: user.profile_picture,
            subscription_plan: user.subscription_plan,
        }
    }
}

/// The data needed to insert a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The user's full name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// URL of the user's avatar image.
    pub profile_picture: String,
    /// The plan the user has subscribed to.
    pub subscription_plan: SubscriptionPlan,
}

/// The avatar given to new users, generated from their initials.
pub fn default_profile_picture(full_name: &str) -> String {
    let query = serde_urlencoded::to_string([("seed", full_name)]).unwrap_or_default();

    format!("https://api.dicebear.com/8.x/initials/svg?{query}")
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                full_name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                profile_picture TEXT NOT NULL,
                subscription_plan TEXT NOT NULL DEFAULT 'free'
                )",
        (),
    )?;

    Ok(())
}

const USER_COLUMNS: &str = "id, full_name, email, password, profile_picture, subscription_plan";

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if the email is already registered,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO user (full_name, email, password, profile_picture, subscription_plan)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                &new_user.full_name,
                &new_user.email,
                new_user.password_hash.as_ref(),
                &new_user.profile_picture,
                new_user.subscription_plan,
            ),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id)], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with the email address `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", email)], map_user_row)
        .map_err(|error| error.into())
}

/// Replace the name and email of the user `user_id`.
///
/// # Errors
///
/// Returns a:
/// - [Error::UpdateMissingUser] if the user does not exist,
/// - [Error::DuplicateEmail] if another user already has `email`,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn update_profile(
    user_id: UserId,
    full_name: &str,
    email: &str,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET full_name = ?1, email = ?2 WHERE id = ?3",
        (full_name, email, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    get_user_by_id(user_id, connection)
}

/// Replace the password hash of the user `user_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn update_password(
    user_id: UserId,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    Ok(())
}

/// Replace the avatar URL of the user `user_id`.
///
/// # Errors
///
/// Returns [Error::UpdateMissingUser] if the user does not exist.
pub fn update_profile_picture(
    user_id: UserId,
    profile_picture: &str,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET profile_picture = ?1 WHERE id = ?2",
        (profile_picture, user_id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    get_user_by_id(user_id, connection)
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        profile_picture: row.get(4)?,
        subscription_plan: row.get(5)?,
    })
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash,
        user::{
            NewUser, SubscriptionPlan, UserId, create_user, get_user_by_email, get_user_by_id,
            update_password, update_profile, update_profile_picture,
        },
    };

    use super::{create_user_table, default_profile_picture};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Maria Silva".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::new_unchecked("hunter2"),
            profile_picture: default_profile_picture("Maria Silva"),
            subscription_plan: SubscriptionPlan::Free,
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();

        let inserted_user = create_user(new_user("maria@example.com"), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "maria@example.com");
        assert_eq!(inserted_user.subscription_plan, SubscriptionPlan::Free);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let db_connection = get_db_connection();
        create_user(new_user("maria@example.com"), &db_connection).unwrap();

        let result = create_user(new_user("maria@example.com"), &db_connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserId::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("maria@example.com"), &db_connection).unwrap();

        let retrieved_user = get_user_by_email("maria@example.com", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_profile_replaces_name_and_email() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("maria@example.com"), &db_connection).unwrap();

        let updated =
            update_profile(test_user.id, "Maria S.", "ms@example.com", &db_connection).unwrap();

        assert_eq!(updated.full_name, "Maria S.");
        assert_eq!(updated.email, "ms@example.com");
        assert_eq!(updated.password_hash, test_user.password_hash);
    }

    #[test]
    fn update_profile_rejects_email_of_other_user() {
        let db_connection = get_db_connection();
        create_user(new_user("taken@example.com"), &db_connection).unwrap();
        let test_user = create_user(new_user("maria@example.com"), &db_connection).unwrap();

        let result = update_profile(test_user.id, "Maria", "taken@example.com", &db_connection);

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn updates_fail_for_missing_user() {
        let db_connection = get_db_connection();
        let id = UserId::new(42);

        assert_eq!(
            update_profile(id, "Nobody", "nobody@example.com", &db_connection),
            Err(Error::UpdateMissingUser)
        );
        assert_eq!(
            update_password(id, &PasswordHash::new_unchecked("x"), &db_connection),
            Err(Error::UpdateMissingUser)
        );
        assert_eq!(
            update_profile_picture(id, "https://example.com/a.png", &db_connection),
            Err(Error::UpdateMissingUser)
        );
    }

    #[test]
    fn default_profile_picture_encodes_name() {
        assert_eq!(
            default_profile_picture("Maria Silva"),
            "https://api.dicebear.com/8.x/initials/svg?seed=Maria+Silva"
        );
    }
}
