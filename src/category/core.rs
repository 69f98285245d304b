//! The category model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, database_id::CategoryId, db::is_foreign_key_violation, transaction::TransactionType,
    user::UserId,
};

/// A named group of transactions of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The user that owns the category.
    pub user_id: UserId,
    /// The display name, e.g. "Groceries".
    pub name: String,
    /// The name of the icon shown next to the category.
    pub icon: String,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// The data for creating a category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The user that will own the category.
    pub user_id: UserId,
    /// The display name.
    pub name: String,
    /// The icon name.
    pub icon: String,
    /// Whether the category is for income or expenses.
    pub transaction_type: TransactionType,
}

/// The fields of a category that can be changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    /// The display name.
    pub name: String,
    /// The icon name.
    pub icon: String,
    /// Whether the category is for income or expenses.
    pub transaction_type: TransactionType,
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::InvalidUser] if the user does not exist.
pub fn create_category(
    new_category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (user_id, name, icon, type) VALUES (?1, ?2, ?3, ?4)
             RETURNING id, user_id, name, icon, type",
        )?
        .query_row(
            (
                new_category.user_id,
                &new_category.name,
                &new_category.icon,
                new_category.transaction_type,
            ),
            map_row,
        )
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::InvalidUser(new_category.user_id.as_i64())
            } else {
                error.into()
            }
        })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name, icon, type FROM category WHERE id = :id")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all of a user's categories ordered alphabetically by name.
pub fn get_categories_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, icon, type FROM category
             WHERE user_id = :user_id ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id)], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace the name, icon and type of a category.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    fields: CategoryFields,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, icon = ?2, type = ?3 WHERE id = ?4",
        (
            &fields.name,
            &fields.icon,
            fields.transaction_type,
            category_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    get_category(category_id, connection)
}

/// Delete a category by ID.
///
/// # Errors
/// Returns a:
/// - [Error::CategoryInUse] if any transaction still refers to the category,
/// - [Error::DeleteMissingCategory] if the category doesn't exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| {
            if is_foreign_key_violation(&error) {
                Error::CategoryInUse
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            icon TEXT NOT NULL,
            type TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        icon: row.get(3)?,
        transaction_type: row.get(4)?,
    })
}

#[cfg(test)]
mod category_query_tests {
    use time::macros::date;

    use crate::{
        Error,
        category::{
            CategoryFields, NewCategory, create_category, delete_category, get_categories_by_user,
            get_category, update_category,
        },
        test_utils::{create_test_category, create_test_user, get_test_connection},
        transaction::{Transaction, TransactionType, create_transaction},
        user::UserId,
    };

    #[test]
    fn create_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);

        let category = create_category(
            NewCategory {
                user_id: user.id,
                name: "Salary".to_owned(),
                icon: "Briefcase".to_owned(),
                transaction_type: TransactionType::Income,
            },
            &connection,
        )
        .expect("Could not create category");

        assert!(category.id > 0);
        assert_eq!(category.name, "Salary");
        assert_eq!(get_category(category.id, &connection), Ok(category));
    }

    #[test]
    fn create_category_fails_for_unknown_user() {
        let connection = get_test_connection();

        let result = create_category(
            NewCategory {
                user_id: UserId::new(42),
                name: "Salary".to_owned(),
                icon: "Briefcase".to_owned(),
                transaction_type: TransactionType::Income,
            },
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidUser(42)));
    }

    #[test]
    fn get_categories_only_returns_users_categories() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let other_user = create_test_user("other@example.com", &connection);
        let rent = create_test_category("Rent", TransactionType::Expense, user.id, &connection);
        let food = create_test_category("Food", TransactionType::Expense, user.id, &connection);
        create_test_category("Gym", TransactionType::Expense, other_user.id, &connection);

        let categories = get_categories_by_user(user.id, &connection).unwrap();

        assert_eq!(categories, vec![food, rent]);
    }

    #[test]
    fn update_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let category = create_test_category("Food", TransactionType::Expense, user.id, &connection);

        let updated = update_category(
            category.id,
            CategoryFields {
                name: "Groceries".to_owned(),
                icon: "ShoppingCart".to_owned(),
                transaction_type: TransactionType::Expense,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.icon, "ShoppingCart");
    }

    #[test]
    fn update_missing_category_fails() {
        let connection = get_test_connection();

        let result = update_category(
            999,
            CategoryFields {
                name: "Groceries".to_owned(),
                icon: "ShoppingCart".to_owned(),
                transaction_type: TransactionType::Expense,
            },
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingCategory));
    }

    #[test]
    fn delete_unused_category_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let category = create_test_category("Food", TransactionType::Expense, user.id, &connection);

        assert_eq!(delete_category(category.id, &connection), Ok(()));
        assert_eq!(get_category(category.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_category_in_use_fails() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let category = create_test_category("Food", TransactionType::Expense, user.id, &connection);
        create_transaction(
            Transaction::build(
                user.id,
                TransactionType::Expense,
                9.99,
                category.id,
                date!(2025 - 03 - 01),
                "Pizza",
            ),
            &connection,
        )
        .unwrap();

        assert_eq!(
            delete_category(category.id, &connection),
            Err(Error::CategoryInUse)
        );
        assert!(get_category(category.id, &connection).is_ok());
    }

    #[test]
    fn delete_missing_category_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_category(999, &connection),
            Err(Error::DeleteMissingCategory)
        );
    }
}
