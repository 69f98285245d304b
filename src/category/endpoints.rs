//! Route handlers for listing, creating, editing and deleting categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    Error,
    app_state::lock_connection,
    category::{
        Category, CategoryFields, CategoryState, NewCategory, create_category, delete_category,
        get_categories_by_user, update_category,
    },
    database_id::CategoryId,
    extract::{JsonBody, QueryParams, UserQuery, require_text},
    transaction::TransactionType,
    user::UserId,
};

/// The request body for creating or editing a category.
///
/// `user_id` is only read when creating a category.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    /// The user that will own the category.
    pub user_id: Option<UserId>,
    /// The display name.
    pub name: Option<String>,
    /// The icon name.
    pub icon: Option<String>,
    /// Whether the category is for income or expenses.
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
}

impl CategoryForm {
    fn fields(self, message: &str) -> Result<CategoryFields, Error> {
        Ok(CategoryFields {
            name: require_text(self.name, message)?,
            icon: require_text(self.icon, message)?,
            transaction_type: self
                .transaction_type
                .ok_or_else(|| Error::MissingField(message.to_owned()))?,
        })
    }
}

/// A route handler for listing the categories of the user given by the `userId` query parameter.
pub async fn get_categories_endpoint(
    State(state): State<CategoryState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Vec<Category>>, Error> {
    let user_id = query.user_id()?;

    let connection = lock_connection(&state.db_connection)?;
    let categories = get_categories_by_user(user_id, &connection)?;

    Ok(Json(categories))
}

/// A route handler for creating a category, responds with the category and status 201.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    JsonBody(mut form): JsonBody<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    const REQUIRED: &str = "All fields are required";
    let user_id = form
        .user_id
        .take()
        .ok_or_else(|| Error::MissingField(REQUIRED.to_owned()))?;
    let fields = form.fields(REQUIRED)?;

    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(
        NewCategory {
            user_id,
            name: fields.name,
            icon: fields.icon,
            transaction_type: fields.transaction_type,
        },
        &connection,
    )?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for replacing the name, icon and type of a category.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<CategoryId>,
    JsonBody(form): JsonBody<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let fields = form.fields("Name, icon and type are required")?;

    let connection = lock_connection(&state.db_connection)?;
    let category = update_category(category_id, fields, &connection)?;

    Ok(Json(category))
}

/// A route handler for deleting a category, responds with status 204.
///
/// Categories that transactions still refer to are not deleted and the
/// response is a 409 conflict.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<CategoryId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match delete_category(category_id, &connection) {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(Error::CategoryInUse) => {
            tracing::debug!("refused to delete category {category_id} as it is in use");
            Err(Error::CategoryInUse)
        }
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        category::Category,
        test_utils::{
            create_category_via_api, create_test_server, create_transaction_via_api,
            register_and_log_in,
        },
        transaction::TransactionType,
    };

    #[tokio::test]
    async fn creates_and_lists_categories() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let salary =
            create_category_via_api(&server, user.id, "Salary", TransactionType::Income).await;

        let response = server
            .get("/api/categories")
            .add_query_param("userId", user.id)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Category>>(), vec![salary]);
    }

    #[tokio::test]
    async fn serializes_type_field() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;

        let response = server
            .post("/api/categories")
            .json(&json!({
                "userId": user.id,
                "name": "Salary",
                "icon": "Briefcase",
                "type": "income",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["type"], "income");
        assert_eq!(body["userId"], json!(user.id));
    }

    #[tokio::test]
    async fn create_requires_all_fields() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;

        let response = server
            .post("/api/categories")
            .json(&json!({ "userId": user.id, "name": "Salary" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "All fields are required" }));
    }

    #[tokio::test]
    async fn updates_category() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let category =
            create_category_via_api(&server, user.id, "Food", TransactionType::Expense).await;

        let response = server
            .put(&format!("/api/categories/{}", category.id))
            .json(&json!({ "name": "Groceries", "icon": "Apple", "type": "expense" }))
            .await;

        response.assert_status_ok();
        let updated = response.json::<Category>();
        assert_eq!(updated.name, "Groceries");
        assert_eq!(updated.icon, "Apple");
    }

    #[tokio::test]
    async fn deletes_unused_category() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let category =
            create_category_via_api(&server, user.id, "Food", TransactionType::Expense).await;

        server
            .delete(&format!("/api/categories/{}", category.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn deleting_category_in_use_is_a_conflict() {
        let server = create_test_server();
        let user = register_and_log_in(&server, "test@example.com").await;
        let category =
            create_category_via_api(&server, user.id, "Food", TransactionType::Expense).await;
        create_transaction_via_api(
            &server,
            json!({
                "userId": user.id,
                "transactionData": {
                    "type": "expense",
                    "amount": 10,
                    "categoryId": category.id,
                    "date": "2024-01-15",
                },
            }),
        )
        .await;

        let response = server
            .delete(&format!("/api/categories/{}", category.id))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        response.assert_json(&json!({
            "message": "Cannot delete category as it is currently in use by one or more transactions."
        }));
    }

    #[tokio::test]
    async fn deleting_missing_category_is_not_found() {
        let server = create_test_server();

        server
            .delete("/api/categories/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
