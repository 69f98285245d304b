//! Defines the endpoint for listing a user's transactions.

use axum::{Json, extract::State};

use crate::{
    Error,
    app_state::lock_connection,
    extract::{QueryParams, UserQuery},
    transaction::{Transaction, TransactionState, get_transactions_by_user},
};

/// A route handler for listing every transaction of the user given by the `userId` query parameter, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
    QueryParams(query): QueryParams<UserQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let user_id = query.user_id()?;

    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions_by_user(user_id, &connection)?;

    Ok(Json(transactions))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_utils::create_test_server;

    #[tokio::test]
    async fn requires_user_id() {
        let server = create_test_server();

        let response = server.get("/api/transactions").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "message": "User ID is required" }));
    }

    #[tokio::test]
    async fn lists_nothing_for_new_user() {
        let server = create_test_server();

        let response = server
            .get("/api/transactions")
            .add_query_param("userId", 1)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }
}
