use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};

use crate::{
    build_router,
    category::Category,
    test_utils::{TEST_PASSWORD, get_test_app_state},
    transaction::{Transaction, TransactionType},
    user::{UserId, UserProfile},
};

pub(crate) fn create_test_server() -> TestServer {
    TestServer::try_new(build_router(get_test_app_state())).expect("Could not create test server")
}

/// Register a new user through the API and log them in, returning their profile.
pub(crate) async fn register_and_log_in(server: &TestServer, email: &str) -> UserProfile {
    server
        .post("/api/auth/register")
        .json(&json!({
            "fullName": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;
    response.assert_status_ok();

    response.json::<UserProfile>()
}

pub(crate) async fn create_category_via_api(
    server: &TestServer,
    user_id: UserId,
    name: &str,
    transaction_type: TransactionType,
) -> Category {
    let response = server
        .post("/api/categories")
        .json(&json!({
            "userId": user_id,
            "name": name,
            "icon": "ShoppingCart",
            "type": transaction_type,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Category>()
}

/// Post `body` to the transaction endpoint and return the created transactions.
pub(crate) async fn create_transaction_via_api(
    server: &TestServer,
    body: Value,
) -> Vec<Transaction> {
    let response = server.post("/api/transactions").json(&body).await;
    response.assert_status(StatusCode::CREATED);

    response.json::<Vec<Transaction>>()
}
