//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The JSON fields whose values are never written to the logs.
const REDACTED_FIELDS: [&str; 3] = ["password", "currentPassword", "newPassword"];

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Password fields in JSON request bodies are replaced with asterisks.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    log_request(&parts, &redact_passwords(&body_text));

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn read_body(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Replace the values of password fields in a JSON object with asterisks.
///
/// Text that is not a JSON object is returned unchanged.
fn redact_passwords(body_text: &str) -> String {
    let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(body_text) else {
        return body_text.to_owned();
    };

    let mut redacted = false;
    for field in REDACTED_FIELDS {
        if let Some(value) = fields.get_mut(field) {
            *value = Value::String("********".to_owned());
            redacted = true;
        }
    }

    if redacted {
        Value::Object(fields).to_string()
    } else {
        body_text.to_owned()
    }
}

/// The longest prefix of `text` that is at most `limit` bytes and ends on a character boundary.
fn truncate(text: &str, limit: usize) -> &str {
    let end = (0..=limit.min(text.len()))
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or(0);

    &text[..end]
}

fn log_request(parts: &request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {} {}\nbody: {}...",
            parts.method,
            parts.uri,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!(
            "Received request: {} {}\nbody: {body:?}",
            parts.method,
            parts.uri
        );
    }
}

fn log_response(parts: &response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {}\nbody: {}...",
            parts.status,
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {}\nbody: {body:?}", parts.status);
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{logging_middleware, redact_passwords, truncate};

    #[test]
    fn redacts_password_fields() {
        let body = json!({
            "email": "maria@example.com",
            "password": "hunter2",
            "currentPassword": "hunter2",
            "newPassword": "hunter3",
        })
        .to_string();

        let redacted: Value = serde_json::from_str(&redact_passwords(&body)).unwrap();

        assert_eq!(redacted["email"], "maria@example.com");
        assert_eq!(redacted["password"], "********");
        assert_eq!(redacted["currentPassword"], "********");
        assert_eq!(redacted["newPassword"], "********");
    }

    #[test]
    fn leaves_other_bodies_alone() {
        assert_eq!(redact_passwords("not json"), "not json");
        assert_eq!(redact_passwords("[1,2]"), "[1,2]");
        assert_eq!(redact_passwords(r#"{"name":"Rent"}"#), r#"{"name":"Rent"}"#);
    }

    #[test]
    fn truncates_on_character_boundary() {
        assert_eq!(truncate("hello", 3), "hel");
        assert_eq!(truncate("hi", 10), "hi");
        // "é" is two bytes, so cutting after one byte would split it.
        assert_eq!(truncate("é", 1), "");
    }

    #[tokio::test]
    async fn passes_bodies_through() {
        let app = Router::new()
            .route("/echo", post(|Json(body): Json<Value>| async { Json(body) }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::try_new(app).expect("Could not create test server");

        let response = server
            .post("/echo")
            .json(&json!({ "password": "hunter2" }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "password": "hunter2" }));
    }
}
