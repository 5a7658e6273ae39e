//! Response status handling
//!
//! The tracker reports failures as a non-2xx status with a JSON body of
//! `{"detail": ...}`, where `detail` is either a message or a list of field
//! validation errors.

use crate::error::{Error, Result};
use serde_json::Value;

/// Pass successful responses through; turn anything else into an [`Error`]
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = detail_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(Error::NotFound(message));
    }
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

/// Extract `detail` from an error body
pub fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => match validation_field(item) {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    },
                    None => item.to_string(),
                })
                .collect();
            Some(parts.join("; "))
        }
        other => Some(other.to_string()),
    }
}

/// Last element of a validation error's `loc`, e.g. `key` in `["body", "key"]`
fn validation_field(item: &Value) -> Option<String> {
    item.get("loc")?
        .as_array()?
        .last()
        .map(|part| match part {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

/// Decode a success body; empty bodies read as `null`
pub async fn read_json(resp: reqwest::Response) -> Result<Value> {
    let text = resp.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body.to_string())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "[]");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn check_response_string_detail() {
        let resp = mock_response(400, r#"{"detail": "Project key 'DTB' already exists"}"#);
        let err = check_response(resp).await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Project key 'DTB' already exists");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn check_response_not_found() {
        let resp = mock_response(404, r#"{"detail": "Task not found"}"#);
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Task not found"));
    }

    #[tokio::test]
    async fn check_response_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "key"], "msg": "field required", "type": "value_error.missing"}]}"#;
        let err = check_response(mock_response(422, body)).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 422, ref message } if message == "key: field required"));
    }

    #[tokio::test]
    async fn check_response_without_body() {
        let err = check_response(mock_response(500, "")).await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 500, ref message } if message == "Internal Server Error"));
    }

    #[tokio::test]
    async fn read_json_empty_body() {
        assert_eq!(read_json(mock_response(200, "")).await.unwrap(), Value::Null);
        assert_eq!(
            read_json(mock_response(200, r#"{"success": true}"#))
                .await
                .unwrap(),
            serde_json::json!({"success": true})
        );
    }
}
