//! The uniform response envelope.
//!
//! Every endpoint answers `{success, data?, error?, message?}`; the HTTP
//! status carries the error kind while the envelope carries the text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Response body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 200 with data.
pub fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }),
    )
        .into_response()
}

/// 201 with the created entity.
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }),
    )
        .into_response()
}

/// 200 with a message and no data (logout, deletes).
pub fn ok_message(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(Envelope::<()> {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }),
    )
        .into_response()
}

/// 200 with both data and a message (status toggles).
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }),
    )
        .into_response()
}

/// An error envelope with the given status.
pub fn error(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(Envelope::<()> {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope_shape() {
        let envelope = Envelope {
            success: true,
            data: Some(serde_json::json!({"id": 1})),
            error: None,
            message: None,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("error").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_error_envelope_shape() {
        let envelope = Envelope::<()> {
            success: false,
            data: None,
            error: Some("Customer not found".to_string()),
            message: None,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Customer not found");
        assert!(json.get("data").is_none());
    }
}
