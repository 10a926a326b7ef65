//! Response envelopes: a success wrapper and RFC 7807 problem documents.

use serde::{Deserialize, Serialize};

/// Body of every 2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::wrap(data, None)
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self::wrap(data, Some(message.into()))
    }

    fn wrap(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
        }
    }
}

/// Problem document (RFC 7807) returned for every failed request.
///
/// Only the members the posts API fills are modelled; `type` is always
/// `about:blank`, so `title` is the status phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    /// Client-facing explanation. Never set for 5xx.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    fn problem(status: u16, title: &str, detail: Option<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.to_string(),
            status,
            detail,
        }
    }

    /// 400: unparsable body or bad path parameter.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::problem(400, "Bad Request", Some(detail.into()))
    }

    /// 422: well-formed body with invalid field values.
    pub fn validation_failed(errors: &[String]) -> Self {
        Self::problem(422, "Validation Failed", Some(errors.join(", ")))
    }

    /// 500: storage failure. The cause is logged, not returned.
    pub fn internal_error() -> Self {
        Self::problem(500, "Internal Server Error", None)
    }
}
