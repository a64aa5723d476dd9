//! Error response body (RFC 7807 problem details).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// ID of the request that failed, as sent in `X-Request-ID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    /// Non-standard 499: the caller went away or its deadline elapsed.
    pub fn cancelled(detail: impl Into<String>) -> Self {
        Self::new(499, "Client Closed Request").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }

    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::new(503, "Service Unavailable").with_detail(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let body = serde_json::to_value(ErrorResponse::internal_error()).unwrap();

        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 500);
        assert!(body.get("detail").is_none());
        assert!(body.get("request_id").is_none());
    }

    #[test]
    fn test_request_id_is_serialized_when_set() {
        let body =
            serde_json::to_value(ErrorResponse::not_found("gone").with_request_id("trace-42"))
                .unwrap();

        assert_eq!(body["request_id"], "trace-42");
    }

    #[test]
    fn test_constructors_set_status_and_detail() {
        let body = ErrorResponse::not_found("post abc not found");
        assert_eq!(body.status, 404);
        assert_eq!(body.detail.as_deref(), Some("post abc not found"));

        let body = ErrorResponse::cancelled("get cancelled");
        assert_eq!(body.status, 499);
        assert_eq!(body.title, "Client Closed Request");
    }
}
