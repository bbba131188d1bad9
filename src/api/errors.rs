use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::agents::OrchestratorError;

/// Response header carrying the machine-readable error code
pub const ERROR_CODE_HEADER: HeaderName = HeaderName::from_static("x-error-code");

/// API error type with HTTP status code, error code and message
///
/// The body is the plain-text message; the code travels in `x-error-code`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error for a body we could not read
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.message).into_response();
        response
            .headers_mut()
            .insert(ERROR_CODE_HEADER, HeaderValue::from_static(self.code));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_intent_is_bad_request() {
        let err = ApiError::from(OrchestratorError::NoIntentMatched("hello".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "no_intent_matched");
    }

    #[test]
    fn routing_and_transport_failures_are_internal() {
        for err in [
            OrchestratorError::AgentNotRegistered("x".into()),
            OrchestratorError::unavailable("x", "down"),
            OrchestratorError::transport("x", "HTTP 500"),
        ] {
            assert_eq!(ApiError::from(err).status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn response_is_plain_text_with_code_header() {
        let response = ApiError::invalid_request("invalid JSON").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ERROR_CODE_HEADER], "invalid_request");
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"invalid JSON");
    }
}
