use serde::Deserialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("API error (status {status}): {}", .body.summary())]
    Api { status: u16, body: ErrorBody },

    #[error("Invalid URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Application-level failure: the server answered with a non-2xx JSON body.
    pub fn rejection(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::Url(err.to_string())
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn detail(&self) -> Option<String> {
        self.detail.as_ref().and_then(display_text)
    }

    pub fn message(&self) -> Option<String> {
        self.message.as_ref().and_then(display_text)
    }

    fn summary(&self) -> String {
        self.detail()
            .or_else(|| self.message())
            .unwrap_or_else(|| "no detail".to_string())
    }
}

// Empty strings and nulls count as absent; structured details (validation
// error lists) are shown as their JSON text.
fn display_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.is_empty() => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn error_body__should_read_string_detail() {
        // Given
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Already removed"}"#).expect("parse body");

        // Then
        assert_eq!(body.detail().as_deref(), Some("Already removed"));
        assert_eq!(body.message(), None);
    }

    #[test]
    fn error_body__should_treat_empty_and_null_as_absent() {
        // Given
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"","message":null}"#).expect("parse body");

        // Then
        assert_eq!(body.detail(), None);
        assert_eq!(body.message(), None);
    }

    #[test]
    fn error_body__should_render_structured_detail_as_json() {
        // Given
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["query","email"]}]}"#).expect("parse body");

        // Then
        assert_eq!(
            body.detail().as_deref(),
            Some(r#"[{"loc":["query","email"]}]"#)
        );
    }

    #[test]
    fn api_error__should_describe_rejection() {
        // Given
        let err = ApiError::Api {
            status: 404,
            body: ErrorBody {
                detail: Some(serde_json::Value::String("Activity not found".to_string())),
                message: None,
            },
        };

        // Then
        assert_eq!(err.to_string(), "API error (status 404): Activity not found");
        assert!(err.rejection().is_some());
        assert!(ApiError::Network("refused".to_string()).rejection().is_none());
    }
}
