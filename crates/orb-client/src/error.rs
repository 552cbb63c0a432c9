//! Client error types.

use std::time::Duration;

use orb_core::ModelError;

/// Errors that can occur when using the Orb client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-2xx response.
    #[error("API error: {status} - {}", problem_message(.detail, .title, .body))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
        /// Problem title, when the body is a problem document.
        title: Option<String>,
        /// Problem detail, when the body is a problem document.
        detail: Option<String>,
        /// Problem type URI, when the body is a problem document.
        error_type: Option<String>,
        /// Delay requested by a `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// A required request value was not set.
    #[error("missing required argument: {name}")]
    MissingArgument {
        /// Name of the missing value.
        name: &'static str,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[source] ModelError),

    /// A decoded response failed structural validation.
    #[error("response validation failed: {0}")]
    Validation(#[source] ModelError),

    /// Request body serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A URL could not be built from the base URL and route.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Problem document returned by the API on errors.
#[derive(Debug, serde::Deserialize)]
struct ProblemBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
}

fn problem_message<'a>(
    detail: &'a Option<String>,
    title: &'a Option<String>,
    body: &'a str,
) -> &'a str {
    detail.as_deref().or(title.as_deref()).unwrap_or(body)
}

impl ClientError {
    /// Build an [`ClientError::Api`] from a raw error response.
    ///
    /// The problem fields are filled in when the body parses; the raw body is
    /// always kept.
    #[must_use]
    pub fn api(status: u16, body: String, retry_after: Option<Duration>) -> Self {
        let problem = serde_json::from_str::<ProblemBody>(&body).ok();
        let (title, detail, error_type) = problem
            .map(|p| (p.title, p.detail, p.error_type))
            .unwrap_or_default();
        Self::Api {
            status,
            body,
            title,
            detail,
            error_type,
            retry_after,
        }
    }

    /// HTTP status code, for API errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Timeouts, connection failures, 408, 409, 429 and 5xx responses are
    /// retryable. Everything raised before a request is sent is not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Api { status, .. } => matches!(status, 408 | 409 | 429) || *status >= 500,
            Self::MissingArgument { .. }
            | Self::Decode(_)
            | Self::Validation(_)
            | Self::Serialization(_)
            | Self::InvalidUrl(_)
            | Self::Configuration(_) => false,
        }
    }

    /// Delay the server asked for before retrying.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_body_is_parsed() {
        let err = ClientError::api(
            404,
            r#"{"type":"https://docs.withorb.com/reference/error-responses#404-resource-not-found","status":404,"title":"Not found","detail":"No plan with id plan_x"}"#.to_string(),
            None,
        );
        match &err {
            ClientError::Api {
                status,
                title,
                detail,
                error_type,
                ..
            } => {
                assert_eq!(*status, 404);
                assert_eq!(title.as_deref(), Some("Not found"));
                assert_eq!(detail.as_deref(), Some("No plan with id plan_x"));
                assert!(error_type.as_deref().unwrap().ends_with("404-resource-not-found"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
        assert_eq!(err.to_string(), "API error: 404 - No plan with id plan_x");
    }

    #[test]
    fn test_raw_body_is_kept_when_not_json() {
        let err = ClientError::api(502, "Bad Gateway".to_string(), None);
        assert_eq!(err.to_string(), "API error: 502 - Bad Gateway");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_retryable_statuses() {
        for status in [408, 409, 429, 500, 503] {
            assert!(ClientError::api(status, String::new(), None).is_retryable());
        }
        for status in [400, 401, 404, 422] {
            assert!(!ClientError::api(status, String::new(), None).is_retryable());
        }
        assert!(!ClientError::MissingArgument { name: "plan_id" }.is_retryable());
    }
}
