// Gateway error taxonomy.
//
// Classification happens once, here, from the reqwest error kind. Session
// code only ever asks `is_transient()`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response (refused, DNS, reset,
    /// timeout). The only retryable class.
    #[error("network error: {0}")]
    Transport(String),

    /// The gateway answered with a non-2xx status.
    #[error("server responded with status {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status { status: u16, message: Option<String> },

    /// A 2xx body that could not be decoded or lacked a required field.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The gateway reported `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// The request could not be built (bad base URL, redirect policy).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_redirect() {
            GatewayError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            GatewayError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Status {
                status: status.as_u16(),
                message: None,
            }
        } else {
            // connect, timeout, request and body errors
            GatewayError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_is_transient() {
        assert!(GatewayError::Transport("refused".into()).is_transient());
        assert!(!GatewayError::Status {
            status: 500,
            message: None
        }
        .is_transient());
        assert!(!GatewayError::Malformed("eof".into()).is_transient());
        assert!(!GatewayError::Rejected("nope".into()).is_transient());
        assert!(!GatewayError::InvalidRequest("bad url".into()).is_transient());
    }

    #[test]
    fn status_display_includes_server_message() {
        let err = GatewayError::Status {
            status: 400,
            message: Some("Missing topic parameter".into()),
        };
        assert_eq!(
            err.to_string(),
            "server responded with status 400: Missing topic parameter"
        );

        let err = GatewayError::Status {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "server responded with status 502: no details");
    }

    #[test]
    fn rejected_display_is_the_bare_message() {
        let err = GatewayError::Rejected("Failed to generate response".into());
        assert_eq!(err.to_string(), "Failed to generate response");
    }

    #[tokio::test]
    async fn invalid_base_url_is_not_transient() {
        let err: GatewayError = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, GatewayError::InvalidRequest(_)), "{err:?}");
        assert!(!err.is_transient());
    }
}
