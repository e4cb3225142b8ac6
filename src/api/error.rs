use reqwest::StatusCode;
use thiserror::Error;

/// How a call to the course service failed.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("server responded with {status}: {body}")]
    Server { status: StatusCode, body: String },

    /// The request went out but no response came back (including timeouts).
    #[error("no response from server: {message}")]
    Network { message: String },

    /// The request could not be built or its result could not be used.
    #[error("request failed: {message}")]
    Request { message: String },
}

impl ApiError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Server { .. } => "server",
            ApiError::Network { .. } => "network",
            ApiError::Request { .. } => "request",
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }

    pub fn is_server_fault(&self) -> bool {
        self.status().is_some_and(|s| s.is_server_error())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::request(err.to_string())
        } else if err.is_timeout() {
            ApiError::network(err.to_string())
        } else if err.is_decode() {
            ApiError::request(format!("invalid response body: {}", err))
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ApiError::network(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Server {
                status,
                body: String::new(),
            }
        } else {
            ApiError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_ranges() {
        let bad_request = ApiError::Server {
            status: StatusCode::BAD_REQUEST,
            body: "{}".to_string(),
        };
        assert!(bad_request.is_client_fault());
        assert!(!bad_request.is_server_fault());

        let crashed = ApiError::Server {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        assert!(crashed.is_server_fault());

        let offline = ApiError::network("connection refused");
        assert!(!offline.is_client_fault());
        assert!(!offline.is_server_fault());
        assert_eq!(offline.kind(), "network");
    }
}
