use thiserror::Error;

/// Failure of a pipeline call, after classification.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Session expired: {message}")]
    Unauthorized { message: String },
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    /// The server answered 2xx with `success: false`.
    #[error("{0}")]
    Application(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Message without the classification prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized { message } | Self::Http { message, .. } => message,
            Self::Network(message)
            | Self::Timeout(message)
            | Self::Application(message)
            | Self::Parse(message)
            | Self::Serialization(message) => message,
        }
    }

    /// HTTP status for transport-level rejections.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Failure below HTTP: the request never produced a status.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Network(String),
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::Timeout("Request timed out. Please try again.".to_string()),
            TransportError::Network(message) => {
                Self::Network(format!("Unable to reach the server: {message}"))
            }
        }
    }
}
