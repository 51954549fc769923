/// Error taxonomy for the admin client
///
/// Every failure a panel can run into ends up here. Errors travel inside
/// iced messages, so they carry plain strings and derive `Clone`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    /// The server answered 401. Never shown inline: the login redirect
    /// already tells the user what happened.
    #[error("session expired")]
    AuthExpired,

    /// A capability check failed on the client. No request was sent.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Non-2xx, non-401 reply. `message` is the server's `error` field when
    /// the body had one.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Transport-level failure (connection refused, reset, DNS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The body could not be parsed as the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Client-side input check failed (wrong extension, not an image, ...).
    #[error("{0}")]
    Validation(String),

    /// Local file I/O.
    #[error("I/O error: {0}")]
    Io(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl AdminError {
    /// Should this error be surfaced to the user at all?
    pub fn is_silent(&self) -> bool {
        matches!(self, AdminError::AuthExpired)
    }
}

impl From<std::io::Error> for AdminError {
    fn from(e: std::io::Error) -> Self {
        AdminError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AdminError::MalformedResponse(e.to_string())
        } else {
            AdminError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self {
        AdminError::MalformedResponse(e.to_string())
    }
}

/// Result type alias for admin client operations.
pub type Result<T> = std::result::Result<T, AdminError>;
