//! Custom error types for resto-rs
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the resto-rs application
#[derive(Error, Debug)]
pub enum RestoError {
    /// User is not logged in
    #[error("You are not logged in.\n\n  → Run 'resto auth login' to sign in.")]
    NotAuthenticated,

    /// Login was rejected by the backend
    #[error("Login failed: {0}\n\n  → Check your email, password and restaurant slug.")]
    LoginFailed(String),

    /// Role is not allowed to use the requested screen or command
    #[error("Access denied: {0}\n\n  → Ask a restaurant admin to grant your account the right role.")]
    AccessDenied(String),

    /// Resource does not exist on the backend
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend throttled the request
    #[error("The server is rate limiting requests.\n\n  → Wait a minute and try again.")]
    RateLimited,

    /// Backend answered with a non-success status
    #[error("API request failed ({status}): {message}\n\n  → Check that the backend at 'resto config get api-url' is reachable.")]
    Api { status: u16, message: String },

    /// Credential storage error
    #[error("Cannot access secure storage: {0}\n\n  → On macOS: Make sure Keychain Access is available.\n  → On Linux: Ensure a secret service (like gnome-keyring) is running.")]
    Credential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// Network request error
    #[error("Network request failed: {0}\n\n  → Check your internet connection and the configured API URL.")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Invalid base URL
    #[error("Invalid API URL: {0}\n\n  → Example: resto config set api-url http://localhost:5000")]
    InvalidUrl(#[from] url::ParseError),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),

    /// Operation cancelled by user
    #[error("Operation cancelled.")]
    Cancelled,
}

impl From<keyring::Error> for RestoError {
    fn from(err: keyring::Error) -> Self {
        RestoError::Credential(err.to_string())
    }
}

impl From<toml::de::Error> for RestoError {
    fn from(err: toml::de::Error) -> Self {
        RestoError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for RestoError {
    fn from(err: toml::ser::Error) -> Self {
        RestoError::Toml(err.to_string())
    }
}

/// Result type alias using RestoError
pub type Result<T> = std::result::Result<T, RestoError>;
