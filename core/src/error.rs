//! Error types for Draft Desk Core

use std::path::PathBuf;

/// Result type alias for Draft Desk operations
pub type DeskResult<T> = Result<T, DeskError>;

/// Main error type for Draft Desk
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to create configuration directory
    #[error("Failed to create configuration directory: {0}")]
    ConfigDirCreateFailed(PathBuf),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Listing unread threads failed
    #[error("Failed to fetch threads: {0}")]
    Fetch(String),

    /// Draft generation failed; the message is shown to the operator as-is
    #[error("{0}")]
    Generation(String),

    /// Reply dispatch failed
    #[error("Failed to send reply: {0}")]
    Send(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DeskError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a new send error
    pub fn send(msg: impl Into<String>) -> Self {
        Self::Send(msg.into())
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Message suitable for an error banner.
    ///
    /// Generation errors carry the backend's structured detail verbatim, so
    /// they are shown without a prefix; everything else uses its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_message_is_unprefixed() {
        let err = DeskError::generation("Model quota exceeded");
        assert_eq!(err.user_message(), "Model quota exceeded");
        assert_eq!(err.to_string(), "Model quota exceeded");
    }

    #[test]
    fn test_send_message_is_prefixed() {
        let err = DeskError::send("503 Service Unavailable");
        assert_eq!(err.user_message(), "Failed to send reply: 503 Service Unavailable");
    }

    #[test]
    fn test_prefixed_messages() {
        assert_eq!(
            DeskError::fetch("connection refused").to_string(),
            "Failed to fetch threads: connection refused"
        );
        assert_eq!(
            DeskError::validation("Draft is empty").user_message(),
            "Validation error: Draft is empty"
        );
    }
}
