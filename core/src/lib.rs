//! Draft Desk Core Library
//!
//! This crate contains the core logic for reviewing AI-drafted email replies:
//! - Message parsing (quoted text and attribution stripping)
//! - Conversation reconstruction from flattened thread histories
//! - The draft lifecycle state machine and its async driver
//! - The mail backend abstraction and its HTTP implementation

pub mod backend;
pub mod config;
pub mod conversation;
pub mod desk;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod types;

// Re-export commonly used types
pub use backend::MailBackend;
pub use config::Config;
pub use conversation::{reconstruct, DisplayUnit, Exchanges};
pub use desk::{DeskSnapshot, DraftDesk};
pub use error::{DeskError, DeskResult};
pub use http::HttpBackend;
pub use lifecycle::{Command, DraftController, DraftState, Event, Ticket};
pub use message::{parse_message, ParsedMessage};
pub use types::{SendRequest, Thread, ThreadSummary};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Draft Desk";

/// Default configuration directory name
pub const CONFIG_DIR_NAME: &str = "draftdesk";

/// Default configuration filename
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default inbox service address
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8001";

/// Initialize the core library
pub fn init() -> DeskResult<()> {
    tracing::info!("Initializing Draft Desk Core v{}", VERSION);
    Ok(())
}

/// Get the default configuration directory.
///
/// Only resolves the path; [`Config::save`] creates it.
pub fn get_config_dir() -> std::path::PathBuf {
    std::env::var("DRAFTDESK_CONFIG_DIR")
        .map(std::path::PathBuf::from)
        .or_else(|_| {
            directories::ProjectDirs::from("", "", CONFIG_DIR_NAME)
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or(std::env::VarError::NotPresent)
        })
        .unwrap_or_else(|_| std::path::PathBuf::from("~/.config/draftdesk"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_dir_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let wanted = temp_dir.path().join("not-yet");
        std::env::set_var("DRAFTDESK_CONFIG_DIR", &wanted);

        let resolved = get_config_dir();
        let config = Config::default();

        std::env::remove_var("DRAFTDESK_CONFIG_DIR");
        assert_eq!(resolved, wanted);
        assert_eq!(config.app.config_dir, wanted);
        assert!(!wanted.exists());
    }
}
