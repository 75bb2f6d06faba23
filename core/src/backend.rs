//! Mail backend abstraction
//!
//! The desk only needs three operations from the outside world. Fetching and
//! sending mail and drafting replies all live behind this trait.

use crate::error::DeskResult;
use crate::types::{SendRequest, Thread};

/// External collaborator providing threads, drafts and delivery
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MailBackend: Send + Sync {
    /// List the unread threads in the inbox
    async fn list_unread_threads(&self) -> DeskResult<Vec<Thread>>;

    /// Generate a draft reply for a thread
    async fn generate_draft(&self, thread: &Thread) -> DeskResult<String>;

    /// Send a reply and mark the thread as handled
    async fn send_reply(&self, request: &SendRequest) -> DeskResult<()>;
}
