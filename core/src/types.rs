//! Core types exchanged with the mail backend and the rendering layer

use serde::{Deserialize, Serialize};

use crate::conversation::{reconstruct, Exchanges};

/// Unread email thread as delivered by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: String,
    pub subject: String,
    pub sender: String,               // "Display Name <address>"
    pub history: String,              // messages joined by the segment separator
}

impl Thread {
    pub fn new(
        thread_id: impl Into<String>,
        subject: impl Into<String>,
        sender: impl Into<String>,
        history: impl Into<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            subject: subject.into(),
            sender: sender.into(),
            history: history.into(),
        }
    }

    /// Display name part of the sender, or the whole sender if it has no address part
    pub fn sender_name(&self) -> &str {
        sender_name(&self.sender)
    }

    /// Uppercased first letter of the sender name
    pub fn sender_initial(&self) -> Option<char> {
        self.sender_name()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
    }

    /// First physical line of the history
    pub fn preview(&self) -> &str {
        self.history.split('\n').next().unwrap_or_default()
    }

    /// Question/response exchanges reconstructed from the history
    pub fn exchanges(&self) -> Exchanges<'_> {
        reconstruct(&self.history)
    }

    /// Inbox row for this thread
    pub fn summary(&self, active: bool) -> ThreadSummary {
        ThreadSummary {
            thread_id: self.thread_id.clone(),
            sender_name: self.sender_name().to_string(),
            sender_initial: self.sender_initial(),
            subject: self.subject.clone(),
            preview: self.preview().to_string(),
            active,
        }
    }

    /// Reply addressed back to the sender of this thread
    pub fn reply(&self, response: impl Into<String>) -> SendRequest {
        SendRequest {
            thread_id: self.thread_id.clone(),
            response: response.into(),
            recipient: self.sender.clone(),
            subject: self.subject.clone(),
        }
    }
}

/// Text before the first `<` of a `"Name <address>"` sender, trimmed
pub fn sender_name(sender: &str) -> &str {
    sender.split('<').next().unwrap_or_default().trim()
}

/// Inbox list row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThreadSummary {
    pub thread_id: String,
    pub sender_name: String,
    pub sender_initial: Option<char>,
    pub subject: String,
    pub preview: String,
    pub active: bool,
}

/// Body of a send-reply request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub thread_id: String,
    pub response: String,
    pub recipient: String,
    pub subject: String,
}
