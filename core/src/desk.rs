//! Async driver tying the draft controller to a mail backend
//!
//! Every operator action is dispatched to the [`DraftController`]; the command
//! it returns is awaited against the backend and its outcome dispatched back.
//! The controller lock is released while a request is in flight, so a second
//! action (selecting another thread, say) can proceed and the earlier result
//! is later dropped as stale.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::backend::MailBackend;
use crate::conversation::DisplayUnit;
use crate::lifecycle::{Command, DraftController, DraftState, Event};
use crate::types::{Thread, ThreadSummary};

/// Point-in-time copy of what the rendering layer shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskSnapshot {
    pub unread_count: usize,
    pub threads: Vec<ThreadSummary>,
    pub selected: Option<Thread>,
    pub conversation: Vec<DisplayUnit>,
    pub state: DraftState,
    pub error: Option<String>,
    pub can_send: bool,
}

/// Draft review session bound to a backend
pub struct DraftDesk<B: MailBackend> {
    backend: Arc<B>,
    controller: Arc<Mutex<DraftController>>,
}

impl<B: MailBackend> Clone for DraftDesk<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            controller: Arc::clone(&self.controller),
        }
    }
}

impl<B: MailBackend> DraftDesk<B> {
    pub fn new(backend: B) -> Self {
        Self::with_controller(backend, DraftController::new())
    }

    pub fn with_controller(backend: B, controller: DraftController) -> Self {
        Self {
            backend: Arc::new(backend),
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    /// Fetch the unread threads. Failures leave an empty inbox.
    pub async fn refresh(&self) {
        self.dispatch(Event::RefreshRequested).await;
    }

    /// Select a thread and generate a draft for it
    pub async fn select_thread(&self, thread_id: &str) {
        self.dispatch(Event::ThreadSelected(thread_id.to_string())).await;
    }

    /// Generate again after a failed generation
    pub async fn retry(&self) {
        self.dispatch(Event::RetryRequested).await;
    }

    /// Send the current draft
    pub async fn send(&self) {
        self.dispatch(Event::SendRequested).await;
    }

    /// Replace the draft text
    pub fn edit_draft(&self, text: impl Into<String>) {
        self.apply(Event::DraftEdited(text.into()));
    }

    /// Open a thread with the given text as its draft, without generating one
    pub fn compose(&self, thread_id: &str, text: impl Into<String>) {
        self.apply(Event::DraftComposed {
            thread_id: thread_id.to_string(),
            text: text.into(),
        });
    }

    /// Discard the draft or error, keeping the selection
    pub fn cancel(&self) {
        self.apply(Event::Cancelled);
    }

    /// Run `f` against the controller
    pub fn inspect<R>(&self, f: impl FnOnce(&DraftController) -> R) -> R {
        f(&self.controller.lock())
    }

    pub fn state(&self) -> DraftState {
        self.controller.lock().state().clone()
    }

    pub fn draft(&self) -> Option<String> {
        self.controller.lock().draft().map(str::to_string)
    }

    pub fn snapshot(&self) -> DeskSnapshot {
        let controller = self.controller.lock();
        DeskSnapshot {
            unread_count: controller.unread_count(),
            threads: controller.summaries(),
            selected: controller.selected_thread().cloned(),
            conversation: controller
                .conversation()
                .map(|units| units.collect())
                .unwrap_or_default(),
            state: controller.state().clone(),
            error: controller.error_message().map(str::to_string),
            can_send: controller.can_send(),
        }
    }

    /// Apply an event that never needs the backend
    fn apply(&self, event: Event) {
        if let Some(command) = self.controller.lock().handle(event) {
            debug!("Unexpected command from synchronous event: {:?}", command);
        }
    }

    async fn dispatch(&self, event: Event) {
        let command = self.controller.lock().handle(event);
        if let Some(command) = command {
            let outcome = self.execute(command).await;
            // Completions never produce further work
            self.apply(outcome);
        }
    }

    async fn execute(&self, command: Command) -> Event {
        match command {
            Command::FetchThreads => Event::InboxLoaded(self.backend.list_unread_threads().await),
            Command::GenerateDraft { ticket, thread } => Event::DraftGenerated {
                result: self.backend.generate_draft(&thread).await,
                ticket,
            },
            Command::SendReply { ticket, request } => Event::ReplySent {
                result: self.backend.send_reply(&request).await,
                ticket,
            },
        }
    }
}
