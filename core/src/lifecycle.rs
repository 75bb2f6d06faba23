//! Draft lifecycle state machine
//!
//! [`DraftController`] owns the unread threads and the single active session
//! (selected thread, draft text, lifecycle state). It never talks to the
//! backend itself: [`DraftController::handle`] applies an [`Event`] and returns
//! the [`Command`] the caller must run, and the outcome of that command comes
//! back as another event carrying the same [`Ticket`].

use std::fmt;

use tracing::{debug, info, warn};

use crate::conversation::Exchanges;
use crate::error::DeskError;
use crate::types::{SendRequest, Thread, ThreadSummary};

/// Shown when a generation failure carries no detail of its own
pub const DEFAULT_GENERATION_ERROR: &str = "Failed to generate draft.";

/// Identifies one in-flight backend request.
///
/// A completion is applied only while the controller still waits on the same
/// ticket, so results for a thread the operator has since left are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub thread_id: String,
    pub seq: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.thread_id, self.seq)
    }
}

/// Lifecycle state of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftState {
    /// Nothing in flight; a thread may still be selected
    Idle,
    /// Unread threads are being fetched
    Loading,
    /// A draft is being generated for the selected thread
    Generating { ticket: Ticket },
    /// A draft is available for editing; `notice` holds the last send failure
    Ready { draft: String, notice: Option<String> },
    /// Generation failed
    Error { message: String },
    /// The draft is being sent
    Sending { ticket: Ticket, draft: String },
}

impl DraftState {
    /// Short label for status bars and logs
    pub fn label(&self) -> &'static str {
        match self {
            DraftState::Idle => "idle",
            DraftState::Loading => "loading",
            DraftState::Generating { .. } => "generating",
            DraftState::Ready { .. } => "ready",
            DraftState::Error { .. } => "error",
            DraftState::Sending { .. } => "sending",
        }
    }
}

impl fmt::Display for DraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs to the state machine: operator actions and backend completions
#[derive(Debug)]
pub enum Event {
    RefreshRequested,
    InboxLoaded(Result<Vec<Thread>, DeskError>),
    ThreadSelected(String),
    DraftGenerated {
        ticket: Ticket,
        result: Result<String, DeskError>,
    },
    DraftEdited(String),
    /// Open a thread with operator-supplied text instead of generating
    DraftComposed { thread_id: String, text: String },
    Cancelled,
    RetryRequested,
    SendRequested,
    ReplySent {
        ticket: Ticket,
        result: Result<(), DeskError>,
    },
}

/// Backend work requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchThreads,
    GenerateDraft { ticket: Ticket, thread: Thread },
    SendReply { ticket: Ticket, request: SendRequest },
}

/// Owner of the unread threads and the active draft session
#[derive(Debug)]
pub struct DraftController {
    threads: Vec<Thread>,
    selected: Option<String>,
    state: DraftState,
    next_seq: u64,
    fallback_error: String,
}

impl Default for DraftController {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftController {
    pub fn new() -> Self {
        Self::with_fallback_error(DEFAULT_GENERATION_ERROR)
    }

    /// Controller that reports `message` for generation failures without detail
    pub fn with_fallback_error(message: impl Into<String>) -> Self {
        Self {
            threads: Vec::new(),
            selected: None,
            state: DraftState::Idle,
            next_seq: 0,
            fallback_error: message.into(),
        }
    }

    /// Apply one event and return the backend work it calls for, if any
    pub fn handle(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::RefreshRequested => self.refresh(),
            Event::InboxLoaded(result) => {
                self.inbox_loaded(result);
                None
            }
            Event::ThreadSelected(thread_id) => self.select(thread_id),
            Event::DraftGenerated { ticket, result } => {
                self.draft_generated(ticket, result);
                None
            }
            Event::DraftEdited(text) => {
                self.edit(text);
                None
            }
            Event::DraftComposed { thread_id, text } => {
                self.compose(thread_id, text);
                None
            }
            Event::Cancelled => {
                self.cancel();
                None
            }
            Event::RetryRequested => self.retry(),
            Event::SendRequested => self.send(),
            Event::ReplySent { ticket, result } => {
                self.reply_sent(ticket, result);
                None
            }
        }
    }

    fn refresh(&mut self) -> Option<Command> {
        if self.state != DraftState::Idle {
            debug!("Ignoring refresh while {}", self.state);
            return None;
        }
        self.state = DraftState::Loading;
        Some(Command::FetchThreads)
    }

    fn inbox_loaded(&mut self, result: Result<Vec<Thread>, DeskError>) {
        if self.state != DraftState::Loading {
            debug!("Ignoring inbox result while {}", self.state);
            return;
        }
        self.threads = match result {
            Ok(threads) => {
                info!("Loaded {} unread threads", threads.len());
                threads
            }
            Err(e) => {
                warn!("Error fetching threads: {}", e);
                Vec::new()
            }
        };
        if let Some(id) = &self.selected {
            if !self.threads.iter().any(|t| &t.thread_id == id) {
                self.selected = None;
            }
        }
        self.state = DraftState::Idle;
    }

    fn select(&mut self, thread_id: String) -> Option<Command> {
        if self.selected.as_deref() == Some(thread_id.as_str()) {
            return None;
        }
        if self.is_locked() {
            debug!("Ignoring selection of {} while {}", thread_id, self.state);
            return None;
        }
        if self.thread(&thread_id).is_none() {
            warn!("Cannot select unknown thread {}", thread_id);
            return None;
        }
        self.selected = Some(thread_id);
        self.start_generation()
    }

    fn retry(&mut self) -> Option<Command> {
        if matches!(self.state, DraftState::Error { .. }) {
            self.start_generation()
        } else {
            debug!("Ignoring retry while {}", self.state);
            None
        }
    }

    /// Open a fresh session for the selected thread. Any previous draft,
    /// error or in-flight ticket is superseded.
    fn start_generation(&mut self) -> Option<Command> {
        let thread = self.selected_thread()?.clone();
        let ticket = self.issue_ticket(&thread.thread_id);
        info!("Generating draft for thread {}", ticket);
        self.state = DraftState::Generating {
            ticket: ticket.clone(),
        };
        Some(Command::GenerateDraft { ticket, thread })
    }

    fn draft_generated(&mut self, ticket: Ticket, result: Result<String, DeskError>) {
        match &self.state {
            DraftState::Generating { ticket: current } if *current == ticket => {}
            _ => {
                debug!("Discarding stale draft for {}", ticket);
                return;
            }
        }
        self.state = match result {
            Ok(draft) => DraftState::Ready { draft, notice: None },
            Err(e) => {
                warn!("Error generating draft for {}: {}", ticket, e);
                DraftState::Error {
                    message: self.generation_message(&e),
                }
            }
        };
    }

    fn generation_message(&self, error: &DeskError) -> String {
        match error {
            DeskError::Generation(detail) if !detail.trim().is_empty() => detail.clone(),
            _ => self.fallback_error.clone(),
        }
    }

    fn edit(&mut self, text: String) {
        if let DraftState::Ready { draft, .. } = &mut self.state {
            *draft = text;
        } else if self.state == DraftState::Idle && self.selected.is_some() {
            self.state = DraftState::Ready {
                draft: text,
                notice: None,
            };
        } else {
            debug!("Ignoring edit while {}", self.state);
        }
    }

    fn compose(&mut self, thread_id: String, text: String) {
        if self.is_locked() {
            debug!("Ignoring manual draft for {} while {}", thread_id, self.state);
            return;
        }
        if self.thread(&thread_id).is_none() {
            warn!("Cannot open unknown thread {}", thread_id);
            return;
        }
        info!("Opening manual draft for thread {}", thread_id);
        self.selected = Some(thread_id);
        self.state = DraftState::Ready {
            draft: text,
            notice: None,
        };
    }

    /// The session cannot change while the inbox reloads or a reply is in flight
    fn is_locked(&self) -> bool {
        matches!(self.state, DraftState::Loading | DraftState::Sending { .. })
    }

    fn cancel(&mut self) {
        match self.state {
            DraftState::Ready { .. } | DraftState::Error { .. } => self.state = DraftState::Idle,
            _ => debug!("Ignoring cancel while {}", self.state),
        }
    }

    fn send(&mut self) -> Option<Command> {
        let draft = match &self.state {
            DraftState::Ready { draft, .. } if !draft.is_empty() => draft.clone(),
            _ => {
                debug!("Ignoring send while {}", self.state);
                return None;
            }
        };
        let request = self.selected_thread()?.reply(draft.clone());
        let ticket = self.issue_ticket(&request.thread_id);
        info!("Sending reply for thread {}", ticket);
        self.state = DraftState::Sending {
            ticket: ticket.clone(),
            draft,
        };
        Some(Command::SendReply { ticket, request })
    }

    fn reply_sent(&mut self, ticket: Ticket, result: Result<(), DeskError>) {
        let current = matches!(
            &self.state,
            DraftState::Sending { ticket: t, .. } if *t == ticket
        );

        match result {
            Ok(()) => {
                info!("Reply sent for thread {}", ticket);
                self.threads.retain(|t| t.thread_id != ticket.thread_id);
                if current || self.selected.as_deref() == Some(ticket.thread_id.as_str()) {
                    self.selected = None;
                    self.state = DraftState::Idle;
                }
            }
            Err(e) if current => {
                warn!("Error sending reply for {}: {}", ticket, e);
                if let DraftState::Sending { draft, .. } =
                    std::mem::replace(&mut self.state, DraftState::Idle)
                {
                    self.state = DraftState::Ready {
                        draft,
                        notice: Some(e.user_message()),
                    };
                }
            }
            Err(e) => warn!("Dropping failed send for superseded session {}: {}", ticket, e),
        }
    }

    fn issue_ticket(&mut self, thread_id: &str) -> Ticket {
        self.next_seq += 1;
        Ticket {
            thread_id: thread_id.to_string(),
            seq: self.next_seq,
        }
    }

    // Read-side accessors for the rendering layer

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn unread_count(&self) -> usize {
        self.threads.len()
    }

    pub fn thread(&self, thread_id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.thread_id == thread_id)
    }

    pub fn summaries(&self) -> Vec<ThreadSummary> {
        self.threads
            .iter()
            .map(|t| t.summary(self.selected.as_deref() == Some(t.thread_id.as_str())))
            .collect()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_thread(&self) -> Option<&Thread> {
        self.thread(self.selected.as_deref()?)
    }

    /// Exchanges of the selected thread
    pub fn conversation(&self) -> Option<Exchanges<'_>> {
        self.selected_thread().map(Thread::exchanges)
    }

    /// Current draft text, including while it is being sent
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            DraftState::Ready { draft, .. } | DraftState::Sending { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Message for the error banner: a generation failure or the last send failure
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            DraftState::Error { message } => Some(message),
            DraftState::Ready {
                notice: Some(notice),
                ..
            } => Some(notice),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            DraftState::Loading | DraftState::Generating { .. } | DraftState::Sending { .. }
        )
    }

    pub fn can_send(&self) -> bool {
        matches!(&self.state, DraftState::Ready { draft, .. } if !draft.is_empty())
    }
}
