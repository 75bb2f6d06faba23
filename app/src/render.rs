//! Plain-text rendering of desk state

use std::fmt::Write;

use draftdesk_core::{DisplayUnit, DraftState, Thread, ThreadSummary};

/// Inbox listing: unread count, then one entry per thread
pub fn inbox(threads: &[ThreadSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Unread: {}", threads.len());

    for summary in threads {
        let initial = summary.sender_initial.unwrap_or('?');
        let _ = writeln!(
            out,
            "{} [{}] {}  {}  ({})",
            if summary.active { '*' } else { ' ' },
            initial,
            summary.sender_name,
            summary.subject,
            summary.thread_id
        );
        if !summary.preview.is_empty() {
            let _ = writeln!(out, "      {}", summary.preview);
        }
    }
    out
}

fn heading(label: &str, time: &str) -> String {
    if time.is_empty() {
        format!("{}:", label)
    } else {
        format!("{} ({}):", label, time)
    }
}

/// Reconstructed conversation of one thread
pub fn conversation(thread: &Thread, units: &[DisplayUnit]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", thread.subject);
    let _ = writeln!(out, "From: {}", thread.sender);

    for unit in units {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", heading(thread.sender_name(), &unit.question_time));
        let _ = writeln!(out, "{}", unit.question_text);
        if unit.has_response {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", heading("Reply", &unit.response_time));
            let _ = writeln!(out, "{}", unit.response_text);
        }
    }
    out
}

/// Draft panel for the current state
pub fn draft(state: &DraftState) -> String {
    match state {
        DraftState::Ready { draft, notice } => {
            let mut out = String::new();
            if let Some(notice) = notice {
                let _ = writeln!(out, "! {}", notice);
            }
            let _ = writeln!(out, "--- Draft ---");
            let _ = writeln!(out, "{}", draft);
            out
        }
        DraftState::Error { message } => format!("! {}\n", message),
        other => format!("({})\n", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftdesk_core::reconstruct;

    #[test]
    fn test_inbox_listing() {
        let thread = Thread::new(
            "t1",
            "Interview prep",
            "Dana Lee <dana@example.com>",
            "Do you offer mock interviews?\nThanks",
        );
        let text = inbox(&[thread.summary(true)]);
        assert!(text.starts_with("Unread: 1\n"));
        assert!(text.contains("* [D] Dana Lee  Interview prep  (t1)"));
        assert!(text.contains("      Do you offer mock interviews?\n"));
        assert!(!text.contains("Thanks"));
    }

    #[test]
    fn test_conversation_headings() {
        let thread = Thread::new(
            "t1",
            "Fees",
            "Omar <omar@example.com>",
            "What are the fees?\n---\nOn Mon, May 1 at 3:05 PM Desk <desk@example.com> wrote:\n\nThey are listed online.",
        );
        let units: Vec<_> = reconstruct(&thread.history).collect();
        let text = conversation(&thread, &units);
        assert!(text.contains("Omar:\nWhat are the fees?\n"));
        assert!(text.contains("Reply (3:05 PM):\nThey are listed online.\n"));
    }

    #[test]
    fn test_draft_panel() {
        let ready = DraftState::Ready {
            draft: "Hello".to_string(),
            notice: Some("Failed to send reply: HTTP 500".to_string()),
        };
        assert_eq!(
            draft(&ready),
            "! Failed to send reply: HTTP 500\n--- Draft ---\nHello\n"
        );
        assert_eq!(draft(&DraftState::Idle), "(idle)\n");
    }
}
