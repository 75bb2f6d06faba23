//! Reconstruction of question/response exchanges from a flattened history
//!
//! The backend joins every message of a thread with a `---` separator, oldest
//! first. Messages alternate by position: even segments are incoming
//! questions, odd segments are the replies already sent.

use serde::Serialize;

use crate::message::parse_message;

/// Separator between messages in a thread history
pub const SEGMENT_SEPARATOR: &str = "---";

/// One question and the reply it received, ready for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayUnit {
    pub question_text: String,
    pub question_time: String,
    pub response_text: String,
    pub response_time: String,
    pub has_response: bool,
}

/// Lazy sequence of [`DisplayUnit`]s over a history string.
///
/// Clone it to walk the history again; nothing is cached between walks.
#[derive(Debug, Clone)]
pub struct Exchanges<'a> {
    segments: Vec<&'a str>,
    next: usize,
}

/// Split `history` into exchanges
pub fn reconstruct(history: &str) -> Exchanges<'_> {
    let segments = if history.trim().is_empty() {
        Vec::new()
    } else {
        history.split(SEGMENT_SEPARATOR).collect()
    };
    Exchanges { segments, next: 0 }
}

impl<'a> Iterator for Exchanges<'a> {
    type Item = DisplayUnit;

    fn next(&mut self) -> Option<DisplayUnit> {
        let question = parse_message(self.segments.get(self.next)?);
        let response = self
            .segments
            .get(self.next + 1)
            .map(|raw| parse_message(raw))
            .unwrap_or_default();
        self.next += 2;

        Some(DisplayUnit {
            has_response: response.has_text(),
            question_text: question.text,
            question_time: question.time,
            response_text: response.text,
            response_time: response.time,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.segments.len().saturating_sub(self.next).div_ceil(2);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Exchanges<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        assert_eq!(reconstruct("").count(), 0);
        assert_eq!(reconstruct("  \n ").len(), 0);
    }

    #[test]
    fn test_trailing_question_without_response() {
        let units: Vec<_> = reconstruct("Q1---R1---Q2").collect();
        assert_eq!(units.len(), 2);
        assert!(units[0].has_response);
        assert_eq!(units[1].question_text, "Q2");
        assert!(!units[1].has_response);
        assert_eq!(units[1].response_text, "");
    }

    #[test]
    fn test_texts_match_parser() {
        let units: Vec<_> = reconstruct("Q1---R1").collect();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].question_text, parse_message("Q1").text);
        assert_eq!(units[0].response_text, parse_message("R1").text);
    }

    #[test]
    fn test_quote_only_response_counts_as_absent() {
        let units: Vec<_> = reconstruct("Question\n---\n> quoted only\n").collect();
        assert_eq!(units.len(), 1);
        assert!(!units[0].has_response);
    }

    #[test]
    fn test_times_and_order() {
        let history = "Can I reschedule?\n\
            ---\n\
            Yes, pick a slot.\n\
            On May 1 at 3:05 PM Alice <a@x.com> wrote:\n\
            > Can I reschedule?\n\
            ---\n\
            Thursday works.\n\
            On May 2 at 10:12 AM Support <s@x.com> wrote:\n\
            > Yes, pick a slot.";
        let units: Vec<_> = reconstruct(history).collect();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].question_text, "Can I reschedule?");
        assert_eq!(units[0].response_text, "Yes, pick a slot.");
        assert_eq!(units[0].response_time, "3:05 PM");
        assert_eq!(units[1].question_text, "Thursday works.");
        assert_eq!(units[1].question_time, "10:12 AM");
    }

    #[test]
    fn test_restartable() {
        let exchanges = reconstruct("a---b---c---d---e");
        assert_eq!(exchanges.len(), 3);
        let first: Vec<_> = exchanges.clone().collect();
        let second: Vec<_> = exchanges.collect();
        assert_eq!(first, second);
    }
}
