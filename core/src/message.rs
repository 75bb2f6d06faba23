//! Cleanup of a single message block from a flattened thread history
//!
//! A message block is plain text as assembled by the backend: the body the
//! sender typed, possibly followed by the mail client's quote attribution
//! (`On <date> at <time> <sender> wrote:`) and `>`-quoted lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Time token inside an attribution line, e.g. `at 3:05 PM`
static ATTRIBUTION_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)at\s+(\d{1,2}:\d{2}\s?(?:AM|PM))").expect("attribution time pattern is valid")
});

/// A message block with quotes and attribution removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Body text, trimmed
    pub text: String,
    /// Time label from the attribution line, empty when none was found
    pub time: String,
}

impl ParsedMessage {
    /// Whether any body text survived cleanup
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    /// Time label, if one was extracted
    pub fn time(&self) -> Option<&str> {
        if self.time.is_empty() {
            None
        } else {
            Some(&self.time)
        }
    }
}

/// Whether a trimmed line is a quote attribution such as
/// `On May 1 at 3:05 PM Alice <a@x.com> wrote:`
pub fn is_attribution_line(trimmed: &str) -> bool {
    trimmed.starts_with("On ") && trimmed.contains("wrote:")
}

/// Time label in an attribution line, if present
pub fn attribution_time(line: &str) -> Option<&str> {
    ATTRIBUTION_TIME
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse one raw message block.
///
/// Attribution lines are dropped and the blank lines right after them are
/// swallowed until the next content line. Quoted (`>`) lines are dropped.
/// When several attributions are present the last time label wins.
pub fn parse_message(raw: &str) -> ParsedMessage {
    let mut time = String::new();
    let mut after_attribution = false;
    let mut kept: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();

        if after_attribution && trimmed.is_empty() {
            continue;
        }

        if is_attribution_line(trimmed) {
            after_attribution = true;
            if let Some(found) = attribution_time(trimmed) {
                time = found.to_string();
            }
            continue;
        }

        after_attribution = false;
        if !trimmed.starts_with('>') {
            kept.push(line);
        }
    }

    ParsedMessage {
        text: kept.join("\n").trim().to_string(),
        time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribution_time_extracted() {
        let raw = "Thanks, that works.\nOn May 1 at 3:05 PM Alice <a@x.com> wrote:\n\n> Can we meet?";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "3:05 PM");
        assert_eq!(parsed.text, "Thanks, that works.");
    }

    #[test]
    fn test_attribution_and_following_blank_removed() {
        let raw = "On May 1 at 3:05 PM Alice <a@x.com> wrote:\n\nHello there\nSecond line";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "3:05 PM");
        assert_eq!(parsed.text, "Hello there\nSecond line");
        assert!(!parsed.text.contains("wrote:"));
    }

    #[test]
    fn test_blank_lines_between_paragraphs_survive() {
        let raw = "On Tue, Jun 4, 2024 at 9:15am Bob <b@y.org> wrote:\n\n\nFirst\n\nSecond";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "9:15am");
        assert_eq!(parsed.text, "First\n\nSecond");
    }

    #[test]
    fn test_no_attribution() {
        let raw = "  Hi team,\n> old quote\nPlease review.\n";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "");
        assert_eq!(parsed.time(), None);
        assert_eq!(parsed.text, "Hi team,\nPlease review.");
    }

    #[test]
    fn test_last_attribution_wins() {
        let raw = "Reply\nOn Mon at 1:00 PM A <a@x> wrote:\n> x\nOn Sun at 11:30 AM B <b@x> wrote:\n> y";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "11:30 AM");
        assert_eq!(parsed.text, "Reply");
    }

    #[test]
    fn test_attribution_without_time() {
        let raw = "On Monday, Carol <c@z.com> wrote:\nbody";
        let parsed = parse_message(raw);
        assert_eq!(parsed.time, "");
        assert_eq!(parsed.text, "body");
    }

    #[test]
    fn test_indented_quote_lines_dropped() {
        let parsed = parse_message("keep\n   > nested quote\nalso keep");
        assert_eq!(parsed.text, "keep\nalso keep");
    }

    #[test]
    fn test_empty_and_quote_only_input() {
        assert_eq!(parse_message(""), ParsedMessage::default());
        assert!(!parse_message("> only\n> quotes").has_text());
    }
}
