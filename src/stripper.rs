//! Quote stripping
//!
//! Removes replied-to and forwarded material from a decoded body so that
//! only the author's own lines remain. Lines are classified one at a time
//! and fed through a two-state machine: once a quote boundary is seen the
//! machine stays in [`QuoteState::Quoted`] for the rest of the text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Header labels that open a forwarded or inline-quoted header block
pub const HEADER_LABELS: [&str; 6] = ["From:", "Sent:", "To:", "Subject:", "Date:", "Cc:"];

static ATTRIBUTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^On .+ wrote:$").unwrap());

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Starts with `>`
    QuoteMarker,
    /// `On <date>, <person> wrote:`
    Attribution,
    /// Starts with one of [`HEADER_LABELS`]
    HeaderLabel,
    /// Dash run on a line mentioning `Forward`
    ForwardBanner,
    /// Whitespace only
    Blank,
    /// Anything else
    Text,
}

impl LineKind {
    /// Classify a raw line, first matching rule wins
    #[must_use]
    pub fn classify(line: &str) -> Self {
        let trimmed = trim_text(line);

        if trimmed.starts_with('>') {
            Self::QuoteMarker
        } else if ATTRIBUTION_REGEX.is_match(trimmed) {
            Self::Attribution
        } else if HEADER_LABELS.iter().any(|label| trimmed.starts_with(label)) {
            Self::HeaderLabel
        } else if trimmed.starts_with("---") && line.contains("Forward") {
            Self::ForwardBanner
        } else if trimmed.is_empty() {
            Self::Blank
        } else {
            Self::Text
        }
    }

    /// Whether this line marks the start of quoted material
    #[must_use]
    pub const fn opens_quote(self) -> bool {
        matches!(
            self,
            Self::QuoteMarker | Self::Attribution | Self::ForwardBanner
        )
    }
}

/// What to do with a classified line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineAction {
    Keep,
    Discard,
}

/// Stripper state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteState {
    /// Still inside the author's own text
    #[default]
    Normal,
    /// Past a quote boundary; nothing more is kept
    Quoted,
}

impl QuoteState {
    /// Transition table
    ///
    /// | state  | line                                         | next   | action  |
    /// |--------|----------------------------------------------|--------|---------|
    /// | any    | quote marker, attribution, forward banner    | Quoted | discard |
    /// | any    | header label                                 | same   | discard |
    /// | Quoted | blank or text                                | Quoted | discard |
    /// | Normal | blank or text                                | Normal | keep    |
    #[must_use]
    pub const fn step(self, kind: LineKind) -> (Self, LineAction) {
        if kind.opens_quote() {
            return (Self::Quoted, LineAction::Discard);
        }

        match (self, kind) {
            (Self::Normal, LineKind::Blank | LineKind::Text) => (Self::Normal, LineAction::Keep),
            (state, _) => (state, LineAction::Discard),
        }
    }
}

/// Strip quoted replies and forwarded content from `text`
///
/// Lines are split on `\n`, kept lines are rejoined with `\n` and the result
/// is trimmed. Never fails; an empty input gives an empty output. For an
/// optional body use `body.as_deref().map(strip_quoted)`.
#[must_use]
pub fn strip_quoted(text: &str) -> String {
    let mut state = QuoteState::Normal;
    let mut kept: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        let (next, action) = state.step(LineKind::classify(line));
        if action == LineAction::Keep {
            kept.push(line);
        }
        state = next;
    }

    trim_text(&kept.join("\n")).to_string()
}

/// Trim whitespace and byte-order marks from both ends
///
/// Byte-order marks count as whitespace here, as they do in the web views
/// these bodies come from.
#[must_use]
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_text_bom() {
        assert_eq!(trim_text("\u{feff} > hi \r"), "> hi");
    }

    #[test]
    fn test_classify_uses_raw_line_for_forward() {
        assert_eq!(
            LineKind::classify("  ---------- Forwarded message ---------"),
            LineKind::ForwardBanner
        );
        assert_eq!(LineKind::classify("--- Original ---"), LineKind::Text);
    }
}
