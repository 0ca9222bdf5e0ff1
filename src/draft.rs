//! Assistant reply parsing

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SUBJECT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Subject:\s*(.+?)\n\n?").unwrap());

/// An assistant reply split into what goes in the subject box and the body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draft {
    pub subject: Option<String>,
    pub body: String,
}

impl Draft {
    /// Split a reply that may open with a `Subject: ...` line
    ///
    /// Replies without a leading subject line are returned unchanged as the
    /// body.
    #[must_use]
    pub fn from_response(content: &str) -> Self {
        match SUBJECT_REGEX.captures(content) {
            Some(caps) => {
                let subject = caps.get(1).map(|m| m.as_str().trim().to_string());
                let rest = caps.get(0).map_or(content, |m| &content[m.end()..]);
                Self {
                    subject: subject.filter(|s| !s.is_empty()),
                    body: rest.trim().to_string(),
                }
            }
            None => Self {
                subject: None,
                body: content.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn has_subject(&self) -> bool {
        self.subject.is_some()
    }
}
