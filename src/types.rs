//! Core types for provider messages and collected samples

use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type of the plain-text alternative
pub const TEXT_PLAIN: &str = "text/plain";

/// MIME type of the HTML alternative
pub const TEXT_HTML: &str = "text/html";

/// A message as returned by the provider's message-get endpoint
///
/// Every field is optional: partially-present records deserialize fine and
/// simply give the extractor less to work with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// Provider message ID
    #[serde(default)]
    pub id: Option<String>,

    /// Provider thread ID
    #[serde(default)]
    pub thread_id: Option<String>,

    /// Parsed body tree (`format=full`)
    #[serde(default)]
    pub payload: Option<Payload>,

    /// Base64url RFC 822 source (`format=raw`)
    #[serde(default)]
    pub raw: Option<String>,
}

impl RawMessage {
    /// Message with only a payload tree
    #[must_use]
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            payload: Some(payload),
            ..Self::default()
        }
    }

    /// Parse a message from the provider's JSON
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Header lookup on the top-level payload
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload.as_ref().and_then(|p| p.header(name))
    }

    /// Short label for log lines
    #[must_use]
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<no id>")
    }
}

/// One node of the payload tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// MIME type of this node
    #[serde(default)]
    pub mime_type: Option<String>,

    /// Headers (only meaningful on the top-level node)
    #[serde(default)]
    pub headers: Vec<Header>,

    /// Inline body
    #[serde(default)]
    pub body: Option<PartBody>,

    /// Child nodes, in order
    #[serde(default)]
    pub parts: Vec<Self>,
}

impl Payload {
    /// Leaf node with the given MIME type and encoded body data
    #[must_use]
    pub fn leaf(mime_type: &str, data: impl Into<String>) -> Self {
        Self {
            mime_type: Some(mime_type.to_string()),
            body: Some(PartBody::with_data(data)),
            ..Self::default()
        }
    }

    /// Container node with the given MIME type and children
    #[must_use]
    pub fn multipart(mime_type: &str, parts: Vec<Self>) -> Self {
        Self {
            mime_type: Some(mime_type.to_string()),
            parts,
            ..Self::default()
        }
    }

    /// First header value whose name matches case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Encoded inline body data, if present and non-empty
    #[must_use]
    pub fn inline_data(&self) -> Option<&str> {
        self.body.as_ref().and_then(PartBody::data)
    }

    /// Exact MIME type match
    #[must_use]
    pub fn is_mime(&self, mime_type: &str) -> bool {
        self.mime_type.as_deref() == Some(mime_type)
    }

    /// Whether this node has child parts
    #[must_use]
    pub fn has_parts(&self) -> bool {
        !self.parts.is_empty()
    }
}

/// A `(name, value)` header pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Inline body of a payload node
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PartBody {
    /// Base64url-encoded content
    #[serde(default)]
    pub data: Option<String>,

    /// Decoded size in bytes, as reported by the provider
    #[serde(default)]
    pub size: Option<u64>,

    /// Set when the content lives behind a separate attachment fetch
    #[serde(default)]
    pub attachment_id: Option<String>,
}

impl PartBody {
    pub fn with_data(data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// Encoded data; empty strings count as absent
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

/// Where a sample was collected from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SampleSource {
    /// Provider message API
    Api,
    /// Text scraped from the rendered mail view
    Dom,
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Dom => write!(f, "dom"),
        }
    }
}

/// Authored text accepted for style analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailSample {
    /// Cleaned text
    pub text: String,

    /// Collection path
    pub source: SampleSource,

    /// Provider message ID (API path only)
    pub message_id: Option<String>,
}

impl EmailSample {
    /// Length in UTF-16 code units, as the sample windows measure it
    #[must_use]
    pub fn utf16_len(&self) -> usize {
        text_len(&self.text)
    }
}

/// Length of `text` in UTF-16 code units
///
/// This is the unit the web views report, so a character outside the Basic
/// Multilingual Plane counts as two.
#[must_use]
pub fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

impl fmt::Display for EmailSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Visible message text captured from the rendered mail view
///
/// `message_bodies` holds the body text of each rendered message container;
/// `expanded_blocks` holds the text blocks of expanded thread messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomSnapshot {
    pub message_bodies: Vec<String>,
    pub expanded_blocks: Vec<String>,
}
