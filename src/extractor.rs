//! Body selection for provider messages
//!
//! A message body is chosen by walking an ordered list of [`Strategy`]
//! values. The first strategy that finds a candidate node decides the result:
//! its data is decoded and returned, and a decode failure yields `None`
//! rather than falling through to later strategies.

use crate::decode::{decode_base64url, decode_base64url_bytes, html_to_text};
use crate::error::Result;
use crate::types::{Payload, RawMessage, TEXT_HTML, TEXT_PLAIN};
use tracing::{debug, warn};

/// One way of locating a message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Inline body on the top-level payload, taken as plain text
    InlineBody,
    /// First direct child typed `text/plain`
    DirectPlainText,
    /// First direct child typed `text/html`, reduced to text
    DirectHtml,
    /// First `text/plain` grandchild under a multipart child
    NestedPlainText,
    /// Full RFC 822 source from the `raw` field, for `format=raw` fetches
    RawSource,
}

/// Default precedence
pub const DEFAULT_STRATEGIES: [Strategy; 5] = [
    Strategy::InlineBody,
    Strategy::DirectPlainText,
    Strategy::DirectHtml,
    Strategy::NestedPlainText,
    Strategy::RawSource,
];

/// A candidate body found by a strategy, still encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate<'a> {
    Text(&'a str),
    Html(&'a str),
    Rfc822(&'a str),
}

impl Strategy {
    /// Locate this strategy's candidate in a message, without decoding
    #[must_use]
    pub fn locate(self, message: &RawMessage) -> Option<Candidate<'_>> {
        if self == Self::RawSource {
            return message
                .raw
                .as_deref()
                .filter(|raw| !raw.is_empty())
                .map(Candidate::Rfc822);
        }

        let payload = message.payload.as_ref()?;
        match self {
            Self::InlineBody => payload.inline_data().map(Candidate::Text),
            Self::DirectPlainText => first_of_type(&payload.parts, TEXT_PLAIN).map(Candidate::Text),
            Self::DirectHtml => first_of_type(&payload.parts, TEXT_HTML).map(Candidate::Html),
            Self::NestedPlainText => payload
                .parts
                .iter()
                .filter(|part| part.has_parts())
                .find_map(|part| first_of_type(&part.parts, TEXT_PLAIN))
                .map(Candidate::Text),
            Self::RawSource => None,
        }
    }
}

fn first_of_type<'a>(parts: &'a [Payload], mime_type: &str) -> Option<&'a str> {
    parts
        .iter()
        .filter(|part| part.is_mime(mime_type))
        .find_map(Payload::inline_data)
}

impl Candidate<'_> {
    /// Decode into text; `None` when the data is malformed
    #[must_use]
    pub fn decode(self) -> Option<String> {
        match self {
            Self::Text(data) => decode_base64url(data),
            Self::Html(data) => decode_base64url(data).map(|html| html_to_text(&html)),
            Self::Rfc822(data) => {
                let bytes = decode_base64url_bytes(data)?;
                match text_from_rfc822(&bytes) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("unreadable raw message source: {e}");
                        None
                    }
                }
            }
        }
    }
}

fn text_from_rfc822(source: &[u8]) -> Result<Option<String>> {
    let parsed = mailparse::parse_mail(source)?;

    if parsed.subparts.is_empty() {
        let mimetype = parsed.ctype.mimetype.to_lowercase();
        if mimetype.starts_with("text/") && mimetype != TEXT_HTML {
            return Ok(Some(parsed.get_body()?));
        }
        return Ok(None);
    }

    find_plain_text(&parsed)
}

fn find_plain_text(parsed: &mailparse::ParsedMail) -> Result<Option<String>> {
    for part in &parsed.subparts {
        if part.subparts.is_empty() {
            if part.ctype.mimetype.eq_ignore_ascii_case(TEXT_PLAIN) {
                return Ok(Some(part.get_body()?));
            }
        } else if let Some(text) = find_plain_text(part)? {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

/// Body extractor over an ordered strategy list
#[derive(Debug, Clone)]
pub struct Extractor {
    strategies: Vec<Strategy>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }
}

impl Extractor {
    /// Extractor with a custom precedence
    #[must_use]
    pub const fn with_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    #[must_use]
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Decoded body of `message`, or `None` if nothing usable was found
    #[must_use]
    pub fn extract(&self, message: &RawMessage) -> Option<String> {
        extract_with(&self.strategies, message)
    }
}

/// Decoded body of `message` under the default precedence
#[must_use]
pub fn extract(message: &RawMessage) -> Option<String> {
    extract_with(&DEFAULT_STRATEGIES, message)
}

fn extract_with(strategies: &[Strategy], message: &RawMessage) -> Option<String> {
    let Some((strategy, candidate)) = strategies
        .iter()
        .find_map(|&s| s.locate(message).map(|c| (s, c)))
    else {
        debug!("no body found in message {}", message.label());
        return None;
    };

    let decoded = candidate.decode();
    if decoded.is_none() {
        debug!(
            "{strategy:?} body of message {} could not be decoded",
            message.label()
        );
    }
    decoded
}
