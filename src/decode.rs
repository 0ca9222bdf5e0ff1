//! Body decoding: base64url payload data and HTML-to-text

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use html_escape::decode_html_entities;
use tracing::trace;

/// Standard alphabet, padding optional, lenient about trailing bits
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Elements outside the document body
const HIDDEN_ELEMENTS: [&str; 2] = ["head", "title"];

/// Decode base64url body data into raw bytes
///
/// The URL-safe characters are mapped back onto the standard alphabet before
/// decoding. Returns `None` on malformed base64.
#[must_use]
pub fn decode_base64url_bytes(data: &str) -> Option<Vec<u8>> {
    let standard: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match LENIENT_STANDARD.decode(standard.as_bytes()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            trace!("base64 decode failed: {e}");
            None
        }
    }
}

/// Decode base64url body data into UTF-8 text
///
/// Returns `None` on malformed base64 or invalid UTF-8.
#[must_use]
pub fn decode_base64url(data: &str) -> Option<String> {
    let bytes = decode_base64url_bytes(data)?;

    match String::from_utf8(bytes) {
        Ok(text) => Some(text),
        Err(e) => {
            trace!("decoded body is not UTF-8: {e}");
            None
        }
    }
}

/// Reduce an HTML document to its concatenated text content
///
/// Tags and attributes are dropped without inserting any separators, so
/// `<p>Hi <b>there</b></p>` becomes `Hi there`. Comments and the content of
/// `head` and `title` are skipped; `script` and `style` text is kept, as the
/// body's text content includes it. Named and numeric character references
/// are decoded, and `&nbsp;` stays U+00A0.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut hidden: Option<String> = None;
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        if hidden.is_none() {
            out.push_str(&decode_html_entities(&rest[..lt]));
        }
        let tail = &rest[lt..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        // A `<` that cannot open a tag is literal text
        if !tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
        {
            if hidden.is_none() {
                out.push('<');
            }
            rest = &tail[1..];
            continue;
        }

        let Some(gt) = tail.find('>') else {
            // Unterminated tag at end of input
            rest = "";
            break;
        };

        let tag = Tag::parse(&tail[1..gt]);
        if let Some(name) = hidden.as_deref() {
            if tag.closing && tag.name == name {
                hidden = None;
            }
        } else if !tag.closing && !tag.self_closing && HIDDEN_ELEMENTS.contains(&tag.name.as_str())
        {
            hidden = Some(tag.name);
        }
        rest = &tail[gt + 1..];
    }

    if hidden.is_none() {
        out.push_str(&decode_html_entities(rest));
    }

    out
}

struct Tag {
    name: String,
    closing: bool,
    self_closing: bool,
}

impl Tag {
    fn parse(inner: &str) -> Self {
        let closing = inner.starts_with('/');
        let self_closing = inner.ends_with('/');
        let name = inner
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        Self {
            name,
            closing,
            self_closing,
        }
    }
}
