// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Authored-text extraction for writing-style learning
//!
//! Pulls the user's own words out of webmail messages so they can be handed
//! to a text-generation service that describes the user's writing style.
//!
//! # Pipeline
//!
//! - [`extract`] picks and decodes the best text body of a provider message
//! - [`strip_quoted`] drops replied-to and forwarded material
//! - [`collect_api_samples`] / [`collect_dom_samples`] run whole batches
//!   and keep the samples whose length falls inside a [`SampleWindow`]
//! - [`learn_style`] sends the samples to a [`StyleSummarizer`] and stores
//!   the resulting [`StyleProfile`] in the [`Session`]
//!
//! # Example
//!
//! ```rust
//! use style_sampler::{RawMessage, extract, strip_quoted};
//!
//! let json = r#"{"id": "m1", "payload": {"body": {"data": "SGVsbG8hCgo-IHF1b3RlZA"}}}"#;
//! let message = RawMessage::from_json(json).unwrap();
//!
//! let body = extract(&message).unwrap();
//! assert_eq!(body, "Hello!\n\n> quoted");
//! assert_eq!(strip_quoted(&body), "Hello!");
//! ```

mod collector;
mod config;
mod decode;
mod draft;
mod error;
mod extractor;
mod session;
mod stripper;
mod style;
mod types;

pub use collector::{SampleCollector, authored_text, collect_api_samples, collect_dom_samples};
pub use config::{Config, SampleWindow};
pub use decode::{decode_base64url, decode_base64url_bytes, html_to_text};
pub use draft::Draft;
pub use error::{Error, Result};
pub use extractor::{Candidate, DEFAULT_STRATEGIES, Extractor, Strategy, extract};
pub use session::{Session, mask_token};
pub use stripper::{HEADER_LABELS, LineAction, LineKind, QuoteState, strip_quoted};
pub use style::{
    ChatMessage, GenerationRequest, Role, StyleProfile, StyleSummarizer, learn_style,
    style_analysis_prompt, system_prompt,
};
pub use types::*;
