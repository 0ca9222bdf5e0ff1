//! Error types for sample collection and style learning

use thiserror::Error;

/// Errors raised around the extraction core.
///
/// Extraction and quote stripping themselves never fail; these cover the
/// session, configuration and summarizer layers.
#[derive(Error, Debug)]
pub enum Error {
    /// No access token in the session
    #[error("Not authorized: no access token in session")]
    NotAuthorized,

    /// The provider rejected the access token
    #[error("Access token expired")]
    TokenExpired,

    /// Too few samples to learn a style from
    #[error("Need at least {required} email samples, found {found}")]
    NotEnoughSamples { found: usize, required: usize },

    /// The style summarizer failed or returned nothing usable
    #[error("Style summarizer failed: {0}")]
    Summarizer(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a raw RFC 822 message source
    #[error("Failed to parse message source: {0}")]
    Rfc822(#[from] mailparse::MailParseError),
}

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
