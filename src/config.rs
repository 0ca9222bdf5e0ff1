//! Collection and style-learning settings

use crate::error::{Error, Result};
use crate::types::text_len;
use serde::{Deserialize, Serialize};

/// Accepted sample lengths (exclusive bounds, in UTF-16 code units) and the batch cap
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleWindow {
    pub min_exclusive: usize,
    pub max_exclusive: usize,
    pub cap: usize,
}

impl SampleWindow {
    /// Window for samples pulled through the message API
    pub const API: Self = Self {
        min_exclusive: 20,
        max_exclusive: 10_000,
        cap: 50,
    };

    /// Window for samples scraped from the rendered mail view
    pub const DOM: Self = Self {
        min_exclusive: 50,
        max_exclusive: 5_000,
        cap: 5,
    };

    /// Whether a text of `len` UTF-16 code units is accepted
    #[must_use]
    pub const fn accepts(&self, len: usize) -> bool {
        len > self.min_exclusive && len < self.max_exclusive
    }

    /// Whether `text` fits the window, measured with [`text_len`]
    #[must_use]
    pub fn accepts_text(&self, text: &str) -> bool {
        self.accepts(text_len(text))
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.min_exclusive >= self.max_exclusive {
            return Err(Error::Config(format!(
                "{name}: min_exclusive ({}) must be below max_exclusive ({})",
                self.min_exclusive, self.max_exclusive
            )));
        }
        if self.cap == 0 {
            return Err(Error::Config(format!("{name}: cap must be at least 1")));
        }
        Ok(())
    }
}

/// Crate configuration
///
/// Missing fields take their defaults when loading from JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Window for the message-API path
    pub api_window: SampleWindow,

    /// Window for the rendered-view path
    pub dom_window: SampleWindow,

    /// Fewest samples a style can be learned from
    pub min_style_samples: usize,

    /// Generation model identifier
    pub model: String,

    /// Token limit for the style analysis request
    pub style_max_tokens: u32,

    /// Token limit for chat requests
    pub chat_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_window: SampleWindow::API,
            dom_window: SampleWindow::DOM,
            min_style_samples: 2,
            model: "claude-sonnet-4-20250514".to_string(),
            style_max_tokens: 500,
            chat_max_tokens: 1024,
        }
    }
}

impl Config {
    /// Load from JSON, filling gaps with defaults, and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.api_window.validate("api_window")?;
        self.dom_window.validate("dom_window")?;
        if self.model.trim().is_empty() {
            return Err(Error::Config("model must not be empty".into()));
        }
        Ok(())
    }
}
