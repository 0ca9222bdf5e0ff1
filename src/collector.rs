//! Sample collection over message batches

use crate::config::{Config, SampleWindow};
use crate::extractor::Extractor;
use crate::session::Session;
use crate::stripper::{strip_quoted, trim_text};
use crate::types::{DomSnapshot, EmailSample, RawMessage, SampleSource, text_len};
use std::fmt;
use tracing::{debug, warn};

/// Extract and strip one message; `None` when it has no usable body
#[must_use]
pub fn authored_text(message: &RawMessage) -> Option<String> {
    crate::extractor::extract(message).map(|body| strip_quoted(&body))
}

/// Collect samples from provider messages
///
/// At most `window.cap` results are consumed, in order. A failed fetch, a
/// message from someone else, a missing body or a length outside the window
/// each skip that one message and the batch carries on.
pub fn collect_api_samples<I, E>(
    session: &Session,
    window: &SampleWindow,
    messages: I,
) -> Vec<EmailSample>
where
    I: IntoIterator<Item = Result<RawMessage, E>>,
    E: fmt::Display,
{
    collect_api_with(&Extractor::default(), session, window, messages)
}

fn collect_api_with<I, E>(
    extractor: &Extractor,
    session: &Session,
    window: &SampleWindow,
    messages: I,
) -> Vec<EmailSample>
where
    I: IntoIterator<Item = Result<RawMessage, E>>,
    E: fmt::Display,
{
    let mut samples = Vec::new();

    for result in messages.into_iter().take(window.cap) {
        let message = match result {
            Ok(message) => message,
            Err(e) => {
                warn!("skipping message that failed to fetch: {e}");
                continue;
            }
        };

        if !session.is_from_user(&message) {
            debug!("skipping message {}: not sent by user", message.label());
            continue;
        }

        let Some(body) = extractor.extract(&message) else {
            debug!("skipping message {}: no readable body", message.label());
            continue;
        };

        let text = strip_quoted(&body);
        let len = text_len(&text);
        if !window.accepts(len) {
            debug!(
                "skipping message {}: length {len} outside window",
                message.label()
            );
            continue;
        }

        samples.push(EmailSample {
            text,
            source: SampleSource::Api,
            message_id: message.id,
        });
    }

    debug!("collected {} samples from message api", samples.len());
    samples
}

/// Collect samples from text captured off the rendered mail view
///
/// Texts are trimmed and length-filtered but not quote-stripped. Expanded
/// blocks repeating an already collected text are skipped. The result is
/// cut to `window.cap`.
#[must_use]
pub fn collect_dom_samples(window: &SampleWindow, snapshot: &DomSnapshot) -> Vec<EmailSample> {
    let mut texts: Vec<&str> = Vec::new();

    for body in &snapshot.message_bodies {
        let text = trim_text(body);
        if window.accepts_text(text) {
            texts.push(text);
        }
    }

    for block in &snapshot.expanded_blocks {
        let text = trim_text(block);
        if window.accepts_text(text) && !texts.contains(&text) {
            texts.push(text);
        }
    }

    texts.truncate(window.cap);
    debug!("collected {} samples from rendered view", texts.len());

    texts
        .into_iter()
        .map(|text| EmailSample {
            text: text.to_string(),
            source: SampleSource::Dom,
            message_id: None,
        })
        .collect()
}

/// Collector bundling an extractor with configured windows
#[derive(Debug, Clone, Default)]
pub struct SampleCollector {
    extractor: Extractor,
    config: Config,
}

impl SampleCollector {
    #[must_use]
    pub const fn new(extractor: Extractor, config: Config) -> Self {
        Self { extractor, config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Samples from provider messages, under the configured API window
    pub fn collect_api<I, E>(&self, session: &Session, messages: I) -> Vec<EmailSample>
    where
        I: IntoIterator<Item = Result<RawMessage, E>>,
        E: fmt::Display,
    {
        collect_api_with(&self.extractor, session, &self.config.api_window, messages)
    }

    /// Samples from a rendered-view snapshot, under the configured DOM window
    #[must_use]
    pub fn collect_dom(&self, snapshot: &DomSnapshot) -> Vec<EmailSample> {
        collect_dom_samples(&self.config.dom_window, snapshot)
    }
}
