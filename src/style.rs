//! Style learning: prompts, generation requests and the summarizer seam

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::EmailSample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const STYLE_ANALYSIS_INTRO: &str = "Analyze the writing style of these email samples from the same person. Create a concise style guide (max 200 words) that captures:
- Tone and formality level
- Common phrases or greetings they use
- Sentence structure preferences (short/long, simple/complex)
- Any unique mannerisms, filler words, or patterns
- Sign-off style and signature patterns

Email samples:
";

const STYLE_ANALYSIS_OUTRO: &str =
    "Respond with ONLY the style guide, no preamble. Be specific about their unique voice.";

const ASSISTANT_PROMPT: &str = r#"You are a professional email assistant integrated into Gmail. Your role is to help users write and improve emails.

FORMATTING RULES:
- When writing a NEW email (compose mode), ALWAYS start your response with a subject line in this exact format:
  Subject: [your subject here]

  [email body here]

- When writing a REPLY to an existing email, do NOT include a subject line. Just provide the reply body directly.

- Never include greetings like "Here's your email:" or "Sure, here you go" - just provide the email content directly.

STYLE GUIDELINES:
- Match the tone requested by the user (formal, casual, friendly, etc.)
- Keep emails concise and professional unless asked otherwise
- Use appropriate greetings and sign-offs based on context
- If the user provides a draft, preserve their voice while improving clarity and grammar

When improving an existing draft:
- Fix grammar and spelling
- Improve clarity and flow
- Maintain the original intent and tone
- For compose mode, suggest a subject if one isn't provided

When the user asks for revisions:
- Apply their feedback to the previous version
- Only output the revised email, not explanations"#;

/// A learned description of the user's writing style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StyleProfile {
    /// Style guide text returned by the summarizer
    pub text: String,

    /// Number of samples it was learned from
    pub sample_count: usize,

    /// When it was learned
    pub learned_at: DateTime<Utc>,
}

impl StyleProfile {
    pub fn new(text: impl Into<String>, sample_count: usize) -> Self {
        Self {
            text: text.into(),
            sample_count,
            learned_at: Utc::now(),
        }
    }
}

/// Message author in a generation request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of a request to the text-generation API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
}

impl GenerationRequest {
    /// Style analysis request over `samples`
    #[must_use]
    pub fn style_analysis(config: &Config, samples: &[EmailSample]) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.style_max_tokens,
            system: None,
            messages: vec![ChatMessage::user(style_analysis_prompt(samples))],
        }
    }

    /// Chat request carrying the assistant system prompt
    #[must_use]
    pub fn chat(config: &Config, session: &Session, history: Vec<ChatMessage>) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.chat_max_tokens,
            system: Some(system_prompt(session.style_profile())),
            messages: history,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Remote service that turns a generation request into text
///
/// Implementations own the transport; this crate only builds requests and
/// consumes the returned text.
pub trait StyleSummarizer {
    fn summarize(&self, request: &GenerationRequest) -> Result<String>;
}

/// Prompt asking for a style guide over the given samples
#[must_use]
pub fn style_analysis_prompt(samples: &[EmailSample]) -> String {
    let joined = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| format!("--- Email {} ---\n{}", i + 1, sample.text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{STYLE_ANALYSIS_INTRO}{joined}\n\n{STYLE_ANALYSIS_OUTRO}")
}

/// Assistant system prompt, with the personal style block when one is active
#[must_use]
pub fn system_prompt(profile: Option<&StyleProfile>) -> String {
    let mut prompt = ASSISTANT_PROMPT.to_string();

    if let Some(profile) = profile.filter(|p| !p.text.is_empty()) {
        prompt.push_str(&format!(
            "\n\nUSER'S PERSONAL WRITING STYLE:\n{}\n\nIMPORTANT: Always write emails in this \
             user's personal style. Match their tone, vocabulary, sentence structure, and \
             mannerisms as closely as possible.",
            profile.text
        ));
    }

    prompt
}

/// Learn a style profile from `samples` and store it in the session
pub fn learn_style<S: StyleSummarizer + ?Sized>(
    session: &mut Session,
    config: &Config,
    summarizer: &S,
    samples: &[EmailSample],
) -> Result<StyleProfile> {
    if samples.len() < config.min_style_samples {
        return Err(Error::NotEnoughSamples {
            found: samples.len(),
            required: config.min_style_samples,
        });
    }

    let request = GenerationRequest::style_analysis(config, samples);
    debug!("requesting style analysis over {} samples", samples.len());

    let text = summarizer.summarize(&request)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::Summarizer("empty style profile".into()));
    }

    let profile = StyleProfile::new(text, samples.len());
    info!("learned style from {} emails", profile.sample_count);
    session.set_style_profile(profile.clone());
    Ok(profile)
}
