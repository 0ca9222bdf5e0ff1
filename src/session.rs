//! Per-user session state

use crate::error::{Error, Result};
use crate::style::StyleProfile;
use crate::types::RawMessage;
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

/// Explicit session context threaded through collection and style learning
///
/// Holds the provider access token, the user's own address once known, and
/// the active style profile. Collection only ever reads it.
#[derive(Clone, Default)]
pub struct Session {
    access_token: Option<String>,
    authorized_at: Option<DateTime<Utc>>,
    user_email: Option<String>,
    style_profile: Option<StyleProfile>,
}

impl Session {
    /// Unauthorized session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session created from a completed authorization
    #[must_use]
    pub fn authorized(access_token: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.authorize(access_token);
        session
    }

    /// Store a fresh access token
    pub fn authorize(&mut self, access_token: impl Into<String>) {
        let token = access_token.into();
        debug!("session authorized with token {}", mask_token(&token));
        self.access_token = Some(token);
        self.authorized_at = Some(Utc::now());
    }

    /// Forget the token and the cached address; the style profile survives
    pub fn logout(&mut self) {
        debug!("session logged out");
        self.access_token = None;
        self.authorized_at = None;
        self.user_email = None;
    }

    /// Drop a token the provider rejected and report it
    pub fn token_expired(&mut self) -> Error {
        debug!("access token rejected, clearing");
        self.access_token = None;
        self.authorized_at = None;
        Error::TokenExpired
    }

    #[must_use]
    pub const fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    /// Access token, or `NotAuthorized`
    pub fn require_token(&self) -> Result<&str> {
        self.access_token.as_deref().ok_or(Error::NotAuthorized)
    }

    #[must_use]
    pub const fn authorized_at(&self) -> Option<DateTime<Utc>> {
        self.authorized_at
    }

    /// Remember the user's address (stored lowercased)
    pub fn set_user_email(&mut self, email: &str) {
        let email = email.trim().to_lowercase();
        self.user_email = if email.is_empty() { None } else { Some(email) };
    }

    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        self.user_email.as_deref()
    }

    /// Whether `message` was sent by the session's user
    ///
    /// True when the `From` header contains the user's address
    /// (case-insensitive), and always true while the address is unknown.
    #[must_use]
    pub fn is_from_user(&self, message: &RawMessage) -> bool {
        let Some(user_email) = self.user_email.as_deref() else {
            return true;
        };
        message
            .header("From")
            .is_some_and(|from| from.to_lowercase().contains(user_email))
    }

    #[must_use]
    pub const fn style_profile(&self) -> Option<&StyleProfile> {
        self.style_profile.as_ref()
    }

    pub fn set_style_profile(&mut self, profile: StyleProfile) {
        self.style_profile = Some(profile);
    }

    pub fn clear_style_profile(&mut self) {
        self.style_profile = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_deref().map(mask_token))
            .field("authorized_at", &self.authorized_at)
            .field("user_email", &self.user_email)
            .field("style_profile", &self.style_profile)
            .finish()
    }
}

/// First four characters of a token followed by `***`
#[must_use]
pub fn mask_token(token: &str) -> String {
    match token.char_indices().nth(4) {
        Some((end, _)) => format!("{}***", &token[..end]),
        None => "***".to_string(),
    }
}
