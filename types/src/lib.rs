//! Core domain types for the fortune cookie.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod fortune;
mod provider;
mod text;
pub mod ui;

pub use fortune::{FailureKind, FortuneFailure, FortuneResult};
pub use provider::{EnumParseError, ProviderId};
pub use text::{capitalize_first, first_sentence, truncate_with_ellipsis};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("fortune text must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    /// Trim surrounding whitespace, then validate.
    pub fn trimmed(value: &str) -> Result<Self, EmptyStringError> {
        Self::new(value.trim())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl From<NonEmptyStaticStr> for NonEmptyString {
    fn from(value: NonEmptyStaticStr) -> Self {
        Self(value.0.to_string())
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A compile-time checked non-empty static string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonEmptyStaticStr(&'static str);

impl NonEmptyStaticStr {
    #[must_use]
    pub const fn new(value: &'static str) -> Self {
        assert!(!value.is_empty(), "NonEmptyStaticStr must not be empty");
        Self(value)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

// ============================================================================
// API Keys
// ============================================================================

/// Credential for one external provider.
///
/// The variant binds the secret to its provider so a key can never be sent
/// to the wrong endpoint.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiKey {
    OpenAI(String),
    HuggingFace(String),
    Gemini(String),
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiKey::OpenAI(_) => write!(f, "ApiKey::OpenAI(<redacted>)"),
            ApiKey::HuggingFace(_) => write!(f, "ApiKey::HuggingFace(<redacted>)"),
            ApiKey::Gemini(_) => write!(f, "ApiKey::Gemini(<redacted>)"),
        }
    }
}

impl ApiKey {
    /// Build a key for `provider`. Returns `None` for the local generator,
    /// which has no credentials.
    #[must_use]
    pub fn for_provider(provider: ProviderId, secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        match provider {
            ProviderId::OpenAI => Some(ApiKey::OpenAI(secret)),
            ProviderId::HuggingFace => Some(ApiKey::HuggingFace(secret)),
            ProviderId::Gemini => Some(ApiKey::Gemini(secret)),
            ProviderId::Local => None,
        }
    }

    #[must_use]
    pub fn provider(&self) -> ProviderId {
        match self {
            ApiKey::OpenAI(_) => ProviderId::OpenAI,
            ApiKey::HuggingFace(_) => ProviderId::HuggingFace,
            ApiKey::Gemini(_) => ProviderId::Gemini,
        }
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        match self {
            ApiKey::OpenAI(key) | ApiKey::HuggingFace(key) | ApiKey::Gemini(key) => key,
        }
    }
}
