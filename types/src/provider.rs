//! Provider identifiers and parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of fortune sources.
///
/// Three external text-generation providers plus the local template
/// generator, which is the unconditional fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    HuggingFace,
    #[default]
    Gemini,
    Local,
}

const PROVIDER_PARSE_VALUES: &[&str] = &[
    "openai",
    "gpt",
    "chatgpt",
    "huggingface",
    "hugging-face",
    "hf",
    "gemini",
    "google",
    "local",
    "mock",
    "template",
];

/// A provider name that matched none of the known identifiers or aliases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid provider value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            raw: raw.into(),
            expected,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn expected(&self) -> &'static [&'static str] {
        self.expected
    }
}

impl ProviderId {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::HuggingFace => "huggingface",
            ProviderId::Gemini => "gemini",
            ProviderId::Local => "local",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OpenAI",
            ProviderId::HuggingFace => "Hugging Face",
            ProviderId::Gemini => "Gemini",
            ProviderId::Local => "Local templates",
        }
    }

    /// Environment variable consulted for this provider's credential.
    #[must_use]
    pub const fn env_var(self) -> Option<&'static str> {
        match self {
            ProviderId::OpenAI => Some("OPENAI_API_KEY"),
            ProviderId::HuggingFace => Some("HF_API_TOKEN"),
            ProviderId::Gemini => Some("GEMINI_API_KEY"),
            ProviderId::Local => None,
        }
    }

    /// Whether a credential is mandatory before any request is attempted.
    #[must_use]
    pub const fn requires_api_key(self) -> bool {
        matches!(self, ProviderId::OpenAI | ProviderId::Gemini)
    }

    #[must_use]
    pub const fn is_external(self) -> bool {
        !matches!(self, ProviderId::Local)
    }

    #[must_use]
    pub const fn all() -> &'static [ProviderId] {
        &[
            ProviderId::OpenAI,
            ProviderId::HuggingFace,
            ProviderId::Gemini,
            ProviderId::Local,
        ]
    }

    pub fn parse(s: &str) -> Result<Self, EnumParseError> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "openai" | "gpt" | "chatgpt" => Ok(ProviderId::OpenAI),
            "huggingface" | "hugging-face" | "hf" => Ok(ProviderId::HuggingFace),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "local" | "mock" | "template" => Ok(ProviderId::Local),
            _ => Err(EnumParseError::new(trimmed, PROVIDER_PARSE_VALUES)),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
