//! The normalized outcome of one fortune attempt.

use std::fmt;

use thiserror::Error;

use crate::NonEmptyString;

/// Failure classes a provider can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Transport error before any response arrived.
    Network,
    /// The bounded per-attempt timeout elapsed.
    Timeout,
    /// The provider answered with a non-2xx status.
    ProviderRejected,
    /// The body could not be parsed, or held no usable text candidate.
    MalformedResponse,
    /// A required credential was not configured; no request was sent.
    MissingCredentials,
    /// No async runtime was available to run the attempt.
    RuntimeUnavailable,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Network => "network",
            FailureKind::Timeout => "timeout",
            FailureKind::ProviderRejected => "provider-rejected",
            FailureKind::MalformedResponse => "malformed-response",
            FailureKind::MissingCredentials => "missing-credentials",
            FailureKind::RuntimeUnavailable => "runtime-unavailable",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an attempt failed: a class plus a human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct FortuneFailure {
    kind: FailureKind,
    detail: String,
}

impl FortuneFailure {
    #[must_use]
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Outcome of one attempt to produce a fortune.
///
/// Success always carries non-empty text and failure always carries a
/// reason, so `success() == !text().is_empty() == error_reason().is_none()`
/// holds for every value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FortuneResult {
    Success(NonEmptyString),
    Failure(FortuneFailure),
}

impl FortuneResult {
    #[must_use]
    pub fn success(text: NonEmptyString) -> Self {
        FortuneResult::Success(text)
    }

    #[must_use]
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        FortuneResult::Failure(FortuneFailure::new(kind, detail))
    }

    /// Normalize a raw provider candidate: trim it, and treat an empty
    /// remainder as a malformed response rather than an empty success.
    #[must_use]
    pub fn from_candidate(candidate: Option<&str>, source: &str) -> Self {
        match candidate.map(NonEmptyString::trimmed) {
            Some(Ok(text)) => FortuneResult::Success(text),
            Some(Err(_)) => Self::failure(
                FailureKind::MalformedResponse,
                format!("{source} returned an empty text candidate"),
            ),
            None => Self::failure(
                FailureKind::MalformedResponse,
                format!("{source} response has no text candidate"),
            ),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, FortuneResult::Success(_))
    }

    /// The message to display; empty on failure.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            FortuneResult::Success(text) => text.as_str(),
            FortuneResult::Failure(_) => "",
        }
    }

    #[must_use]
    pub fn failure_info(&self) -> Option<&FortuneFailure> {
        match self {
            FortuneResult::Success(_) => None,
            FortuneResult::Failure(failure) => Some(failure),
        }
    }

    /// Human-readable failure cause, present iff the attempt failed.
    #[must_use]
    pub fn error_reason(&self) -> Option<String> {
        self.failure_info().map(ToString::to_string)
    }
}
