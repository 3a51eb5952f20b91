//! Single-level fallback from a preferred provider to local templates.

use futures_util::future::BoxFuture;

use fortune_providers::{FortuneRequest, ProviderSet};
use fortune_types::{FortuneFailure, FortuneResult, ProviderId};

/// Outcome of one fortune acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct FortuneReport {
    pub result: FortuneResult,
    /// Provider whose result is in `result`.
    pub served_by: ProviderId,
    /// Failure of the preferred external provider, when it was absorbed by fallback.
    pub absorbed_failure: Option<FortuneFailure>,
}

impl FortuneReport {
    #[must_use]
    pub fn served(result: FortuneResult, served_by: ProviderId) -> Self {
        Self {
            result,
            served_by,
            absorbed_failure: None,
        }
    }

    #[must_use]
    pub fn with_absorbed_failure(mut self, failure: Option<FortuneFailure>) -> Self {
        self.absorbed_failure = failure;
        self
    }

    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.absorbed_failure.is_some()
    }
}

/// Anything that can acquire a fortune for the state machine.
pub trait FortuneSource: Send + Sync {
    fn fetch(&self, preferred: Option<ProviderId>) -> BoxFuture<'_, FortuneReport>;
}

#[derive(Debug, Clone)]
pub struct FortuneOrchestrator {
    providers: ProviderSet,
    request: FortuneRequest,
}

impl FortuneOrchestrator {
    #[must_use]
    pub fn new(providers: ProviderSet, request: FortuneRequest) -> Self {
        Self { providers, request }
    }

    #[must_use]
    pub fn request(&self) -> &FortuneRequest {
        &self.request
    }

    /// Acquire a fortune. Resolves to a success unless the local generator itself failed.
    pub async fn get_fortune(&self, preferred: impl Into<Option<ProviderId>>) -> FortuneResult {
        self.get_fortune_report(preferred).await.result
    }

    /// Like [`Self::get_fortune`], also reporting who served it and any absorbed failure.
    pub async fn get_fortune_report(
        &self,
        preferred: impl Into<Option<ProviderId>>,
    ) -> FortuneReport {
        let mut absorbed = None;

        if let Some(provider) = preferred.into().filter(|p| p.is_external()) {
            match self.providers.produce(provider, &self.request).await {
                result @ FortuneResult::Success(_) => {
                    return FortuneReport::served(result, provider);
                }
                FortuneResult::Failure(failure) => {
                    tracing::warn!(
                        provider = %provider,
                        kind = %failure.kind(),
                        "Preferred provider failed; falling back to local templates"
                    );
                    absorbed = Some(failure);
                }
            }
        }

        let result = self.providers.produce(ProviderId::Local, &self.request).await;
        if let FortuneResult::Failure(failure) = &result {
            tracing::error!(%failure, "Local generator failed");
        }
        FortuneReport::served(result, ProviderId::Local).with_absorbed_failure(absorbed)
    }
}

impl FortuneSource for FortuneOrchestrator {
    fn fetch(&self, preferred: Option<ProviderId>) -> BoxFuture<'_, FortuneReport> {
        Box::pin(self.get_fortune_report(preferred))
    }
}
