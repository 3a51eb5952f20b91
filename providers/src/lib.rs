//! Fortune text providers.
//!
//! # Architecture
//!
//! Every provider exposes the same capability: attempt to produce one fortune
//! string, or fail with a reason. [`ProviderSet::produce`] is the single
//! dispatch point:
//!
//! - [`openai`] - OpenAI Chat Completions API (bearer credential required)
//! - [`huggingface`] - Hugging Face Inference API (credential optional)
//! - [`gemini`] - Google Gemini GenerateContent API (key required)
//! - [`local`] - Template generator; never fails, never blocks indefinitely
//!
//! # Error Handling
//!
//! Nothing here returns `Err` for a failed attempt. Transport errors, timeouts,
//! non-2xx statuses, unparseable bodies and empty candidates all become
//! [`FortuneResult::Failure`] with a [`FailureKind`] describing the class.

pub mod gemini;
pub mod huggingface;
pub mod local;
pub mod openai;
pub mod wire_types;

pub use fortune_types;
pub use fortune_types::{
    ApiKey, FailureKind, FortuneFailure, FortuneResult, NonEmptyString, ProviderId,
};
pub use local::LocalGenerator;

use std::time::Duration;

use serde::de::DeserializeOwned;

/// Canonical OpenAI API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";
/// Canonical Hugging Face Inference API base URL.
pub const HUGGINGFACE_API_BASE_URL: &str = "https://api-inference.huggingface.co";
/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "gpt2";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Bounded timeout for one external attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_LANGUAGE: &str = "Turkish";
pub const DEFAULT_MAX_CHARS: u32 = 80;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 50;
const DEFAULT_TEMPERATURE: f32 = 0.8;

const CONNECT_TIMEOUT_SECS: u64 = 5;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;
const ERROR_EXCERPT_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ProviderSetupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn base_client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(concat!("fortune-cookie/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Build the shared HTTP client.
///
/// `https_only` is dropped only when an endpoint was explicitly configured
/// with a plain-HTTP base URL (local proxies, test servers).
pub fn http_client(https_only: bool) -> Result<reqwest::Client, reqwest::Error> {
    base_client_builder().https_only(https_only).build()
}

pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// Map a reqwest error to a failure class.
pub(crate) fn classify_transport_error(
    provider: ProviderId,
    error: &reqwest::Error,
) -> FortuneFailure {
    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_decode() {
        FailureKind::MalformedResponse
    } else {
        FailureKind::Network
    };
    FortuneFailure::new(kind, format!("{} request failed: {error}", provider.display_name()))
}

/// Send one request and decode a 2xx JSON body into `T`.
///
/// No retries: the caller gets exactly one bounded attempt.
pub(crate) async fn send_json<T>(
    provider: ProviderId,
    request: reqwest::RequestBuilder,
    timeout: Duration,
) -> Result<T, FortuneFailure>
where
    T: DeserializeOwned,
{
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_transport_error(provider, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = read_capped_error_body(response).await;
        let excerpt = fortune_types::truncate_with_ellipsis(&body, ERROR_EXCERPT_CHARS);
        return Err(FortuneFailure::new(
            FailureKind::ProviderRejected,
            format!("{} API error {status}: {excerpt}", provider.display_name()),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_transport_error(provider, &e))?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(%e, provider = %provider, payload_bytes = body.len(), "Unparseable provider response");
        FortuneFailure::new(
            FailureKind::MalformedResponse,
            format!("{} response could not be parsed: {e}", provider.display_name()),
        )
    })
}

/// Everything an external attempt needs besides its endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FortuneRequest {
    language: String,
    max_chars: u32,
    max_output_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl Default for FortuneRequest {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

impl FortuneRequest {
    #[must_use]
    pub fn new(language: impl Into<String>, max_chars: u32) -> Self {
        Self {
            language: language.into(),
            max_chars,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_generation(mut self, max_output_tokens: u32, temperature: f32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self.temperature = temperature;
        self
    }

    /// The fixed fortune-teller instruction, parameterized by language and budget.
    #[must_use]
    pub fn instruction(&self) -> String {
        format!(
            "You are a wise fortune teller. Generate a short, positive, inspirational \
             fortune message in {}. Keep it under {} characters. Be motivational and uplifting.",
            self.language, self.max_chars
        )
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub const fn max_chars(&self) -> u32 {
        self.max_chars
    }

    #[must_use]
    pub const fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Where one external provider lives and how to authenticate with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    model: String,
    api_key: Option<ApiKey>,
}

impl Endpoint {
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<ApiKey>) -> Self {
        self.api_key = api_key;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }

    fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Endpoints for all external providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub openai: Endpoint,
    pub huggingface: Endpoint,
    pub gemini: Endpoint,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            openai: Endpoint::new(OPENAI_API_BASE_URL, DEFAULT_OPENAI_MODEL),
            huggingface: Endpoint::new(HUGGINGFACE_API_BASE_URL, DEFAULT_HUGGINGFACE_MODEL),
            gemini: Endpoint::new(GEMINI_API_BASE_URL, DEFAULT_GEMINI_MODEL),
        }
    }
}

impl ProviderSettings {
    fn all_https(&self) -> bool {
        [&self.openai, &self.huggingface, &self.gemini]
            .iter()
            .all(|endpoint| endpoint.is_https())
    }
}

/// The registered providers, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct ProviderSet {
    client: reqwest::Client,
    settings: ProviderSettings,
    local: LocalGenerator,
}

impl ProviderSet {
    pub fn new(
        settings: ProviderSettings,
        local: LocalGenerator,
    ) -> Result<Self, ProviderSetupError> {
        let client = http_client(settings.all_https())?;
        Ok(Self {
            client,
            settings,
            local,
        })
    }

    #[must_use]
    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    #[must_use]
    pub fn local(&self) -> &LocalGenerator {
        &self.local
    }

    /// Attempt one fortune from `provider`. Never panics, never returns `Err`.
    pub async fn produce(&self, provider: ProviderId, request: &FortuneRequest) -> FortuneResult {
        let result = match provider {
            ProviderId::OpenAI => {
                openai::produce(&self.client, &self.settings.openai, request).await
            }
            ProviderId::HuggingFace => {
                huggingface::produce(&self.client, &self.settings.huggingface, request).await
            }
            ProviderId::Gemini => {
                gemini::produce(&self.client, &self.settings.gemini, request).await
            }
            ProviderId::Local => self.local.produce().await,
        };

        match &result {
            FortuneResult::Success(text) => {
                tracing::debug!(provider = %provider, chars = text.chars().count(), "Fortune produced");
            }
            FortuneResult::Failure(failure) => {
                tracing::warn!(provider = %provider, kind = %failure.kind(), "{}", failure.detail());
            }
        }
        result
    }
}

/// Failure returned when a provider needs a credential that isn't configured.
pub(crate) fn missing_credentials(provider: ProviderId) -> FortuneResult {
    let hint = provider
        .env_var()
        .map(|var| format!(" (set {var} or add it under [api_keys])"))
        .unwrap_or_default();
    FortuneResult::failure(
        FailureKind::MissingCredentials,
        format!("{} API key required{hint}", provider.display_name()),
    )
}

/// Normalize a decoded response or a transport failure into a result.
pub(crate) fn into_result(
    provider: ProviderId,
    outcome: Result<Option<String>, FortuneFailure>,
) -> FortuneResult {
    match outcome {
        Ok(candidate) => {
            FortuneResult::from_candidate(candidate.as_deref(), provider.display_name())
        }
        Err(failure) => FortuneResult::Failure(failure),
    }
}

#[cfg(test)]
mod tests {
    use super::{Endpoint, FortuneRequest, ProviderId, ProviderSettings, missing_credentials};
    use fortune_types::FailureKind;
    use std::time::Duration;

    #[test]
    fn instruction_mentions_language_and_budget() {
        let request = FortuneRequest::new("English", 60);
        let instruction = request.instruction();
        assert!(instruction.contains("in English"));
        assert!(instruction.contains("under 60 characters"));
    }

    #[test]
    fn default_request_uses_bounded_timeout() {
        let request = FortuneRequest::default();
        assert_eq!(request.timeout(), Duration::from_secs(10));
        assert_eq!(request.max_output_tokens(), 50);
        assert_eq!(request.language(), "Turkish");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let endpoint = Endpoint::new("http://127.0.0.1:9999/", "gpt2");
        assert_eq!(endpoint.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn default_settings_are_https_only() {
        assert!(ProviderSettings::default().all_https());
        let mut settings = ProviderSettings::default();
        settings.gemini = Endpoint::new("http://localhost:8080", "gemini-2.0-flash");
        assert!(!settings.all_https());
    }

    #[test]
    fn missing_credentials_names_env_var() {
        let result = missing_credentials(ProviderId::OpenAI);
        let failure = result.failure_info().unwrap();
        assert_eq!(failure.kind(), FailureKind::MissingCredentials);
        assert!(failure.detail().contains("OPENAI_API_KEY"));
    }
}
