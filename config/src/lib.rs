//! Configuration for the fortune cookie.
//!
//! Read from `~/.fortune-cookie/config.toml`. Every section and field is
//! optional; a missing file means built-in defaults. String values may
//! reference environment variables as `${VAR}`.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fortune_providers::local::Locale;
use fortune_providers::{
    DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_LANGUAGE, DEFAULT_MAX_CHARS, Endpoint, FortuneRequest,
    LocalGenerator, ProviderSettings,
};
use fortune_types::{ApiKey, EnumParseError, ProviderId};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_DIR: &str = ".fortune-cookie";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct FortuneConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
    pub providers: Option<ProvidersConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid app.preferred_provider: {0}")]
    Provider(#[from] EnumParseError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => {
                Some(path.as_path())
            }
            ConfigError::Provider(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Provider tried first; anything else falls back to local templates.
    pub preferred_provider: Option<String>,
    /// Language requested from external providers and used for local templates.
    pub language: Option<String>,
    /// Character budget stated in the instruction.
    pub max_chars: Option<u32>,
    /// Finish every animation phase on the next frame.
    #[serde(default)]
    pub reduced_motion: bool,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub huggingface: Option<String>,
    pub gemini: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(opt: Option<&String>) -> &'static str {
            if opt.is_some() { "[REDACTED]" } else { "None" }
        }
        f.debug_struct("ApiKeys")
            .field("openai", &mask(self.openai.as_ref()))
            .field("huggingface", &mask(self.huggingface.as_ref()))
            .field("gemini", &mask(self.gemini.as_ref()))
            .finish()
    }
}

impl ApiKeys {
    fn raw(&self, provider: ProviderId) -> Option<&str> {
        match provider {
            ProviderId::OpenAI => self.openai.as_deref(),
            ProviderId::HuggingFace => self.huggingface.as_deref(),
            ProviderId::Gemini => self.gemini.as_deref(),
            ProviderId::Local => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProvidersConfig {
    /// Per-attempt timeout for external providers.
    pub timeout_secs: Option<u64>,
    /// Artificial pause before a local fortune is returned.
    pub local_delay_ms: Option<u64>,
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    pub huggingface_base_url: Option<String>,
    pub huggingface_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_model: Option<String>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// Expand and trim; blank values count as absent.
fn resolve(value: Option<&str>) -> Option<String> {
    let expanded = expand_env_vars(value?);
    let trimmed = expanded.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FortuneConfig {
    /// Load from the default location. `Ok(None)` when no file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// The provider to try first. Defaults to Gemini.
    pub fn preferred_provider(&self) -> Result<ProviderId, ConfigError> {
        let raw = self
            .app
            .as_ref()
            .and_then(|app| resolve(app.preferred_provider.as_deref()));
        match raw {
            Some(raw) => Ok(ProviderId::parse(&raw)?),
            None => Ok(ProviderId::default()),
        }
    }

    #[must_use]
    pub fn language(&self) -> String {
        self.app
            .as_ref()
            .and_then(|app| resolve(app.language.as_deref()))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    #[must_use]
    pub fn max_chars(&self) -> u32 {
        self.app
            .as_ref()
            .and_then(|app| app.max_chars)
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_MAX_CHARS)
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.app.as_ref().is_some_and(|app| app.reduced_motion)
    }

    /// Credential for `provider`: config value first, then its environment variable.
    #[must_use]
    pub fn api_key(&self, provider: ProviderId) -> Option<ApiKey> {
        let configured = self
            .api_keys
            .as_ref()
            .and_then(|keys| resolve(keys.raw(provider)));
        let secret = configured.or_else(|| {
            provider
                .env_var()
                .and_then(|var| env::var(var).ok())
                .and_then(|value| resolve(Some(value.as_str())))
        })?;
        ApiKey::for_provider(provider, secret)
    }

    fn attempt_timeout(&self) -> Duration {
        self.providers
            .as_ref()
            .and_then(|p| p.timeout_secs)
            .filter(|&secs| secs > 0)
            .map_or(DEFAULT_ATTEMPT_TIMEOUT, Duration::from_secs)
    }

    #[must_use]
    pub fn fortune_request(&self) -> FortuneRequest {
        FortuneRequest::new(self.language(), self.max_chars()).with_timeout(self.attempt_timeout())
    }

    #[must_use]
    pub fn provider_settings(&self) -> ProviderSettings {
        let defaults = ProviderSettings::default();
        let section = self.providers.as_ref();
        let endpoint = |provider: ProviderId,
                        default: &Endpoint,
                        base_url: Option<&str>,
                        model: Option<&str>| {
            let base_url = resolve(base_url).unwrap_or_else(|| default.base_url().to_string());
            let model = resolve(model).unwrap_or_else(|| default.model().to_string());
            Endpoint::new(base_url, model).with_api_key(self.api_key(provider))
        };

        ProviderSettings {
            openai: endpoint(
                ProviderId::OpenAI,
                &defaults.openai,
                section.and_then(|p| p.openai_base_url.as_deref()),
                section.and_then(|p| p.openai_model.as_deref()),
            ),
            huggingface: endpoint(
                ProviderId::HuggingFace,
                &defaults.huggingface,
                section.and_then(|p| p.huggingface_base_url.as_deref()),
                section.and_then(|p| p.huggingface_model.as_deref()),
            ),
            gemini: endpoint(
                ProviderId::Gemini,
                &defaults.gemini,
                section.and_then(|p| p.gemini_base_url.as_deref()),
                section.and_then(|p| p.gemini_model.as_deref()),
            ),
        }
    }

    /// Locale of the local templates and the fallback message.
    #[must_use]
    pub fn locale(&self) -> Locale {
        Locale::from_language(&self.language())
    }

    /// Local generator; `local_delay_ms` is capped at `MAX_LOCAL_DELAY`.
    #[must_use]
    pub fn local_generator(&self) -> LocalGenerator {
        let generator = LocalGenerator::new(self.locale());
        match self.providers.as_ref().and_then(|p| p.local_delay_ms) {
            Some(ms) => generator.with_delay(Duration::from_millis(ms)),
            None => generator,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}
