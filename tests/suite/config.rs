//! Configuration file wiring into providers

use std::time::Duration;

use fortune_config::FortuneConfig;
use fortune_engine::{FortuneOrchestrator, ProviderSet};
use fortune_types::ProviderId;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::GEMINI_PATH;

fn write_config(dir: &tempfile::TempDir, body: &str) -> FortuneConfig {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    FortuneConfig::load_from(&path).unwrap().unwrap()
}

#[tokio::test]
async fn configured_endpoint_and_key_are_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(header("x-goog-api-key", "from-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Config works." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        &format!(
            r#"
[app]
preferred_provider = "google"

[api_keys]
gemini = "from-config"

[providers]
timeout_secs = 2
local_delay_ms = 0
gemini_base_url = "{}"
"#,
            server.uri()
        ),
    );

    let preferred = config.preferred_provider().unwrap();
    assert_eq!(preferred, ProviderId::Gemini);

    let providers = ProviderSet::new(config.provider_settings(), config.local_generator()).unwrap();
    let orchestrator = FortuneOrchestrator::new(providers, config.fortune_request());
    let report = orchestrator.get_fortune_report(preferred).await;

    assert_eq!(report.served_by, ProviderId::Gemini);
    assert_eq!(report.result.text(), "Config works.");
    assert_eq!(orchestrator.request().timeout(), Duration::from_secs(2));
}

#[tokio::test]
async fn local_preference_from_config_needs_no_network() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        &dir,
        "[app]\npreferred_provider = \"local\"\nlanguage = \"English\"\n\n[providers]\nlocal_delay_ms = 0\n",
    );

    let providers = ProviderSet::new(config.provider_settings(), config.local_generator()).unwrap();
    let orchestrator = FortuneOrchestrator::new(providers, config.fortune_request());
    let result = orchestrator
        .get_fortune(config.preferred_provider().unwrap())
        .await;

    assert!(result.is_success());
    assert!(result.text().is_ascii());
}
