//! Provider layer tests against mocked HTTP endpoints

use std::time::Duration;

use fortune_engine::{FortuneRequest, LocalGenerator, ProviderSet};
use fortune_types::{FailureKind, ProviderId};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    GEMINI_PATH, mount_gemini_fortune, mount_huggingface_fortune, mount_openai_fortune,
    mount_status, settings_for,
};

fn provider_set(server: &MockServer) -> ProviderSet {
    let local = LocalGenerator::default().with_delay(Duration::ZERO);
    ProviderSet::new(settings_for(server), local).unwrap()
}

#[test]
fn provider_parse_aliases() {
    assert_eq!(ProviderId::parse("openai").unwrap(), ProviderId::OpenAI);
    assert_eq!(ProviderId::parse("ChatGPT").unwrap(), ProviderId::OpenAI);
    assert_eq!(ProviderId::parse("hf").unwrap(), ProviderId::HuggingFace);
    assert_eq!(ProviderId::parse("Google").unwrap(), ProviderId::Gemini);
    assert_eq!(ProviderId::parse("mock").unwrap(), ProviderId::Local);
    assert!(ProviderId::parse("oracle").is_err());
}

#[test]
fn provider_env_vars() {
    assert_eq!(ProviderId::OpenAI.env_var(), Some("OPENAI_API_KEY"));
    assert_eq!(ProviderId::HuggingFace.env_var(), Some("HF_API_TOKEN"));
    assert_eq!(ProviderId::Gemini.env_var(), Some("GEMINI_API_KEY"));
    assert_eq!(ProviderId::Local.env_var(), None);
}

#[tokio::test]
async fn every_external_provider_trims_candidate() {
    let server = MockServer::start().await;
    mount_openai_fortune(&server, "\n  Cesur adımlar seni bekliyor.  ").await;
    mount_gemini_fortune(&server, "\t Huzur kapını çalacak. \n").await;

    let providers = provider_set(&server);
    let request = FortuneRequest::default();

    for provider in [ProviderId::OpenAI, ProviderId::Gemini] {
        let result = providers.produce(provider, &request).await;
        assert!(result.is_success(), "{provider}");
        assert_eq!(result.text(), result.text().trim(), "{provider}");
        assert!(!result.text().is_empty());
    }
}

#[tokio::test]
async fn huggingface_output_is_reduced_to_one_sentence() {
    let server = MockServer::start().await;
    mount_huggingface_fortune(&server, "  şans seninle. Yarın da öyle").await;

    let result = provider_set(&server)
        .produce(ProviderId::HuggingFace, &FortuneRequest::default())
        .await;
    assert_eq!(result.text(), "Şans seninle.");
}

#[tokio::test]
async fn gemini_request_carries_instruction_and_generation_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "maxOutputTokens": 50 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Yeni bir yol." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = FortuneRequest::new("English", 80);
    let result = provider_set(&server).produce(ProviderId::Gemini, &request).await;
    assert_eq!(result.text(), "Yeni bir yol.");
}

#[tokio::test]
async fn rejected_status_is_reported_not_raised() {
    let server = MockServer::start().await;
    mount_status(&server, 500, "internal").await;

    let providers = provider_set(&server);
    for provider in [ProviderId::OpenAI, ProviderId::HuggingFace, ProviderId::Gemini] {
        let result = providers.produce(provider, &FortuneRequest::default()).await;
        let failure = result.failure_info().unwrap();
        assert_eq!(failure.kind(), FailureKind::ProviderRejected, "{provider}");
        assert!(result.text().is_empty());
        assert!(result.error_reason().is_some());
    }
}

#[tokio::test]
async fn local_provider_always_succeeds() {
    let server = MockServer::start().await;
    let providers = provider_set(&server);
    for _ in 0..100 {
        let result = providers
            .produce(ProviderId::Local, &FortuneRequest::default())
            .await;
        assert!(result.is_success());
        assert!(!result.text().is_empty());
    }
}
