//! Shared test utilities and fixtures
//!
//! Mock provider endpoints and pre-wired orchestrators for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use fortune_engine::{
    FortuneOrchestrator, FortuneRequest, LocalGenerator, ProviderSet, ProviderSettings,
};
use fortune_providers::{ApiKey, Endpoint};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OPENAI_PATH: &str = "/chat/completions";
pub const HUGGINGFACE_PATH: &str = "/models/gpt2";
pub const GEMINI_PATH: &str = "/models/gemini-2.0-flash:generateContent";

/// Every external endpoint routed to `server`, with credentials for all.
pub fn settings_for(server: &MockServer) -> ProviderSettings {
    ProviderSettings {
        openai: Endpoint::new(server.uri(), "gpt-3.5-turbo")
            .with_api_key(Some(ApiKey::OpenAI("sk-test".to_string()))),
        huggingface: Endpoint::new(server.uri(), "gpt2"),
        gemini: Endpoint::new(server.uri(), "gemini-2.0-flash")
            .with_api_key(Some(ApiKey::Gemini("g-test".to_string()))),
    }
}

/// Orchestrator against `server` with an instant local fallback.
pub fn orchestrator_for(server: &MockServer, timeout: Duration) -> FortuneOrchestrator {
    let local = LocalGenerator::default().with_delay(Duration::ZERO);
    let providers = ProviderSet::new(settings_for(server), local).expect("client builds");
    FortuneOrchestrator::new(providers, FortuneRequest::default().with_timeout(timeout))
}

pub async fn mount_openai_fortune(server: &MockServer, text: &str) {
    let body = serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    });

    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_huggingface_fortune(server: &MockServer, text: &str) {
    let body = serde_json::json!([{ "generated_text": text }]);

    Mock::given(method("POST"))
        .and(path(HUGGINGFACE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_gemini_fortune(server: &MockServer, text: &str) {
    let body = serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    });

    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Any POST answers with `status` and `body`.
pub async fn mount_status(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
