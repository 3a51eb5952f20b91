//! Fallback orchestration against mocked providers

use std::time::Duration;

use fortune_engine::FortuneSource;
use fortune_types::{FailureKind, ProviderId};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{GEMINI_PATH, OPENAI_PATH, mount_gemini_fortune, mount_status, orchestrator_for};

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn preferred_success_is_returned_without_fallback() {
    let server = MockServer::start().await;
    mount_gemini_fortune(&server, "  Bolluk yolda.  ").await;

    let report = orchestrator_for(&server, ATTEMPT_TIMEOUT)
        .get_fortune_report(ProviderId::Gemini)
        .await;

    assert_eq!(report.served_by, ProviderId::Gemini);
    assert_eq!(report.result.text(), "Bolluk yolda.");
    assert!(report.absorbed_failure.is_none());
}

#[tokio::test]
async fn every_preference_yields_text_when_all_externals_fail() {
    let server = MockServer::start().await;
    mount_status(&server, 503, "overloaded").await;
    let orchestrator = orchestrator_for(&server, ATTEMPT_TIMEOUT);

    let mut preferences: Vec<Option<ProviderId>> =
        ProviderId::all().iter().copied().map(Some).collect();
    preferences.push(None);

    for preferred in preferences {
        let result = orchestrator.get_fortune(preferred).await;
        assert!(result.is_success(), "{preferred:?}");
        assert!(!result.text().is_empty());
    }
}

#[tokio::test]
async fn only_the_preferred_provider_is_tried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = orchestrator_for(&server, ATTEMPT_TIMEOUT)
        .get_fortune_report(ProviderId::OpenAI)
        .await;

    assert_eq!(report.served_by, ProviderId::Local);
    assert!(report.result.is_success());
    assert_eq!(
        report.absorbed_failure.map(|f| f.kind()),
        Some(FailureKind::ProviderRejected)
    );
}

#[tokio::test]
async fn timed_out_provider_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(OPENAI_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let report = orchestrator_for(&server, Duration::from_millis(200))
        .fetch(Some(ProviderId::OpenAI))
        .await;

    assert_eq!(report.served_by, ProviderId::Local);
    assert_eq!(
        report.absorbed_failure.map(|f| f.kind()),
        Some(FailureKind::Timeout)
    );
}

#[tokio::test]
async fn local_preference_never_touches_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = orchestrator_for(&server, ATTEMPT_TIMEOUT)
        .get_fortune_report(ProviderId::Local)
        .await;
    assert_eq!(report.served_by, ProviderId::Local);
    assert!(report.result.is_success());
}
