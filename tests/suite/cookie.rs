//! End-to-end cookie cycles: state machine + orchestrator + mocked providers

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fortune_engine::{CookieApp, FETCH_DELAY, InteractionState};
use fortune_types::ProviderId;
use fortune_types::ui::PULSE_SEGMENT;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{GEMINI_PATH, mount_gemini_fortune, mount_status, orchestrator_for};

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

fn app_for(server: &MockServer, preferred: ProviderId) -> CookieApp {
    let orchestrator = orchestrator_for(server, ATTEMPT_TIMEOUT);
    CookieApp::new(Arc::new(orchestrator), Some(preferred), false)
}

/// Break the cookie and let the fetch go out.
fn break_cookie(app: &mut CookieApp) {
    app.activate();
    assert_eq!(app.state(), InteractionState::Breaking);
    app.tick(PULSE_SEGMENT * 2);
    assert_eq!(app.state(), InteractionState::AwaitingFortune);
    app.tick(FETCH_DELAY);
    assert_eq!(app.fetches_issued(), 1);
}

async fn wait_for_reveal(app: &mut CookieApp) {
    for _ in 0..300 {
        if app.state().is_revealed() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.tick(Duration::ZERO);
    }
}

#[tokio::test]
async fn cookie_reveals_trimmed_external_fortune() {
    let server = MockServer::start().await;
    mount_gemini_fortune(&server, "   Sevgin güçlü bir şekilde parlayacak.\n").await;

    let mut app = app_for(&server, ProviderId::Gemini);
    break_cookie(&mut app);
    wait_for_reveal(&mut app).await;

    assert_eq!(app.state(), InteractionState::Revealed);
    assert_eq!(app.fortune(), Some("Sevgin güçlü bir şekilde parlayacak."));
    assert_eq!(app.served_by(), Some(ProviderId::Gemini));
    assert!(app.diagnostic().is_none());
}

#[tokio::test]
async fn cookie_with_failing_provider_reveals_local_fortune() {
    let server = MockServer::start().await;
    mount_status(&server, 500, "boom").await;

    let mut app = app_for(&server, ProviderId::OpenAI);
    break_cookie(&mut app);
    wait_for_reveal(&mut app).await;

    assert_eq!(app.state(), InteractionState::Revealed);
    assert!(app.fortune().is_some_and(|text| !text.is_empty()));
    assert_eq!(app.served_by(), Some(ProviderId::Local));
    assert!(app.absorbed_failure().is_some());
    assert!(app.diagnostic().is_none());
}

#[tokio::test]
async fn reset_while_fetching_discards_late_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "candidates": [{ "content": { "parts": [{ "text": "late" }] } }]
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server, ProviderId::Gemini);
    break_cookie(&mut app);
    app.reset();

    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.tick(Duration::ZERO);
    }

    assert_eq!(app.state(), InteractionState::Idle);
    assert!(app.fortune().is_none());
    assert_eq!(app.fetches_issued(), 1);
}

#[test]
fn renderer_thread_drives_cycle_on_supplied_runtime() {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_gemini_fortune(&server, "Yeni başlangıçlar seni bekliyor.").await;
        server
    });

    let mut app = app_for(&server, ProviderId::Gemini).with_runtime(runtime.handle().clone());
    break_cookie(&mut app);
    for _ in 0..300 {
        if app.state().is_revealed() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
        app.tick(Duration::ZERO);
    }

    assert_eq!(app.state(), InteractionState::Revealed);
    assert_eq!(app.fortune(), Some("Yeni başlangıçlar seni bekliyor."));
    assert_eq!(app.served_by(), Some(ProviderId::Gemini));
}
