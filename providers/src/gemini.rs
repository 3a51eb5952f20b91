//! Google Gemini GenerateContent client.

use serde_json::json;

use crate::wire_types::gemini::Response;
use crate::{Endpoint, FailureKind, FortuneFailure, FortuneRequest, FortuneResult, ProviderId};

pub(crate) fn build_request_body(request: &FortuneRequest) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{ "text": request.instruction() }]
        }],
        "generationConfig": {
            "maxOutputTokens": request.max_output_tokens(),
            "temperature": request.temperature(),
        },
    })
}

fn extract_text(response: Response) -> Result<Option<String>, FortuneFailure> {
    // Gemini can report errors inside a 200 body.
    if let Some(error) = &response.error {
        let code = error.code.map(|c| format!(" ({c})")).unwrap_or_default();
        return Err(FortuneFailure::new(
            FailureKind::ProviderRejected,
            format!("Gemini API error{code}: {}", error.message_or_default()),
        ));
    }
    Ok(response.into_first_text())
}

pub async fn produce(
    client: &reqwest::Client,
    endpoint: &Endpoint,
    request: &FortuneRequest,
) -> FortuneResult {
    let Some(key) = endpoint.api_key() else {
        return crate::missing_credentials(ProviderId::Gemini);
    };

    let url = format!(
        "{}/models/{}:generateContent",
        endpoint.base_url(),
        endpoint.model()
    );

    let http = client
        .post(&url)
        .header("x-goog-api-key", key.expose_secret())
        .json(&build_request_body(request));

    let outcome = crate::send_json::<Response>(ProviderId::Gemini, http, request.timeout())
        .await
        .and_then(extract_text);
    crate::into_result(ProviderId::Gemini, outcome)
}
