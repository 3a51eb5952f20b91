//! OpenAI Chat Completions client.

use serde_json::json;

use crate::wire_types::openai::ChatCompletion;
use crate::{Endpoint, FortuneRequest, FortuneResult, ProviderId};

const USER_PROMPT: &str = "Give me a fortune for today.";

pub(crate) fn build_request_body(model: &str, request: &FortuneRequest) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": request.instruction() },
            { "role": "user", "content": USER_PROMPT },
        ],
        "max_tokens": request.max_output_tokens(),
        "temperature": request.temperature(),
    })
}

pub async fn produce(
    client: &reqwest::Client,
    endpoint: &Endpoint,
    request: &FortuneRequest,
) -> FortuneResult {
    let Some(key) = endpoint.api_key() else {
        return crate::missing_credentials(ProviderId::OpenAI);
    };

    let url = format!("{}/chat/completions", endpoint.base_url());
    let body = build_request_body(endpoint.model(), request);

    let http = client
        .post(&url)
        .bearer_auth(key.expose_secret())
        .json(&body);

    let outcome = crate::send_json::<ChatCompletion>(ProviderId::OpenAI, http, request.timeout())
        .await
        .map(ChatCompletion::into_first_text);
    crate::into_result(ProviderId::OpenAI, outcome)
}
