//! Hugging Face Inference API client (text generation).
//!
//! Base language models don't follow instructions, so the request is seeded
//! with a short prompt and the continuation is cut down to one sentence.

use serde_json::json;

use crate::local::Locale;
use crate::wire_types::huggingface::Generations;
use crate::{Endpoint, FortuneRequest, FortuneResult, ProviderId};

const TURKISH_SEEDS: [&str; 5] = [
    "Güzel bir gün için motivasyon:",
    "Pozitif enerji mesajı:",
    "İlham verici söz:",
    "Bugün için şanslı mesaj:",
    "Mutluluk getiren kelimeler:",
];

const ENGLISH_SEEDS: [&str; 5] = [
    "Motivation for a beautiful day:",
    "A message of positive energy:",
    "An inspiring saying:",
    "A lucky message for today:",
    "Words that bring happiness:",
];

fn seed_prompt(locale: Locale) -> String {
    let (seeds, lead) = match locale {
        Locale::Turkish => (&TURKISH_SEEDS, "Bugün"),
        Locale::English => (&ENGLISH_SEEDS, "Today"),
    };
    let seed = seeds[rand::random_range(0..seeds.len())];
    format!("{seed} {lead}")
}

/// Reduce raw model output to a single capitalized sentence.
///
/// Returns `None` when nothing but punctuation or whitespace is left.
pub(crate) fn clean_generated(raw: &str, prompt: &str) -> Option<String> {
    let continuation = raw.strip_prefix(prompt).unwrap_or(raw);
    let sentence = fortune_types::first_sentence(continuation);
    if sentence.trim_end_matches('.').trim().is_empty() {
        return None;
    }
    Some(fortune_types::capitalize_first(&sentence))
}

pub(crate) fn build_request_body(prompt: &str, request: &FortuneRequest) -> serde_json::Value {
    json!({
        "inputs": prompt,
        "parameters": {
            "max_new_tokens": request.max_output_tokens(),
            "temperature": request.temperature(),
            "return_full_text": false,
        },
    })
}

pub async fn produce(
    client: &reqwest::Client,
    endpoint: &Endpoint,
    request: &FortuneRequest,
) -> FortuneResult {
    let prompt = seed_prompt(Locale::from_language(request.language()));
    let url = format!("{}/models/{}", endpoint.base_url(), endpoint.model());

    let mut http = client.post(&url).json(&build_request_body(&prompt, request));
    if let Some(key) = endpoint.api_key() {
        http = http.bearer_auth(key.expose_secret());
    }

    let outcome = crate::send_json::<Generations>(ProviderId::HuggingFace, http, request.timeout())
        .await
        .map(|generations| {
            generations
                .into_first_text()
                .and_then(|raw| clean_generated(&raw, &prompt))
        });
    crate::into_result(ProviderId::HuggingFace, outcome)
}
