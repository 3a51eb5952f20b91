//! Typed response structures for provider APIs.
//!
//! Parse errors happen at the serde boundary, not scattered through
//! extraction logic. Every field a provider may omit is optional so that a
//! structurally valid but empty answer decodes and is then rejected as a
//! missing candidate.

pub mod openai {
    use serde::Deserialize;

    /// Chat Completions response.
    #[derive(Debug, Deserialize)]
    pub struct ChatCompletion {
        #[serde(default)]
        pub choices: Vec<Choice>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: Option<ChoiceMessage>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChoiceMessage {
        pub content: Option<String>,
    }

    impl ChatCompletion {
        #[must_use]
        pub fn into_first_text(self) -> Option<String> {
            self.choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message)
                .and_then(|message| message.content)
        }
    }
}

pub mod huggingface {
    use serde::Deserialize;

    /// Text-generation responses are a JSON array of generations.
    #[derive(Debug, Deserialize)]
    #[serde(transparent)]
    pub struct Generations(pub Vec<Generation>);

    #[derive(Debug, Deserialize)]
    pub struct Generation {
        pub generated_text: Option<String>,
    }

    impl Generations {
        #[must_use]
        pub fn into_first_text(self) -> Option<String> {
            self.0.into_iter().next().and_then(|g| g.generated_text)
        }
    }
}

pub mod gemini {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Response {
        pub candidates: Option<Vec<Candidate>>,
        pub error: Option<ErrorInfo>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Candidate {
        pub content: Option<Content>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Content {
        pub parts: Option<Vec<Part>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Part {
        pub text: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorInfo {
        pub message: Option<String>,
        pub code: Option<i32>,
    }

    impl ErrorInfo {
        #[must_use]
        pub fn message_or_default(&self) -> &str {
            self.message.as_deref().unwrap_or("Unknown error")
        }
    }

    impl Response {
        /// Text of the first part of the first candidate that carries text.
        #[must_use]
        pub fn into_first_text(self) -> Option<String> {
            self.candidates?
                .into_iter()
                .next()?
                .content?
                .parts?
                .into_iter()
                .find_map(|part| part.text)
        }
    }
}
