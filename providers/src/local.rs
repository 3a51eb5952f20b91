//! Local template generator.
//!
//! Always succeeds. A short artificial delay keeps the reveal pacing the same
//! whether the fortune came from the network or from here.

use std::time::Duration;

use fortune_types::{FortuneResult, NonEmptyStaticStr, NonEmptyString};

use crate::DEFAULT_ATTEMPT_TIMEOUT;

/// Pause before a local fortune is handed back.
pub const DEFAULT_LOCAL_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on the artificial delay; the terminal fallback must stay prompt.
pub const MAX_LOCAL_DELAY: Duration = DEFAULT_ATTEMPT_TIMEOUT;

/// Which word set the templates are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Turkish,
    English,
}

impl Locale {
    /// Map a configured language name. Anything not recognized as Turkish is English.
    #[must_use]
    pub fn from_language(language: &str) -> Self {
        let normalized = language.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "turkish" | "tr" | "türkçe" | "turkce" => Self::Turkish,
            _ => Self::English,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Action,
    Quality,
    Obstacle,
    Guidance,
    Outcome,
}

struct Template {
    text: &'static str,
    slot: Slot,
}

const PLACEHOLDER: &str = "{}";
const FALLBACK_FORTUNE: NonEmptyStaticStr = NonEmptyStaticStr::new("Good things are on their way.");

struct WordSet {
    templates: [Template; 5],
    actions: [&'static str; 4],
    qualities: [&'static str; 4],
    obstacles: [&'static str; 4],
    guidance: [&'static str; 4],
    outcomes: [&'static str; 4],
}

impl WordSet {
    fn words(&self, slot: Slot) -> &[&'static str; 4] {
        match slot {
            Slot::Action => &self.actions,
            Slot::Quality => &self.qualities,
            Slot::Obstacle => &self.obstacles,
            Slot::Guidance => &self.guidance,
            Slot::Outcome => &self.outcomes,
        }
    }
}

static TURKISH: WordSet = WordSet {
    templates: [
        Template {
            text: "Bugün {} için mükemmel bir gün.",
            slot: Slot::Action,
        },
        Template {
            text: "Hayatında {} güçlü bir şekilde parlamaya başlayacak.",
            slot: Slot::Quality,
        },
        Template {
            text: "Önündeki {} aslında gizli bir fırsat.",
            slot: Slot::Obstacle,
        },
        Template {
            text: "Kalbin sana {} konusunda doğru yolu gösterecek.",
            slot: Slot::Guidance,
        },
        Template {
            text: "Bu hafta {} ile ilgili güzel haberler alacaksın.",
            slot: Slot::Outcome,
        },
    ],
    actions: ["yeni başlangıçlar", "cesur adımlar", "pozitif değişimler", "önemli kararlar"],
    qualities: ["yaratıcılığın", "özgüvenin", "sevgin", "bilgeliğin"],
    obstacles: ["zorluk", "engel", "problem", "duraklama"],
    guidance: ["aşk", "kariyer", "dostluk", "sağlık"],
    outcomes: ["başarı", "mutluluk", "huzur", "bolluk"],
};

static ENGLISH: WordSet = WordSet {
    templates: [
        Template {
            text: "Today is a perfect day for {}.",
            slot: Slot::Action,
        },
        Template {
            text: "Your {} will begin to shine brightly.",
            slot: Slot::Quality,
        },
        Template {
            text: "The {} ahead of you is a hidden opportunity.",
            slot: Slot::Obstacle,
        },
        Template {
            text: "Your heart will show you the right path in {}.",
            slot: Slot::Guidance,
        },
        Template {
            text: "This week you will hear good news about {}.",
            slot: Slot::Outcome,
        },
    ],
    actions: ["new beginnings", "bold steps", "positive changes", "important decisions"],
    qualities: ["creativity", "confidence", "love", "wisdom"],
    obstacles: ["difficulty", "obstacle", "problem", "pause"],
    guidance: ["love", "career", "friendship", "health"],
    outcomes: ["success", "happiness", "peace", "abundance"],
};

fn pick<T>(items: &[T]) -> &T {
    &items[rand::random_range(0..items.len())]
}

#[derive(Debug, Clone)]
pub struct LocalGenerator {
    locale: Locale,
    delay: Duration,
}

impl Default for LocalGenerator {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl LocalGenerator {
    #[must_use]
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            delay: DEFAULT_LOCAL_DELAY,
        }
    }

    /// Set the artificial delay, capped at [`MAX_LOCAL_DELAY`].
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay.min(MAX_LOCAL_DELAY);
        self
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn word_set(&self) -> &'static WordSet {
        match self.locale {
            Locale::Turkish => &TURKISH,
            Locale::English => &ENGLISH,
        }
    }

    /// Fill one random template with one random word of its slot kind.
    #[must_use]
    pub fn compose(&self) -> NonEmptyString {
        let set = self.word_set();
        let template = pick(&set.templates);
        let word = pick(set.words(template.slot));
        let text = template.text.replacen(PLACEHOLDER, word, 1);
        NonEmptyString::new(text).unwrap_or_else(|_| FALLBACK_FORTUNE.into())
    }

    pub async fn produce(&self) -> FortuneResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        FortuneResult::success(self.compose())
    }
}
