//! Interaction state.

use std::fmt;

/// Where the cookie is in its break/reveal cycle.
///
/// `Error` is the reveal of the fixed fallback message; it behaves like
/// `Revealed` for every transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum InteractionState {
    #[default]
    Idle,
    Breaking,
    AwaitingFortune,
    Revealed,
    Error,
}

impl InteractionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Breaking => "breaking",
            InteractionState::AwaitingFortune => "awaiting-fortune",
            InteractionState::Revealed => "revealed",
            InteractionState::Error => "error",
        }
    }

    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// A cycle is underway and has not yet revealed anything.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(
            self,
            InteractionState::Breaking | InteractionState::AwaitingFortune
        )
    }

    #[must_use]
    pub const fn is_revealed(self) -> bool {
        matches!(self, InteractionState::Revealed | InteractionState::Error)
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
