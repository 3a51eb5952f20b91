//! Core engine for the fortune cookie: fallback orchestration and the
//! interaction state machine.
//!
//! This crate has no rendering dependencies. A renderer drives [`CookieApp`]
//! by calling [`CookieApp::tick`] once per frame and reading its state and
//! animation values.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

mod orchestrator;
mod state;

pub use fortune_providers::local::Locale;
pub use fortune_providers::{self, FortuneRequest, LocalGenerator, ProviderSet, ProviderSettings};
pub use fortune_types::{
    FailureKind, FortuneFailure, FortuneResult, NonEmptyStaticStr, NonEmptyString, ProviderId,
};
pub use fortune_types::ui::{AnimationEdges, CookieAnimation, EffectTimer};
pub use orchestrator::{FortuneOrchestrator, FortuneReport, FortuneSource};
pub use state::InteractionState;

pub const FALLBACK_MESSAGE_TURKISH: NonEmptyStaticStr =
    NonEmptyStaticStr::new("Teknik bir sorun oluştu. Lütfen tekrar deneyin.");
pub const FALLBACK_MESSAGE_ENGLISH: NonEmptyStaticStr =
    NonEmptyStaticStr::new("A technical problem occurred. Please try again.");

/// Shown when even the terminal fallback reports failure.
#[must_use]
pub const fn fallback_message(locale: Locale) -> NonEmptyStaticStr {
    match locale {
        Locale::Turkish => FALLBACK_MESSAGE_TURKISH,
        Locale::English => FALLBACK_MESSAGE_ENGLISH,
    }
}

/// Pause between the end of the break pulse and issuing the fetch.
pub const FETCH_DELAY: Duration = Duration::from_millis(500);

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum CookieEvent {
    Activate,
    Reset,
    /// The compress/expand pulse of the break finished.
    BreakPulseFinished,
    FetchDelayElapsed,
    FortuneResolved { epoch: u64, report: FortuneReport },
}

/// Fortune text and provenance stored on reveal.
#[derive(Debug, Clone)]
struct Revealed {
    text: String,
    diagnostic: Option<String>,
    served_by: ProviderId,
    absorbed_failure: Option<FortuneFailure>,
}

pub struct CookieApp {
    source: Arc<dyn FortuneSource>,
    preferred: Option<ProviderId>,
    locale: Locale,
    /// Runtime fetches are spawned on; falls back to the caller's ambient runtime.
    runtime: Option<Handle>,
    state: InteractionState,
    epoch: u64,
    fetches_issued: u64,
    animation: CookieAnimation,
    fetch_delay: Option<EffectTimer>,
    /// Epoch of the most recently issued fetch.
    issued_epoch: Option<u64>,
    revealed: Option<Revealed>,
    result_tx: mpsc::UnboundedSender<(u64, FortuneReport)>,
    result_rx: mpsc::UnboundedReceiver<(u64, FortuneReport)>,
    last_frame: Instant,
}

impl std::fmt::Debug for CookieApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieApp")
            .field("preferred", &self.preferred)
            .field("locale", &self.locale)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("fetches_issued", &self.fetches_issued)
            .finish_non_exhaustive()
    }
}

impl CookieApp {
    pub fn new(
        source: Arc<dyn FortuneSource>,
        preferred: Option<ProviderId>,
        reduced_motion: bool,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            source,
            preferred,
            locale: Locale::default(),
            runtime: Handle::try_current().ok(),
            state: InteractionState::Idle,
            epoch: 0,
            fetches_issued: 0,
            animation: CookieAnimation::new(reduced_motion),
            fetch_delay: None,
            issued_epoch: None,
            revealed: None,
            result_tx,
            result_rx,
            last_frame: Instant::now(),
        }
    }

    /// Spawn fetches on `handle`, for renderers that tick from outside a Tokio runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Language of the fallback message shown in the `Error` state.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Start a break/reveal cycle. Ignored unless idle.
    pub fn activate(&mut self) {
        self.handle_event(CookieEvent::Activate);
    }

    /// Return to `Idle` from any state, invalidating any outstanding fetch.
    pub fn reset(&mut self) {
        self.handle_event(CookieEvent::Reset);
    }

    pub fn handle_event(&mut self, event: CookieEvent) {
        match event {
            CookieEvent::Activate => self.on_activate(),
            CookieEvent::Reset => self.on_reset(),
            CookieEvent::BreakPulseFinished => self.on_break_pulse_finished(),
            CookieEvent::FetchDelayElapsed => self.on_fetch_delay_elapsed(),
            CookieEvent::FortuneResolved { epoch, report } => {
                self.on_fortune_resolved(epoch, report);
            }
        }
    }

    /// Advance animations by `delta` and apply any fetch results that arrived.
    ///
    /// Never blocks. Fetches run on the runtime captured at construction or
    /// given to [`CookieApp::with_runtime`]; with neither, the cycle ends in
    /// `Error` instead of fetching.
    pub fn tick(&mut self, delta: Duration) {
        // The delay timer goes first so one armed during this tick starts from zero.
        let delay_elapsed = self.fetch_delay.as_mut().is_some_and(|timer| {
            timer.advance(delta);
            timer.is_finished()
        });
        if delay_elapsed {
            self.fetch_delay = None;
            self.handle_event(CookieEvent::FetchDelayElapsed);
        }

        let edges = self.animation.advance(delta);
        if edges.pulse_finished {
            self.handle_event(CookieEvent::BreakPulseFinished);
        }
        if edges.reveal_finished {
            tracing::debug!(epoch = self.epoch, "Reveal animation settled");
        }

        self.process_fetch_results();
    }

    /// Time since the previous call; for renderers that tick on wall-clock time.
    pub fn frame_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    fn process_fetch_results(&mut self) {
        while let Ok((epoch, report)) = self.result_rx.try_recv() {
            self.handle_event(CookieEvent::FortuneResolved { epoch, report });
        }
    }

    fn transition(&mut self, to: InteractionState) {
        tracing::debug!(from = %self.state, to = %to, epoch = self.epoch, "State transition");
        self.state = to;
    }

    fn on_activate(&mut self) {
        if !self.state.is_idle() {
            tracing::debug!(state = %self.state, "Activate ignored; cycle already underway");
            return;
        }
        self.epoch += 1;
        self.animation.start_pulse();
        self.transition(InteractionState::Breaking);
    }

    fn on_reset(&mut self) {
        self.epoch += 1;
        self.fetch_delay = None;
        self.revealed = None;
        self.animation.reset();
        self.transition(InteractionState::Idle);
    }

    fn on_break_pulse_finished(&mut self) {
        if self.state != InteractionState::Breaking {
            return;
        }
        self.animation.start_rotation();
        self.fetch_delay = Some(EffectTimer::new(FETCH_DELAY));
        self.transition(InteractionState::AwaitingFortune);
    }

    fn on_fetch_delay_elapsed(&mut self) {
        if self.state != InteractionState::AwaitingFortune || self.issued_epoch == Some(self.epoch)
        {
            return;
        }
        self.fetch_delay = None;
        self.issue_fetch();
    }

    /// Spawn the fetch, tagged with the epoch current at issue time.
    ///
    /// Without a runtime to spawn on, the cycle resolves straight to `Error`.
    fn issue_fetch(&mut self) {
        let epoch = self.epoch;
        let preferred = self.preferred;
        self.issued_epoch = Some(epoch);

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            tracing::warn!(epoch, "No Tokio runtime to run the fortune fetch");
            let report = FortuneReport::served(
                FortuneResult::failure(
                    FailureKind::RuntimeUnavailable,
                    "fetch could not be scheduled",
                ),
                preferred.unwrap_or(ProviderId::Local),
            );
            self.handle_event(CookieEvent::FortuneResolved { epoch, report });
            return;
        };

        let source = Arc::clone(&self.source);
        let tx = self.result_tx.clone();
        self.fetches_issued += 1;
        tracing::debug!(epoch, ?preferred, "Issuing fortune fetch");

        runtime.spawn(async move {
            let report = source.fetch(preferred).await;
            // Receiver lives as long as the app; a send error means it was dropped.
            let _ = tx.send((epoch, report));
        });
    }

    fn on_fortune_resolved(&mut self, epoch: u64, report: FortuneReport) {
        if epoch != self.epoch || self.state != InteractionState::AwaitingFortune {
            tracing::debug!(
                result_epoch = epoch,
                current_epoch = self.epoch,
                state = %self.state,
                "Discarding stale fortune"
            );
            return;
        }

        let FortuneReport {
            result,
            served_by,
            absorbed_failure,
        } = report;

        let (text, diagnostic, next) = match result {
            FortuneResult::Success(text) => (text.into_inner(), None, InteractionState::Revealed),
            FortuneResult::Failure(failure) => {
                tracing::warn!(%failure, "Fortune acquisition failed; showing fallback message");
                (
                    fallback_message(self.locale).as_str().to_string(),
                    Some(failure.to_string()),
                    InteractionState::Error,
                )
            }
        };

        self.revealed = Some(Revealed {
            text,
            diagnostic,
            served_by,
            absorbed_failure,
        });
        self.animation.start_reveal();
        self.transition(next);
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Displayed text; present only once revealed.
    #[must_use]
    pub fn fortune(&self) -> Option<&str> {
        self.revealed.as_ref().map(|r| r.text.as_str())
    }

    /// Failure reason; present only in `Error`.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        self.revealed.as_ref().and_then(|r| r.diagnostic.as_deref())
    }

    #[must_use]
    pub fn served_by(&self) -> Option<ProviderId> {
        self.revealed.as_ref().map(|r| r.served_by)
    }

    /// Failure of the preferred provider that fallback covered for.
    #[must_use]
    pub fn absorbed_failure(&self) -> Option<&FortuneFailure> {
        self.revealed
            .as_ref()
            .and_then(|r| r.absorbed_failure.as_ref())
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    #[must_use]
    pub fn animation(&self) -> &CookieAnimation {
        &self.animation
    }

    #[must_use]
    pub fn preferred_provider(&self) -> Option<ProviderId> {
        self.preferred
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }
}
