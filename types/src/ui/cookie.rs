//! Animation progress values for the cookie and its reveal card.
//!
//! The renderer reads these numbers; only the engine mutates them.

use std::time::Duration;

use super::animation::{DampedSpring, EffectTimer, ease_out_cubic, lerp};

/// Each half of the compress/expand pulse.
pub const PULSE_SEGMENT: Duration = Duration::from_millis(100);
pub const PULSE_PEAK_SCALE: f32 = 1.1;
pub const PULSE_SETTLED_SCALE: f32 = 0.95;

pub const ROTATION_DURATION: Duration = Duration::from_millis(1000);
/// Final tilt of each half, in degrees. Left turns negative, right positive.
pub const ROTATION_DEGREES: f32 = 10.0;

pub const REVEAL_FADE_DURATION: Duration = Duration::from_millis(1000);
/// Time after which the reveal spring is treated as settled.
pub const REVEAL_SPRING_SETTLE: Duration = Duration::from_millis(2000);
pub const REVEAL_SPRING: DampedSpring = DampedSpring::new(40.0, 6.0);

pub const REST_COOKIE_SCALE: f32 = 1.0;
pub const REST_ROTATION: f32 = 0.0;
pub const REST_REVEAL_OPACITY: f32 = 0.0;
pub const REST_REVEAL_SCALE: f32 = 0.5;

/// Edges crossed during one [`CookieAnimation::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationEdges {
    pub pulse_finished: bool,
    pub reveal_finished: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CookieAnimation {
    pulse: Option<EffectTimer>,
    rotation: Option<EffectTimer>,
    reveal: Option<EffectTimer>,
    pulse_reported: bool,
    reveal_reported: bool,
    reduced_motion: bool,
}

impl CookieAnimation {
    #[must_use]
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            ..Self::default()
        }
    }

    fn timer(&self, duration: Duration) -> EffectTimer {
        let mut timer = EffectTimer::new(duration);
        if self.reduced_motion {
            timer.finish();
        }
        timer
    }

    /// Phase one of the break: the brief compress/expand pulse.
    pub fn start_pulse(&mut self) {
        self.pulse = Some(self.timer(PULSE_SEGMENT * 2));
        self.pulse_reported = false;
    }

    /// Phase two of the break: the halves rotate apart.
    pub fn start_rotation(&mut self) {
        self.rotation = Some(self.timer(ROTATION_DURATION));
    }

    pub fn start_reveal(&mut self) {
        self.reveal = Some(self.timer(REVEAL_SPRING_SETTLE));
        self.reveal_reported = false;
    }

    /// Advance all running phases and report which ones just finished.
    pub fn advance(&mut self, delta: Duration) -> AnimationEdges {
        for timer in [&mut self.pulse, &mut self.rotation, &mut self.reveal]
            .into_iter()
            .flatten()
        {
            timer.advance(delta);
        }

        let mut edges = AnimationEdges::default();
        if !self.pulse_reported && self.pulse.as_ref().is_some_and(EffectTimer::is_finished) {
            self.pulse_reported = true;
            edges.pulse_finished = true;
        }
        if !self.reveal_reported && self.reveal.as_ref().is_some_and(EffectTimer::is_finished) {
            self.reveal_reported = true;
            edges.reveal_finished = true;
        }
        edges
    }

    /// Return every value to rest.
    pub fn reset(&mut self) {
        *self = Self::new(self.reduced_motion);
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    #[must_use]
    pub fn is_pulse_running(&self) -> bool {
        self.pulse.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Progress of the compress/expand pulse, 0.0 to 1.0.
    #[must_use]
    pub fn break_progress(&self) -> f32 {
        self.pulse.as_ref().map_or(0.0, EffectTimer::progress)
    }

    #[must_use]
    pub fn cookie_scale(&self) -> f32 {
        let Some(pulse) = &self.pulse else {
            return REST_COOKIE_SCALE;
        };
        let elapsed = pulse.elapsed();
        if elapsed <= PULSE_SEGMENT {
            let t = elapsed.as_secs_f32() / PULSE_SEGMENT.as_secs_f32();
            lerp(REST_COOKIE_SCALE, PULSE_PEAK_SCALE, t)
        } else {
            let t = (elapsed - PULSE_SEGMENT).as_secs_f32() / PULSE_SEGMENT.as_secs_f32();
            lerp(PULSE_PEAK_SCALE, PULSE_SETTLED_SCALE, t)
        }
    }

    #[must_use]
    pub fn left_rotation(&self) -> f32 {
        self.rotation.as_ref().map_or(REST_ROTATION, |t| {
            lerp(REST_ROTATION, -ROTATION_DEGREES, t.progress())
        })
    }

    #[must_use]
    pub fn right_rotation(&self) -> f32 {
        self.rotation.as_ref().map_or(REST_ROTATION, |t| {
            lerp(REST_ROTATION, ROTATION_DEGREES, t.progress())
        })
    }

    #[must_use]
    pub fn reveal_opacity(&self) -> f32 {
        self.reveal.as_ref().map_or(REST_REVEAL_OPACITY, |t| {
            if t.is_finished() {
                return 1.0;
            }
            let fade = t.elapsed().as_secs_f32() / REVEAL_FADE_DURATION.as_secs_f32();
            ease_out_cubic(fade)
        })
    }

    #[must_use]
    pub fn reveal_scale(&self) -> f32 {
        self.reveal.as_ref().map_or(REST_REVEAL_SCALE, |t| {
            if t.is_finished() {
                1.0
            } else {
                REVEAL_SPRING.value_at(REST_REVEAL_SCALE, 1.0, t.elapsed().as_secs_f32())
            }
        })
    }
}
