use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimPhase {
    Running { progress: f32 },
    Finished,
}

pub(crate) fn normalized_progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }

    let elapsed = elapsed.as_secs_f32();
    let total = duration.as_secs_f32();
    (elapsed / total).clamp(0.0, 1.0)
}

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

pub(crate) fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[derive(Debug, Clone)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
}

impl EffectTimer {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.elapsed = self.elapsed.saturating_add(delta);
    }

    /// Jump straight to the end.
    pub fn finish(&mut self) {
        self.elapsed = self.duration;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.min(self.duration)
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        normalized_progress(self.elapsed, self.duration)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        if self.is_finished() {
            AnimPhase::Finished
        } else {
            AnimPhase::Running {
                progress: self.progress(),
            }
        }
    }
}

/// Underdamped spring with unit mass and zero initial velocity.
///
/// Evaluated in closed form, so the value at a given elapsed time does not
/// depend on frame cadence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedSpring {
    tension: f32,
    friction: f32,
}

impl DampedSpring {
    #[must_use]
    pub const fn new(tension: f32, friction: f32) -> Self {
        Self { tension, friction }
    }

    /// Value at `t` seconds when moving from `from` toward `to`.
    #[must_use]
    pub fn value_at(&self, from: f32, to: f32, t: f32) -> f32 {
        let omega0 = self.tension.sqrt();
        let zeta = self.friction / (2.0 * omega0);
        let displacement = from - to;
        if zeta >= 1.0 {
            // Critically damped or slower: no overshoot.
            let decay = (-omega0 * t).exp();
            return to + displacement * decay * (1.0 + omega0 * t);
        }
        let omega_d = omega0 * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega0 * t).exp();
        let oscillation = (omega_d * t).cos() + (zeta * omega0 / omega_d) * (omega_d * t).sin();
        to + displacement * decay * oscillation
    }
}
