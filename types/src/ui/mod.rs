//! Animation state types shared by the engine and any renderer.
//!
//! Pure data types with no IO, no async.

mod animation;
mod cookie;

pub use animation::{AnimPhase, DampedSpring, EffectTimer};
pub use cookie::{
    AnimationEdges, CookieAnimation, PULSE_PEAK_SCALE, PULSE_SEGMENT, PULSE_SETTLED_SCALE,
    REST_COOKIE_SCALE, REST_REVEAL_OPACITY, REST_REVEAL_SCALE, REST_ROTATION,
    REVEAL_FADE_DURATION, REVEAL_SPRING_SETTLE, ROTATION_DEGREES, ROTATION_DURATION,
};
