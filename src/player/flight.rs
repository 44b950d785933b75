//! Sword and phoenix flight.
//!
//! Both modes run the same tick with their own `FlightTuning`: gravity off,
//! a world-axis target velocity from the raw input, exponential smoothing of a
//! persistent flight velocity toward it, a horizontal speed cap, and soft
//! world bounds. The result overrides the body's velocity on all three axes.

use crate::audio::{AudioCue, CueCooldown};
use crate::input::ControlIntent;
use crate::physics::PhysicsBody;
use crate::player::locomotion::{TickInput, TickOutcome};
use crate::settings::{FlightTuning, WorldBounds};
use crate::state::GameState;
use bevy::math::Vec3;

/// Forward in flight is fixed to world -Z, strafing to world X.
pub const FLIGHT_FORWARD: Vec3 = Vec3::NEG_Z;
pub const FLIGHT_RIGHT: Vec3 = Vec3::X;

/// Per-mode parameters for one flight tick.
pub struct FlightParams<'a> {
    pub tuning: &'a FlightTuning,
    pub bounds: &'a WorldBounds,
    pub cue: AudioCue,
}

/// Velocity the input is asking for, before smoothing.
///
/// Ascend (or jump) beats descend when both are held.
#[must_use]
pub fn target_velocity(intent: &ControlIntent, tuning: &FlightTuning) -> Vec3 {
    let mut planar = Vec3::ZERO;
    if intent.forward {
        planar += FLIGHT_FORWARD;
    }
    if intent.backward {
        planar -= FLIGHT_FORWARD;
    }
    if intent.right {
        planar += FLIGHT_RIGHT;
    }
    if intent.left {
        planar -= FLIGHT_RIGHT;
    }
    let planar = planar.normalize_or_zero() * tuning.max_speed;

    let vertical = if intent.wants_up() {
        tuning.vertical_speed
    } else if intent.descend {
        -tuning.vertical_speed
    } else {
        0.0
    };

    Vec3::new(planar.x, vertical, planar.z)
}

/// Frame-rate independent exponential approach of `current` toward `target`.
#[must_use]
pub fn smooth_toward(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    let alpha = 1.0 - (-rate * dt).exp();
    current.lerp(target, alpha)
}

/// Rescale x/z uniformly so horizontal speed is at most `max_speed`.
#[must_use]
pub fn clamp_horizontal(velocity: Vec3, max_speed: f32) -> Vec3 {
    let speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
    if speed <= max_speed || speed == 0.0 {
        return velocity;
    }
    let k = max_speed / speed;
    Vec3::new(velocity.x * k, velocity.y, velocity.z * k)
}

/// Block outward velocity at the bounds, never inward velocity.
///
/// An axis already at or past a bound loses any component pointing further
/// out. Inside the bounds, an outward component is limited so that one step of
/// `dt` ends on the bound rather than beyond it.
#[must_use]
pub fn apply_soft_bounds(position: Vec3, velocity: Vec3, bounds: &WorldBounds, dt: f32) -> Vec3 {
    let (lo, hi) = (bounds.min_v(), bounds.max_v());
    let mut out = velocity;
    for axis in 0..3 {
        let p = position[axis];
        let v = out[axis];
        if v > 0.0 {
            out[axis] = if p >= hi[axis] {
                0.0
            } else if dt > 0.0 {
                v.min((hi[axis] - p) / dt)
            } else {
                v
            };
        } else if v < 0.0 {
            out[axis] = if p <= lo[axis] {
                0.0
            } else if dt > 0.0 {
                v.max((lo[axis] - p) / dt)
            } else {
                v
            };
        }
    }
    out
}

/// Horizontal speed of a velocity.
#[must_use]
pub fn horizontal_speed(v: Vec3) -> f32 {
    Vec3::new(v.x, 0.0, v.z).length()
}

/// Run one flight tick and write the velocity to `body`.
pub fn flight_tick(
    flight_velocity: &mut Vec3,
    cooldown: &mut CueCooldown,
    params: &FlightParams<'_>,
    input: &TickInput<'_>,
    body: &mut dyn PhysicsBody,
    state: &mut GameState,
    out: &mut TickOutcome,
) {
    let tuning = params.tuning;
    body.set_gravity_scale(0.0, true);
    body.set_linear_damping(0.0);

    let target = target_velocity(&input.intent, tuning);
    let rate = if input.intent.has_any() { tuning.acceleration } else { tuning.deceleration };

    let mut velocity = smooth_toward(*flight_velocity, target, rate, input.dt);
    velocity = clamp_horizontal(velocity, tuning.max_speed);
    velocity = apply_soft_bounds(body.translation(), velocity, params.bounds, input.dt);

    *flight_velocity = velocity;
    body.set_linvel(velocity, true);
    state.player.is_grounded = false;

    if horizontal_speed(velocity) > tuning.cue_min_speed && cooldown.trigger(input.now) {
        out.cues.push(params.cue);
    }
}
