//! Grounded locomotion: walking, jumping and click-to-target leaps.
//!
//! Gravity is on. Planar movement is relative to the camera, while the
//! physics body owns the vertical axis except at the instant of a jump.

use crate::audio::AudioCue;
use crate::input::ControlIntent;
use crate::physics::PhysicsBody;
use crate::player::locomotion::{LocomotionController, TickInput, TickOutcome};
use crate::player::trajectory::{plan_jump, JumpPlan};
use crate::state::GameState;
use bevy::log::debug;
use bevy::math::Vec3;

/// Planar unit direction for `intent`, relative to where the camera looks.
///
/// # Arguments
/// * `intent` - held directions
/// * `camera_forward` - camera look direction; only its x/z matter
#[must_use]
pub fn camera_relative_direction(intent: &ControlIntent, camera_forward: Vec3) -> Vec3 {
    let fwd = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
    let right = fwd.cross(Vec3::Y);

    let mut dir = Vec3::ZERO;
    if intent.forward {
        dir += fwd;
    }
    if intent.backward {
        dir -= fwd;
    }
    if intent.right {
        dir += right;
    }
    if intent.left {
        dir -= right;
    }
    dir.normalize_or_zero()
}

/// Run one grounded tick and write the velocity to `body`.
pub fn ground_tick(
    ctl: &mut LocomotionController,
    input: &TickInput<'_>,
    body: &mut dyn PhysicsBody,
    state: &mut GameState,
    out: &mut TickOutcome,
) {
    let loco = &input.settings.locomotion;
    body.set_gravity_scale(1.0, false);

    let origin = body.translation();
    let grounded = body.cast_ray(origin, Vec3::NEG_Y, loco.ground_ray_length).is_some();
    state.player.is_grounded = grounded;

    let mut velocity = body.linvel();

    if grounded && !ctl.was_grounded && velocity.y <= 0.0 {
        out.cues.push(AudioCue::Land);
        if ctl.jumping_to_target {
            if let Some(target) = ctl.click_target {
                let miss = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z).length();
                if miss > loco.arrival_radius {
                    debug!("target leap landed {miss:.2} from its mark");
                }
            }
            ctl.jumping_to_target = false;
            ctl.click_target = None;
        }
    }
    ctl.was_grounded = grounded;

    // mid-arc the trajectory owns the horizontal axes
    let in_leap = ctl.jumping_to_target && !grounded;
    let speed = if grounded { loco.base_speed } else { loco.base_speed * loco.air_control };

    if input.intent.has_direction() && !in_leap {
        let dir = camera_relative_direction(&input.intent, input.camera_forward);
        velocity.x = dir.x * speed;
        velocity.z = dir.z * speed;
        ctl.click_target = None;
        ctl.jumping_to_target = false;
    } else if grounded && !ctl.jumping_to_target {
        velocity.x *= loco.friction;
        velocity.z *= loco.friction;
    }

    // one impulse per press, or per landing while jump stays held
    if !input.intent.jump || !grounded {
        ctl.jump_latched = false;
    }

    if grounded && input.intent.jump && !ctl.jump_latched {
        velocity.y = loco.jump_impulse;
        ctl.was_grounded = false;
        ctl.jump_latched = true;
        out.cues.push(AudioCue::Jump);
    } else if grounded && !ctl.jump_latched {
        if let Some(point) = input.click {
            let plan = plan_jump(origin, point, loco.gravity, &loco.trajectory);
            if let JumpPlan::Arc { apex, flight_time, .. } = plan {
                debug!("leap to ({:.1}, {:.1}) apex {apex:.1} in {flight_time:.2}s", point.x, point.z);
            }
            velocity = plan.velocity();
            ctl.click_target = Some(point);
            ctl.jumping_to_target = true;
            ctl.was_grounded = false;
            out.cues.push(AudioCue::Jump);
        }
    }

    body.set_linvel(velocity, true);
}
