//! Entering and leaving flight.
//!
//! Flight can start or stop three ways: the toggle key, an unlock trigger
//! flipping `is_flying` from outside, or the state becoming inconsistent
//! (flying while the transport is `Cloud`). All three go through `enter` and
//! `exit` so the body is reconfigured the same way every time.

use crate::audio::AudioCue;
use crate::physics::PhysicsBody;
use crate::player::locomotion::{LocomotionController, TickInput, TickOutcome};
use crate::state::{GameState, TransportMode};
use bevy::log::{debug, info};
use bevy::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Entered(TransportMode),
    Exited,
}

/// Cue announcing take-off on `mode`.
#[must_use]
pub fn entry_cue(mode: TransportMode) -> Option<AudioCue> {
    match mode {
        TransportMode::Cloud => None,
        TransportMode::Sword => Some(AudioCue::SwordWhoosh),
        TransportMode::Beast => Some(AudioCue::PhoenixCry),
    }
}

/// Resolve every flight transition for this tick, before the branch runs.
pub fn process(
    ctl: &mut LocomotionController,
    input: &TickInput<'_>,
    body: &mut dyn PhysicsBody,
    state: &mut GameState,
    out: &mut TickOutcome,
) {
    let flying = state.player.is_flying;
    if flying != ctl.prev_flying {
        if flying {
            enter(ctl, input, body, state, out);
        } else {
            exit(ctl, input, body, state, out);
        }
    }

    if state.player.is_flying && !state.transport_mode.can_fly() {
        debug!("flying on {}, forcing a landing", state.transport_mode.label());
        exit(ctl, input, body, state, out);
    }

    if ctl.toggle.rising(input.toggle_flight) {
        let mode = state.transport_mode;
        if state.player.is_flying {
            exit(ctl, input, body, state, out);
        } else if mode.can_fly() && state.is_unlocked(mode) {
            enter(ctl, input, body, state, out);
        } else {
            debug!("flight toggle ignored on {}", mode.label());
        }
    }

    if ctl.cycle.rising(input.cycle_transport) {
        if state.player.is_flying {
            debug!("transport change ignored while flying");
        } else {
            cycle_transport(state);
        }
    }
}

/// Switch to the next unlocked transport.
pub fn cycle_transport(state: &mut GameState) {
    let mut next = state.transport_mode.next();
    while !state.is_unlocked(next) {
        next = next.next();
    }
    if next != state.transport_mode {
        info!("transport: {} -> {}", state.transport_mode.label(), next.label());
        state.transport_mode = next;
    }
}

/// Take off on the current transport.
///
/// The flight velocity keeps the horizontal momentum and gets at least the
/// mode's launch speed upward, which is also applied to the body right away.
pub fn enter(
    ctl: &mut LocomotionController,
    input: &TickInput<'_>,
    body: &mut dyn PhysicsBody,
    state: &mut GameState,
    out: &mut TickOutcome,
) {
    let mode = state.transport_mode;
    let Some(tuning) = input.settings.flight.tuning(mode) else {
        return;
    };

    let v = body.linvel();
    let seeded = Vec3::new(v.x, v.y.max(tuning.launch_speed), v.z);
    ctl.flight_velocity = seeded;
    body.set_gravity_scale(0.0, true);
    body.set_linear_damping(0.0);
    body.set_linvel(seeded, true);

    state.player.is_flying = true;
    state.player.is_grounded = false;
    ctl.was_grounded = false;
    ctl.click_target = None;
    ctl.jumping_to_target = false;

    if let Some(cue) = entry_cue(mode) {
        out.cues.push(cue);
        ctl.cooldown_for(mode).force(input.now);
    }
    out.transition = Some(Transition::Entered(mode));
    info!("taking off on {}", mode.label());
}

/// Drop back to the ground branch with gravity restored.
pub fn exit(
    ctl: &mut LocomotionController,
    input: &TickInput<'_>,
    body: &mut dyn PhysicsBody,
    state: &mut GameState,
    out: &mut TickOutcome,
) {
    ctl.flight_velocity = Vec3::ZERO;
    body.set_gravity_scale(1.0, true);
    body.set_linear_damping(input.settings.locomotion.resting_damping);
    state.player.is_flying = false;
    out.transition = Some(Transition::Exited);
    info!("landing from {}", state.transport_mode.label());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_skips_locked_transports() {
        let mut state = GameState::default();
        cycle_transport(&mut state);
        assert_eq!(state.transport_mode, TransportMode::Cloud);

        state.unlock(TransportMode::Beast);
        cycle_transport(&mut state);
        assert_eq!(state.transport_mode, TransportMode::Beast);
        cycle_transport(&mut state);
        assert_eq!(state.transport_mode, TransportMode::Cloud);

        state.unlock(TransportMode::Sword);
        cycle_transport(&mut state);
        assert_eq!(state.transport_mode, TransportMode::Sword);
    }

    #[test]
    fn each_flying_mode_has_its_own_cue() {
        assert_eq!(entry_cue(TransportMode::Cloud), None);
        assert_eq!(entry_cue(TransportMode::Sword), Some(AudioCue::SwordWhoosh));
        assert_eq!(entry_cue(TransportMode::Beast), Some(AudioCue::PhoenixCry));
    }
}
