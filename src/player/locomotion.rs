//! The per-frame locomotion state machine.
//!
//! Each tick picks exactly one branch from `(is_flying, transport_mode)`:
//! grounded movement, sword flight or phoenix flight. Transitions are resolved
//! first, then the branch writes the body's velocity, then position and
//! velocity are read back into `GameState`. Sounds are not played here; they
//! come back as cues in the `TickOutcome`.

use crate::audio::{AudioCue, AudioCueEvent, CueCooldown};
use crate::camera::OrbitControls;
use crate::input::{ControlIntent, EdgeTrigger, PendingClick};
use crate::physics::{BodyHandle, PhysicsBody, SimBody};
use crate::player::flight::{flight_tick, FlightParams};
use crate::player::transitions::{self, Transition};
use crate::player::{movement, Player};
use crate::settings::Settings;
use crate::state::{GameState, TransportMode};
use crate::world::Terrain;
use bevy::prelude::*;

/// Which movement logic owns the body this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Grounded,
    Sword,
    Phoenix,
}

impl Branch {
    /// `Cloud` never flies, so `(true, Cloud)` walks until transitions fix it.
    #[must_use]
    pub fn select(is_flying: bool, mode: TransportMode) -> Self {
        match (is_flying, mode) {
            (true, TransportMode::Sword) => Branch::Sword,
            (true, TransportMode::Beast) => Branch::Phoenix,
            _ => Branch::Grounded,
        }
    }
}

/// Everything the controller reads besides the body and `GameState`.
pub struct TickInput<'a> {
    pub dt: f32,
    /// Monotonic seconds, used for cue cooldowns.
    pub now: f64,
    pub intent: ControlIntent,
    /// Raw held state of the flight toggle key.
    pub toggle_flight: bool,
    /// Raw held state of the transport cycle key.
    pub cycle_transport: bool,
    /// Ground point from a qualifying click this frame.
    pub click: Option<Vec3>,
    pub camera_forward: Vec3,
    pub settings: &'a Settings,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// `None` when the tick was skipped for lack of a body.
    pub branch: Option<Branch>,
    pub velocity: Vec3,
    pub cues: Vec<AudioCue>,
    pub transition: Option<Transition>,
}

/// Persistent controller state carried between ticks.
#[derive(Component, Debug, Clone)]
pub struct LocomotionController {
    pub(crate) flight_velocity: Vec3,
    pub(crate) click_target: Option<Vec3>,
    pub(crate) jumping_to_target: bool,
    pub(crate) was_grounded: bool,
    /// Set by a jump impulse until jump is released or the body leaves the ground.
    pub(crate) jump_latched: bool,
    pub(crate) prev_flying: bool,
    pub(crate) toggle: EdgeTrigger,
    pub(crate) cycle: EdgeTrigger,
    whoosh: CueCooldown,
    cry: CueCooldown,
}

impl LocomotionController {
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            flight_velocity: Vec3::ZERO,
            click_target: None,
            jumping_to_target: false,
            was_grounded: false,
            jump_latched: false,
            prev_flying: false,
            toggle: EdgeTrigger::default(),
            cycle: EdgeTrigger::default(),
            whoosh: CueCooldown::new(settings.flight.sword.cue_cooldown),
            cry: CueCooldown::new(settings.flight.phoenix.cue_cooldown),
        }
    }

    #[must_use]
    pub fn flight_velocity(&self) -> Vec3 {
        self.flight_velocity
    }

    #[must_use]
    pub fn click_target(&self) -> Option<Vec3> {
        self.click_target
    }

    #[must_use]
    pub fn is_jumping_to_target(&self) -> bool {
        self.jumping_to_target
    }

    pub(crate) fn cooldown_for(&mut self, mode: TransportMode) -> &mut CueCooldown {
        match mode {
            TransportMode::Beast => &mut self.cry,
            _ => &mut self.whoosh,
        }
    }

    /// Advance one frame.
    ///
    /// With no body mounted nothing happens at all: no velocity is written,
    /// `GameState` is untouched and the returned outcome has no branch.
    pub fn tick(
        &mut self,
        input: &TickInput<'_>,
        body: Option<&mut dyn PhysicsBody>,
        state: &mut GameState,
    ) -> TickOutcome {
        let Some(body) = body else {
            return TickOutcome::default();
        };

        // hot-reloaded settings may have changed the intervals
        self.whoosh.interval = input.settings.flight.sword.cue_cooldown;
        self.cry.interval = input.settings.flight.phoenix.cue_cooldown;

        let mut out = TickOutcome::default();
        transitions::process(self, input, body, state, &mut out);

        let branch = Branch::select(state.player.is_flying, state.transport_mode);
        let flight = &input.settings.flight;
        match branch {
            Branch::Grounded => movement::ground_tick(self, input, body, state, &mut out),
            Branch::Sword => {
                let params = FlightParams { tuning: &flight.sword, bounds: &flight.bounds, cue: AudioCue::SwordWhoosh };
                flight_tick(&mut self.flight_velocity, &mut self.whoosh, &params, input, body, state, &mut out);
            }
            Branch::Phoenix => {
                let params = FlightParams { tuning: &flight.phoenix, bounds: &flight.bounds, cue: AudioCue::PhoenixCry };
                flight_tick(&mut self.flight_velocity, &mut self.cry, &params, input, body, state, &mut out);
            }
        }

        state.player.position = body.translation();
        state.player.velocity = body.linvel();
        self.prev_flying = state.player.is_flying;

        out.branch = Some(branch);
        out.velocity = state.player.velocity;
        out
    }
}

/// Run the controller for the player entity and forward its cues.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn drive_locomotion(
    time: Res<Time>,
    settings: Res<Settings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    intent: Res<ControlIntent>,
    click: Res<PendingClick>,
    terrain: Res<Terrain>,
    mut state: ResMut<GameState>,
    cameras: Query<&GlobalTransform, With<OrbitControls>>,
    mut players: Query<(&mut LocomotionController, Option<&mut SimBody>), With<Player>>,
    mut cues: EventWriter<AudioCueEvent>,
) {
    let camera_forward = cameras
        .get_single()
        .map(|tf| Vec3::from(tf.forward()))
        .unwrap_or(Vec3::NEG_Z);

    let input = TickInput {
        dt: time.delta_seconds(),
        now: time.elapsed_seconds_f64(),
        intent: *intent,
        toggle_flight: keyboard.pressed(settings.key("toggle_flight", KeyCode::KeyF)),
        cycle_transport: keyboard.pressed(settings.key("cycle_transport", KeyCode::KeyT)),
        click: click.0,
        camera_forward,
        settings: &settings,
    };

    for (mut controller, body) in &mut players {
        let mut handle = body.map(|b| BodyHandle { body: b.into_inner(), terrain: &terrain });
        let outcome = controller.tick(&input, handle.as_mut().map(|h| h as &mut dyn PhysicsBody), &mut state);
        for cue in outcome.cues {
            cues.send(AudioCueEvent(cue));
        }
    }
}
