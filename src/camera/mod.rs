//! Camera follow controller and orbit rig.
//!
//! The camera is an orbit rig: a position plus the point it orbits and looks
//! at (`OrbitControls::target`). Each frame `CameraFollowController` decides who
//! drives it:
//! - sword flight: the rig trails behind and above the player,
//! - a pending `CameraAnimationTarget`: the rig glides toward it,
//! - otherwise the user's orbit input.
//!
//! Any orbit interaction cancels a pending animation before anything else
//! runs, so the user always wins over a programmatic move.

use crate::player::flight::smooth_toward;
use crate::settings::{CameraSettings, Settings};
use crate::state::{GameState, TransportMode};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Orbit sensitivity in radians per pixel at `mouse_sensitivity == 1.0`.
const ORBIT_RADIANS_PER_PIXEL: f32 = 0.005;
/// Fraction of the radius removed per wheel line at `zoom_speed == 1.0`.
const ZOOM_STEP: f32 = 0.1;

/// Position and look-at point of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraRig {
    /// Horizontal unit vector the camera faces, `-Z` when looking straight down.
    #[must_use]
    pub fn facing(&self) -> Vec3 {
        let d = self.look_at - self.position;
        let flat = Vec3::new(d.x, 0.0, d.z).normalize_or_zero();
        if flat == Vec3::ZERO { Vec3::NEG_Z } else { flat }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    SwordFollow,
    Animating,
    #[default]
    Orbit,
}

impl CameraMode {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::SwordFollow => "sword follow",
            CameraMode::Animating => "animating",
            CameraMode::Orbit => "orbit",
        }
    }
}

/// Where the camera wants to sit while trailing a sword-flying player.
#[must_use]
pub fn sword_follow_position(player: Vec3, facing: Vec3, settings: &CameraSettings) -> Vec3 {
    player - facing * settings.follow_distance + Vec3::Y * settings.follow_height
}

/// Decides, per frame, which mode moves the camera and moves it.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CameraFollowController {
    mode: CameraMode,
}

impl CameraFollowController {
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Advance the camera by `dt`.
    ///
    /// # Arguments
    /// * `interaction_started` - the user began an orbit gesture this frame
    /// * `state` - read for the player; `camera_target` is cleared here
    /// * `rig` - updated in place
    pub fn tick(
        &mut self,
        dt: f32,
        interaction_started: bool,
        state: &mut GameState,
        rig: &mut CameraRig,
        settings: &CameraSettings,
    ) -> CameraMode {
        if interaction_started && state.camera_target.is_some() {
            debug!("camera animation cancelled by orbit input");
            state.clear_camera_target();
        }

        let sword_flying = state.player.is_flying && state.transport_mode == TransportMode::Sword;
        let mode = if sword_flying {
            let player = state.player.position;
            let ideal = sword_follow_position(player, rig.facing(), settings);
            rig.position = smooth_toward(rig.position, ideal, settings.follow_rate, dt);
            rig.look_at = smooth_toward(rig.look_at, player, 2.0 * settings.follow_rate, dt);
            CameraMode::SwordFollow
        } else if let Some(target) = state.camera_target {
            rig.position = smooth_toward(rig.position, target.position, settings.animation_rate, dt);
            if let Some(look_at) = target.look_at {
                rig.look_at = smooth_toward(rig.look_at, look_at, settings.animation_rate, dt);
            }
            if rig.position.distance(target.position) < settings.arrival_threshold {
                state.clear_camera_target();
            }
            CameraMode::Animating
        } else {
            CameraMode::Orbit
        };

        if mode != self.mode {
            debug!("camera mode: {} -> {}", self.mode.label(), mode.label());
            self.mode = mode;
        }
        mode
    }
}

/// Orbit rig state on the camera entity. The camera's translation is the rig
/// position; `target` is what it orbits and looks at.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self { target }
    }

    /// Rotate `position` about `target` by yaw/pitch deltas in radians,
    /// keeping the radius and clamping elevation to `max_pitch` radians.
    #[must_use]
    pub fn orbit(&self, position: Vec3, delta_yaw: f32, delta_pitch: f32, max_pitch: f32) -> Vec3 {
        let offset = position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return position;
        }
        let yaw = offset.x.atan2(offset.z) + delta_yaw;
        let pitch = ((offset.y / radius).clamp(-1.0, 1.0).asin() + delta_pitch).clamp(-max_pitch, max_pitch);
        let dir = Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
        self.target + dir * radius
    }

    /// Move `position` along its line to `target` so the radius scales by
    /// `factor`, clamped to `[min, max]`.
    #[must_use]
    pub fn zoom(&self, position: Vec3, factor: f32, min: f32, max: f32) -> Vec3 {
        let offset = position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return position;
        }
        self.target + offset / radius * (radius * factor).clamp(min, max)
    }
}

/// The user started dragging or scrolling the orbit rig.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct OrbitInteractionStarted;

/// Apply mouse orbit/zoom to the camera and report gesture starts.
///
/// Left-drag orbits, the wheel zooms. A button press or any wheel movement
/// counts as the start of an interaction.
#[allow(clippy::needless_pass_by_value)]
pub fn orbit_controls(
    mouse: Res<ButtonInput<MouseButton>>,
    motion_events: Res<Events<MouseMotion>>,
    mut wheel_events: EventReader<MouseWheel>,
    settings: Res<Settings>,
    mut cameras: Query<(&mut Transform, &OrbitControls)>,
    mut started: EventWriter<OrbitInteractionStarted>,
) {
    let mut scroll = 0.0;
    for ev in wheel_events.read() {
        scroll += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 100.0,
        };
    }

    if mouse.any_just_pressed([MouseButton::Left, MouseButton::Right]) || scroll != 0.0 {
        started.send(OrbitInteractionStarted);
    }

    let mut delta = Vec2::ZERO;
    if mouse.pressed(MouseButton::Left) {
        for ev in motion_events.iter_current_update_events() {
            let mut axis = ev.delta;
            if settings.controls.invert_x {
                axis.x = -axis.x;
            }
            if settings.controls.invert_y {
                axis.y = -axis.y;
            }
            delta += axis;
        }
    }

    if delta == Vec2::ZERO && scroll == 0.0 {
        return;
    }

    let cam = &settings.camera;
    let k = settings.controls.mouse_sensitivity * ORBIT_RADIANS_PER_PIXEL;
    for (mut transform, controls) in &mut cameras {
        let mut position = transform.translation;
        if delta != Vec2::ZERO {
            position = controls.orbit(position, -delta.x * k, delta.y * k, cam.max_pitch_deg.to_radians());
        }
        if scroll != 0.0 {
            let factor = (1.0 - ZOOM_STEP * settings.controls.zoom_speed).powf(scroll);
            position = controls.zoom(position, factor, cam.min_radius, cam.max_radius);
        }
        transform.translation = position;
    }
}

/// Run the follow controller against the orbit camera.
#[allow(clippy::needless_pass_by_value)]
pub fn follow_camera(
    time: Res<Time>,
    settings: Res<Settings>,
    mut interactions: EventReader<OrbitInteractionStarted>,
    mut controller: ResMut<CameraFollowController>,
    mut state: ResMut<GameState>,
    mut cameras: Query<(&mut Transform, &mut OrbitControls)>,
) {
    let interaction_started = interactions.read().count() > 0;
    let Ok((mut transform, mut controls)) = cameras.get_single_mut() else { return };

    let mut rig = CameraRig { position: transform.translation, look_at: controls.target };
    controller.tick(time.delta_seconds(), interaction_started, &mut state, &mut rig, &settings.camera);
    transform.translation = rig.position;
    controls.target = rig.look_at;
}

/// Point every orbit camera at its target.
pub fn apply_camera_rig(mut cameras: Query<(&mut Transform, &OrbitControls)>) {
    for (mut transform, controls) in &mut cameras {
        if transform.translation.distance_squared(controls.target) > f32::EPSILON {
            transform.look_at(controls.target, Vec3::Y);
        }
    }
}
