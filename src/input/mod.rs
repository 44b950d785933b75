//! Input aggregation: keyboard state into a `ControlIntent`, edge detection
//! for toggle keys, and short-click classification for click-to-jump.
//!
//! Nothing here is queued. Every frame the intent is rebuilt from the keys
//! currently held and the controller polls it.

use crate::camera::OrbitControls;
use crate::player::trajectory::ray_ground_intersection;
use crate::settings::Settings;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Normalized control intent for one tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub ascend: bool,
    pub descend: bool,
}

impl ControlIntent {
    /// Any of the four planar directions held.
    #[must_use]
    pub fn has_direction(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Any input at all, vertical included.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.has_direction() || self.jump || self.ascend || self.descend
    }

    /// Ascend request; `jump` doubles as ascend while flying.
    #[must_use]
    pub fn wants_up(&self) -> bool {
        self.ascend || self.jump
    }
}

/// Rising-edge detector. Holding a key down reports `true` once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeTrigger {
    held: bool,
}

impl EdgeTrigger {
    pub fn rising(&mut self, down: bool) -> bool {
        let edge = down && !self.held;
        self.held = down;
        edge
    }
}

/// Tracks one pointer press to tell a click from a camera drag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickGesture {
    pressed_at: Option<f64>,
    origin: Vec2,
    travel: f32,
}

impl ClickGesture {
    pub fn press(&mut self, now: f64, pointer: Vec2) {
        self.pressed_at = Some(now);
        self.origin = pointer;
        self.travel = 0.0;
    }

    /// Record the pointer position while the button is held.
    pub fn track(&mut self, pointer: Vec2) {
        if self.pressed_at.is_some() {
            self.travel = self.travel.max(pointer.distance(self.origin));
        }
    }

    /// Finish the gesture. Returns `true` if it qualifies as a click.
    pub fn release(&mut self, now: f64, pointer: Vec2, max_duration: f64, max_travel: f32) -> bool {
        self.track(pointer);
        let Some(started) = self.pressed_at.take() else { return false };
        now - started < max_duration && self.travel < max_travel
    }
}

/// Ground point of a click made this frame, consumed by the locomotion tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PendingClick(pub Option<Vec3>);

/// Build this frame's `ControlIntent` from the keybinds in `Settings`.
///
/// Arrow keys always mirror the planar movement keys.
#[allow(clippy::needless_pass_by_value)]
pub fn read_control_intent(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut intent: ResMut<ControlIntent>,
) {
    let held = |name: &str, default: KeyCode| keyboard_input.pressed(settings.key(name, default));

    *intent = ControlIntent {
        forward: held("forward", KeyCode::KeyW) || keyboard_input.pressed(KeyCode::ArrowUp),
        backward: held("back", KeyCode::KeyS) || keyboard_input.pressed(KeyCode::ArrowDown),
        left: held("left", KeyCode::KeyA) || keyboard_input.pressed(KeyCode::ArrowLeft),
        right: held("right", KeyCode::KeyD) || keyboard_input.pressed(KeyCode::ArrowRight),
        jump: held("jump", KeyCode::Space),
        ascend: held("ascend", KeyCode::KeyE),
        descend: held("descend", KeyCode::KeyQ),
    };
}

/// Classify left-button presses and project qualifying clicks onto the
/// click plane.
///
/// A ray parallel to the plane leaves `PendingClick` empty.
#[allow(clippy::needless_pass_by_value)]
pub fn track_click_gesture(
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    settings: Res<Settings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<OrbitControls>>,
    mut gesture: Local<ClickGesture>,
    mut pending: ResMut<PendingClick>,
) {
    pending.0 = None;

    let Ok(window) = windows.get_single() else { return };
    let Some(cursor) = window.cursor_position() else { return };
    let now = time.elapsed_seconds_f64();

    if mouse.just_pressed(MouseButton::Left) {
        gesture.press(now, cursor);
        return;
    }
    if mouse.pressed(MouseButton::Left) {
        gesture.track(cursor);
        return;
    }
    if !mouse.just_released(MouseButton::Left) {
        return;
    }

    let controls = &settings.controls;
    if !gesture.release(now, cursor, controls.click_max_duration, controls.click_max_travel) {
        return;
    }

    let Ok((camera, camera_tf)) = cameras.get_single() else { return };
    let Some(ray) = camera.viewport_to_world(camera_tf, cursor) else { return };
    pending.0 = ray_ground_intersection(ray.origin, *ray.direction, settings.locomotion.click_plane_height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_produces_single_edge() {
        let mut edge = EdgeTrigger::default();
        let edges = (0..30).filter(|_| edge.rising(true)).count();
        assert_eq!(edges, 1);
        assert!(!edge.rising(false));
        assert!(edge.rising(true));
    }

    #[test]
    fn short_still_press_is_click() {
        let mut g = ClickGesture::default();
        g.press(1.0, Vec2::new(100.0, 100.0));
        g.track(Vec2::new(101.0, 100.0));
        assert!(g.release(1.1, Vec2::new(101.0, 101.0), 0.25, 5.0));
    }

    #[test]
    fn drag_is_not_click() {
        let mut g = ClickGesture::default();
        g.press(1.0, Vec2::new(100.0, 100.0));
        g.track(Vec2::new(140.0, 100.0));
        // returning to the start point does not undo the drag
        assert!(!g.release(1.1, Vec2::new(100.0, 100.0), 0.25, 5.0));
    }

    #[test]
    fn long_press_is_not_click() {
        let mut g = ClickGesture::default();
        g.press(1.0, Vec2::ZERO);
        assert!(!g.release(1.5, Vec2::ZERO, 0.25, 5.0));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut g = ClickGesture::default();
        assert!(!g.release(1.0, Vec2::ZERO, 0.25, 5.0));
    }

    #[test]
    fn jump_aliases_ascend() {
        let intent = ControlIntent { jump: true, ..Default::default() };
        assert!(intent.wants_up());
        assert!(intent.has_any());
        assert!(!intent.has_direction());
    }
}
