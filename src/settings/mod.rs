//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Every
//! movement and camera constant lives here; none of them are hard invariants.
use bevy::prelude::{KeyCode, Resource, Vec3};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    #[serde(default = "AudioSettings::default_master")]
    pub master_volume: f32,
    #[serde(default = "AudioSettings::default_effects")]
    pub effects_volume: f32, // Multiplier for jump/land/flight cues
}

impl AudioSettings {
    fn default_master() -> f32 { 1.0 }
    fn default_effects() -> f32 { 0.8 }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: Self::default_master(),
            effects_volume: Self::default_effects(),
        }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default)]
    pub invert_y: bool,
    #[serde(default)]
    pub invert_x: bool,
    #[serde(default = "ControlsSettings::default_sensitivity")]
    pub mouse_sensitivity: f32, // Orbit rotation multiplier
    #[serde(default = "ControlsSettings::default_zoom_speed")]
    pub zoom_speed: f32, // Orbit radius change per wheel line
    #[serde(default = "ControlsSettings::default_click_max_duration")]
    pub click_max_duration: f64, // Seconds; longer presses are drags, not clicks
    #[serde(default = "ControlsSettings::default_click_max_travel")]
    pub click_max_travel: f32, // Pixels; more pointer travel is a drag
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, String>, // Action name -> key identifier
}

impl ControlsSettings {
    fn default_sensitivity() -> f32 { 1.0 }
    fn default_zoom_speed() -> f32 { 1.5 }
    fn default_click_max_duration() -> f64 { 0.25 }
    fn default_click_max_travel() -> f32 { 6.0 }

    fn default_keybinds() -> HashMap<String, String> {
        [
            ("forward", "W"),
            ("back", "S"),
            ("left", "A"),
            ("right", "D"),
            ("jump", "Space"),
            ("ascend", "E"),
            ("descend", "Q"),
            ("toggle_flight", "F"),
            ("cycle_transport", "T"),
            ("toggle_debug", "F1"),
            ("toggle_gizmos", "F2"),
            ("dump_debug", "F3"),
            ("section_1", "1"),
            ("section_2", "2"),
            ("section_3", "3"),
            ("section_4", "4"),
            ("section_5", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            invert_y: false,
            invert_x: false,
            mouse_sensitivity: Self::default_sensitivity(),
            zoom_speed: Self::default_zoom_speed(),
            click_max_duration: Self::default_click_max_duration(),
            click_max_travel: Self::default_click_max_travel(),
            keybinds: Self::default_keybinds(),
        }
    }
}

/// Click-to-target jump shaping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrajectorySettings {
    #[serde(default = "TrajectorySettings::default_hop_radius")]
    pub hop_radius: f32, // Targets closer than this only get a small hop
    #[serde(default = "TrajectorySettings::default_hop_speed")]
    pub hop_speed: f32,
    #[serde(default = "TrajectorySettings::default_apex_per_unit")]
    pub apex_per_unit: f32, // Apex height per unit of horizontal distance
    #[serde(default = "TrajectorySettings::default_apex_min")]
    pub apex_min: f32,
    #[serde(default = "TrajectorySettings::default_apex_max")]
    pub apex_max: f32,
}

impl TrajectorySettings {
    fn default_hop_radius() -> f32 { 0.5 }
    fn default_hop_speed() -> f32 { 6.0 }
    fn default_apex_per_unit() -> f32 { 0.3 }
    fn default_apex_min() -> f32 { 3.0 }
    fn default_apex_max() -> f32 { 12.0 }
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            hop_radius: Self::default_hop_radius(),
            hop_speed: Self::default_hop_speed(),
            apex_per_unit: Self::default_apex_per_unit(),
            apex_min: Self::default_apex_min(),
            apex_max: Self::default_apex_max(),
        }
    }
}

/// Grounded movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocomotionSettings {
    #[serde(default = "LocomotionSettings::default_gravity")]
    pub gravity: f32, // Downward acceleration, shared by the body and jump planning
    #[serde(default = "LocomotionSettings::default_base_speed")]
    pub base_speed: f32,
    #[serde(default = "LocomotionSettings::default_air_control")]
    pub air_control: f32, // Fraction of base speed available while airborne
    #[serde(default = "LocomotionSettings::default_friction")]
    pub friction: f32, // Per-tick horizontal multiplier when idle on the ground
    #[serde(default = "LocomotionSettings::default_jump_impulse")]
    pub jump_impulse: f32,
    #[serde(default = "LocomotionSettings::default_ground_ray_length")]
    pub ground_ray_length: f32,
    #[serde(default = "LocomotionSettings::default_resting_damping")]
    pub resting_damping: f32, // Linear damping restored when leaving flight
    #[serde(default = "LocomotionSettings::default_arrival_radius")]
    pub arrival_radius: f32, // Landing this close to a click target clears it
    #[serde(default)]
    pub click_plane_height: f32,
    #[serde(default = "LocomotionSettings::default_spawn")]
    pub spawn: [f32; 3],
    #[serde(default = "LocomotionSettings::default_body_half_extents")]
    pub body_half_extents: [f32; 3],
    #[serde(default)]
    pub trajectory: TrajectorySettings,
}

impl LocomotionSettings {
    fn default_gravity() -> f32 { 30.0 }
    fn default_base_speed() -> f32 { 8.0 }
    fn default_air_control() -> f32 { 0.3 }
    fn default_friction() -> f32 { 0.85 }
    fn default_jump_impulse() -> f32 { 12.0 }
    fn default_ground_ray_length() -> f32 { 1.1 }
    fn default_resting_damping() -> f32 { 0.0 }
    fn default_arrival_radius() -> f32 { 1.0 }
    fn default_spawn() -> [f32; 3] { [0.0, 1.5, 12.0] }
    fn default_body_half_extents() -> [f32; 3] { [0.4, 1.0, 0.4] }

    #[must_use]
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        Vec3::from_array(self.body_half_extents)
    }
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            base_speed: Self::default_base_speed(),
            air_control: Self::default_air_control(),
            friction: Self::default_friction(),
            jump_impulse: Self::default_jump_impulse(),
            ground_ray_length: Self::default_ground_ray_length(),
            resting_damping: Self::default_resting_damping(),
            arrival_radius: Self::default_arrival_radius(),
            click_plane_height: 0.0,
            spawn: Self::default_spawn(),
            body_half_extents: Self::default_body_half_extents(),
            trajectory: TrajectorySettings::default(),
        }
    }
}

/// Tuning for one flight mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlightTuning {
    pub max_speed: f32, // Horizontal speed cap
    pub vertical_speed: f32,
    pub acceleration: f32, // Smoothing rate while any input is held
    pub deceleration: f32, // Smoothing rate while idle
    pub launch_speed: f32, // Minimum upward speed on take-off
    pub cue_cooldown: f64, // Seconds between repeating flight cues
    pub cue_min_speed: f32, // Horizontal speed needed to play the cue
}

impl FlightTuning {
    #[must_use]
    pub fn sword() -> Self {
        Self {
            max_speed: 20.0,
            vertical_speed: 10.0,
            acceleration: 4.0,
            deceleration: 2.0,
            launch_speed: 6.0,
            cue_cooldown: 0.8,
            cue_min_speed: 6.0,
        }
    }

    /// Faster than the sword, and it glides: deceleration is half the acceleration.
    #[must_use]
    pub fn phoenix() -> Self {
        let acceleration = 3.0;
        Self {
            max_speed: 30.0,
            vertical_speed: 14.0,
            acceleration,
            deceleration: acceleration * 0.5,
            launch_speed: 10.0,
            cue_cooldown: 3.0,
            cue_min_speed: 8.0,
        }
    }
}

/// Per-field overrides for a `FlightTuning`. Missing fields fall back to the
/// mode's own defaults, so `sword: (max_speed: 25.0)` is a valid file.
#[derive(Debug, Deserialize)]
struct FlightTuningOverrides {
    #[serde(default, deserialize_with = "present")]
    max_speed: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    vertical_speed: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    acceleration: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    deceleration: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    launch_speed: Option<f32>,
    #[serde(default, deserialize_with = "present")]
    cue_cooldown: Option<f64>,
    #[serde(default, deserialize_with = "present")]
    cue_min_speed: Option<f32>,
}

impl FlightTuningOverrides {
    fn over(self, base: FlightTuning) -> FlightTuning {
        FlightTuning {
            max_speed: self.max_speed.unwrap_or(base.max_speed),
            vertical_speed: self.vertical_speed.unwrap_or(base.vertical_speed),
            acceleration: self.acceleration.unwrap_or(base.acceleration),
            deceleration: self.deceleration.unwrap_or(base.deceleration),
            launch_speed: self.launch_speed.unwrap_or(base.launch_speed),
            cue_cooldown: self.cue_cooldown.unwrap_or(base.cue_cooldown),
            cue_min_speed: self.cue_min_speed.unwrap_or(base.cue_min_speed),
        }
    }
}

// RON spells a plain value, not `Some(..)`, for a field that is present.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn sword_tuning<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FlightTuning, D::Error> {
    FlightTuningOverrides::deserialize(deserializer).map(|o| o.over(FlightTuning::sword()))
}

fn phoenix_tuning<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FlightTuning, D::Error> {
    FlightTuningOverrides::deserialize(deserializer).map(|o| o.over(FlightTuning::phoenix()))
}

/// Axis-aligned flight limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorldBounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl WorldBounds {
    #[must_use]
    pub fn min_v(&self) -> Vec3 {
        Vec3::from_array(self.min)
    }

    #[must_use]
    pub fn max_v(&self) -> Vec3 {
        Vec3::from_array(self.max)
    }

    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min_v()).all() && p.cmple(self.max_v()).all()
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self { min: [-58.0, -2.0, -58.0], max: [58.0, 60.0, 58.0] }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightSettings {
    #[serde(default = "FlightTuning::sword", deserialize_with = "sword_tuning")]
    pub sword: FlightTuning,
    #[serde(default = "FlightTuning::phoenix", deserialize_with = "phoenix_tuning")]
    pub phoenix: FlightTuning,
    #[serde(default)]
    pub bounds: WorldBounds,
}

impl FlightSettings {
    /// Tuning for a flying transport, `None` for `Cloud`.
    #[must_use]
    pub fn tuning(&self, mode: crate::state::TransportMode) -> Option<&FlightTuning> {
        match mode {
            crate::state::TransportMode::Cloud => None,
            crate::state::TransportMode::Sword => Some(&self.sword),
            crate::state::TransportMode::Beast => Some(&self.phoenix),
        }
    }
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            sword: FlightTuning::sword(),
            phoenix: FlightTuning::phoenix(),
            bounds: WorldBounds::default(),
        }
    }
}

/// Camera follow / animation tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_follow_distance")]
    pub follow_distance: f32, // Behind the player while sword-flying
    #[serde(default = "CameraSettings::default_follow_height")]
    pub follow_height: f32,
    #[serde(default = "CameraSettings::default_follow_rate")]
    pub follow_rate: f32, // Position smoothing rate; the look-at uses twice this
    #[serde(default = "CameraSettings::default_animation_rate")]
    pub animation_rate: f32,
    #[serde(default = "CameraSettings::default_arrival_threshold")]
    pub arrival_threshold: f32, // Animation completes under this distance
    #[serde(default = "CameraSettings::default_min_radius")]
    pub min_radius: f32,
    #[serde(default = "CameraSettings::default_max_radius")]
    pub max_radius: f32,
    #[serde(default = "CameraSettings::default_max_pitch_deg")]
    pub max_pitch_deg: f32,
}

impl CameraSettings {
    fn default_follow_distance() -> f32 { 10.0 }
    fn default_follow_height() -> f32 { 4.0 }
    fn default_follow_rate() -> f32 { 4.0 }
    fn default_animation_rate() -> f32 { 3.0 }
    fn default_arrival_threshold() -> f32 { 0.1 }
    fn default_min_radius() -> f32 { 4.0 }
    fn default_max_radius() -> f32 { 80.0 }
    fn default_max_pitch_deg() -> f32 { 85.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow_distance: Self::default_follow_distance(),
            follow_height: Self::default_follow_height(),
            follow_rate: Self::default_follow_rate(),
            animation_rate: Self::default_animation_rate(),
            arrival_threshold: Self::default_arrival_threshold(),
            min_radius: Self::default_min_radius(),
            max_radius: Self::default_max_radius(),
            max_pitch_deg: Self::default_max_pitch_deg(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub locomotion: LocomotionSettings,
    #[serde(default)]
    pub flight: FlightSettings,
    #[serde(default)]
    pub camera: CameraSettings,
}

const LETTER_KEYS: [KeyCode; 26] = [
    KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE, KeyCode::KeyF,
    KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ, KeyCode::KeyK, KeyCode::KeyL,
    KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO, KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR,
    KeyCode::KeyS, KeyCode::KeyT, KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX,
    KeyCode::KeyY, KeyCode::KeyZ,
];

const DIGIT_KEYS: [KeyCode; 10] = [
    KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
    KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
    KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
];

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Key bound to `action`, or `default` when unbound or unparseable.
    #[must_use]
    pub fn key(&self, action: &str, default: KeyCode) -> KeyCode {
        self.controls
            .keybinds
            .get(action)
            .and_then(|s| Self::keycode_from_str(s))
            .unwrap_or(default)
    }

    /// Convert a string key identifier (e.g. from `controls.keybinds`) into a `KeyCode`.
    ///
    /// # Arguments
    /// * `name` - key identifier such as "W", "Space", "F1" (case-insensitive)
    ///
    /// # Returns
    /// The matching `KeyCode`, or `None` if the identifier is unknown.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        let s = name.to_ascii_uppercase();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return Some(LETTER_KEYS[(c as u8 - b'A') as usize]);
            }
            if c.is_ascii_digit() {
                return Some(DIGIT_KEYS[(c as u8 - b'0') as usize]);
            }
        }
        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return n.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i)).copied();
        }

        Some(match s.as_str() {
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,
            _ => return None,
        })
    }
}

pub mod loader;
