//! Shared game state: the store the locomotion and camera controllers read
//! and write every frame.
//!
//! `GameState` is an ordinary Bevy resource that is passed by reference into
//! the controllers; nothing here is global. Each field has exactly one kind of
//! writer:
//!
//! | Field                                   | Written by                                  |
//! |-----------------------------------------|---------------------------------------------|
//! | `player.position/velocity/is_grounded`  | locomotion controller                       |
//! | `player.is_flying`                      | locomotion controller, unlock triggers      |
//! | `transport_mode`                        | transport selection, unlock triggers        |
//! | `unlocked_transports`                   | unlock triggers (`unlock`)                  |
//! | `camera_target`                         | navigation (set), camera follow (clear)     |
//! | `active_section`                        | navigation                                  |

use crate::world::Section;
use bevy::prelude::*;
use std::collections::HashSet;

/// Locomotion mode selector. `Cloud` is walking; the other two fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    #[default]
    Cloud,
    Sword,
    Beast,
}

impl TransportMode {
    /// Whether this mode has a flight branch at all.
    #[must_use]
    pub fn can_fly(self) -> bool {
        !matches!(self, TransportMode::Cloud)
    }

    /// Next mode in the selection cycle (`Cloud -> Sword -> Beast -> Cloud`).
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            TransportMode::Cloud => TransportMode::Sword,
            TransportMode::Sword => TransportMode::Beast,
            TransportMode::Beast => TransportMode::Cloud,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TransportMode::Cloud => "cloud",
            TransportMode::Sword => "sword",
            TransportMode::Beast => "phoenix",
        }
    }
}

/// Player kinematics mirrored from the physics body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// True iff the ground ray hit a collider this tick.
    pub is_grounded: bool,
    /// True while a flight mode (sword or phoenix) is active.
    pub is_flying: bool,
}

impl PlayerState {
    #[must_use]
    pub fn spawned_at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            is_grounded: false,
            is_flying: false,
        }
    }
}

/// A programmatic camera move requested by navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAnimationTarget {
    pub position: Vec3,
    pub look_at: Option<Vec3>,
}

#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub player: PlayerState,
    pub transport_mode: TransportMode,
    unlocked_transports: HashSet<TransportMode>,
    pub camera_target: Option<CameraAnimationTarget>,
    pub active_section: Option<Section>,
}

impl GameState {
    /// Fresh session state with the player at `spawn`. Only `Cloud` is unlocked.
    #[must_use]
    pub fn new(spawn: Vec3) -> Self {
        let mut unlocked_transports = HashSet::new();
        unlocked_transports.insert(TransportMode::Cloud);
        Self {
            player: PlayerState::spawned_at(spawn),
            transport_mode: TransportMode::Cloud,
            unlocked_transports,
            camera_target: None,
            active_section: None,
        }
    }

    #[must_use]
    pub fn is_unlocked(&self, mode: TransportMode) -> bool {
        self.unlocked_transports.contains(&mode)
    }

    /// Mark `mode` as unlocked. Returns `true` if it was not unlocked before.
    pub fn unlock(&mut self, mode: TransportMode) -> bool {
        self.unlocked_transports.insert(mode)
    }

    /// Unlocked transports in cycle order.
    #[must_use]
    pub fn unlocked(&self) -> Vec<TransportMode> {
        [TransportMode::Cloud, TransportMode::Sword, TransportMode::Beast]
            .into_iter()
            .filter(|m| self.is_unlocked(*m))
            .collect()
    }

    pub fn request_camera(&mut self, target: CameraAnimationTarget) {
        self.camera_target = Some(target);
    }

    /// Frame `section` and remember it as the active one.
    pub fn navigate_to(&mut self, section: Section) {
        self.active_section = Some(section);
        self.request_camera(section.framing());
    }

    pub fn clear_camera_target(&mut self) {
        self.camera_target = None;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
