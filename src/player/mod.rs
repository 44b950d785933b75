//! Player locomotion: grounded walking, click-to-target leaps, and sword or
//! phoenix flight.
//!
//! `LocomotionController` is the state machine; the submodules are its
//! branches and the maths they share. The module provides the `Player` marker
//! and re-exports for the systems the app registers.
//!
//! # Example:
//!
//! ```ignore
//! // spawn the player with a body and a controller
//! commands.spawn((
//!     Player,
//!     SimBody::new(spawn, half_extents),
//!     LocomotionController::new(&settings),
//! ));
//! // register the tick
//! app.add_systems(Update, drive_locomotion);
//! ```
pub mod flight;
pub mod locomotion;
pub mod movement;
pub mod trajectory;
pub mod transitions;

use bevy::prelude::*;

pub use locomotion::{drive_locomotion, Branch, LocomotionController, TickInput, TickOutcome};
pub use trajectory::{plan_jump, ray_ground_intersection, JumpPlan};
pub use transitions::Transition;

/// Marks the entity the locomotion controller drives.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Move the player's render transform to its physics body.
pub fn sync_player_transform(mut players: Query<(&mut Transform, &crate::physics::SimBody), With<Player>>) {
    for (mut transform, body) in &mut players {
        transform.translation = body.position;
    }
}
