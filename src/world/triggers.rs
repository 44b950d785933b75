//! World triggers that grant a flight transport when the player walks into them.
//!
//! Entering a trigger for a still-locked transport unlocks it, selects it and
//! raises `player.is_flying` directly in the shared state. The locomotion
//! controller notices the flag flip on its next tick and performs the normal
//! take-off. While the player is already in the air the trigger only unlocks;
//! switching transport mid-flight is left to the player.

use crate::state::{GameState, TransportMode};
use crate::world::Section;
use bevy::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct UnlockTrigger {
    pub mode: TransportMode,
    pub min: Vec3,
    pub max: Vec3,
}

impl UnlockTrigger {
    /// A shrine-sized trigger volume sitting on top of `section`'s terrace.
    #[must_use]
    pub fn on_stage(mode: TransportMode, section: Section) -> Self {
        let top = section.stage_top();
        Self {
            mode,
            min: top + Vec3::new(-2.0, 0.0, -2.0),
            max: top + Vec3::new(2.0, 3.0, 2.0),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct UnlockTriggers(pub Vec<UnlockTrigger>);

impl UnlockTriggers {
    /// Sword shrine on the first terrace, phoenix nest on the third.
    #[must_use]
    pub fn staged() -> Self {
        Self(vec![
            UnlockTrigger::on_stage(TransportMode::Sword, Section::About),
            UnlockTrigger::on_stage(TransportMode::Beast, Section::Projects),
        ])
    }

    /// Unlock the first locked transport whose trigger contains the player,
    /// and activate it unless the player is already flying.
    ///
    /// # Return
    /// * `Option<TransportMode>` - the transport that was just unlocked, if any
    pub fn apply(&self, state: &mut GameState) -> Option<TransportMode> {
        let pos = state.player.position;
        let trigger = self
            .0
            .iter()
            .find(|t| t.contains(pos) && !state.is_unlocked(t.mode))?;
        state.unlock(trigger.mode);
        if !state.player.is_flying {
            state.transport_mode = trigger.mode;
            state.player.is_flying = true;
        }
        Some(trigger.mode)
    }
}

/// Run unlock triggers against the current player position.
#[allow(clippy::needless_pass_by_value)]
pub fn check_unlock_triggers(triggers: Res<UnlockTriggers>, mut state: ResMut<GameState>) {
    if let Some(mode) = triggers.apply(&mut state) {
        info!("unlocked transport: {}", mode.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entering_trigger_unlocks_and_raises_flight() {
        let triggers = UnlockTriggers::staged();
        let mut state = GameState::new(Section::About.stage_top() + Vec3::Y);
        assert_eq!(triggers.apply(&mut state), Some(TransportMode::Sword));
        assert!(state.is_unlocked(TransportMode::Sword));
        assert_eq!(state.transport_mode, TransportMode::Sword);
        assert!(state.player.is_flying);
    }

    #[test]
    fn already_unlocked_trigger_is_inert() {
        let triggers = UnlockTriggers::staged();
        let mut state = GameState::new(Section::About.stage_top() + Vec3::Y);
        state.unlock(TransportMode::Sword);
        assert_eq!(triggers.apply(&mut state), None);
        assert!(!state.player.is_flying);
    }

    #[test]
    fn trigger_reached_in_flight_only_unlocks() {
        let triggers = UnlockTriggers::staged();
        let mut state = GameState::new(Section::Projects.stage_top() + Vec3::Y);
        state.unlock(TransportMode::Sword);
        state.transport_mode = TransportMode::Sword;
        state.player.is_flying = true;
        assert_eq!(triggers.apply(&mut state), Some(TransportMode::Beast));
        assert!(state.is_unlocked(TransportMode::Beast));
        assert_eq!(state.transport_mode, TransportMode::Sword);
        assert!(state.player.is_flying);
    }

    #[test]
    fn outside_every_trigger_does_nothing() {
        let triggers = UnlockTriggers::staged();
        let mut state = GameState::new(Vec3::new(0.0, 1.0, 20.0));
        assert_eq!(triggers.apply(&mut state), None);
        assert_eq!(state.transport_mode, TransportMode::Cloud);
    }
}
