//! Section navigation: number keys frame a stage with the camera.
use ascension::settings::Settings;
use ascension::state::GameState;
use ascension::world::Section;
use bevy::prelude::*;

const DIGITS: [KeyCode; 5] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4, KeyCode::Digit5];

/// Keys `section_1`..`section_5` (default 1-5) request the camera framing of
/// the matching section.
#[allow(clippy::needless_pass_by_value)]
pub fn navigate_sections(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut state: ResMut<GameState>,
) {
    for (i, default) in DIGITS.into_iter().enumerate() {
        if !keyboard.just_pressed(settings.key(&format!("section_{}", i + 1), default)) {
            continue;
        }
        if let Some(section) = Section::from_index(i) {
            info!("navigating to {}", section.label());
            state.navigate_to(section);
        }
    }
}
