//! Window settings that can change at runtime.
use ascension::settings::Settings;
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};

#[must_use]
pub fn present_mode(vsync: bool) -> PresentMode {
    if vsync { PresentMode::Fifo } else { PresentMode::AutoNoVsync }
}

/// Apply `Settings.graphics.vsync` to the primary window after a reload.
///
/// `last` caches the applied value so the window is only touched on change.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let vsync = settings.graphics.vsync;
    if *last == Some(vsync) {
        return;
    }
    for mut window in &mut windows {
        window.present_mode = present_mode(vsync);
    }
    if last.is_some() {
        info!("vsync {}", if vsync { "on" } else { "off" });
    }
    *last = Some(vsync);
}
