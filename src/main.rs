use ascension::audio::{log_audio_cues, AudioCueEvent};
use ascension::camera::{apply_camera_rig, follow_camera, orbit_controls, CameraFollowController, OrbitInteractionStarted};
use ascension::debug::DebugDumpPlugin;
use ascension::input::{read_control_intent, track_click_gesture, ControlIntent, PendingClick};
use ascension::physics::step_bodies;
use ascension::player::{drive_locomotion, sync_player_transform};
use ascension::settings::loader as settings_loader;
use ascension::state::GameState;
use ascension::ui::{
    draw_debug_gizmos, setup_debug_overlay, spawn_debug_overlay, toggle_debug_gizmos, toggle_debug_overlay,
    update_debug_overlay,
};
use ascension::world::{check_unlock_triggers, Terrain, UnlockTriggers};
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};

mod app;
use app::display::present_mode;
use app::{navigate_sections, setup, sync_vsync_settings};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|_| settings_loader::SettingsWatcher::stub());

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Ascension".into(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: present_mode(settings.graphics.vsync),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(FrameTimeDiagnosticsPlugin)
    .add_plugins(LogDiagnosticsPlugin::default())
    .add_plugins(DebugDumpPlugin);

    app.insert_resource(GameState::new(settings.locomotion.spawn_point()));
    app.insert_resource(Terrain::staged());
    app.insert_resource(UnlockTriggers::staged());
    app.init_resource::<ControlIntent>();
    app.init_resource::<PendingClick>();
    app.init_resource::<CameraFollowController>();
    app.add_event::<AudioCueEvent>();
    app.add_event::<OrbitInteractionStarted>();

    app.insert_resource(settings);
    app.insert_resource(settings_watcher);

    app.add_systems(Startup, (setup_debug_overlay, spawn_debug_overlay, setup));

    app.add_systems(Update, settings_loader::check_settings_changes);
    app.add_systems(Update, sync_vsync_settings);
    app.add_systems(Update, (toggle_debug_overlay, toggle_debug_gizmos, update_debug_overlay, draw_debug_gizmos));
    app.add_systems(Update, log_audio_cues);

    // one frame of the simulation, in order
    app.add_systems(
        Update,
        (
            read_control_intent,
            track_click_gesture,
            check_unlock_triggers,
            navigate_sections,
            step_bodies,
            drive_locomotion,
            sync_player_transform,
            orbit_controls,
            follow_camera,
            apply_camera_rig,
        )
            .chain(),
    );

    app.run();
}
