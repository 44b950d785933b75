//! Debug overlay and gizmos.
//!
//! F1 shows a text overlay with frame timing and the locomotion/camera state;
//! F2 draws the world bounds, unlock triggers and the pending click target.
//! Both are driven from `Settings.controls.keybinds` like every other key.

use crate::camera::CameraFollowController;
use crate::player::{LocomotionController, Player};
use crate::settings::Settings;
use crate::state::GameState;
use crate::world::UnlockTriggers;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    /// Whether the overlay is currently visible.
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Resource, Default)]
pub struct DebugGizmosVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert debug overlay resources.
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(0.25, TimerMode::Repeating)));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(DebugGizmosVisible::default());
}

/// Spawn the (initially empty) overlay text in the top-left corner.
pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 0.9, 0.4),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.key("toggle_debug", KeyCode::F1)) {
        state.visible = !state.visible;
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_gizmos(
    mut gizmos: ResMut<DebugGizmosVisible>,
    input: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
) {
    if input.just_pressed(settings.key("toggle_gizmos", KeyCode::F2)) {
        gizmos.0 = !gizmos.0;
    }
}

/// Render the overlay body. Kept free of ECS types so the layout is testable.
#[must_use]
pub fn overlay_text(
    fps: f64,
    frame_time_ms: f64,
    state: &GameState,
    controller: Option<&LocomotionController>,
    camera: &CameraFollowController,
) -> String {
    let p = &state.player;
    let section = state.active_section.map_or("none", |s| s.label());
    let leap = controller
        .and_then(LocomotionController::click_target)
        .map_or_else(|| "none".to_string(), |t| format!("({:.1}, {:.1})", t.x, t.z));
    let unlocked: Vec<&str> = state.unlocked().into_iter().map(|m| m.label()).collect();

    format!(
        "FPS: {fps:.1}\nFrame Time: {frame_time_ms:.2} ms\n\
         Pos: ({:.1}, {:.1}, {:.1})\nVel: ({:.1}, {:.1}, {:.1})\n\
         Grounded: {} | Flying: {}\nTransport: {} (unlocked: {})\n\
         Leap target: {leap}\nCamera: {}\nSection: {section}",
        p.position.x,
        p.position.y,
        p.position.z,
        p.velocity.x,
        p.velocity.y,
        p.velocity.z,
        p.is_grounded,
        p.is_flying,
        state.transport_mode.label(),
        unlocked.join(", "),
        camera.mode().label(),
    )
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Res<'w, DiagnosticsStore>,
    pub overlay: Res<'w, DebugOverlayState>,
    pub game: Res<'w, GameState>,
    pub camera: Res<'w, CameraFollowController>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub text: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub controllers: Query<'w, 's, &'static LocomotionController, With<Player>>,
}

/// Refresh the overlay text on a fixed interval.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.text.get_single_mut() else { return };

    if !ctx.overlay.visible {
        text.sections[0].value = String::new();
        return;
    }

    let fps = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = ctx
        .diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    text.sections[0].value = overlay_text(fps, frame_time, &ctx.game, ctx.controllers.get_single().ok(), &ctx.camera);
}

/// Draw world bounds, unlock triggers and the leap target.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_debug_gizmos(
    visible: Res<DebugGizmosVisible>,
    settings: Res<Settings>,
    state: Res<GameState>,
    triggers: Res<UnlockTriggers>,
    controllers: Query<&LocomotionController, With<Player>>,
    mut gizmos: Gizmos,
) {
    if !visible.0 {
        return;
    }

    let bounds = &settings.flight.bounds;
    let (lo, hi) = (bounds.min_v(), bounds.max_v());
    gizmos.cuboid(
        Transform::from_translation((lo + hi) * 0.5).with_scale(hi - lo),
        Color::srgb(0.2, 0.6, 1.0),
    );

    for trigger in &triggers.0 {
        let color = if state.is_unlocked(trigger.mode) {
            Color::srgb(0.4, 0.4, 0.4)
        } else {
            Color::srgb(1.0, 0.5, 0.0)
        };
        gizmos.cuboid(
            Transform::from_translation((trigger.min + trigger.max) * 0.5).with_scale(trigger.max - trigger.min),
            color,
        );
    }

    if let Some(target) = controllers.get_single().ok().and_then(LocomotionController::click_target) {
        let green = Color::srgb(0.0, 1.0, 0.0);
        gizmos.line(target + Vec3::new(-0.5, 0.05, 0.0), target + Vec3::new(0.5, 0.05, 0.0), green);
        gizmos.line(target + Vec3::new(0.0, 0.05, -0.5), target + Vec3::new(0.0, 0.05, 0.5), green);
        gizmos.line(state.player.position, target, Color::srgba(0.0, 1.0, 0.0, 0.3));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TransportMode;
    use crate::world::Section;

    #[test]
    fn overlay_reports_locomotion_state() {
        let mut state = GameState::new(Vec3::new(1.0, 2.0, 3.0));
        state.unlock(TransportMode::Sword);
        state.transport_mode = TransportMode::Sword;
        state.player.is_flying = true;
        state.navigate_to(Section::Skills);

        let text = overlay_text(59.94, 16.68, &state, None, &CameraFollowController::default());
        assert!(text.contains("FPS: 59.9"));
        assert!(text.contains("Pos: (1.0, 2.0, 3.0)"));
        assert!(text.contains("Flying: true"));
        assert!(text.contains("Transport: sword (unlocked: cloud, sword)"));
        assert!(text.contains("Leap target: none"));
        assert!(text.contains(&format!("Section: {}", Section::Skills.label())));
    }
}
