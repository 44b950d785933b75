//! Debug dump (F3 default): writes frame timing, process memory and a
//! snapshot of the locomotion and camera state to a timestamped text file in
//! `./debug-dumps/`.
//!
//! Useful for attaching the exact controller state to a bug report about a
//! leap that missed or a camera that would not settle.
use crate::camera::CameraFollowController;
use crate::player::{LocomotionController, Player};
use crate::settings::Settings;
use crate::state::GameState;
use bevy::diagnostic::{Diagnostic, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use std::time::SystemTime;
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

#[allow(clippy::cast_precision_loss)]
fn bytes_to_mb(bytes: u64) -> String {
    format!("{:.2} MB", (bytes as f64) / 1024.0 / 1024.0)
}

/// Process and system memory in bytes, as reported by `sysinfo`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub process_bytes: u64,
    pub process_virtual_bytes: u64,
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl MemorySnapshot {
    #[must_use]
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let pid = Pid::from_u32(std::process::id());
        sys.refresh_process(pid);
        let proc = sys.process(pid);
        Self {
            process_bytes: proc.map_or(0, ProcessExt::memory),
            process_virtual_bytes: proc.map_or(0, ProcessExt::virtual_memory),
            total_bytes: sys.total_memory(),
            used_bytes: sys.used_memory(),
        }
    }
}

/// Build the dump text.
///
/// # Arguments
/// * `stamp` - wall-clock time of the dump
/// * `fps`, `frame_time` - smoothed diagnostics (`frame_time` in seconds)
/// * `controller` - the player's controller, if one is spawned
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn format_dump(
    stamp: DateTime<Utc>,
    fps: f64,
    frame_time: f64,
    entity_count: usize,
    memory: &MemorySnapshot,
    state: &GameState,
    controller: Option<&LocomotionController>,
    camera: &CameraFollowController,
) -> String {
    let mut out = String::new();
    writeln!(out, "Debug dump: {}", stamp.timestamp()).ok();
    writeln!(out, "Timestamp: {}", stamp.format("%Y-%m-%d %H:%M:%S")).ok();
    writeln!(out, "FPS: {fps:.1}, frame_time: {:.4} ms", frame_time * 1000.0).ok();
    writeln!(out, "Entities: {entity_count}").ok();
    writeln!(
        out,
        "Process memory: {} (virtual {})",
        bytes_to_mb(memory.process_bytes),
        bytes_to_mb(memory.process_virtual_bytes)
    )
    .ok();
    writeln!(out, "System memory: total={} used={}", bytes_to_mb(memory.total_bytes), bytes_to_mb(memory.used_bytes)).ok();

    let p = &state.player;
    writeln!(out, "\nPlayer:").ok();
    writeln!(out, "  position: {:?}", p.position).ok();
    writeln!(out, "  velocity: {:?}", p.velocity).ok();
    writeln!(out, "  grounded={} flying={}", p.is_grounded, p.is_flying).ok();
    writeln!(out, "  transport: {}", state.transport_mode.label()).ok();
    let unlocked: Vec<&str> = state.unlocked().into_iter().map(|m| m.label()).collect();
    writeln!(out, "  unlocked: {}", unlocked.join(", ")).ok();

    writeln!(out, "\nLocomotion controller:").ok();
    match controller {
        Some(c) => {
            writeln!(out, "  flight velocity: {:?}", c.flight_velocity()).ok();
            writeln!(out, "  click target: {:?}", c.click_target()).ok();
            writeln!(out, "  leaping to target: {}", c.is_jumping_to_target()).ok();
        }
        None => {
            writeln!(out, "  (no player spawned)").ok();
        }
    }

    writeln!(out, "\nCamera:").ok();
    writeln!(out, "  mode: {}", camera.mode().label()).ok();
    writeln!(out, "  pending target: {:?}", state.camera_target).ok();
    writeln!(out, "  active section: {}", state.active_section.map_or("none", |s| s.label())).ok();
    out
}

/// Write a dump when the dump key (default F3) is pressed.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    diagnostics: Res<DiagnosticsStore>,
    query_entities: Query<Entity>,
    state: Res<GameState>,
    camera: Res<CameraFollowController>,
    controllers: Query<&LocomotionController, With<Player>>,
) {
    if !keys.just_pressed(settings.key("dump_debug", KeyCode::F3)) {
        return;
    }

    let stamp: DateTime<Utc> = DateTime::from(SystemTime::now());
    let fname = format!("{DUMP_DIR}/debug-{}.txt", stamp.timestamp());

    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(Diagnostic::smoothed)
        .unwrap_or(0.0);

    let out = format_dump(
        stamp,
        fps,
        frame_time,
        query_entities.iter().count(),
        &MemorySnapshot::capture(),
        &state,
        controllers.get_single().ok(),
        &camera,
    );

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dump_includes_controller_snapshot() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let settings = Settings::default();
        let controller = LocomotionController::new(&settings);
        let state = GameState::new(Vec3::new(0.0, 1.5, 12.0));
        let text = format_dump(
            stamp,
            60.0,
            0.0166,
            42,
            &MemorySnapshot { process_bytes: 2 * 1024 * 1024, ..Default::default() },
            &state,
            Some(&controller),
            &CameraFollowController::default(),
        );
        assert!(text.contains("Timestamp: 2024-05-01 12:30:00"));
        assert!(text.contains("Entities: 42"));
        assert!(text.contains("Process memory: 2.00 MB"));
        assert!(text.contains("leaping to target: false"));
        assert!(text.contains("mode: orbit"));
    }

    #[test]
    fn dump_without_player_says_so() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let text = format_dump(
            stamp,
            0.0,
            0.0,
            0,
            &MemorySnapshot::default(),
            &GameState::default(),
            None,
            &CameraFollowController::default(),
        );
        assert!(text.contains("(no player spawned)"));
    }
}
