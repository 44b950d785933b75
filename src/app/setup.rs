//! Startup system: spawns the staged world, the player and the orbit camera.
//!
//! Resources (`Settings`, `GameState`, `Terrain`, `UnlockTriggers`) are
//! inserted by `main` before this runs; everything here only reads them.
use ascension::camera::OrbitControls;
use ascension::physics::SimBody;
use ascension::player::{LocomotionController, Player};
use ascension::settings::Settings;
use ascension::world::{Terrain, UnlockTriggers};
use bevy::prelude::*;

/// Spawn lights, terrain meshes, trigger pads, the player and the camera.
///
/// # Arguments
/// - `meshes`, `materials`: asset stores for the generated primitives
/// - `terrain`: colliders; each platform gets a matching box mesh
/// - `triggers`: unlock volumes, drawn as thin glowing pads
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
    terrain: Res<Terrain>,
    triggers: Res<UnlockTriggers>,
) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.85, 0.85, 1.0),
        brightness: 300.0,
    });
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 8000.0,
                shadows_enabled: true,
                ..default()
            },
            transform: Transform::from_xyz(30.0, 60.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..default()
        },
        Name::new("Sun"),
    ));

    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.52, 0.48),
        perceptual_roughness: 0.9,
        ..default()
    });
    let jade = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.62, 0.5),
        perceptual_roughness: 0.6,
        ..default()
    });
    for platform in &terrain.platforms {
        let material = if platform.name == "courtyard" { stone.clone() } else { jade.clone() };
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::from_size(platform.size())),
                material,
                transform: Transform::from_translation(platform.center()),
                ..default()
            },
            Name::new(platform.name.clone()),
        ));
    }

    let glow = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 0.7, 0.2, 0.6),
        emissive: LinearRgba::rgb(2.0, 1.2, 0.3),
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    for trigger in &triggers.0 {
        let size = trigger.max - trigger.min;
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(size.x, 0.05, size.z)),
                material: glow.clone(),
                transform: Transform::from_translation(Vec3::new(
                    (trigger.min.x + trigger.max.x) * 0.5,
                    trigger.min.y + 0.03,
                    (trigger.min.z + trigger.max.z) * 0.5,
                )),
                ..default()
            },
            Name::new(format!("{} shrine", trigger.mode.label())),
        ));
    }

    let spawn = settings.locomotion.spawn_point();
    let half = settings.locomotion.half_extents();
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Capsule3d::new(half.x, (2.0 * (half.y - half.x)).max(0.0))),
            material: materials.add(Color::srgb(0.9, 0.9, 0.95)),
            transform: Transform::from_translation(spawn),
            ..default()
        },
        Player,
        SimBody::new(spawn, half),
        LocomotionController::new(&settings),
        Name::new("Player"),
    ));

    let eye = spawn + Vec3::new(0.0, 6.0, 12.0);
    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(eye).looking_at(spawn, Vec3::Y),
            ..default()
        },
        OrbitControls::new(spawn),
        Name::new("Camera"),
    ));
    info!("spawned player at {spawn} on {} platforms", terrain.platforms.len());
}
