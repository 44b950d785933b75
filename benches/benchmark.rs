use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ascension::camera::{CameraFollowController, CameraRig};
use ascension::input::ControlIntent;
use ascension::physics::{BodyHandle, PhysicsBody, SimBody};
use ascension::player::{plan_jump, LocomotionController, TickInput};
use ascension::settings::Settings;
use ascension::state::{CameraAnimationTarget, GameState, TransportMode};
use ascension::world::Terrain;
use bevy::math::Vec3;

const DT: f32 = 1.0 / 60.0;

/// Deterministic LCG so every run sees the same input stream.
fn lcg(state: &mut u32) -> u32 {
    *state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    *state >> 16
}

fn random_intent(state: &mut u32) -> ControlIntent {
    let bits = lcg(state);
    ControlIntent {
        forward: bits & 1 != 0,
        backward: bits & 2 != 0,
        left: bits & 4 != 0,
        right: bits & 8 != 0,
        jump: bits & 16 != 0 && bits & 32 != 0,
        ascend: bits & 64 != 0,
        descend: bits & 128 != 0,
    }
}

/// Walk and jump on the staged terrain: ground ray, friction, landing cues.
fn bench_locomotion_grounded(c: &mut Criterion) {
    let settings = Settings::default();
    let terrain = Terrain::staged();
    c.bench_function("locomotion_grounded_1000_ticks", |b| {
        b.iter(|| {
            let mut body = SimBody::new(settings.locomotion.spawn_point(), settings.locomotion.half_extents());
            let mut ctl = LocomotionController::new(&settings);
            let mut state = GameState::new(body.position);
            let mut rng = 0x1234_5678;
            for i in 0..1_000u32 {
                body.step(DT, settings.locomotion.gravity, &terrain);
                let input = TickInput {
                    dt: DT,
                    now: f64::from(i) * f64::from(DT),
                    intent: random_intent(&mut rng),
                    toggle_flight: false,
                    cycle_transport: false,
                    click: None,
                    camera_forward: Vec3::NEG_Z,
                    settings: &settings,
                };
                let mut handle = BodyHandle { body: &mut body, terrain: &terrain };
                black_box(ctl.tick(&input, Some(&mut handle as &mut dyn PhysicsBody), &mut state));
            }
            black_box(state.player.position);
        })
    });
}

/// Sword flight with random input, pushing into the world bounds.
fn bench_locomotion_flight(c: &mut Criterion) {
    let settings = Settings::default();
    let terrain = Terrain::staged();
    c.bench_function("locomotion_sword_flight_1000_ticks", |b| {
        b.iter(|| {
            let mut body = SimBody::new(Vec3::new(0.0, 20.0, 0.0), settings.locomotion.half_extents());
            let mut ctl = LocomotionController::new(&settings);
            let mut state = GameState::new(body.position);
            state.unlock(TransportMode::Sword);
            state.transport_mode = TransportMode::Sword;
            state.player.is_flying = true;
            let mut rng = 0x9e37_79b9;
            for i in 0..1_000u32 {
                body.step(DT, settings.locomotion.gravity, &terrain);
                let input = TickInput {
                    dt: DT,
                    now: f64::from(i) * f64::from(DT),
                    intent: random_intent(&mut rng),
                    toggle_flight: false,
                    cycle_transport: false,
                    click: None,
                    camera_forward: Vec3::NEG_Z,
                    settings: &settings,
                };
                let mut handle = BodyHandle { body: &mut body, terrain: &terrain };
                black_box(ctl.tick(&input, Some(&mut handle as &mut dyn PhysicsBody), &mut state));
            }
            black_box(state.player.position);
        })
    });
}

fn bench_plan_jump(c: &mut Criterion) {
    let tuning = Settings::default().locomotion.trajectory;
    c.bench_function("plan_jump_1000_targets", |b| {
        b.iter(|| {
            let mut rng = 0xdead_beef;
            let mut sum = Vec3::ZERO;
            for _ in 0..1_000usize {
                let x = (lcg(&mut rng) & 0x7fff) as f32 / 32767.0 * 100.0 - 50.0;
                let z = (lcg(&mut rng) & 0x7fff) as f32 / 32767.0 * 100.0 - 50.0;
                sum += plan_jump(Vec3::new(0.0, 1.0, 0.0), black_box(Vec3::new(x, 0.0, z)), 30.0, &tuning).velocity();
            }
            black_box(sum);
        })
    });
}

/// Alternate between sword follow and section framing animations.
fn bench_camera_follow(c: &mut Criterion) {
    let settings = Settings::default();
    c.bench_function("camera_follow_1000_ticks", |b| {
        b.iter(|| {
            let mut ctl = CameraFollowController::default();
            let mut state = GameState::default();
            state.transport_mode = TransportMode::Sword;
            let mut rig = CameraRig { position: Vec3::new(0.0, 8.0, 20.0), look_at: Vec3::ZERO };
            for i in 0..1_000u32 {
                let phase = i / 100;
                state.player.is_flying = phase % 2 == 0;
                state.player.position = Vec3::new((i as f32 * 0.1).sin() * 20.0, 15.0, -(i as f32) * 0.05);
                if i % 100 == 50 {
                    state.request_camera(CameraAnimationTarget {
                        position: Vec3::new(20.0, 14.0, -14.0),
                        look_at: Some(Vec3::new(20.0, 7.0, -30.0)),
                    });
                }
                black_box(ctl.tick(DT, i % 250 == 0, &mut state, &mut rig, &settings.camera));
            }
            black_box(rig);
        })
    });
}

/// Drop a body onto the terraces and let it slide around.
fn bench_body_step(c: &mut Criterion) {
    let terrain = Terrain::staged();
    c.bench_function("sim_body_step_1000", |b| {
        b.iter(|| {
            let mut body = SimBody::new(Vec3::new(-20.0, 30.0, -42.0), Vec3::new(0.4, 1.0, 0.4));
            for i in 0..1_000u32 {
                if i % 120 == 0 {
                    body.velocity = Vec3::new(6.0, 12.0, 4.0);
                    body.wake();
                }
                body.step(DT, 30.0, &terrain);
            }
            black_box(body.position);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(100);
    targets =
        bench_locomotion_grounded,
        bench_locomotion_flight,
        bench_plan_jump,
        bench_camera_follow,
        bench_body_step
}
criterion_main!(benches);
