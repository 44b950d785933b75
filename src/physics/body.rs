//! Player rigid body: gravity, damping and collision against `Terrain`.
//!
//! Integration is semi-implicit Euler: velocity is updated first (gravity,
//! damping), then position moves by `velocity * dt`, one axis at a time so a
//! blocked axis does not stop sliding along the others.

use crate::physics::{PhysicsBody, RayHit};
use crate::settings::Settings;
use crate::world::Terrain;
use bevy::prelude::*;

pub const TERMINAL_FALL_SPEED: f32 = 60.0;
/// Longest step integrated in one go; longer frames are truncated.
pub const MAX_STEP: f32 = 0.1;

const SLEEP_SPEED: f32 = 0.05;
const SLEEP_DELAY: f32 = 0.5;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct SimBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub half_extents: Vec3,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    pub sleeping: bool,
    rest_time: f32,
}

impl SimBody {
    #[must_use]
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            half_extents,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            sleeping: false,
            rest_time: 0.0,
        }
    }

    /// Leave sleep. An awake body keeps its accumulated rest time.
    pub fn wake(&mut self) {
        if self.sleeping {
            self.sleeping = false;
            self.rest_time = 0.0;
        }
    }

    /// Advance the body by `dt` seconds under `gravity` (magnitude, pointing down).
    pub fn step(&mut self, dt: f32, gravity: f32, terrain: &Terrain) {
        if self.sleeping || dt <= 0.0 {
            return;
        }
        let dt = dt.min(MAX_STEP);

        self.velocity.y -= gravity * self.gravity_scale * dt;
        if self.velocity.y < -TERMINAL_FALL_SPEED {
            self.velocity.y = -TERMINAL_FALL_SPEED;
        }
        if self.linear_damping > 0.0 {
            self.velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        }

        // vertical first so landing resolves before sliding
        for axis in [1, 0, 2] {
            let delta = self.velocity[axis] * dt;
            self.move_axis(axis, delta, terrain);
        }

        if self.velocity.length_squared() < SLEEP_SPEED * SLEEP_SPEED {
            self.rest_time += dt;
            if self.rest_time >= SLEEP_DELAY {
                self.sleeping = true;
                self.velocity = Vec3::ZERO;
            }
        } else {
            self.rest_time = 0.0;
        }
    }

    fn move_axis(&mut self, axis: usize, delta: f32, terrain: &Terrain) {
        if delta == 0.0 {
            return;
        }
        let mut next = self.position;
        next[axis] += delta;
        let blocker = terrain
            .platforms
            .iter()
            .find(|p| p.overlaps(next - self.half_extents, next + self.half_extents));

        let Some(platform) = blocker else {
            self.position = next;
            return;
        };

        // snap flush against the face we ran into
        next[axis] = if delta < 0.0 {
            platform.max[axis] + self.half_extents[axis]
        } else {
            platform.min[axis] - self.half_extents[axis]
        };
        if !terrain.overlaps(next - self.half_extents, next + self.half_extents) {
            self.position = next;
        }
        self.velocity[axis] = 0.0;
    }
}

/// A `SimBody` paired with the colliders its rays are cast against.
pub struct BodyHandle<'a> {
    pub body: &'a mut SimBody,
    pub terrain: &'a Terrain,
}

impl PhysicsBody for BodyHandle<'_> {
    fn linvel(&self) -> Vec3 {
        self.body.velocity
    }

    // rewriting the same value leaves a sleeping body asleep
    fn set_linvel(&mut self, velocity: Vec3, wake: bool) {
        if wake && velocity != self.body.velocity {
            self.body.wake();
        }
        self.body.velocity = velocity;
    }

    fn translation(&self) -> Vec3 {
        self.body.position
    }

    fn set_gravity_scale(&mut self, scale: f32, wake: bool) {
        if wake && scale != self.body.gravity_scale {
            self.body.wake();
        }
        self.body.gravity_scale = scale;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.body.linear_damping = damping;
    }

    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        self.terrain
            .raycast(origin, dir, max_toi)
            .map(|toi| RayHit { toi, point: origin + dir * toi })
    }
}

/// Integrate every `SimBody` for this frame.
#[allow(clippy::needless_pass_by_value)]
pub fn step_bodies(
    time: Res<Time>,
    terrain: Res<Terrain>,
    settings: Res<Settings>,
    mut bodies: Query<&mut SimBody>,
) {
    let dt = time.delta_seconds();
    for mut body in &mut bodies {
        body.step(dt, settings.locomotion.gravity, &terrain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF: Vec3 = Vec3::new(0.4, 1.0, 0.4);

    #[test]
    fn falling_body_lands_flush_on_floor() {
        let terrain = Terrain::flat();
        let mut body = SimBody::new(Vec3::new(0.0, 5.0, 0.0), HALF);
        for _ in 0..240 {
            body.step(1.0 / 60.0, 30.0, &terrain);
        }
        assert!((body.position.y - 1.0).abs() < 1e-4);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn zero_gravity_scale_keeps_altitude() {
        let terrain = Terrain::flat();
        let mut body = SimBody::new(Vec3::new(0.0, 5.0, 0.0), HALF);
        body.gravity_scale = 0.0;
        body.velocity = Vec3::new(2.0, 0.0, 0.0);
        // longer than MAX_STEP, so only 0.1 s is integrated
        body.step(0.5, 30.0, &terrain);
        assert!((body.position - Vec3::new(0.2, 5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn wall_blocks_only_its_axis() {
        let terrain = Terrain::new(vec![
            crate::world::Platform::new("floor", Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)),
            crate::world::Platform::new("wall", Vec3::new(1.0, 0.0, -50.0), Vec3::new(2.0, 10.0, 50.0)),
        ]);
        let mut body = SimBody::new(Vec3::new(0.5, 1.0, 0.0), HALF);
        body.velocity = Vec3::new(5.0, 0.0, 5.0);
        body.step(0.1, 30.0, &terrain);
        assert!((body.position.x - 0.6).abs() < 1e-5);
        assert!((body.position.z - 0.5).abs() < 1e-5);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn resting_body_sleeps_and_wakes_on_velocity_write() {
        let terrain = Terrain::flat();
        let mut body = SimBody::new(Vec3::new(0.0, 1.0, 0.0), HALF);
        for _ in 0..60 {
            body.step(1.0 / 60.0, 30.0, &terrain);
        }
        assert!(body.sleeping);
        let mut handle = BodyHandle { body: &mut body, terrain: &terrain };
        handle.set_linvel(Vec3::ZERO, true);
        handle.set_gravity_scale(1.0, true);
        assert!(handle.body.sleeping);
        handle.set_linvel(Vec3::new(0.0, 10.0, 0.0), true);
        assert!(!body.sleeping);
    }

    #[test]
    fn idle_player_on_the_ground_falls_asleep() {
        let settings = Settings::default();
        let terrain = Terrain::flat();
        let mut body = SimBody::new(Vec3::new(0.0, 1.0, 0.0), HALF);
        body.velocity = Vec3::new(3.0, 0.0, 0.0);
        let mut ctl = crate::player::LocomotionController::new(&settings);
        let mut state = crate::state::GameState::new(body.position);
        let dt = 1.0 / 60.0;
        for i in 0..180u32 {
            body.step(dt, settings.locomotion.gravity, &terrain);
            let input = crate::player::TickInput {
                dt,
                now: f64::from(i) * f64::from(dt),
                intent: crate::input::ControlIntent::default(),
                toggle_flight: false,
                cycle_transport: false,
                click: None,
                camera_forward: Vec3::NEG_Z,
                settings: &settings,
            };
            let mut handle = BodyHandle { body: &mut body, terrain: &terrain };
            ctl.tick(&input, Some(&mut handle as &mut dyn PhysicsBody), &mut state);
        }
        assert!(body.sleeping);
        assert!(state.player.is_grounded);
    }

    #[test]
    fn handle_ground_ray_reports_contact_point() {
        let terrain = Terrain::flat();
        let mut body = SimBody::new(Vec3::new(2.0, 1.0, 3.0), HALF);
        let handle = BodyHandle { body: &mut body, terrain: &terrain };
        let hit = handle.cast_ray(handle.translation(), Vec3::NEG_Y, 1.1).unwrap();
        assert!((hit.toi - 1.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(2.0, 0.0, 3.0)).length() < 1e-5);
    }
}
