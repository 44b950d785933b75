//! In-memory `PhysicsBody` for controller tests.

use crate::physics::{PhysicsBody, RayHit};
use bevy::math::Vec3;

/// Records what the controller asked of it; the ground is wherever
/// `ground_distance` says it is.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub gravity_scale: f32,
    pub linear_damping: f32,
    /// Distance straight down to ground, `None` for open air.
    pub ground_distance: Option<f32>,
    pub linvel_writes: usize,
}

impl FakeBody {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            gravity_scale: 1.0,
            linear_damping: 0.0,
            ground_distance: None,
            linvel_writes: 0,
        }
    }

    pub fn standing(position: Vec3) -> Self {
        Self { ground_distance: Some(1.0), ..Self::at(position) }
    }
}

impl PhysicsBody for FakeBody {
    fn linvel(&self) -> Vec3 {
        self.velocity
    }

    fn set_linvel(&mut self, velocity: Vec3, _wake: bool) {
        self.velocity = velocity;
        self.linvel_writes += 1;
    }

    fn translation(&self) -> Vec3 {
        self.position
    }

    fn set_gravity_scale(&mut self, scale: f32, _wake: bool) {
        self.gravity_scale = scale;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping;
    }

    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<RayHit> {
        if dir.y >= 0.0 {
            return None;
        }
        let toi = self.ground_distance.filter(|d| *d <= max_toi)?;
        Some(RayHit { toi, point: origin + Vec3::NEG_Y * toi })
    }
}
