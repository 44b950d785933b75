//! Physics boundary used by the locomotion controller.
//!
//! The controller only sees `PhysicsBody`: read/write linear velocity, read
//! position, change gravity scale and damping, cast a ray. `SimBody` is the
//! in-crate rigid body that backs it at runtime; tests substitute fakes.

pub mod body;
#[cfg(test)]
pub mod testing;

use bevy::math::Vec3;

pub use body::{step_bodies, BodyHandle, SimBody};

/// Result of a ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the (normalized) ray direction.
    pub toi: f32,
    pub point: Vec3,
}

/// The capability surface the controller needs from a rigid body.
pub trait PhysicsBody {
    fn linvel(&self) -> Vec3;
    fn set_linvel(&mut self, velocity: Vec3, wake: bool);
    fn translation(&self) -> Vec3;
    fn set_gravity_scale(&mut self, scale: f32, wake: bool);
    fn set_linear_damping(&mut self, damping: f32);
    /// First collider hit along `dir` within `max_toi`, ignoring the body itself.
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<RayHit>;
}
