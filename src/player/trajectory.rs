//! Ballistic jump planning for click-to-target movement.
//!
//! The launch velocity is solved analytically so that, under constant gravity
//! and no further input, the arc comes back down to launch height exactly at
//! the target's (x, z). The apex grows with distance, clamped to a range, so
//! short hops stay low and long leaps still look like leaps.

use crate::settings::TrajectorySettings;
use bevy::math::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpPlan {
    /// Target too close for an arc; just bounce in place.
    Hop { velocity: Vec3 },
    Arc {
        velocity: Vec3,
        apex: f32,
        flight_time: f32,
    },
}

impl JumpPlan {
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        match *self {
            JumpPlan::Hop { velocity } | JumpPlan::Arc { velocity, .. } => velocity,
        }
    }
}

/// Apex height for a jump covering `distance` horizontally.
#[must_use]
pub fn apex_height(distance: f32, tuning: &TrajectorySettings) -> f32 {
    (distance * tuning.apex_per_unit).clamp(tuning.apex_min, tuning.apex_max)
}

/// Solve the launch velocity from `from` to the (x, z) of `to`.
///
/// `v_y = sqrt(2 g h)`, total time is twice the time to apex, and the
/// horizontal components cover the displacement in that time.
#[must_use]
pub fn plan_jump(from: Vec3, to: Vec3, gravity: f32, tuning: &TrajectorySettings) -> JumpPlan {
    let offset = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    let distance = offset.length();

    if distance < tuning.hop_radius {
        return JumpPlan::Hop { velocity: Vec3::new(0.0, tuning.hop_speed, 0.0) };
    }

    let apex = apex_height(distance, tuning);
    let vy = (2.0 * gravity * apex).sqrt();
    let flight_time = 2.0 * vy / gravity;
    let horizontal = offset / flight_time;

    JumpPlan::Arc {
        velocity: Vec3::new(horizontal.x, vy, horizontal.z),
        apex,
        flight_time,
    }
}

/// Intersect a ray with the horizontal plane `y = plane_y`.
///
/// # Return
/// * `Option<Vec3>` - the hit point, or `None` when the ray is parallel to the
///   plane or points away from it
#[must_use]
pub fn ray_ground_intersection(origin: Vec3, dir: Vec3, plane_y: f32) -> Option<Vec3> {
    if dir.y.abs() < 1e-6 {
        return None;
    }
    let t = (plane_y - origin.y) / dir.y;
    if t < 0.0 {
        return None;
    }
    Some(origin + dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f32 = 30.0;

    fn landing(from: Vec3, plan: &JumpPlan) -> Vec3 {
        let JumpPlan::Arc { velocity, flight_time, .. } = *plan else {
            panic!("expected an arc");
        };
        let t = flight_time;
        from + Vec3::new(velocity.x * t, velocity.y * t - 0.5 * G * t * t, velocity.z * t)
    }

    #[test]
    fn twenty_unit_leap_matches_worked_example() {
        let tuning = TrajectorySettings::default();
        let plan = plan_jump(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0), G, &tuning);
        let JumpPlan::Arc { velocity, apex, flight_time } = plan else { panic!("expected an arc") };
        assert!((apex - 6.0).abs() < 1e-5);
        assert!((velocity.y - 18.973).abs() < 1e-2);
        assert!((flight_time - 1.265).abs() < 1e-3);
        assert!((velocity.x - 15.81).abs() < 1e-2);
        assert!(velocity.z.abs() < 1e-6);
    }

    #[test]
    fn arcs_land_on_target_at_launch_height() {
        let tuning = TrajectorySettings::default();
        let from = Vec3::new(3.0, 7.0, -2.0);
        for &(dx, dz) in &[(0.6, 0.0), (-4.0, 3.0), (12.0, -9.0), (0.0, 55.0), (-70.0, -70.0)] {
            let to = Vec3::new(from.x + dx, 0.0, from.z + dz);
            let plan = plan_jump(from, to, G, &tuning);
            let land = landing(from, &plan);
            assert!((land.x - to.x).abs() < 1e-3, "x for ({dx}, {dz})");
            assert!((land.z - to.z).abs() < 1e-3, "z for ({dx}, {dz})");
            assert!((land.y - from.y).abs() < 1e-3, "y for ({dx}, {dz})");
        }
    }

    #[test]
    fn apex_is_clamped() {
        let tuning = TrajectorySettings::default();
        assert_eq!(apex_height(1.0, &tuning), 3.0);
        assert_eq!(apex_height(100.0, &tuning), 12.0);
    }

    #[test]
    fn nearby_target_only_hops() {
        let tuning = TrajectorySettings::default();
        let plan = plan_jump(Vec3::ZERO, Vec3::new(0.3, 5.0, 0.2), G, &tuning);
        assert_eq!(plan, JumpPlan::Hop { velocity: Vec3::new(0.0, tuning.hop_speed, 0.0) });
    }

    #[test]
    fn ground_intersection_from_above() {
        let hit = ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 1.0).normalize(), 0.0);
        let hit = hit.unwrap();
        assert!(hit.y.abs() < 1e-5);
        assert!((hit.z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn parallel_or_receding_rays_miss() {
        assert!(ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::X, 0.0).is_none());
        assert!(ray_ground_intersection(Vec3::new(0.0, 10.0, 0.0), Vec3::Y, 0.0).is_none());
    }
}
