//! Static world colliders and their queries.
//!
//! This module provides the `Terrain` resource which holds the axis-aligned
//! platforms the player can stand on: a wide courtyard at height 0 and one
//! raised terrace per content section, each higher than the last. It also
//! answers the two geometric questions the physics body needs: "does this box
//! overlap anything?" and "how far along this ray is the first platform?".
//!
//! # Example:
//!
//! ```
//! use ascension::world::Terrain;
//! use bevy::math::Vec3;
//!
//! let terrain = Terrain::staged();
//! // distance from a point just above the courtyard down to its surface
//! let hit = terrain.raycast(Vec3::new(0.0, 1.0, 10.0), Vec3::NEG_Y, 1.1);
//! assert!(hit.is_some());
//! ```

pub mod sections;
pub mod triggers;

use bevy::prelude::*;

pub use sections::Section;
pub use triggers::{check_unlock_triggers, UnlockTrigger, UnlockTriggers};

/// An axis-aligned solid box.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

impl Platform {
    #[must_use]
    pub fn new(name: &str, min: Vec3, max: Vec3) -> Self {
        Self { name: name.to_string(), min: min.min(max), max: min.max(max) }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Strict overlap test: boxes that merely touch do not overlap.
    #[must_use]
    pub fn overlaps(&self, min: Vec3, max: Vec3) -> bool {
        self.min.x < max.x
            && self.max.x > min.x
            && self.min.y < max.y
            && self.max.y > min.y
            && self.min.z < max.z
            && self.max.z > min.z
    }

    /// Slab-test a ray against this box.
    ///
    /// # Return
    /// * `Option<f32>` - distance along `dir` (which must be normalized) to the
    ///   entry point, or `0.0` if `origin` is inside the box; `None` if the ray
    ///   misses or the hit lies beyond `max_toi`.
    #[must_use]
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<f32> {
        let mut t_min = 0.0f32;
        let mut t_max = max_toi;
        for axis in 0..3 {
            let o = origin[axis];
            let d = dir[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);
            if d.abs() < 1e-8 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }
}

/// The `Terrain` resource holds every static collider in the world.
#[derive(Resource, Debug, Clone, Default)]
pub struct Terrain {
    pub platforms: Vec<Platform>,
}

impl Terrain {
    #[must_use]
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self { platforms }
    }

    /// A single infinite-ish floor with its surface at `y = 0`.
    #[must_use]
    pub fn flat() -> Self {
        Self::new(vec![Platform::new(
            "floor",
            Vec3::new(-1000.0, -1.0, -1000.0),
            Vec3::new(1000.0, 0.0, 1000.0),
        )])
    }

    /// The default layout: courtyard plus one terrace per section.
    #[must_use]
    pub fn staged() -> Self {
        let mut platforms = vec![Platform::new(
            "courtyard",
            Vec3::new(-60.0, -1.0, -60.0),
            Vec3::new(60.0, 0.0, 60.0),
        )];
        for section in Section::ALL {
            let top = section.stage_top();
            let half = section.stage_half_extent();
            platforms.push(Platform::new(
                section.label(),
                Vec3::new(top.x - half, 0.0, top.z - half),
                Vec3::new(top.x + half, top.y, top.z + half),
            ));
        }
        Self::new(platforms)
    }

    /// True if the box `[min, max]` overlaps any platform.
    #[must_use]
    pub fn overlaps(&self, min: Vec3, max: Vec3) -> bool {
        self.platforms.iter().any(|p| p.overlaps(min, max))
    }

    /// Nearest hit distance along a normalized ray, if within `max_toi`.
    #[must_use]
    pub fn raycast(&self, origin: Vec3, dir: Vec3, max_toi: f32) -> Option<f32> {
        self.platforms
            .iter()
            .filter_map(|p| p.raycast(origin, dir, max_toi))
            .min_by(f32::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downward_ray_hits_floor_within_range() {
        let terrain = Terrain::flat();
        let hit = terrain.raycast(Vec3::new(3.0, 1.0, -2.0), Vec3::NEG_Y, 1.1);
        assert!((hit.unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn downward_ray_too_short_misses() {
        let terrain = Terrain::flat();
        assert!(terrain.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 1.1).is_none());
    }

    #[test]
    fn nearest_platform_wins() {
        let terrain = Terrain::new(vec![
            Platform::new("low", Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0)),
            Platform::new("high", Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 3.0, 1.0)),
        ]);
        let hit = terrain.raycast(Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y, 20.0);
        assert!((hit.unwrap() - 7.0).abs() < 1e-5);
    }

    #[test]
    fn touching_boxes_do_not_overlap() {
        let p = Platform::new("p", Vec3::ZERO, Vec3::ONE);
        assert!(!p.overlaps(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0)));
        assert!(p.overlaps(Vec3::new(0.5, 0.9, 0.5), Vec3::new(1.0, 2.0, 1.0)));
    }

    #[test]
    fn staged_terraces_rise_in_section_order() {
        let terrain = Terrain::staged();
        let heights: Vec<f32> = terrain.platforms[1..].iter().map(|p| p.max.y).collect();
        assert_eq!(heights.len(), Section::ALL.len());
        assert!(heights.windows(2).all(|w| w[0] < w[1]));
    }
}
