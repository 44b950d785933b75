//! Content sections and where their terraces sit in the world.

use crate::state::CameraAnimationTarget;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    About,
    Skills,
    Projects,
    Experience,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::About,
        Section::Skills,
        Section::Projects,
        Section::Experience,
        Section::Contact,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Section::About => "about",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Experience => "experience",
            Section::Contact => "contact",
        }
    }

    /// Section bound to navigation slot `index` (0-based).
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Centre of the terrace's top face.
    #[must_use]
    pub fn stage_top(self) -> Vec3 {
        match self {
            Section::About => Vec3::new(0.0, 2.0, -18.0),
            Section::Skills => Vec3::new(20.0, 6.0, -30.0),
            Section::Projects => Vec3::new(-20.0, 12.0, -42.0),
            Section::Experience => Vec3::new(18.0, 20.0, -50.0),
            Section::Contact => Vec3::new(0.0, 30.0, -50.0),
        }
    }

    #[must_use]
    pub fn stage_half_extent(self) -> f32 {
        match self {
            Section::Projects => 7.0,
            _ => 6.0,
        }
    }

    /// Camera pose used when navigating to this section: above and in front of
    /// the terrace, looking at its surface.
    #[must_use]
    pub fn framing(self) -> CameraAnimationTarget {
        let top = self.stage_top();
        CameraAnimationTarget {
            position: top + Vec3::new(0.0, 8.0, 16.0),
            look_at: Some(top + Vec3::Y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_slots_cover_every_section() {
        for (i, s) in Section::ALL.iter().enumerate() {
            assert_eq!(Section::from_index(i), Some(*s));
        }
        assert_eq!(Section::from_index(5), None);
    }

    #[test]
    fn framing_looks_at_terrace() {
        let f = Section::Skills.framing();
        assert_eq!(f.look_at, Some(Section::Skills.stage_top() + Vec3::Y));
        assert!(f.position.y > Section::Skills.stage_top().y);
    }
}
