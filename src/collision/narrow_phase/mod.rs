//! Exact convex-polygon overlap tests.
//!
//! SAT is the default path; GJK seeding EPA is the selectable alternate.
//! Both produce the same class of result and agree within float tolerance
//! on the same input.

pub mod epa;
pub mod gjk;
pub mod sat;

use crate::dynamics::RigidPolygon;
use crate::math::Vec2;

/// Result of a confirmed narrow-phase test.
///
/// The normal is unit length and points from the first polygon toward the
/// second; translating the first polygon by `-normal * depth` separates
/// the two.
#[derive(Debug, Clone, Copy)]
pub struct Penetration {
    /// Representative contact point in world space
    pub point: Vec2,
    /// Unit contact normal, first polygon toward second
    pub normal: Vec2,
    /// Overlap along the normal
    pub depth: f32,
}

/// Which exact test the world runs over candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrowPhaseKind {
    /// Separating axis test
    Sat,
    /// GJK boolean test refined by the expanding polytope algorithm
    GjkEpa,
}

impl Default for NarrowPhaseKind {
    fn default() -> Self {
        NarrowPhaseKind::Sat
    }
}

impl NarrowPhaseKind {
    /// Runs this narrow phase on two synced polygons
    pub fn test(self, a: &RigidPolygon, b: &RigidPolygon) -> Option<Penetration> {
        match self {
            NarrowPhaseKind::Sat => sat::test(a, b),
            NarrowPhaseKind::GjkEpa => epa::test(a, b),
        }
    }
}
