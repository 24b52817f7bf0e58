//! Contact resolution: a position-correction pass and an impulse-based
//! velocity-response pass, both consuming the world's confirmed contact
//! list.

pub mod position;
pub mod velocity;

use crate::collision::ContactPair;
use crate::dynamics::RigidPolygon;

/// Tunables shared by both solver passes.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Fraction of the remaining penetration corrected per position
    /// iteration
    pub steering: f32,
    /// Position-correction iterations per step
    pub position_iterations: u32,
    /// Penetration depth below which no correction is applied
    pub slop: f32,
    /// Restitution coefficient (0 = inelastic, 1 = elastic)
    pub restitution: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            steering: 0.2,
            position_iterations: 2,
            slop: 0.0,
            restitution: 0.6,
            friction: 0.1,
        }
    }
}

/// Mutable access to both bodies of a pair.
///
/// The pair's canonical ordering guarantees `a < b`, which makes the
/// split borrow safe. Handles must refer to live arena slots.
pub(crate) fn pair_mut<'a>(
    bodies: &'a mut [Option<RigidPolygon>],
    pair: ContactPair,
) -> (&'a mut RigidPolygon, &'a mut RigidPolygon) {
    let (ia, ib) = (pair.a.index(), pair.b.index());
    debug_assert!(ia < ib);
    let (head, tail) = bodies.split_at_mut(ib);
    let a = head[ia].as_mut();
    let b = tail[0].as_mut();
    match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => panic!("contact refers to a removed body"),
    }
}
