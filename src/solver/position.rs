//! Positional overlap correction.

use log::trace;

use super::{pair_mut, SolverConfig};
use crate::collision::narrow_phase::sat;
use crate::collision::Contact;
use crate::dynamics::RigidPolygon;

/// Pushes overlapping bodies apart along the contact normal, leaving
/// velocities untouched.
///
/// Each iteration re-measures the pair's penetration with the quick
/// single-axis re-test (both bodies may have moved since the full test),
/// then moves the bodies along the normal by a damped fraction of the
/// remaining depth, split proportionally to each body's inverse mass.
/// Rotation is deliberately not corrected; the stored axis stays valid
/// because of it.
pub fn solve(
    bodies: &mut [Option<RigidPolygon>],
    contacts: &mut [Contact],
    config: &SolverConfig,
) {
    for _ in 0..config.position_iterations {
        for contact in contacts.iter_mut() {
            if contact.inv_mass_sum <= 0.0 {
                // Two static bodies, nothing can move
                continue;
            }

            let (a, b) = pair_mut(bodies, contact.pair);
            a.sync();
            b.sync();

            let Some((point, depth)) = sat::quick_test(a, b, contact.normal) else {
                continue;
            };
            contact.point = point;
            contact.depth = depth;

            if depth <= config.slop {
                continue;
            }

            let correction = (depth - config.slop) * config.steering / contact.inv_mass_sum;
            if !a.is_static() {
                a.translate(-contact.normal * (correction * a.inv_mass));
            }
            if !b.is_static() {
                b.translate(contact.normal * (correction * b.inv_mass));
            }
            trace!(
                "position pass: pair {:?}/{:?} depth {depth}",
                contact.pair.a,
                contact.pair.b
            );
        }
    }

    // Leave every touched body synced for the velocity pass
    for contact in contacts.iter() {
        let (a, b) = pair_mut(bodies, contact.pair);
        a.sync();
        b.sync();
    }
}
