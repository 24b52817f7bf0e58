//! Expanding polytope algorithm, refining a GJK simplex into the
//! penetration normal, depth and contact point.

use super::gjk;
use super::Penetration;
use crate::dynamics::RigidPolygon;
use crate::math::Vec2;

/// Convergence tolerance on the support-point distance
const TOLERANCE: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
struct ClosestEdge {
    /// Index of the edge's first vertex in the polytope
    index: usize,
    /// Outward unit normal
    normal: Vec2,
    /// Distance from the origin to the edge along the normal
    distance: f32,
}

/// Finds the polytope edge closest to the origin.
///
/// The polytope is kept counter-clockwise, so the clockwise
/// perpendicular of each edge is its outward normal.
fn closest_edge(polytope: &[Vec2]) -> ClosestEdge {
    let mut best = ClosestEdge {
        index: 0,
        normal: Vec2::X,
        distance: f32::MAX,
    };

    for i in 0..polytope.len() {
        let p1 = polytope[i];
        let p2 = polytope[(i + 1) % polytope.len()];
        let edge = p2 - p1;

        let Some(normal) = Vec2::new(edge.y, -edge.x).try_normalize() else {
            // Coincident vertices make a zero-length edge; skip it
            continue;
        };

        let distance = normal.dot(p1);
        if distance < best.distance {
            best = ClosestEdge {
                index: i,
                normal,
                distance,
            };
        }
    }

    best
}

/// Picks the witness contact point once the normal has converged.
///
/// The deepest vertex of one polygon against an edge of the other: when
/// an edge incident to `a`'s deepest vertex is perpendicular to the
/// normal, the contact feature of `a` is that edge and the witness vertex
/// comes from `b`; otherwise it is `a`'s vertex itself.
fn contact_point(a: &[Vec2], b: &[Vec2], normal: Vec2) -> Vec2 {
    let ia = gjk::farthest_index(a, normal);
    let ib = gjk::farthest_index(b, -normal);

    let next = a[(ia + 1) % a.len()];
    let prev = a[(ia + a.len() - 1) % a.len()];
    let is_face = |edge: Vec2| edge.dot(normal).abs() < TOLERANCE;

    if is_face(a[ia] - next) || is_face(prev - a[ia]) {
        b[ib]
    } else {
        a[ia]
    }
}

/// GJK followed by EPA.
///
/// Expands the polytope by replacing its closest edge with the support
/// point along that edge's normal until the support point stops getting
/// farther, at which point the edge normal is the penetration normal and
/// its distance the depth. Converges to the same normal/depth class of
/// result as the separating axis test.
pub fn test(a: &RigidPolygon, b: &RigidPolygon) -> Option<Penetration> {
    let pa = a.world_points();
    let pb = b.world_points();

    let triangle = gjk::intersect(pa, pb)?;

    let mut polytope = triangle.to_vec();
    // Wind counter-clockwise so edge normals face outward
    if (polytope[1] - polytope[0]).cross(polytope[2] - polytope[0]) < 0.0 {
        polytope.swap(1, 2);
    }

    loop {
        let edge = closest_edge(&polytope);
        let new_point = gjk::support(pa, pb, edge.normal);
        let distance = new_point.dot(edge.normal);

        if distance - edge.distance < TOLERANCE {
            return Some(Penetration {
                point: contact_point(pa, pb, edge.normal),
                normal: edge.normal,
                depth: edge.distance,
            });
        }

        polytope.insert(edge.index + 1, new_point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_at(x: f32, y: f32) -> RigidPolygon {
        RigidPolygon::rect(1.0, 1.0).with_position(Vec2::new(x, y))
    }

    #[test]
    fn test_axis_aligned_depth_and_normal() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.6, 0.0);

        let hit = test(&a, &b).unwrap();
        assert_relative_eq!(hit.depth, 0.4, epsilon = 1e-3);
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(hit.normal.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_miss_returns_none() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.0, 4.0);
        assert!(test(&a, &b).is_none());
    }

    #[test]
    fn test_vertical_overlap_normal() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.0, 0.7);

        let hit = test(&a, &b).unwrap();
        assert_relative_eq!(hit.depth, 0.3, epsilon = 1e-3);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_grazing_overlap_reports_minimal_depth() {
        // The seed triangle has an edge running through the origin here;
        // the polytope must keep expanding past it instead of settling on
        // that edge's far support distance
        let a = square_at(0.0, 0.0);
        let b = square_at(0.999, 0.0);

        let hit = test(&a, &b).unwrap();
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(hit.depth, 1.0 - 0.999, epsilon = 1e-5);
    }

    #[test]
    fn test_vertex_contact_uses_penetrating_corner() {
        let a = square_at(0.0, 0.0);
        let b = RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(1.0, 0.0))
            .with_angle(std::f32::consts::FRAC_PI_4);

        let hit = test(&a, &b).unwrap();
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-3);
        // The witness point is B's leftmost corner
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(
            hit.point.x,
            1.0 - std::f32::consts::FRAC_1_SQRT_2,
            epsilon = 1e-3
        );
    }
}
