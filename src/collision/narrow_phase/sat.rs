//! Separating axis test over the edge normals of both polygons.

use super::Penetration;
use crate::dynamics::RigidPolygon;
use crate::math::Vec2;

/// Vertices projecting within this tolerance of the extreme are treated
/// as tied, turning a vertex contact into an edge contact.
const FARTHEST_TOLERANCE: f32 = 1e-3;

/// Projects the points onto `axis`, returning the (min, max) interval
fn project(points: &[Vec2], axis: Vec2) -> (f32, f32) {
    let mut min = points[0].dot(axis);
    let mut max = min;
    for &p in &points[1..] {
        let v = p.dot(axis);
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// All vertices within tolerance of the farthest projection along `dir`
fn farthest_points(points: &[Vec2], dir: Vec2, out: &mut Vec<Vec2>) {
    out.clear();
    let mut best = f32::MIN;
    for &p in points {
        let proj = p.dot(dir);
        if proj > best + FARTHEST_TOLERANCE {
            out.clear();
            out.push(p);
            best = proj;
        } else if proj > best - FARTHEST_TOLERANCE {
            out.push(p);
        }
    }
}

/// Picks the representative contact point for a confirmed overlap.
///
/// A unique deepest vertex of either polygon is the point (shifted onto
/// the other's surface when it comes from the second polygon). When both
/// sides have tied-farthest vertices the contact is edge-edge, and the
/// point is the midpoint of the overlap interval along the tangent, a
/// deterministic tie-break that keeps the point stable across frames.
fn collision_point(a: &RigidPolygon, b: &RigidPolygon, normal: Vec2, depth: f32) -> Vec2 {
    let mut deepest_a = Vec::new();
    farthest_points(a.world_points(), normal, &mut deepest_a);
    let mut deepest_b = Vec::new();
    farthest_points(b.world_points(), -normal, &mut deepest_b);

    if deepest_a.len() == 1 {
        return deepest_a[0];
    }
    if deepest_b.len() == 1 {
        return deepest_b[0] + normal * depth;
    }

    let tangent = normal.perp();
    let mid_on = |axis: Vec2| {
        let (min_a, max_a) = project(a.world_points(), axis);
        let (min_b, max_b) = project(b.world_points(), axis);
        let lo = min_a.max(min_b);
        let hi = max_a.min(max_b);
        lo + (hi - lo) * 0.5
    };
    tangent * mid_on(tangent) + normal * mid_on(normal)
}

/// Full separating axis test.
///
/// Returns `None` as soon as any edge normal separates the projections.
/// Otherwise the axis of minimum overlap becomes the contact normal,
/// sign-corrected with the center-to-center vector so it always points
/// from `a` toward `b` even when several parallel edges share the axis.
pub fn test(a: &RigidPolygon, b: &RigidPolygon) -> Option<Penetration> {
    let mut smallest_overlap = f32::MAX;
    let mut best_axis = Vec2::ZERO;

    for axis_source in [a.world_normals(), b.world_normals()] {
        for &axis in axis_source {
            let (min_a, max_a) = project(a.world_points(), axis);
            let (min_b, max_b) = project(b.world_points(), axis);

            if !(max_a > min_b && max_b > min_a) {
                return None;
            }

            let overlap = max_a.min(max_b) - min_a.max(min_b);
            if overlap < smallest_overlap {
                smallest_overlap = overlap;
                best_axis = axis;
                if (a.position - b.position).dot(best_axis) > 0.0 {
                    best_axis = -best_axis;
                }
            }
        }
    }

    Some(Penetration {
        point: collision_point(a, b, best_axis, smallest_overlap),
        normal: best_axis,
        depth: smallest_overlap,
    })
}

/// Re-validates a single known axis without enumerating all normals.
///
/// Valid only while neither body has rotated since the full test that
/// produced `axis`; used by the position solver to re-measure penetration
/// cheaply every iteration. The axis keeps its original orientation.
pub fn quick_test(a: &RigidPolygon, b: &RigidPolygon, axis: Vec2) -> Option<(Vec2, f32)> {
    debug_assert!(axis.is_normalized());

    let (min_a, max_a) = project(a.world_points(), axis);
    let (min_b, max_b) = project(b.world_points(), axis);

    if !(max_a > min_b && max_b > min_a) {
        return None;
    }

    let overlap = max_a.min(max_b) - min_a.max(min_b);
    Some((collision_point(a, b, axis, overlap), overlap))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_at(x: f32, y: f32) -> RigidPolygon {
        RigidPolygon::rect(1.0, 1.0).with_position(Vec2::new(x, y))
    }

    #[test]
    fn test_separated_squares() {
        let a = square_at(0.0, 0.0);
        let b = square_at(3.0, 0.0);
        assert!(test(&a, &b).is_none());
    }

    #[test]
    fn test_touching_faces_do_not_collide() {
        // Sharing a face exactly is not an overlap under the strict
        // projection test
        let a = square_at(0.0, 0.0);
        let b = square_at(1.0, 0.0);
        assert!(test(&a, &b).is_none());
    }

    #[test]
    fn test_half_overlapping_squares() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.5, 0.0);
        let hit = test(&a, &b).unwrap();
        assert_relative_eq!(hit.depth, 0.5, epsilon = 1e-6);
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_two_by_two_squares() {
        let a = RigidPolygon::rect(2.0, 2.0);
        let far = RigidPolygon::rect(2.0, 2.0).with_position(Vec2::new(3.0, 0.0));
        assert!(test(&a, &far).is_none());

        let near = RigidPolygon::rect(2.0, 2.0).with_position(Vec2::new(1.0, 0.0));
        let hit = test(&a, &near).unwrap();
        assert_relative_eq!(hit.depth, 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal.x.abs(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.normal.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_points_from_a_to_b() {
        let a = square_at(0.5, 0.0);
        let b = square_at(0.0, 0.0);
        let hit = test(&a, &b).unwrap();
        // B is to the left of A
        assert_relative_eq!(hit.normal.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_commutativity() {
        let a = square_at(0.0, 0.1);
        let b = square_at(0.7, 0.3);

        let ab = test(&a, &b).unwrap();
        let ba = test(&b, &a).unwrap();

        assert_relative_eq!(ab.depth, ba.depth, epsilon = 1e-6);
        assert_relative_eq!(ab.normal.x, -ba.normal.x, epsilon = 1e-6);
        assert_relative_eq!(ab.normal.y, -ba.normal.y, epsilon = 1e-6);
    }

    #[test]
    fn test_vertex_contact_point() {
        // Rotate B 45 degrees so one corner pokes into A's right face
        let a = square_at(0.0, 0.0);
        let b = RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(1.0, 0.0))
            .with_angle(std::f32::consts::FRAC_PI_4);

        let hit = test(&a, &b).unwrap();
        // The penetrating feature is B's left corner
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-5);
        let expected_depth = 0.5 - (1.0 - std::f32::consts::FRAC_1_SQRT_2);
        assert_relative_eq!(hit.depth, expected_depth, epsilon = 1e-5);
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_edge_edge_midpoint_tie_break() {
        let a = square_at(0.0, 0.0);
        let b = square_at(0.8, 0.2);

        let hit = test(&a, &b).unwrap();
        // Overlap strip on x is [0.3, 0.5], on y it is [-0.3, 0.5]
        assert_relative_eq!(hit.normal.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(hit.point.x, 0.4, epsilon = 1e-5);
        assert_relative_eq!(hit.point.y, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn test_quick_test_tracks_shrinking_overlap() {
        let a = square_at(0.0, 0.0);
        let mut b = square_at(0.5, 0.0);
        let full = test(&a, &b).unwrap();

        b.set_position(Vec2::new(0.8, 0.0));
        b.sync();
        let (_, depth) = quick_test(&a, &b, full.normal).unwrap();
        assert_relative_eq!(depth, 0.2, epsilon = 1e-6);

        b.set_position(Vec2::new(2.0, 0.0));
        b.sync();
        assert!(quick_test(&a, &b, full.normal).is_none());
    }
}
