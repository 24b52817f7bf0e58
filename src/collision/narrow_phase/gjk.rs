//! Boolean overlap test on the Minkowski difference.

use crate::math::Vec2;

/// Index of the farthest point along `dir`
pub(super) fn farthest_index(points: &[Vec2], dir: Vec2) -> usize {
    let mut best = 0;
    let mut best_proj = points[0].dot(dir);
    for (i, &p) in points.iter().enumerate().skip(1) {
        let proj = p.dot(dir);
        if proj > best_proj {
            best_proj = proj;
            best = i;
        }
    }
    best
}

/// Support point of the Minkowski difference `a - b` along `dir`
pub(super) fn support(a: &[Vec2], b: &[Vec2], dir: Vec2) -> Vec2 {
    a[farthest_index(a, dir)] - b[farthest_index(b, -dir)]
}

/// Perpendicular of `ab` pointing toward the origin
fn line_normal_to_origin(a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let n = Vec2::triple_product(ab, -a, ab);
    if n.is_near_zero(1e-6) {
        // Origin on the line: either perpendicular works
        ab.perp()
    } else {
        n
    }
}

/// Walks a triangle simplex toward the origin.
///
/// Returns the final triangle containing the origin when the shapes
/// overlap (EPA seeds its polytope from it), or `None` when a support
/// point fails to reach past the origin.
pub(super) fn intersect(a: &[Vec2], b: &[Vec2]) -> Option<[Vec2; 3]> {
    let mut dir = Vec2::X;
    let p1 = support(a, b, dir);
    let p2 = support(a, b, -dir);

    dir = line_normal_to_origin(p1, p2);
    let mut triangle = [support(a, b, dir), p1, p2];

    loop {
        // The newest vertex must pass the origin along the direction
        // that produced it
        if triangle[0].dot(dir) < 0.0 {
            return None;
        }

        let [ta, tb, tc] = triangle;
        let ab = tb - ta;
        let ac = tc - ta;
        let to_origin = -ta;

        // Perpendiculars of AB and AC facing away from the triangle
        let n_ab = Vec2::triple_product(ac, ab, ab);
        if n_ab.dot(to_origin) > 0.0 {
            dir = n_ab;
            triangle = [support(a, b, dir), ta, tb];
            continue;
        }
        let n_ac = Vec2::triple_product(ab, ac, ac);
        if n_ac.dot(to_origin) > 0.0 {
            dir = n_ac;
            triangle = [support(a, b, dir), ta, tc];
            continue;
        }

        // Not beyond any edge: the origin is inside
        return Some(triangle);
    }
}

/// Convenience boolean form
pub fn overlaps(a: &[Vec2], b: &[Vec2]) -> bool {
    intersect(a, b).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::RigidPolygon;

    fn square_points(x: f32, y: f32) -> Vec<Vec2> {
        RigidPolygon::rect(1.0, 1.0)
            .with_position(Vec2::new(x, y))
            .world_points()
            .to_vec()
    }

    #[test]
    fn test_overlap_and_miss() {
        let a = square_points(0.0, 0.0);
        assert!(overlaps(&a, &square_points(0.5, 0.3)));
        assert!(!overlaps(&a, &square_points(3.0, 0.0)));
        assert!(!overlaps(&a, &square_points(0.0, -5.0)));
    }

    #[test]
    fn test_containment_is_overlap() {
        let big = RigidPolygon::rect(4.0, 4.0).world_points().to_vec();
        let small = square_points(0.2, -0.1);
        assert!(overlaps(&big, &small));
        assert!(overlaps(&small, &big));
    }

    #[test]
    fn test_diagonal_near_miss() {
        let a = square_points(0.0, 0.0);
        let b = square_points(1.2, 1.2);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_final_triangle_contains_origin() {
        let a = square_points(0.0, 0.0);
        let b = square_points(0.4, 0.1);
        let tri = intersect(&a, &b).unwrap();

        // Origin inside the triangle: same side of every edge
        let sign = |p1: Vec2, p2: Vec2| (p2 - p1).cross(-p1);
        let s0 = sign(tri[0], tri[1]);
        let s1 = sign(tri[1], tri[2]);
        let s2 = sign(tri[2], tri[0]);
        assert!(s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0 || s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0);
    }
}
