use crate::collision::BodyHandle;
use crate::geometry::{Aabb, Circle};
use crate::math::{Rot2, Vec2};

/// Debug tag recording how far a body made it through the pipeline
/// during the last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionState {
    /// Not part of any candidate pair
    NotColliding,
    /// Part of a candidate pair, not confirmed
    BroadPhase,
    /// Part of a confirmed contact
    NarrowPhase,
}

impl Default for CollisionState {
    fn default() -> Self {
        CollisionState::NotColliding
    }
}

/// A convex polygon rigid body.
///
/// Local vertices are stored counter-clockwise; world-space points and
/// edge normals are cached and recomputed by [`RigidPolygon::sync`] after
/// the transform changes. The world never reads a stale cache: every
/// mutation of position or rotation marks the body dirty and the step
/// pipeline syncs before detection.
#[derive(Debug, Clone)]
pub struct RigidPolygon {
    /// Handle of this body in the world's arena
    pub handle: BodyHandle,

    /// Convex hull vertices in local space, counter-clockwise
    local_points: Vec<Vec2>,
    /// Radius of the smallest origin-centered circle containing the hull
    local_radius: f32,

    // Transform
    /// Position in world space
    pub position: Vec2,
    /// Rotation
    pub rotation: Rot2,

    // Velocities
    /// Linear velocity
    pub linear_velocity: Vec2,
    /// Angular velocity in radians per second
    pub angular_velocity: f32,

    // Mass properties
    /// Inverse mass (0 for static)
    pub inv_mass: f32,
    /// Inverse moment of inertia about the center (0 for static)
    pub inv_inertia: f32,

    /// Pipeline debug tag, reset at the start of each broad phase
    pub collision_state: CollisionState,

    // World-space caches
    world_points: Vec<Vec2>,
    world_normals: Vec<Vec2>,
    dirty: bool,
}

impl RigidPolygon {
    /// Creates a unit-density body from counter-clockwise convex vertices.
    ///
    /// # Panics
    /// Panics if fewer than three vertices are given or if they do not
    /// form a counter-clockwise convex hull.
    pub fn new(local_points: Vec<Vec2>) -> Self {
        assert!(
            local_points.len() >= 3,
            "a polygon needs at least three vertices"
        );
        assert!(
            is_ccw_convex(&local_points),
            "polygon vertices must be convex and counter-clockwise"
        );

        let n = local_points.len();
        let local_radius = Circle::enclosing(Vec2::ZERO, &local_points).radius;
        let mut body = Self {
            handle: BodyHandle::INVALID,
            local_points,
            local_radius,
            position: Vec2::ZERO,
            rotation: Rot2::IDENTITY,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            inv_mass: 0.0,
            inv_inertia: 0.0,
            collision_state: CollisionState::NotColliding,
            world_points: vec![Vec2::ZERO; n],
            world_normals: vec![Vec2::ZERO; n],
            dirty: true,
        };
        body.set_density(1.0);
        body.sync();
        body
    }

    /// Creates an axis-aligned rectangle centered on the local origin
    pub fn rect(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ])
    }

    /// Sets the position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.set_position(position);
        self.sync();
        self
    }

    /// Sets the rotation from an angle in radians
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.set_rotation(Rot2::from_angle(angle));
        self.sync();
        self
    }

    /// Sets the density; 0 makes the body static
    pub fn with_density(mut self, density: f32) -> Self {
        self.set_density(density);
        self
    }

    /// Sets the linear velocity
    pub fn with_linear_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Sets the angular velocity
    pub fn with_angular_velocity(mut self, velocity: f32) -> Self {
        self.angular_velocity = velocity;
        self
    }

    /// Recomputes inverse mass and inverse inertia from `density`.
    ///
    /// A density of zero (or less) makes the body static: infinite mass,
    /// infinite inertia, and the solvers leave it untouched.
    pub fn set_density(&mut self, density: f32) {
        if density <= 0.0 {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
            return;
        }
        let (area, second_moment) = polygon_integrals(&self.local_points);
        self.inv_mass = 1.0 / (density * area);
        self.inv_inertia = 1.0 / (density * second_moment);
    }

    /// Returns true if this body never moves
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inv_mass <= 0.0
    }

    /// Local-space vertices, counter-clockwise
    #[inline]
    pub fn local_points(&self) -> &[Vec2] {
        &self.local_points
    }

    /// World-space vertices; the body must be synced
    #[inline]
    pub fn world_points(&self) -> &[Vec2] {
        debug_assert!(!self.dirty, "reading world points of an unsynced body");
        &self.world_points
    }

    /// Outward world-space edge normals; normal `i` belongs to the edge
    /// from vertex `i` to vertex `i + 1`
    #[inline]
    pub fn world_normals(&self) -> &[Vec2] {
        debug_assert!(!self.dirty, "reading world normals of an unsynced body");
        &self.world_normals
    }

    /// Moves the body and marks the caches stale
    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    /// Translates the body and marks the caches stale
    #[inline]
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
        self.dirty = true;
    }

    /// Rotates the body and marks the caches stale
    #[inline]
    pub fn set_rotation(&mut self, rotation: Rot2) {
        self.rotation = rotation;
        self.dirty = true;
    }

    /// Recomputes the world-space vertex and normal caches.
    ///
    /// Cheap when the transform has not changed since the last call.
    pub fn sync(&mut self) {
        if !self.dirty {
            return;
        }
        let n = self.local_points.len();
        for i in 0..n {
            self.world_points[i] = self.position + self.rotation * self.local_points[i];
        }
        for i in 0..n {
            let edge = self.world_points[(i + 1) % n] - self.world_points[i];
            // CCW winding makes the clockwise perpendicular point outward
            self.world_normals[i] = Vec2::new(edge.y, -edge.x).normalize();
        }
        self.dirty = false;
    }

    /// Tight world-space AABB; the body must be synced
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.world_points())
    }

    /// Position-centered world-space bounding circle.
    ///
    /// Rotation-invariant, so it stays valid without a sync.
    #[inline]
    pub fn bounding_circle(&self) -> Circle {
        Circle::new(self.position, self.local_radius)
    }

    /// Returns true when the world-space point lies inside the polygon
    pub fn contains_point(&self, point: Vec2) -> bool {
        let points = self.world_points();
        let n = points.len();
        for i in 0..n {
            let edge = points[(i + 1) % n] - points[i];
            if edge.cross(point - points[i]) < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Checks that the vertices wind counter-clockwise and every turn is convex
fn is_ccw_convex(points: &[Vec2]) -> bool {
    let n = points.len();
    for i in 0..n {
        let e1 = points[(i + 1) % n] - points[i];
        let e2 = points[(i + 2) % n] - points[(i + 1) % n];
        if e1.cross(e2) <= 0.0 {
            return false;
        }
    }
    true
}

/// Area and second moment of area about the local origin, via the
/// standard shoelace decomposition into origin-anchored triangles.
fn polygon_integrals(points: &[Vec2]) -> (f32, f32) {
    let n = points.len();
    let mut area = 0.0;
    let mut second_moment = 0.0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let cross = p1.cross(p2);
        area += cross;
        second_moment += cross * (p1.dot(p1) + p1.dot(p2) + p2.dot(p2));
    }
    (area * 0.5, second_moment / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn unit_square() -> RigidPolygon {
        RigidPolygon::rect(1.0, 1.0)
    }

    #[test]
    fn test_mass_properties_of_unit_square() {
        let body = unit_square();
        // Unit density, unit area
        assert_relative_eq!(body.inv_mass, 1.0, epsilon = 1e-6);
        // I = m (w² + h²) / 12 = 1/6
        assert_relative_eq!(body.inv_inertia, 6.0, epsilon = 1e-4);
    }

    #[test]
    fn test_density_zero_is_static() {
        let body = unit_square().with_density(0.0);
        assert!(body.is_static());
        assert_eq!(body.inv_mass, 0.0);
        assert_eq!(body.inv_inertia, 0.0);
    }

    #[test]
    fn test_world_points_follow_transform() {
        let mut body = unit_square().with_position(Vec2::new(2.0, 0.0));
        body.set_rotation(Rot2::from_angle(FRAC_PI_2));
        body.sync();

        // Local (0.5, -0.5) rotates to (0.5, 0.5), then translates
        let p = body.world_points()[1];
        assert_relative_eq!(p.x, 2.5, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_normals_point_outward() {
        let body = unit_square();
        for (i, &normal) in body.world_normals().iter().enumerate() {
            let points = body.world_points();
            let mid = (points[i] + points[(i + 1) % 4]) * 0.5;
            // Moving along the normal from an edge midpoint leaves the polygon
            assert!(!body.contains_point(mid + normal * 0.1));
            assert!(body.contains_point(mid - normal * 0.1));
            assert!(normal.is_normalized());
        }
    }

    #[test]
    fn test_contains_point() {
        let body = unit_square().with_position(Vec2::new(1.0, 1.0));
        assert!(body.contains_point(Vec2::new(1.0, 1.0)));
        assert!(body.contains_point(Vec2::new(1.4, 1.4)));
        assert!(!body.contains_point(Vec2::new(1.6, 1.0)));
        assert!(!body.contains_point(Vec2::ZERO));
    }

    #[test]
    fn test_bounds() {
        let body = unit_square().with_position(Vec2::new(3.0, -1.0));
        let aabb = body.aabb();
        assert_eq!(aabb.min, Vec2::new(2.5, -1.5));
        assert_eq!(aabb.max, Vec2::new(3.5, -0.5));

        let circle = body.bounding_circle();
        assert_eq!(circle.center, Vec2::new(3.0, -1.0));
        assert_relative_eq!(circle.radius, 0.5f32.sqrt(), epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "counter-clockwise")]
    fn test_clockwise_winding_panics() {
        let _ = RigidPolygon::new(vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(-0.5, 0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.5, -0.5),
        ]);
    }
}
