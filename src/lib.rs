//! # collide2d
//!
//! A 2D rigid-polygon collision detection and resolution pipeline.
//!
//! ## Features
//!
//! - **Rigid Polygon Bodies**: convex polygons with density-derived mass
//!   and inertia, explicit Euler integration
//! - **Broad Phase**: six interchangeable strategies (brute force,
//!   bounding volume, spatial hash grid, sweep-and-prune, dynamic AABB
//!   tree, quad tree), swappable at runtime
//! - **Narrow Phase**: separating axis test by default, GJK + EPA as a
//!   selectable alternate
//! - **Constraint Solver**: iterative position correction plus
//!   impulse-based velocity response with Coulomb friction
//!
//! ## Quick Start
//!
//! ```rust
//! use collide2d::prelude::*;
//!
//! let mut world = World::new(WorldConfig {
//!     gravity: Vec2::new(0.0, -9.81),
//!     floor_y: Some(-4.0),
//!     ..WorldConfig::default()
//! });
//!
//! // A static floor slab and a falling box
//! let _floor = world.add_body(
//!     RigidPolygon::rect(20.0, 1.0)
//!         .with_position(Vec2::new(0.0, -3.0))
//!         .with_density(0.0),
//! );
//! let falling = world.add_body(RigidPolygon::rect(1.0, 1.0).with_position(Vec2::new(0.0, 5.0)));
//!
//! let dt = 1.0 / 60.0;
//! for _ in 0..600 {
//!     world.step(dt);
//! }
//! let body = world.body(falling).unwrap();
//! assert!(body.position.y > -3.0);
//! ```

pub mod collision;
pub mod dynamics;
pub mod geometry;
pub mod math;
pub mod solver;
mod world;

pub use world::{World, WorldConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::broad_phase::{BroadPhase, BroadPhaseKind};
    pub use crate::collision::narrow_phase::NarrowPhaseKind;
    pub use crate::collision::{BodyHandle, Contact, ContactPair};
    pub use crate::dynamics::{CollisionState, RigidPolygon};
    pub use crate::geometry::{Aabb, Circle};
    pub use crate::math::{Rot2, Vec2};
    pub use crate::solver::SolverConfig;
    pub use crate::world::{World, WorldConfig};
}
