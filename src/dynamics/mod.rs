//! Rigid bodies and their mass properties.

mod rigid_body;

pub use rigid_body::{CollisionState, RigidPolygon};
