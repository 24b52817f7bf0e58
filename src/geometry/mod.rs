//! Geometric primitives shared by the broad and narrow phases.

mod aabb;
mod circle;

pub use aabb::Aabb;
pub use circle::Circle;
