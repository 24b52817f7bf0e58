//! Hand-rolled 2D math value types.

mod rot2;
mod vec2;

pub use rot2::Rot2;
pub use vec2::Vec2;
