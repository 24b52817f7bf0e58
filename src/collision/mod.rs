//! Collision detection: candidate generation, exact tests, contact data.

pub mod broad_phase;
mod contact;
pub mod narrow_phase;

pub use contact::{BodyHandle, Contact, ContactPair};
