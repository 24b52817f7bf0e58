use crate::math::Vec2;

/// A handle identifying a body in the world's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

impl BodyHandle {
    /// Invalid/null body handle
    pub const INVALID: Self = Self(u32::MAX);

    /// Creates a new body handle
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the arena index of this handle
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns true if this handle is valid
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for BodyHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// An unordered candidate pair of bodies, canonicalized so that
/// `(a, b)` and `(b, a)` compare and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContactPair {
    /// First body (always the smaller handle)
    pub a: BodyHandle,
    /// Second body (always the larger handle)
    pub b: BodyHandle,
}

impl ContactPair {
    /// Creates a canonical pair.
    ///
    /// # Panics
    /// Panics if both handles refer to the same body; a self-pair is a
    /// programmer error that would corrupt the solver.
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        assert!(a != b, "ContactPair: a body cannot pair with itself");
        if a.0 <= b.0 {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// A confirmed contact produced by the narrow phase.
///
/// The normal points from body `pair.a` toward body `pair.b`; the depth is
/// the minimum translation along the normal that separates the bodies.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// The colliding pair, canonically ordered
    pub pair: ContactPair,
    /// Representative contact point in world space
    pub point: Vec2,
    /// Unit contact normal, from A toward B
    pub normal: Vec2,
    /// Penetration depth along the normal (positive when overlapping)
    pub depth: f32,
    /// Sum of the two bodies' inverse masses, cached once per step for
    /// reuse by both solver passes
    pub inv_mass_sum: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_canonical_ordering() {
        let p1 = ContactPair::new(BodyHandle::new(1), BodyHandle::new(2));
        let p2 = ContactPair::new(BodyHandle::new(2), BodyHandle::new(1));

        assert_eq!(p1, p2);
        assert_eq!(p1.a, BodyHandle::new(1));
        assert_eq!(p1.b, BodyHandle::new(2));
    }

    #[test]
    #[should_panic(expected = "pair with itself")]
    fn test_self_pair_panics() {
        let h = BodyHandle::new(3);
        let _ = ContactPair::new(h, h);
    }

    #[test]
    fn test_pair_hashes_identically() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |pair: ContactPair| {
            let mut hasher = DefaultHasher::new();
            pair.hash(&mut hasher);
            hasher.finish()
        };

        let p1 = ContactPair::new(BodyHandle::new(7), BodyHandle::new(4));
        let p2 = ContactPair::new(BodyHandle::new(4), BodyHandle::new(7));
        assert_eq!(hash(p1), hash(p2));
    }
}
