use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};

/// The trivial strategy and the oracle for the others: every pair of
/// registered bodies is a candidate.
///
/// Pairs are built once at insertion time, so adding is O(n) and the
/// query is a copy.
#[derive(Debug, Default)]
pub struct BruteForce {
    handles: Vec<BodyHandle>,
    pairs: Vec<ContactPair>,
}

impl BruteForce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for BruteForce {
    fn on_added(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        for &other in &self.handles {
            self.pairs.push(ContactPair::new(other, handle));
        }
        self.handles.push(handle);
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        self.pairs.retain(|pair| pair.a != handle && pair.b != handle);
        self.handles.retain(|&h| h != handle);
    }

    fn on_updated(&mut self, _handle: BodyHandle, _bounds: &BodyBounds) {}

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        pairs.extend_from_slice(&self.pairs);
    }

    fn name(&self) -> &'static str {
        "brute force"
    }
}
