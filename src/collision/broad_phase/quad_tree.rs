use rustc_hash::FxHashMap;

use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::Aabb;
use crate::math::Vec2;

const NULL_NODE: u32 = u32::MAX;

#[derive(Debug, Clone)]
struct QuadNode {
    quadrants: [Aabb; 4],
    children: [u32; 4],
    elements: Vec<BodyHandle>,
    parent: u32,
    depth_left: u8,
}

impl QuadNode {
    fn new(bounds: Aabb, depth_left: u8, parent: u32) -> Self {
        let min = bounds.min;
        let max = bounds.max;
        let mid = bounds.center();
        Self {
            quadrants: [
                Aabb::new(Vec2::new(min.x, mid.y), Vec2::new(mid.x, max.y)),
                Aabb::new(min, mid),
                Aabb::new(Vec2::new(mid.x, min.y), Vec2::new(max.x, mid.y)),
                Aabb::new(mid, max),
            ],
            children: [NULL_NODE; 4],
            elements: Vec::new(),
            parent,
            depth_left,
        }
    }

    fn has_children(&self) -> bool {
        self.children.iter().any(|&c| c != NULL_NODE)
    }
}

/// Quad tree over a fixed world bound, subdivided lazily to a bounded
/// depth.
///
/// A body whose AABB overlaps more than one quadrant is stored at the
/// lowest common ancestor instead of being duplicated. Pair enumeration
/// at a node pairs its own elements with each other, crosses them against
/// every descendant's elements, then recurses.
#[derive(Debug)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    free_list: Vec<u32>,
    root: u32,
    bounds: Aabb,
    /// Body -> node currently holding it
    locations: FxHashMap<BodyHandle, u32>,
}

impl QuadTree {
    pub fn new(bounds: Aabb, max_depth: u8) -> Self {
        Self {
            nodes: vec![QuadNode::new(bounds, max_depth, NULL_NODE)],
            free_list: Vec::new(),
            root: 0,
            bounds,
            locations: FxHashMap::default(),
        }
    }

    /// Files the body at the deepest node whose quadrant fully claims it.
    ///
    /// # Panics
    /// Panics when the AABB cannot be placed, i.e. it escapes the tree's
    /// fixed world bounds.
    fn insert(&mut self, handle: BodyHandle, aabb: Aabb) {
        assert!(
            self.bounds.intersects(aabb),
            "quad tree bounds exceeded by body {:?}",
            handle
        );
        let node = self.insert_from(self.root, handle, aabb);
        let node = node.unwrap_or_else(|| panic!("quad tree cannot place body {:?}", handle));
        self.locations.insert(handle, node);
    }

    fn insert_from(&mut self, node: u32, handle: BodyHandle, aabb: Aabb) -> Option<u32> {
        if self.nodes[node as usize].depth_left == 0 {
            self.nodes[node as usize].elements.push(handle);
            return Some(node);
        }

        let mut hit: Option<usize> = None;
        let quadrants = self.nodes[node as usize].quadrants;
        for (q, quadrant) in quadrants.iter().enumerate() {
            if quadrant.intersects(aabb) {
                if hit.is_some() {
                    // Straddles a subdivision line: lowest common ancestor
                    self.nodes[node as usize].elements.push(handle);
                    return Some(node);
                }
                hit = Some(q);
            }
        }

        let q = hit?;
        let child = self.child_or_create(node, q);
        self.insert_from(child, handle, aabb)
    }

    fn child_or_create(&mut self, node: u32, quadrant: usize) -> u32 {
        let existing = self.nodes[node as usize].children[quadrant];
        if existing != NULL_NODE {
            return existing;
        }
        let bounds = self.nodes[node as usize].quadrants[quadrant];
        let depth_left = self.nodes[node as usize].depth_left - 1;
        let child = self.allocate(QuadNode::new(bounds, depth_left, node));
        self.nodes[node as usize].children[quadrant] = child;
        child
    }

    fn remove(&mut self, handle: BodyHandle) {
        let Some(node) = self.locations.remove(&handle) else {
            return;
        };
        self.nodes[node as usize].elements.retain(|&h| h != handle);
        self.prune(node);
    }

    /// Frees empty childless nodes bottom-up
    fn prune(&mut self, node: u32) {
        let n = &self.nodes[node as usize];
        if n.parent == NULL_NODE || !n.elements.is_empty() || n.has_children() {
            return;
        }
        let parent = n.parent;
        for slot in self.nodes[parent as usize].children.iter_mut() {
            if *slot == node {
                *slot = NULL_NODE;
            }
        }
        self.free_list.push(node);
        self.prune(parent);
    }

    fn allocate(&mut self, node: QuadNode) -> u32 {
        if let Some(index) = self.free_list.pop() {
            self.nodes[index as usize] = node;
            index
        } else {
            let index = self.nodes.len() as u32;
            self.nodes.push(node);
            index
        }
    }

    fn add_pairs(&self, node: u32, pairs: &mut Vec<ContactPair>) {
        let elements = &self.nodes[node as usize].elements;
        for i in 0..elements.len() {
            for j in i + 1..elements.len() {
                pairs.push(ContactPair::new(elements[i], elements[j]));
            }
        }

        for &child in &self.nodes[node as usize].children {
            if child != NULL_NODE {
                self.cross_pairs(node, child, pairs);
            }
        }
        for &child in &self.nodes[node as usize].children {
            if child != NULL_NODE {
                self.add_pairs(child, pairs);
            }
        }
    }

    /// Pairs `node`'s own elements against every element in the subtree
    /// rooted at `sub`
    fn cross_pairs(&self, node: u32, sub: u32, pairs: &mut Vec<ContactPair>) {
        for &a in &self.nodes[node as usize].elements {
            for &b in &self.nodes[sub as usize].elements {
                pairs.push(ContactPair::new(a, b));
            }
        }
        for &child in &self.nodes[sub as usize].children {
            if child != NULL_NODE {
                self.cross_pairs(node, child, pairs);
            }
        }
    }
}

impl BroadPhase for QuadTree {
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.insert(handle, bounds.aabb);
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        self.remove(handle);
    }

    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.remove(handle);
        self.insert(handle, bounds.aabb);
    }

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        self.add_pairs(self.root, pairs);
    }

    fn name(&self) -> &'static str {
        "quad tree"
    }
}
