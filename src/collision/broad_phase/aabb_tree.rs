use super::{BodyBounds, BroadPhase};
use crate::collision::{BodyHandle, ContactPair};
use crate::geometry::Aabb;

const NULL_NODE: u32 = u32::MAX;

/// A node in the dynamic AABB tree.
///
/// Leaves store the body handle in `left`; `right == NULL_NODE` marks a
/// leaf. Parent/child links are pool indices, never pointers.
#[derive(Debug, Clone)]
struct TreeNode {
    aabb: Aabb,
    left: u32,
    right: u32,
    parent: u32,
}

impl TreeNode {
    fn is_leaf(&self) -> bool {
        self.right == NULL_NODE
    }
}

/// Dynamic bounding-volume hierarchy over fattened AABBs.
///
/// Insertion walks down from the root choosing between creating a sibling
/// at the current node and descending into the cheaper child, by merged
/// area cost. Removal promotes the removed leaf's sibling into the
/// grandparent. An update whose new AABB still fits inside the stored fat
/// AABB is free; otherwise the leaf is removed and reinserted.
#[derive(Debug)]
pub struct AabbTree {
    nodes: Vec<TreeNode>,
    root: Option<u32>,
    body_to_node: Vec<Option<u32>>,
    free_list: Vec<u32>,
    margin: f32,
}

impl Default for AabbTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AabbTree {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            body_to_node: Vec::new(),
            free_list: Vec::new(),
            margin: 0.1,
        }
    }

    pub fn with_margin(margin: f32) -> Self {
        Self {
            margin,
            ..Self::new()
        }
    }

    fn insert(&mut self, handle: BodyHandle, aabb: Aabb) {
        let fat_aabb = aabb.expand(self.margin);
        let leaf = self.allocate(TreeNode {
            aabb: fat_aabb,
            left: handle.0,
            right: NULL_NODE,
            parent: NULL_NODE,
        });

        let index = handle.index();
        if index >= self.body_to_node.len() {
            self.body_to_node.resize(index + 1, None);
        }
        self.body_to_node[index] = Some(leaf);

        let Some(root) = self.root else {
            self.root = Some(leaf);
            return;
        };

        let sibling = self.find_best_sibling(fat_aabb, root);

        let old_parent = self.nodes[sibling as usize].parent;
        let new_parent = self.allocate(TreeNode {
            aabb: fat_aabb.union(self.nodes[sibling as usize].aabb),
            left: sibling,
            right: leaf,
            parent: old_parent,
        });
        self.nodes[sibling as usize].parent = new_parent;
        self.nodes[leaf as usize].parent = new_parent;

        if old_parent == NULL_NODE {
            self.root = Some(new_parent);
        } else {
            let old_parent_node = &mut self.nodes[old_parent as usize];
            if old_parent_node.left == sibling {
                old_parent_node.left = new_parent;
            } else {
                old_parent_node.right = new_parent;
            }
        }

        self.refit(new_parent);
    }

    fn remove(&mut self, handle: BodyHandle) {
        let index = handle.index();
        let Some(Some(leaf)) = self.body_to_node.get(index).copied() else {
            return;
        };
        self.body_to_node[index] = None;

        if Some(leaf) == self.root {
            self.root = None;
            self.free(leaf);
            return;
        }

        let parent = self.nodes[leaf as usize].parent;
        let grandparent = self.nodes[parent as usize].parent;
        let sibling = if self.nodes[parent as usize].left == leaf {
            self.nodes[parent as usize].right
        } else {
            self.nodes[parent as usize].left
        };

        if grandparent == NULL_NODE {
            self.root = Some(sibling);
            self.nodes[sibling as usize].parent = NULL_NODE;
        } else {
            let grandparent_node = &mut self.nodes[grandparent as usize];
            if grandparent_node.left == parent {
                grandparent_node.left = sibling;
            } else {
                grandparent_node.right = sibling;
            }
            self.nodes[sibling as usize].parent = grandparent;
            self.refit(grandparent);
        }

        self.free(leaf);
        self.free(parent);
    }

    fn update(&mut self, handle: BodyHandle, aabb: Aabb) {
        let Some(Some(leaf)) = self.body_to_node.get(handle.index()).copied() else {
            return;
        };
        // Still inside the fat AABB: nothing to do
        if self.nodes[leaf as usize].aabb.contains_aabb(aabb) {
            return;
        }
        self.remove(handle);
        self.insert(handle, aabb);
    }

    fn find_best_sibling(&self, leaf_aabb: Aabb, root: u32) -> u32 {
        let mut best = root;
        let mut best_cost = leaf_aabb.union(self.nodes[root as usize].aabb).area();

        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            let n = &self.nodes[current as usize];

            let combined_cost = leaf_aabb.union(n.aabb).area();
            if combined_cost < best_cost {
                best = current;
                best_cost = combined_cost;
            }

            if !n.is_leaf() {
                // Lower bound on the cost of any sibling below this node
                let inherited = combined_cost - n.aabb.area();
                let left_cost =
                    leaf_aabb.union(self.nodes[n.left as usize].aabb).area() + inherited;
                let right_cost =
                    leaf_aabb.union(self.nodes[n.right as usize].aabb).area() + inherited;
                if left_cost < best_cost || right_cost < best_cost {
                    stack.push(n.left);
                    stack.push(n.right);
                }
            }
        }

        best
    }

    fn refit(&mut self, start: u32) {
        let mut current = start;
        while current != NULL_NODE {
            let n = &self.nodes[current as usize];
            if !n.is_leaf() {
                let left_aabb = self.nodes[n.left as usize].aabb;
                let right_aabb = self.nodes[n.right as usize].aabb;
                self.nodes[current as usize].aabb = left_aabb.union(right_aabb);
            }
            current = self.nodes[current as usize].parent;
        }
    }

    fn allocate(&mut self, node: TreeNode) -> u32 {
        if let Some(index) = self.free_list.pop() {
            self.nodes[index as usize] = node;
            index
        } else {
            let index = self.nodes.len() as u32;
            self.nodes.push(node);
            index
        }
    }

    fn free(&mut self, index: u32) {
        self.free_list.push(index);
    }

    fn collect_leaves(&self, node: u32, leaves: &mut Vec<u32>) {
        let n = &self.nodes[node as usize];
        if n.is_leaf() {
            leaves.push(node);
        } else {
            self.collect_leaves(n.left, leaves);
            self.collect_leaves(n.right, leaves);
        }
    }
}

impl BroadPhase for AabbTree {
    fn on_added(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.insert(handle, bounds.aabb);
    }

    fn on_removed(&mut self, handle: BodyHandle, _bounds: &BodyBounds) {
        self.remove(handle);
    }

    fn on_updated(&mut self, handle: BodyHandle, bounds: &BodyBounds) {
        self.update(handle, bounds.aabb);
    }

    fn candidate_pairs(&mut self, pairs: &mut Vec<ContactPair>) {
        let Some(root) = self.root else {
            return;
        };

        let mut leaves = Vec::new();
        self.collect_leaves(root, &mut leaves);

        for &leaf in &leaves {
            let handle = BodyHandle::new(self.nodes[leaf as usize].left);
            let aabb = self.nodes[leaf as usize].aabb;

            let mut stack = vec![root];
            while let Some(current) = stack.pop() {
                let n = &self.nodes[current as usize];
                if !n.aabb.intersects(aabb) {
                    continue;
                }
                if n.is_leaf() {
                    let other = BodyHandle::new(n.left);
                    // Each unordered pair is visited from both leaves;
                    // keep it once
                    if handle.0 < other.0 {
                        pairs.push(ContactPair::new(handle, other));
                    }
                } else {
                    stack.push(n.left);
                    stack.push(n.right);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "dynamic AABB tree"
    }
}
