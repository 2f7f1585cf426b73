use std::ops::Index;

use crate::error::TreeError;
use crate::node::Node;
use crate::state::State;

/// All nodes in discovery order plus the subset whose state lies in the goal region.
///
/// Nodes are only ever appended, so an index handed out once stays valid for the lifetime of the
/// tree. Parent and children links are stored as such indices. Once seeded, index `0` is the root.
#[derive(Clone, Debug)]
pub struct SearchTree<S> {
    nodes: Vec<Node<S>>,
    goal_nodes: Vec<usize>,
}

impl<S> SearchTree<S> {
    /// `capacity` should be the sample budget, so the node storage never grows while planning.
    pub fn with_capacity(capacity: usize) -> Self {
        SearchTree {
            nodes: Vec::with_capacity(capacity),
            goal_nodes: Vec::new(),
        }
    }

    /// Drops every node and seeds the tree with `root`.
    pub(crate) fn reset(&mut self, root: S) {
        self.nodes.clear();
        self.goal_nodes.clear();
        self.nodes.push(Node::new_root(root));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<&Node<S>> {
        self.nodes.first()
    }

    pub fn get(&self, idx: usize) -> Option<&Node<S>> {
        self.nodes.get(idx)
    }

    pub fn nodes(&self) -> &[Node<S>] {
        self.nodes.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node<S>> {
        self.nodes.iter()
    }

    /// Indices of the nodes that landed in the goal region, in the order they were found.
    pub fn goal_nodes(&self) -> &[usize] {
        self.goal_nodes.as_slice()
    }

    /// Appends `node` and registers it as a child of its parent. Returns the new index.
    pub(crate) fn add_node(&mut self, node: Node<S>) -> usize {
        let idx = self.nodes.len();
        if let Some(parent) = node.parent() {
            self.nodes[parent].add_child(idx);
        }
        self.nodes.push(node);
        idx
    }

    pub(crate) fn add_goal(&mut self, idx: usize) {
        debug_assert!(idx < self.nodes.len());
        self.goal_nodes.push(idx);
    }

    /// Whether `ancestor` lies strictly above `node` on its way to the root.
    pub fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut curr = self.nodes.get(node).and_then(Node::parent);
        let mut steps = 0;
        while let Some(idx) = curr {
            if idx == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                break;
            }
            curr = self.nodes.get(idx).and_then(Node::parent);
        }
        false
    }

    /// Moves `idx` under `new_parent` and assigns it `cost`, keeping the children lists of both
    /// parents in sync.
    pub(crate) fn reparent(&mut self, idx: usize, new_parent: usize, cost: f32) {
        let node = &mut self.nodes[idx];
        let old_parent = node.set_parent(new_parent);
        node.set_cost(cost);

        if let Some(old_parent) = old_parent {
            let removed = self.nodes[old_parent].remove_child(idx);
            debug_assert!(removed, "node {} missing from children of {}", idx, old_parent);
        }
        self.nodes[new_parent].add_child(idx);
    }

    /// Indices from the root down to `idx`, both included.
    pub fn ancestry(&self, idx: usize) -> Result<Vec<usize>, TreeError> {
        let mut path = vec![idx];
        let mut curr = self.nodes.get(idx).ok_or(TreeError::Empty)?;

        while let Some(parent) = curr.parent() {
            if path.len() > self.nodes.len() {
                return Err(TreeError::Cycle { node: idx });
            }
            curr = self
                .nodes
                .get(parent)
                .ok_or(TreeError::DanglingParent { node: *path.last().unwrap_or(&idx), parent })?;
            path.push(parent);
        }

        path.reverse();
        Ok(path)
    }
}

impl<S: State> SearchTree<S> {
    pub fn edge_cost(&self, from: usize, to: usize) -> f32 {
        self.nodes[from].state().distance(self.nodes[to].state())
    }

    /// Recomputes the cost of every node below `idx` from its parent. Returns how many nodes
    /// were updated.
    pub(crate) fn propagate_cost_update(&mut self, idx: usize) -> usize {
        let mut stack = vec![idx];
        let mut updated = 0;

        while let Some(parent) = stack.pop() {
            for i in 0..self.nodes[parent].children().len() {
                let child = self.nodes[parent].children()[i];
                let cost = self.nodes[parent].cost() + self.edge_cost(parent, child);
                self.nodes[child].set_cost(cost);
                stack.push(child);
                updated += 1;
            }
        }

        updated
    }

    /// Checks the structural invariants of the tree: a single root at index `0` with cost `0`,
    /// parents and children lists that agree, costs equal to the parent cost plus the edge cost
    /// (up to `tolerance`, relative for large costs) and every node reachable from the root.
    pub fn validate(&self, tolerance: f32) -> Result<(), TreeError> {
        let root = self.nodes.first().ok_or(TreeError::Empty)?;
        if root.parent().is_some() {
            return Err(TreeError::Cycle { node: 0 });
        }
        if root.cost() != 0.0 {
            return Err(TreeError::RootCost { cost: root.cost() });
        }

        for (node, n) in self.nodes.iter().enumerate().skip(1) {
            let parent = n.parent().ok_or(TreeError::SecondRoot { node })?;
            let p = self
                .nodes
                .get(parent)
                .ok_or(TreeError::DanglingParent { node, parent })?;

            if !p.children().contains(&node) {
                return Err(TreeError::MissingChild { node, parent });
            }

            let expected = p.cost() + p.state().distance(n.state());
            if (expected - n.cost()).abs() > tolerance * expected.abs().max(1.0) {
                return Err(TreeError::InconsistentCost {
                    node,
                    expected,
                    actual: n.cost(),
                });
            }
        }

        // Every child list entry has been matched with a parent link above, so a node that is not
        // reachable from the root can only be part of a cycle.
        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![0];
        reached[0] = true;
        while let Some(idx) = stack.pop() {
            for &child in self.nodes[idx].children() {
                if self.nodes[child].parent() != Some(idx) || reached[child] {
                    return Err(TreeError::MissingChild { node: child, parent: idx });
                }
                reached[child] = true;
                stack.push(child);
            }
        }

        match reached.iter().position(|&r| !r) {
            Some(node) => Err(TreeError::Cycle { node }),
            None => Ok(()),
        }
    }
}

impl<S> Index<usize> for SearchTree<S> {
    type Output = Node<S>;

    #[inline]
    fn index(&self, idx: usize) -> &Node<S> {
        &self.nodes[idx]
    }
}

#[cfg(test)]
mod tests {
    use nalgebra as na;

    use super::*;
    use crate::testing::point2;

    fn chain() -> SearchTree<na::Point2<f32>> {
        // 0 -> 1 -> 2, 0 -> 3
        let mut tree = SearchTree::with_capacity(8);
        tree.reset(point2(0.0, 0.0));
        tree.add_node(Node::new(point2(1.0, 0.0), 1.0, 0));
        tree.add_node(Node::new(point2(2.0, 0.0), 2.0, 1));
        tree.add_node(Node::new(point2(0.0, 1.0), 1.0, 0));
        tree
    }

    #[test]
    fn add_node_registers_children() {
        let tree = chain();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree[0].children(), &[1, 3]);
        assert_eq!(tree[1].children(), &[2]);
        assert!(tree.validate(1e-6).is_ok());
    }

    #[test]
    fn ancestry_goes_from_root_to_node() {
        let tree = chain();
        assert_eq!(tree.ancestry(2), Ok(vec![0, 1, 2]));
        assert_eq!(tree.ancestry(0), Ok(vec![0]));
        assert!(tree.is_ancestor(0, 2));
        assert!(tree.is_ancestor(1, 2));
        assert!(!tree.is_ancestor(3, 2));
        assert!(!tree.is_ancestor(2, 2));
    }

    #[test]
    fn reparent_moves_child_and_propagates() {
        let mut tree = chain();
        // Move node 1 under node 3. Its cost becomes 1 + sqrt(2) and node 2 follows.
        let cost = tree[3].cost() + tree.edge_cost(3, 1);
        tree.reparent(1, 3, cost);
        assert_eq!(tree.propagate_cost_update(1), 1);

        assert_eq!(tree[0].children(), &[3]);
        assert_eq!(tree[3].children(), &[1]);
        assert!((tree[2].cost() - (1.0 + 2.0_f32.sqrt() + 1.0)).abs() < 1e-5);
        assert_eq!(tree.ancestry(2), Ok(vec![0, 3, 1, 2]));
        assert!(tree.validate(1e-5).is_ok());
    }

    #[test]
    fn validate_reports_stale_costs() {
        let mut tree = chain();
        let cost = tree[3].cost() + tree.edge_cost(3, 1);
        tree.reparent(1, 3, cost);
        assert!(matches!(
            tree.validate(1e-5),
            Err(TreeError::InconsistentCost { node: 2, .. })
        ));
    }

    #[test]
    fn validate_reports_cycles() {
        let mut tree = chain();
        // 1 -> 2 -> 1 detaches both nodes from the root.
        let cost = tree[2].cost() + tree.edge_cost(2, 1);
        tree.reparent(1, 2, cost);
        assert_eq!(tree.ancestry(2), Err(TreeError::Cycle { node: 2 }));
        assert!(tree.validate(f32::INFINITY).is_err());
    }

    #[test]
    fn empty_tree() {
        let tree: SearchTree<na::Point2<f32>> = SearchTree::with_capacity(0);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.validate(0.0), Err(TreeError::Empty));
    }
}
