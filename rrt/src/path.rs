use itertools::Itertools;

use crate::error::TreeError;
use crate::state::State;
use crate::tree::SearchTree;

/// Waypoints from the root of the tree to one of its nodes.
#[derive(Clone, Debug)]
pub struct Path<S> {
    pub waypoints: Vec<S>,
    /// Tree index of every waypoint.
    pub nodes: Vec<usize>,
    /// Cost of the last node at the time the path was extracted.
    pub cost: f32,
}

impl<S: Clone> Path<S> {
    pub fn from_tree(tree: &SearchTree<S>, idx: usize) -> Result<Self, TreeError> {
        let nodes = tree.ancestry(idx)?;
        let waypoints = nodes.iter().map(|&i| tree[i].state().clone()).collect();

        Ok(Path {
            waypoints,
            nodes,
            cost: tree[idx].cost(),
        })
    }
}

impl<S> Path<S> {
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Option<&S> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&S> {
        self.waypoints.last()
    }

    pub fn segments(&self) -> impl Iterator<Item = (&S, &S)> + '_ {
        self.waypoints.iter().tuple_windows()
    }
}

impl<S: State> Path<S> {
    /// Sum of the edge lengths. Matches `cost` as long as the tree costs are up to date.
    pub fn length(&self) -> f32 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::testing::point2;

    #[test]
    fn path_from_root_to_node() {
        let mut tree = SearchTree::with_capacity(4);
        tree.reset(point2(0.0, 0.0));
        tree.add_node(Node::new(point2(3.0, 4.0), 5.0, 0));
        tree.add_node(Node::new(point2(3.0, 0.0), 3.0, 0));
        tree.add_node(Node::new(point2(6.0, 4.0), 8.0, 1));

        let path = Path::from_tree(&tree, 3).unwrap();
        assert_eq!(path.nodes, vec![0, 1, 3]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&point2(0.0, 0.0)));
        assert_eq!(path.last(), Some(&point2(6.0, 4.0)));
        assert_eq!(path.cost, 8.0);
        assert!((path.length() - 8.0).abs() < 1e-6);
        assert_eq!(path.segments().count(), 2);
    }

    #[test]
    fn root_only_path() {
        let mut tree = SearchTree::with_capacity(1);
        tree.reset(point2(1.0, 1.0));
        let path = Path::from_tree(&tree, 0).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.cost, 0.0);
    }
}
