/// A vertex of the search tree. Parents and children are indices into the tree that owns the node.
#[derive(Clone, Debug)]
pub struct Node<S> {
    state: S,
    parent: Option<usize>,
    cost: f32,
    children: Vec<usize>,
}

impl<S> Node<S> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Length of the path from the root to this node.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn children(&self) -> &[usize] {
        self.children.as_slice()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl<S> Node<S> {
    pub(crate) fn new_root(state: S) -> Self {
        Node {
            state,
            parent: None,
            cost: 0.0,
            children: Vec::new(),
        }
    }

    pub(crate) fn new(state: S, cost: f32, parent: usize) -> Self {
        Node {
            state,
            parent: Some(parent),
            cost,
            children: Vec::new(),
        }
    }

    /// Returns the previous parent.
    pub(crate) fn set_parent(&mut self, parent: usize) -> Option<usize> {
        self.parent.replace(parent)
    }

    pub(crate) fn set_cost(&mut self, cost: f32) {
        self.cost = cost;
    }

    pub(crate) fn add_child(&mut self, child: usize) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: usize) -> bool {
        match self.children.iter().position(|&el| el == child) {
            Some(idx) => {
                self.children.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_has_no_parent_and_zero_cost() {
        let root = Node::new_root("root");
        assert!(root.is_root());
        assert_eq!(root.cost(), 0.0);
        assert!(root.children().is_empty());
    }

    #[test]
    fn children_bookkeeping() {
        let mut node = Node::new("a", 1.5, 0);
        node.add_child(3);
        node.add_child(7);
        node.add_child(9);
        assert!(node.remove_child(7));
        assert!(!node.remove_child(7));
        let mut children = node.children().to_vec();
        children.sort_unstable();
        assert_eq!(children, vec![3, 9]);
        assert_eq!(node.set_parent(4), Some(0));
        assert_eq!(node.parent(), Some(4));
    }
}
