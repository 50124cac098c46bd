//! Arena-backed AND-OR graph.

use crate::state::{SearchState, StateKey};
use std::collections::HashMap;

/// Stable handle of a node inside an [`AndOrGraph`].
pub type NodeId = usize;

/// A partial tour in the AND-OR graph.
#[derive(Debug, Clone)]
pub struct AoNode {
    pub state: SearchState,
    /// Estimated total tour cost through this node: `g` plus the best
    /// remaining estimate, either from the heuristic (unexpanded) or from the
    /// cheapest child (expanded).
    pub cost: f64,
    /// Set once `cost` is exact. Solved costs are never revised.
    pub solved: bool,
    pub children: Vec<NodeId>,
    /// Back-reference only; the arena owns every node.
    pub parent: Option<NodeId>,
}

/// Effect of [`AndOrGraph::revise`] on a node's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revision {
    Unchanged,
    Lowered,
    Raised,
    /// The node's best child is solved, so the node now is too.
    Solved,
}

/// Nodes plus a state-key index for deduplication.
#[derive(Debug, Default)]
pub struct AndOrGraph {
    nodes: Vec<AoNode>,
    index: HashMap<StateKey, NodeId>,
}

impl AndOrGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &AoNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &AoNode)> {
        self.nodes.iter().enumerate()
    }

    /// Adds a parentless node.
    pub fn add_root(&mut self, state: SearchState, cost: f64) -> NodeId {
        self.insert(state, cost, None)
    }

    /// Adds `state` as a child of `parent`.
    ///
    /// If a node with the same key already exists it is linked instead of
    /// duplicated and `false` is returned alongside its id.
    pub fn add_child(&mut self, parent: NodeId, state: SearchState, cost: f64) -> (NodeId, bool) {
        if let Some(&existing) = self.index.get(&state.key()) {
            if !self.nodes[parent].children.contains(&existing) {
                self.nodes[parent].children.push(existing);
            }
            return (existing, false);
        }
        let id = self.insert(state, cost, Some(parent));
        self.nodes[parent].children.push(id);
        (id, true)
    }

    fn insert(&mut self, state: SearchState, cost: f64, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.index.insert(state.key(), id);
        self.nodes.push(AoNode {
            state,
            cost,
            solved: false,
            children: Vec::new(),
            parent,
        });
        id
    }

    /// Marks `id` solved with its exact cost.
    pub fn mark_solved(&mut self, id: NodeId, cost: f64) {
        let node = &mut self.nodes[id];
        node.cost = cost;
        node.solved = true;
    }

    /// Cheapest child of `id`; on equal cost a solved child wins, then the
    /// earlier-generated one.
    pub fn best_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].children.iter().copied().min_by(|&a, &b| {
            let (na, nb) = (&self.nodes[a], &self.nodes[b]);
            na.cost
                .total_cmp(&nb.cost)
                .then_with(|| nb.solved.cmp(&na.solved))
                .then_with(|| a.cmp(&b))
        })
    }

    /// Recomputes the cost of an expanded node from its children.
    ///
    /// The new cost is that of the best child (its `g` already includes the
    /// edge from `id`), and the node becomes solved when that child is
    /// solved. Solved nodes and leaves are left untouched.
    pub fn revise(&mut self, id: NodeId) -> Revision {
        if self.nodes[id].solved {
            return Revision::Unchanged;
        }
        let Some(best) = self.best_child(id) else {
            return Revision::Unchanged;
        };
        let (best_cost, best_solved) = (self.nodes[best].cost, self.nodes[best].solved);
        let node = &mut self.nodes[id];
        let old = node.cost;
        node.cost = best_cost;
        node.solved = best_solved;
        if best_solved {
            return Revision::Solved;
        }
        match best_cost.total_cmp(&old) {
            std::cmp::Ordering::Less => Revision::Lowered,
            std::cmp::Ordering::Greater => Revision::Raised,
            std::cmp::Ordering::Equal => Revision::Unchanged,
        }
    }

    /// Follows best children from `id` down to a leaf.
    pub fn marked_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(next) = self.best_child(current) {
            path.push(next);
            current = next;
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;

    fn line() -> DistanceMatrix {
        DistanceMatrix::from_coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
    }

    #[test]
    fn test_add_child_links_parent() {
        let m = line();
        let mut g = AndOrGraph::new();
        let root_state = SearchState::root(3, 0);
        let child_state = root_state.extend(1, &m);
        let root = g.add_root(root_state, 4.0);
        let (child, inserted) = g.add_child(root, child_state.clone(), 4.0);
        assert!(inserted);
        assert_eq!(g.node(child).parent, Some(root));
        assert_eq!(g.node(root).children, vec![child]);

        let (again, inserted) = g.add_child(root, child_state, 4.0);
        assert!(!inserted);
        assert_eq!(again, child);
        assert_eq!(g.node(root).children.len(), 1);
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_revise_takes_cheapest_child() {
        let m = line();
        let mut g = AndOrGraph::new();
        let root_state = SearchState::root(3, 0);
        let root = g.add_root(root_state.clone(), 2.0);
        let (a, _) = g.add_child(root, root_state.extend(1, &m), 4.0);
        let (b, _) = g.add_child(root, root_state.extend(2, &m), 5.0);
        assert_eq!(g.revise(root), Revision::Raised);
        assert_eq!(g.node(root).cost, 4.0);
        assert!(!g.node(root).solved);
        assert_eq!(g.best_child(root), Some(a));

        g.mark_solved(b, 4.0);
        assert_eq!(g.best_child(root), Some(b), "solved child wins ties");
        assert_eq!(g.revise(root), Revision::Solved);
        assert!(g.node(root).solved);
        assert_eq!(g.marked_path(root), vec![root, b]);
    }

    #[test]
    fn test_solved_cost_is_final() {
        let m = line();
        let mut g = AndOrGraph::new();
        let root_state = SearchState::root(3, 0);
        let root = g.add_root(root_state.clone(), 2.0);
        let (a, _) = g.add_child(root, root_state.extend(1, &m), 4.0);
        g.mark_solved(a, 4.0);
        g.revise(root);
        assert!(g.node(root).solved);

        // A cheaper sibling showing up later must not move a solved node.
        g.add_child(root, root_state.extend(2, &m), 1.0);
        assert_eq!(g.revise(root), Revision::Unchanged);
        assert_eq!(g.node(root).cost, 4.0);
    }

    #[test]
    fn test_revise_leaf_unchanged() {
        let mut g = AndOrGraph::new();
        let root = g.add_root(SearchState::root(3, 0), 2.0);
        assert_eq!(g.revise(root), Revision::Unchanged);
        assert_eq!(g.node(root).cost, 2.0);
    }
}
