use crate::datastructures::BitSet;
use crate::graph::BaseGraph;
use fxhash::FxHashSet;
use std::cmp::max;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum TreeDecompositionValidationError {
    HasCycle,
    NotConnected,
    MissingVertex(usize),
    MissingEdge((usize, usize)),
    NotInducingSubtree(usize),
}

impl Display for TreeDecompositionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            TreeDecompositionValidationError::HasCycle => write!(f, "Has Cycle"),
            TreeDecompositionValidationError::NotConnected => write!(f, "Not Connected"),
            TreeDecompositionValidationError::MissingVertex(v) => {
                write!(f, "Missing Vertex: {}", v)
            }
            TreeDecompositionValidationError::MissingEdge((u, v)) => {
                write!(f, "Missing Edge: ({}, {})", u, v)
            }
            TreeDecompositionValidationError::NotInducingSubtree(v) => {
                write!(f, "Not Inducing Subtree: {}", v)
            }
        }
    }
}

impl Error for TreeDecompositionValidationError {}

#[derive(Debug, Default, Clone)]
pub struct Bag {
    pub id: usize,
    pub vertex_set: FxHashSet<usize>,
    pub neighbors: FxHashSet<usize>,
}

impl Bag {
    /// Members in ascending order.
    pub fn sorted_vertices(&self) -> Vec<usize> {
        let mut vertices: Vec<usize> = self.vertex_set.iter().copied().collect();
        vertices.sort_unstable();
        vertices
    }
}

/// A tree of bags. Bag ids always equal their position in `bags`.
#[derive(Debug, Clone, Default)]
pub struct TreeDecomposition {
    pub bags: Vec<Bag>,
    pub root: Option<usize>,
    pub max_bag_size: usize,
}

impl TreeDecomposition {
    pub fn with_root(vertex_set: FxHashSet<usize>) -> Self {
        let mut td = Self::default();
        td.add_bag(vertex_set);
        td
    }

    pub fn add_bag(&mut self, vertex_set: FxHashSet<usize>) -> usize {
        let id = self.bags.len();
        if id == 0 {
            self.root = Some(id);
        }
        self.max_bag_size = max(self.max_bag_size, vertex_set.len());
        self.bags.push(Bag {
            id,
            vertex_set,
            neighbors: FxHashSet::default(),
        });
        id
    }

    pub fn add_edge(&mut self, b1: usize, b2: usize) {
        assert!(b1 < self.bags.len());
        assert!(b2 < self.bags.len());
        assert_ne!(b1, b2);
        self.bags[b1].neighbors.insert(b2);
        self.bags[b2].neighbors.insert(b1);
    }

    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    /// Largest bag size minus one, `0` for an empty decomposition.
    pub fn width(&self) -> usize {
        self.max_bag_size.saturating_sub(1)
    }

    /// Tree edges as `(a, b)` with `a < b`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .bags
            .iter()
            .flat_map(|b| {
                b.neighbors
                    .iter()
                    .copied()
                    .filter(move |n| b.id < *n)
                    .map(move |n| (b.id, n))
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn dfs(&self) -> TreeDecompositionIterator<'_> {
        let mut visited = BitSet::new(self.bags.len());
        let stack = match self.root {
            Some(root) => {
                visited.set_bit(root);
                vec![root]
            }
            None => vec![],
        };
        TreeDecompositionIterator {
            td: self,
            stack,
            visited,
        }
    }

    /// Merges every bag that is a subset of an adjacent bag into that neighbor.
    pub fn flatten(&mut self) {
        while let Some((keep, merge)) = self.find_combinable() {
            let neighbors: Vec<usize> = self.bags[merge]
                .neighbors
                .iter()
                .copied()
                .filter(|n| *n != keep)
                .collect();
            for n in neighbors {
                self.bags[n].neighbors.remove(&merge);
                self.add_edge(keep, n);
            }
            self.bags[keep].neighbors.remove(&merge);
            self.bags[merge].neighbors.clear();
            self.remove_bag(merge);
        }
    }

    fn find_combinable(&self) -> Option<(usize, usize)> {
        for b in &self.bags {
            if let Some(n) = b
                .neighbors
                .iter()
                .find(|n| self.bags[**n].vertex_set.is_subset(&b.vertex_set))
            {
                return Some((b.id, *n));
            }
        }
        None
    }

    fn remove_bag(&mut self, id: usize) {
        assert!(self.bags[id].neighbors.is_empty());
        let last = self.bags.len() - 1;
        self.bags.swap_remove(id);
        if id != last {
            self.bags[id].id = id;
            let neighbors: Vec<usize> = self.bags[id].neighbors.iter().copied().collect();
            for n in neighbors {
                self.bags[n].neighbors.remove(&last);
                self.bags[n].neighbors.insert(id);
            }
        }
        if self.root == Some(id) || self.root == Some(last) {
            self.root = if self.bags.is_empty() { None } else { Some(0) };
        }
    }

    pub fn verify<G: BaseGraph>(&self, graph: &G) -> Result<(), TreeDecompositionValidationError> {
        if !self.is_connected() {
            return Err(TreeDecompositionValidationError::NotConnected);
        }

        if self.is_cyclic() {
            return Err(TreeDecompositionValidationError::HasCycle);
        }

        if let Some(v) = self.get_missing_vertex(graph) {
            return Err(TreeDecompositionValidationError::MissingVertex(v));
        }

        if let Some(e) = self.get_missing_edge(graph) {
            return Err(TreeDecompositionValidationError::MissingEdge(e));
        }

        if let Some(v) = self.get_vertex_not_inducing_subtree(graph) {
            return Err(TreeDecompositionValidationError::NotInducingSubtree(v));
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        if self.bags.is_empty() {
            return true;
        }
        self.dfs().count() == self.bags.len()
    }

    // only meaningful once connectivity holds
    fn is_cyclic(&self) -> bool {
        let edge_count: usize = self.bags.iter().map(|b| b.neighbors.len()).sum::<usize>() / 2;
        !self.bags.is_empty() && edge_count != self.bags.len() - 1
    }

    fn get_missing_vertex<G: BaseGraph>(&self, graph: &G) -> Option<usize> {
        let mut vertices: FxHashSet<usize> = graph.vertices().collect();
        self.bags.iter().for_each(|b| {
            b.vertex_set.iter().for_each(|x| {
                vertices.remove(x);
            })
        });
        vertices.iter().copied().min()
    }

    fn get_missing_edge<G: BaseGraph>(&self, graph: &G) -> Option<(usize, usize)> {
        graph.edges().into_iter().find(|(u, v)| {
            !self
                .bags
                .iter()
                .any(|b| b.vertex_set.contains(u) && b.vertex_set.contains(v))
        })
    }

    fn get_vertex_not_inducing_subtree<G: BaseGraph>(&self, graph: &G) -> Option<usize> {
        let mut vertices: Vec<usize> = graph.vertices().collect();
        vertices.sort_unstable();
        for u in vertices {
            let mut inducing_bags: FxHashSet<usize> = self
                .bags
                .iter()
                .filter(|b| b.vertex_set.contains(&u))
                .map(|b| b.id)
                .collect();

            let first = match inducing_bags.iter().next() {
                Some(first) => *first,
                None => continue,
            };
            inducing_bags.remove(&first);
            let mut visited = BitSet::new(self.bags.len());
            visited.set_bit(first);
            let mut stack: Vec<usize> = vec![first];
            while let Some(c) = stack.pop() {
                for n in self.bags[c].neighbors.iter().copied() {
                    let bag = &self.bags[n];
                    if !visited[n] && bag.vertex_set.contains(&u) {
                        inducing_bags.remove(&bag.id);
                        stack.push(n);
                        visited.set_bit(n);
                    }
                }
            }
            if !inducing_bags.is_empty() {
                return Some(u);
            }
        }
        None
    }
}

pub struct TreeDecompositionIterator<'a> {
    td: &'a TreeDecomposition,
    stack: Vec<usize>,
    visited: BitSet,
}

impl<'a> Iterator for TreeDecompositionIterator<'a> {
    type Item = &'a Bag;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for c in self.td.bags[current].neighbors.iter().copied() {
            if !self.visited[c] {
                self.stack.push(c);
                self.visited.set_bit(c);
            }
        }
        self.td.bags.get(current)
    }
}
