use crate::datastructures::BitSet;
use crate::graph::base_graph::BaseGraph;
use crate::graph::mutable_graph::MutableGraph;
use fxhash::FxHashMap;
use fxhash::FxHashSet;

#[derive(Clone, Debug)]
pub struct HashMapGraph {
    data: FxHashMap<usize, FxHashSet<usize>>,
}

impl HashMapGraph {
    /// Graph on the vertices `0..n` without any edges.
    pub fn with_vertices(n: usize) -> Self {
        let mut graph = Self::with_capacity(n);
        for v in 0..n {
            graph.add_vertex(v);
        }
        graph
    }

    pub fn has_vertex(&self, u: usize) -> bool {
        self.data.contains_key(&u)
    }

    pub fn neighborhood_set(&self, u: usize) -> &FxHashSet<usize> {
        &self.data[&u]
    }

    /// Vertices in ascending order.
    pub fn sorted_vertices(&self) -> Vec<usize> {
        let mut vertices: Vec<usize> = self.data.keys().copied().collect();
        vertices.sort_unstable();
        vertices
    }

    pub fn dfs(&self, u: usize) -> HashMapGraphDfs<'_> {
        assert!(self.data.contains_key(&u));
        let bound = self.data.keys().copied().max().map_or(0, |m| m + 1);
        let mut visited = BitSet::new(bound);
        visited.set_bit(u);
        HashMapGraphDfs {
            graph: self,
            stack: vec![u],
            visited,
        }
    }

    /// The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        match self.data.keys().next() {
            None => true,
            Some(u) => self.dfs(*u).count() == self.data.len(),
        }
    }

    pub fn connected_components(&self) -> Vec<FxHashSet<usize>> {
        let mut components: Vec<FxHashSet<usize>> = Vec::new();
        let mut visited: FxHashSet<usize> =
            FxHashSet::with_capacity_and_hasher(self.data.len(), Default::default());
        for u in self.sorted_vertices() {
            if visited.contains(&u) {
                continue;
            }
            let component: FxHashSet<usize> = self.dfs(u).collect();
            visited.extend(component.iter().copied());
            components.push(component);
        }
        components
    }
}

pub struct HashMapGraphDfs<'a> {
    graph: &'a HashMapGraph,
    stack: Vec<usize>,
    visited: BitSet,
}

impl<'a> Iterator for HashMapGraphDfs<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        for c in self.graph.data[&current].iter().copied() {
            if !self.visited[c] {
                self.stack.push(c);
                self.visited.set_bit(c);
            }
        }
        Some(current)
    }
}

impl MutableGraph for HashMapGraph {
    fn add_vertex(&mut self, u: usize) {
        self.data.entry(u).or_insert_with(FxHashSet::default);
    }

    fn remove_vertex(&mut self, u: usize) {
        if let Some(neighbors) = self.data.remove(&u) {
            for i in neighbors.iter() {
                if let Some(nb) = self.data.get_mut(i) {
                    nb.remove(&u);
                }
            }
        }
    }

    fn add_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        self.data.entry(u).or_insert_with(FxHashSet::default).insert(v);
        self.data.entry(v).or_insert_with(FxHashSet::default).insert(u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        assert_ne!(u, v);
        if let Some(x) = self.data.get_mut(&u) {
            x.remove(&v);
        }
        if let Some(x) = self.data.get_mut(&v) {
            x.remove(&u);
        }
    }

    fn eliminate_vertex(&mut self, u: usize) {
        let nb = match self.data.remove(&u) {
            Some(nb) => nb,
            None => return,
        };
        for i in &nb {
            if let Some(x) = self.data.get_mut(i) {
                x.remove(&u);
            }
        }
        for i in &nb {
            for j in &nb {
                if i < j {
                    self.add_edge(*i, *j);
                }
            }
        }
    }

    fn new() -> Self {
        HashMapGraph {
            data: FxHashMap::default(),
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        HashMapGraph {
            data: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }
}

impl BaseGraph for HashMapGraph {
    fn degree(&self, u: usize) -> usize {
        self.data[&u].len()
    }

    fn order(&self) -> usize {
        self.data.len()
    }

    fn has_edge(&self, u: usize, v: usize) -> bool {
        self.data.get(&u).map_or(false, |nb| nb.contains(&v))
    }

    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data.keys().copied())
    }

    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(self.data[&u].iter().copied())
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let mut count = 0;
        for x in self.neighborhood_set(u) {
            for y in self.neighborhood_set(u) {
                if x < y && !self.has_edge(*x, *y) {
                    count += 1;
                }
            }
        }
        count
    }
}
