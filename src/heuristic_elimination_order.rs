use crate::datastructures::BinaryQueue;
use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
#[cfg(feature = "handle-ctrlc")]
use crate::signals::received_ctrl_c;
use crate::tree_decomposition::TreeDecomposition;
use fxhash::{FxHashMap, FxHashSet};
use log::debug;
use std::cmp::max;

pub trait Selector: From<HashMapGraph> {
    fn graph(&self) -> &HashMapGraph;
    fn value(&self, v: usize) -> i64;
    fn eliminate_vertex(&mut self, v: usize);
}

pub struct MinDegreeSelector {
    graph: HashMapGraph,
}

impl From<HashMapGraph> for MinDegreeSelector {
    fn from(graph: HashMapGraph) -> Self {
        Self { graph }
    }
}

impl Selector for MinDegreeSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.graph.degree(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        self.graph.eliminate_vertex(v);
    }
}

/// Keeps, per vertex, the number of edges inside its neighborhood so the fill-in
/// is available without rescanning.
pub struct MinFillSelector {
    graph: HashMapGraph,
    cache: FxHashMap<usize, usize>,
}

impl From<HashMapGraph> for MinFillSelector {
    fn from(graph: HashMapGraph) -> Self {
        let mut cache = FxHashMap::with_capacity_and_hasher(graph.order(), Default::default());
        for u in graph.vertices() {
            cache.insert(u, 0);
        }
        for (u, v) in graph.edges() {
            graph
                .neighborhood_set(u)
                .iter()
                .copied()
                .filter(|x| v < *x && graph.has_edge(*x, v))
                .for_each(|x| {
                    *cache.entry(x).or_insert(0) += 1;
                    *cache.entry(u).or_insert(0) += 1;
                    *cache.entry(v).or_insert(0) += 1;
                })
        }
        Self { graph, cache }
    }
}

impl Selector for MinFillSelector {
    fn graph(&self) -> &HashMapGraph {
        &self.graph
    }

    fn value(&self, v: usize) -> i64 {
        self.fill_in_count(v) as i64
    }

    fn eliminate_vertex(&mut self, v: usize) {
        if self.fill_in_count(v) == 0 {
            self.eliminate_fill0(v);
        } else {
            let mut to_add: Vec<(usize, usize)> = vec![];
            for u in self.graph.neighborhood_set(v) {
                for w in self
                    .graph
                    .neighborhood_set(v)
                    .iter()
                    .filter(|w| u < *w && !self.graph.has_edge(*u, **w))
                {
                    to_add.push((*u, *w));
                }
            }
            for (u, w) in to_add {
                self.add_edge(u, w);
            }
            self.remove_vertex(v);
        }
    }
}

impl MinFillSelector {
    fn add_edge(&mut self, u: usize, v: usize) {
        self.graph.add_edge(u, v);
        let common: Vec<usize> = self
            .graph
            .neighborhood_set(u)
            .iter()
            .copied()
            .filter(|x| self.graph.has_edge(*x, v))
            .collect();
        for x in common {
            self.increment(x, 1);
            self.increment(u, 1);
            self.increment(v, 1);
        }
    }

    fn remove_vertex(&mut self, u: usize) {
        let neighbors: Vec<usize> = self.graph.neighborhood_set(u).iter().copied().collect();
        for v in neighbors {
            self.remove_edge(u, v);
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn remove_edge(&mut self, u: usize, v: usize) {
        self.graph.remove_edge(u, v);
        let common: Vec<usize> = self
            .graph
            .neighborhood_set(u)
            .iter()
            .copied()
            .filter(|x| self.graph.has_edge(*x, v))
            .collect();
        for x in common {
            self.decrement(x, 1);
            self.decrement(u, 1);
            self.decrement(v, 1);
        }
    }

    // a vertex without fill-in is simplicial: each neighbor loses deg(u) - 1 triangles
    fn eliminate_fill0(&mut self, u: usize) {
        let degree = self.graph.degree(u);
        if degree > 1 {
            let neighbors: Vec<usize> = self.graph.neighborhood_set(u).iter().copied().collect();
            for v in neighbors {
                self.decrement(v, degree - 1);
            }
        }
        self.graph.remove_vertex(u);
        self.cache.remove(&u);
    }

    fn increment(&mut self, u: usize, by: usize) {
        *self.cache.entry(u).or_insert(0) += by;
    }

    fn decrement(&mut self, u: usize, by: usize) {
        let entry = self.cache.entry(u).or_insert(0);
        *entry = entry.saturating_sub(by);
    }

    fn fill_in_count(&self, u: usize) -> usize {
        let deg = self.graph.degree(u);
        let possible = deg * deg.saturating_sub(1) / 2;
        possible.saturating_sub(self.cache.get(&u).copied().unwrap_or(0))
    }
}

pub type MinFillDecomposer = HeuristicEliminationDecomposer<MinFillSelector>;
pub type MinDegreeDecomposer = HeuristicEliminationDecomposer<MinDegreeSelector>;

/// Builds a tree decomposition from a greedy elimination ordering: repeatedly
/// eliminates the vertex with the smallest selector value, then glues the
/// resulting bags together in reverse elimination order.
pub struct HeuristicEliminationDecomposer<S: Selector> {
    selector: S,
}

impl<S: Selector> HeuristicEliminationDecomposer<S> {
    pub fn with_graph(graph: &HashMapGraph) -> Self {
        Self {
            selector: S::from(graph.clone()),
        }
    }

    pub fn compute(self) -> TreeDecomposition {
        let mut tree_decomposition = TreeDecomposition::default();
        if self.selector.graph().order() <= 1 {
            tree_decomposition.add_bag(self.selector.graph().vertices().collect());
            return tree_decomposition;
        }

        let mut max_bag = 2;
        let mut selector = self.selector;
        let mut pq = BinaryQueue::new();

        let mut bags: FxHashMap<usize, FxHashSet<usize>> = FxHashMap::default();

        let mut vertices: Vec<usize> = selector.graph().vertices().collect();
        vertices.sort_unstable();
        for v in vertices {
            pq.insert(v, selector.value(v))
        }

        let mut stack: Vec<usize> = vec![];
        while let Some((u, _)) = pq.pop_min() {
            if selector.graph().order() <= max_bag {
                break;
            }

            #[cfg(feature = "handle-ctrlc")]
            if received_ctrl_c() {
                // remaining vertices end up in a single bag, callers discard the result
                break;
            }

            let nb: FxHashSet<usize> = selector.graph().neighborhood(u).collect();
            max_bag = max(max_bag, nb.len() + 1);
            stack.push(u);
            bags.insert(u, nb.clone());
            selector.eliminate_vertex(u);

            let mut nb: Vec<usize> = nb.into_iter().collect();
            nb.sort_unstable();
            for u in nb {
                pq.insert(u, selector.value(u));
            }
        }

        if selector.graph().order() > 0 {
            let mut rest: Vec<usize> = selector.graph().vertices().collect();
            rest.sort_unstable();
            let u = rest.remove(0);
            bags.insert(u, rest.into_iter().collect());
            stack.push(u);
        }

        for v in stack.iter().rev() {
            let mut nb = bags.remove(v).unwrap_or_default();
            let old_bag_id = tree_decomposition
                .bags
                .iter()
                .find(|old_bag| old_bag.vertex_set.is_superset(&nb))
                .map(|old_bag| old_bag.id);
            nb.insert(*v);
            let id = tree_decomposition.add_bag(nb);
            if let Some(old_bag_id) = old_bag_id {
                tree_decomposition.add_edge(old_bag_id, id);
            }
        }
        tree_decomposition.flatten();
        debug!(
            "Heuristic decomposition: {} bags, width {}",
            tree_decomposition.bags().len(),
            tree_decomposition.width()
        );
        tree_decomposition
    }
}

#[cfg(test)]
mod tests {
    use crate::generator::RandomGraphBuilder;
    use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
    use crate::heuristic_elimination_order::{
        MinDegreeDecomposer, MinFillDecomposer, MinFillSelector, Selector,
    };
    use fxhash::FxHashMap;

    fn random_graph(seed: u64, n: usize, density: f64) -> HashMapGraph {
        RandomGraphBuilder::new()
            .seed(seed)
            .vertices(n)
            .density(density)
            .build()
            .unwrap()
            .0
    }

    #[test]
    fn fill_in_cache() {
        let mut graph = random_graph(11, 30, 0.2);
        let mut selector = MinFillSelector::from(graph.clone());

        let mut vertices: Vec<_> = graph.sorted_vertices();
        while let Some(v) = vertices.pop() {
            graph.eliminate_vertex(v);
            selector.eliminate_vertex(v);

            assert_eq!(selector.graph().sorted_vertices(), graph.sorted_vertices());
            let fc1: FxHashMap<_, _> = vertices
                .iter()
                .map(|v| (*v, graph.fill_in_count(*v) as i64))
                .collect();
            let fc2: FxHashMap<_, _> = vertices.iter().map(|v| (*v, selector.value(*v))).collect();
            assert_eq!(fc1, fc2);
        }
    }

    #[test]
    fn valid_decompositions() {
        for seed in 0..5 {
            let graph = random_graph(seed, 25, 0.15);
            let td = MinFillDecomposer::with_graph(&graph).compute();
            assert!(td.verify(&graph).is_ok());
            let td = MinDegreeDecomposer::with_graph(&graph).compute();
            assert!(td.verify(&graph).is_ok());
        }
    }

    #[test]
    fn tree_has_width_one() {
        let mut graph = HashMapGraph::new();
        graph.add_edge(0, 1);
        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(3, 4);
        let td = MinFillDecomposer::with_graph(&graph).compute();
        assert!(td.verify(&graph).is_ok());
        assert_eq!(td.width(), 1);
    }

    #[test]
    fn clique_is_single_bag() {
        let mut graph = HashMapGraph::with_vertices(5);
        graph.make_clique(&[0, 1, 2, 3, 4]);
        let td = MinDegreeDecomposer::with_graph(&graph).compute();
        assert!(td.verify(&graph).is_ok());
        assert_eq!(td.bags().len(), 1);
        assert_eq!(td.width(), 4);
    }

    #[test]
    fn single_vertex() {
        let graph = HashMapGraph::with_vertices(1);
        let td = MinFillDecomposer::with_graph(&graph).compute();
        assert_eq!(td.bags().len(), 1);
        assert_eq!(td.bags()[0].sorted_vertices(), vec![0]);
        assert!(td.edges().is_empty());
    }
}
