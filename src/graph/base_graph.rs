use std::fmt::Debug;

pub trait BaseGraph: Clone + Debug {
    fn degree(&self, u: usize) -> usize;
    fn order(&self) -> usize;
    fn has_edge(&self, u: usize, v: usize) -> bool;
    fn vertices(&self) -> Box<dyn Iterator<Item = usize> + '_>;
    fn neighborhood(&self, u: usize) -> Box<dyn Iterator<Item = usize> + '_>;
    fn fill_in_count(&self, u: usize) -> usize;

    /// Number of edges.
    fn size(&self) -> usize {
        self.vertices().map(|v| self.degree(v)).sum::<usize>() / 2
    }

    /// Ratio of present edges to the `n(n-1)/2` possible ones. A graph with
    /// fewer than two vertices counts as complete.
    fn density(&self) -> f64 {
        let n = self.order();
        if n < 2 {
            return 1f64;
        }
        let max_edges = (n * (n - 1)) as f64 / 2f64;
        self.size() as f64 / max_edges
    }

    /// All edges as `(u, v)` with `u < v`, sorted lexicographically.
    fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .vertices()
            .flat_map(|u| {
                self.neighborhood(u)
                    .filter(move |v| u < *v)
                    .map(move |v| (u, v))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}
