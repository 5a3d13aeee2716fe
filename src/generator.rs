use crate::error::InstanceError;
use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
#[cfg(feature = "handle-ctrlc")]
use crate::signals::received_ctrl_c;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Weight of vertex `i` at index `i`.
pub type WeightVector = Vec<usize>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    pub num_vertices: usize,
    /// Lower bound for `|E| / (n(n-1)/2)` of the accepted graph.
    pub density: f64,
    pub upper_weight: usize,
    /// Bound on rejected graphs. `None` retries until a connected graph is found.
    pub max_attempts: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_vertices: 10,
            density: 0.3,
            upper_weight: 10,
            max_attempts: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), InstanceError> {
        if self.num_vertices < 1 {
            return Err(InstanceError::InvalidParameter(
                "number of vertices must be at least 1".into(),
            ));
        }
        if !(self.density > 0f64 && self.density <= 1f64) {
            return Err(InstanceError::InvalidParameter(format!(
                "density must be in (0, 1], got {}",
                self.density
            )));
        }
        if self.upper_weight < 1 {
            return Err(InstanceError::InvalidParameter(
                "upper weight must be at least 1".into(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(InstanceError::InvalidParameter(
                "maximum number of attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Rejection-samples a connected graph with at least the configured density and
/// assigns uniform weights in `[1, upper_weight]`.
///
/// Every attempt starts from scratch: each vertex first gets one edge to a random
/// other vertex, then random edges are added until the density is reached. Graphs
/// that end up disconnected are thrown away as a whole.
pub fn create_random_graph<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<(HashMapGraph, WeightVector), InstanceError> {
    config.validate()?;

    let mut attempts = 0;
    let graph = loop {
        if let Some(max_attempts) = config.max_attempts {
            if attempts >= max_attempts {
                return Err(InstanceError::AttemptsExhausted(max_attempts));
            }
        }
        #[cfg(feature = "handle-ctrlc")]
        if received_ctrl_c() {
            return Err(InstanceError::Interrupted);
        }
        attempts += 1;

        let graph = random_dense_graph(rng, config.num_vertices, config.density);
        if graph.is_connected() {
            break graph;
        }
        debug!(
            "Attempt {} rejected: {} edges but {} components",
            attempts,
            graph.size(),
            graph.connected_components().len()
        );
    };

    let weights: WeightVector = (0..config.num_vertices)
        .map(|_| rng.gen_range(1..=config.upper_weight))
        .collect();

    info!(
        "Generated connected graph after {} attempt(s): {} vertices, {} edges, density {:.3}",
        attempts,
        graph.order(),
        graph.size(),
        graph.density()
    );
    Ok((graph, weights))
}

/// Uniform vertex in `0..n` other than `v`. Requires `n >= 2`.
fn other_vertex<R: Rng + ?Sized>(rng: &mut R, n: usize, v: usize) -> usize {
    let w = rng.gen_range(0..n - 1);
    if w >= v {
        w + 1
    } else {
        w
    }
}

fn random_dense_graph<R: Rng + ?Sized>(rng: &mut R, n: usize, density: f64) -> HashMapGraph {
    let mut graph = HashMapGraph::with_vertices(n);
    if n < 2 {
        return graph;
    }

    let max_edges = (n as f64) * ((n - 1) as f64) / 2f64;
    let mut edges = 0usize;
    for v in 0..n {
        let w = other_vertex(rng, n, v);
        if !graph.has_edge(v, w) {
            graph.add_edge(v, w);
            edges += 1;
        }
    }

    while (edges as f64) / max_edges < density {
        let v = rng.gen_range(0..n);
        let w = other_vertex(rng, n, v);
        if !graph.has_edge(v, w) {
            graph.add_edge(v, w);
            edges += 1;
        }
    }
    graph
}

pub struct RandomGraphBuilder {
    pub rng: StdRng,
    pub config: GeneratorConfig,
}

impl Default for RandomGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomGraphBuilder {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            config,
        }
    }

    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn vertices(&mut self, num_vertices: usize) -> &mut Self {
        self.config.num_vertices = num_vertices;
        self
    }

    pub fn density(&mut self, density: f64) -> &mut Self {
        self.config.density = density;
        self
    }

    pub fn upper_weight(&mut self, upper_weight: usize) -> &mut Self {
        self.config.upper_weight = upper_weight;
        self
    }

    pub fn max_attempts(&mut self, max_attempts: Option<usize>) -> &mut Self {
        self.config.max_attempts = max_attempts;
        self
    }

    pub fn build(&mut self) -> Result<(HashMapGraph, WeightVector), InstanceError> {
        create_random_graph(&mut self.rng, &self.config)
    }
}
