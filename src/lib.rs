pub(crate) mod datastructures;

pub mod error;
pub mod generator;
pub mod graph;
pub mod heuristic_elimination_order;
pub mod instance;
pub mod io;
pub mod solver;
pub mod tree_decomposition;

#[cfg(feature = "cli")]
pub mod log;
#[cfg(feature = "handle-ctrlc")]
pub mod signals;

pub use error::InstanceError;
pub use generator::{create_random_graph, GeneratorConfig, RandomGraphBuilder, WeightVector};
pub use instance::{write_instance, Instance, InstanceWriter};
pub use solver::{Decomposer, UpperboundHeuristicType};
