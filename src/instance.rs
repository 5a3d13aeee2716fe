use crate::error::InstanceError;
use crate::generator::{RandomGraphBuilder, WeightVector};
use crate::graph::{BaseGraph, HashMapGraph};
use crate::io::{GraphWriter, TreeDecompositionWriter};
use crate::solver::{Decomposer, UpperboundHeuristicType};
use crate::tree_decomposition::TreeDecomposition;
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Where the TD-IS solver looks for its instances, relative to the generator.
pub const DEFAULT_INSTANCE_DIRECTORY: &str = "../TD-IS/instances";

#[derive(Debug, Clone)]
pub struct Instance {
    pub graph: HashMapGraph,
    pub weights: WeightVector,
    pub tree_decomposition: TreeDecomposition,
}

pub struct InstanceWriter {
    directory: PathBuf,
    interrupted: fn() -> bool,
}

#[cfg(feature = "handle-ctrlc")]
fn interrupted() -> bool {
    crate::signals::received_ctrl_c()
}

#[cfg(not(feature = "handle-ctrlc"))]
fn interrupted() -> bool {
    false
}

impl Default for InstanceWriter {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE_DIRECTORY)
    }
}

impl InstanceWriter {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            interrupted,
        }
    }

    /// Replaces the check that is polled before any file is written. By
    /// default it reports whether Ctrl-C was received.
    pub fn with_interrupt_check(mut self, interrupted: fn() -> bool) -> Self {
        self.interrupted = interrupted;
        self
    }

    pub fn graph_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}G.csv", name))
    }

    pub fn tree_decomposition_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{}TD.csv", name))
    }

    /// Generates a graph, decomposes it and writes `<name>G.csv` and
    /// `<name>TD.csv`, replacing existing files.
    ///
    /// An interrupt during decomposition leaves the heuristic with a valid
    /// but degenerate decomposition, so nothing is written in that case and
    /// [`InstanceError::Interrupted`] is returned.
    pub fn write_instance<D: Decomposer + ?Sized>(
        &self,
        builder: &mut RandomGraphBuilder,
        decomposer: &D,
        name: &str,
    ) -> Result<Instance, InstanceError> {
        let (graph, weights) = builder.build()?;
        let tree_decomposition = decomposer.decompose(&graph);
        tree_decomposition.verify(&graph)?;
        if (self.interrupted)() {
            warn!("Interrupted, instance '{}' is not written", name);
            return Err(InstanceError::Interrupted);
        }
        info!(
            "Instance '{}': {} vertices, {} edges, {} bags, width {}",
            name,
            graph.order(),
            graph.size(),
            tree_decomposition.bags().len(),
            tree_decomposition.width()
        );

        let graph_writer = GraphWriter::new(&graph, &weights);
        let td_writer = TreeDecompositionWriter::new(&tree_decomposition);
        debug!("Graph:\n{}", graph_writer.render());
        debug!("Tree decomposition:\n{}", td_writer.render());

        let graph_path = self.graph_path(name);
        graph_writer.output(BufWriter::new(File::create(&graph_path)?))?;
        let td_path = self.tree_decomposition_path(name);
        td_writer.output(BufWriter::new(File::create(&td_path)?))?;
        info!("Wrote {} and {}", graph_path.display(), td_path.display());

        Ok(Instance {
            graph,
            weights,
            tree_decomposition,
        })
    }
}

/// Writes one instance into [`DEFAULT_INSTANCE_DIRECTORY`] using an entropy
/// seeded generator and the default heuristic decomposer.
pub fn write_instance(
    num_vertices: usize,
    density: f64,
    upper_weight: usize,
    name: &str,
) -> Result<Instance, InstanceError> {
    let mut builder = RandomGraphBuilder::new();
    builder
        .vertices(num_vertices)
        .density(density)
        .upper_weight(upper_weight);
    InstanceWriter::default().write_instance(
        &mut builder,
        &UpperboundHeuristicType::default(),
        name,
    )
}

#[cfg(test)]
mod tests {
    use crate::error::InstanceError;
    use crate::generator::RandomGraphBuilder;
    use crate::graph::{BaseGraph, HashMapGraph};
    use crate::instance::InstanceWriter;
    use crate::io::{GraphReader, ParsedGraph, TreeDecompositionReader};
    use crate::solver::UpperboundHeuristicType;
    use crate::tree_decomposition::{TreeDecomposition, TreeDecompositionValidationError};
    use std::collections::HashSet;
    use std::convert::TryFrom;
    use std::fs;
    use std::fs::File;
    use std::io::BufReader;
    use tempfile::tempdir;

    #[test]
    fn writes_both_files() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path());
        let mut builder = RandomGraphBuilder::new();
        builder.seed(5).vertices(15).density(0.25).upper_weight(20);

        let instance = writer
            .write_instance(&mut builder, &UpperboundHeuristicType::MinFill, "Test")
            .unwrap();

        let graph_file = File::open(dir.path().join("TestG.csv")).unwrap();
        let parsed = ParsedGraph::try_from(GraphReader(BufReader::new(graph_file))).unwrap();
        assert_eq!(parsed.graph.order(), 15);
        assert!(parsed.graph.is_connected());
        assert!(parsed.graph.density() >= 0.25);
        assert_eq!(parsed.weights, instance.weights);
        assert_eq!(parsed.graph.edges(), instance.graph.edges());

        let td_file = File::open(dir.path().join("TestTD.csv")).unwrap();
        let td = TreeDecompositionReader(BufReader::new(td_file))
            .read(&parsed)
            .unwrap();
        let expected: Vec<String> = (0..td.names.len()).map(|i| format!("N{}", i)).collect();
        assert_eq!(td.names, expected);
        assert_eq!(
            td.tree_decomposition.edges().len(),
            td.tree_decomposition.bags().len() - 1
        );
        assert!(td.tree_decomposition.verify(&parsed.graph).is_ok());
        let covered: HashSet<usize> = td
            .tree_decomposition
            .bags()
            .iter()
            .flat_map(|b| b.vertex_set.iter().copied())
            .collect();
        assert_eq!(covered.len(), 15);
    }

    #[test]
    fn single_vertex_instance() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path());
        let mut builder = RandomGraphBuilder::new();
        builder.seed(9).vertices(1).density(1.0).upper_weight(4);

        let instance = writer
            .write_instance(&mut builder, &UpperboundHeuristicType::All, "One")
            .unwrap();
        let graph = fs::read_to_string(writer.graph_path("One")).unwrap();
        assert_eq!(graph, format!("0,,{}\n", instance.weights[0]));
        let td = fs::read_to_string(writer.tree_decomposition_path("One")).unwrap();
        assert_eq!(td, "N0,,0\n");
    }

    #[test]
    fn same_seed_same_files() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        for dir in &[&first, &second] {
            let mut builder = RandomGraphBuilder::new();
            builder.seed(77).vertices(20).density(0.2).upper_weight(9);
            InstanceWriter::new(dir.path())
                .write_instance(&mut builder, &UpperboundHeuristicType::All, "Seeded")
                .unwrap();
        }
        for file in &["SeededG.csv", "SeededTD.csv"] {
            assert_eq!(
                fs::read_to_string(first.path().join(file)).unwrap(),
                fs::read_to_string(second.path().join(file)).unwrap()
            );
        }
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path());
        fs::write(writer.graph_path("Old"), "stale").unwrap();
        let mut builder = RandomGraphBuilder::new();
        builder.seed(1).vertices(4).density(1.0);
        writer
            .write_instance(&mut builder, &UpperboundHeuristicType::MinDegree, "Old")
            .unwrap();
        let graph = fs::read_to_string(writer.graph_path("Old")).unwrap();
        assert_eq!(graph.lines().count(), 10);
    }

    #[test]
    fn rejects_invalid_decomposition() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path());
        let mut builder = RandomGraphBuilder::new();
        builder.seed(2).vertices(6).density(0.5);
        let broken = |_: &HashMapGraph| TreeDecomposition::with_root([0].iter().copied().collect());
        match writer.write_instance(&mut builder, &broken, "Broken") {
            Err(InstanceError::InvalidDecomposition(TreeDecompositionValidationError::MissingVertex(
                1,
            ))) => {}
            other => panic!("expected invalid decomposition, got {:?}", other.map(|_| ())),
        }
        assert!(!writer.graph_path("Broken").exists());
    }

    #[test]
    fn interrupted_before_writing() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path()).with_interrupt_check(|| true);
        let mut builder = RandomGraphBuilder::new();
        builder.seed(4).vertices(12).density(0.3);
        assert!(matches!(
            writer.write_instance(&mut builder, &UpperboundHeuristicType::MinFill, "Stopped"),
            Err(InstanceError::Interrupted)
        ));
        assert!(!writer.graph_path("Stopped").exists());
        assert!(!writer.tree_decomposition_path("Stopped").exists());

        let writer = InstanceWriter::new(dir.path()).with_interrupt_check(|| false);
        let mut builder = RandomGraphBuilder::new();
        builder.seed(4).vertices(12).density(0.3);
        assert!(writer
            .write_instance(&mut builder, &UpperboundHeuristicType::MinFill, "Stopped")
            .is_ok());
        assert!(writer.tree_decomposition_path("Stopped").exists());
    }

    #[test]
    fn missing_directory() {
        let dir = tempdir().unwrap();
        let writer = InstanceWriter::new(dir.path().join("does-not-exist"));
        let mut builder = RandomGraphBuilder::new();
        builder.seed(3).vertices(3);
        assert!(matches!(
            writer.write_instance(&mut builder, &UpperboundHeuristicType::All, "X"),
            Err(InstanceError::Io(_))
        ));
    }
}
