use log::{error, info, LevelFilter};
use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;
use structopt::StructOpt;
use tdis_gen::graph::BaseGraph;
use tdis_gen::io::{GraphReader, ParsedGraph, TreeDecompositionReader};
use tdis_gen::{InstanceError, InstanceWriter, RandomGraphBuilder, UpperboundHeuristicType};

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "tdis-gen-cli",
    about = "Generates random weighted graphs with tree decompositions for the TD-IS solver."
)]
struct Opt {
    /// Log debug output, including the generated files.
    #[structopt(short, long)]
    verbose: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Generates a connected graph and writes `<name>G.csv` and `<name>TD.csv`.
    Generate {
        /// Number of vertices.
        #[structopt(short = "n", long)]
        vertices: usize,

        /// Minimum edge density in (0, 1].
        #[structopt(short, long)]
        density: f64,

        /// Vertex weights are drawn from [1, upper-weight].
        #[structopt(short, long, default_value = "10")]
        upper_weight: usize,

        /// Instance name, used as file name prefix.
        #[structopt(long)]
        name: String,

        /// Output directory.
        #[structopt(long, parse(from_os_str), default_value = "../TD-IS/instances")]
        directory: PathBuf,

        /// Seed for the random generator. Random if not specified.
        #[structopt(short, long)]
        seed: Option<u64>,

        /// Gives up after this many disconnected graphs. Unbounded if not specified.
        #[structopt(long)]
        max_attempts: Option<usize>,

        /// Decomposition heuristic: min-fill, min-degree or all.
        #[structopt(long, default_value = "all")]
        heuristic: UpperboundHeuristicType,
    },
    /// Reads an instance and verifies the tree decomposition against the graph.
    Check {
        #[structopt(parse(from_os_str))]
        graph: PathBuf,

        #[structopt(parse(from_os_str))]
        tree_decomposition: PathBuf,
    },
}

fn run(command: Command) -> Result<(), InstanceError> {
    match command {
        Command::Generate {
            vertices,
            density,
            upper_weight,
            name,
            directory,
            seed,
            max_attempts,
            heuristic,
        } => {
            let mut builder = RandomGraphBuilder::new();
            if let Some(seed) = seed {
                builder.seed(seed);
            }
            builder
                .vertices(vertices)
                .density(density)
                .upper_weight(upper_weight)
                .max_attempts(max_attempts);
            info!("Using {} heuristic", heuristic);
            InstanceWriter::new(directory).write_instance(&mut builder, &heuristic, &name)?;
            Ok(())
        }
        Command::Check {
            graph,
            tree_decomposition,
        } => {
            let parsed = ParsedGraph::try_from(GraphReader(BufReader::new(File::open(graph)?)))?;
            let td = TreeDecompositionReader(BufReader::new(File::open(tree_decomposition)?))
                .read(&parsed)?
                .tree_decomposition;
            td.verify(&parsed.graph)?;
            println!(
                "vertices: {}, edges: {}, bags: {}, width: {}",
                parsed.graph.order(),
                parsed.graph.size(),
                td.bags().len(),
                td.width()
            );
            Ok(())
        }
    }
}

fn main() {
    let opt = Opt::from_args();

    if opt.verbose {
        tdis_gen::log::build_logger_for_level(LevelFilter::Debug);
    } else if std::env::var_os("RUST_LOG").is_some() {
        tdis_gen::log::build_logger();
    } else {
        tdis_gen::log::build_logger_for_level(LevelFilter::Info);
    }

    #[cfg(feature = "handle-ctrlc")]
    if let Err(e) = tdis_gen::signals::initialize() {
        error!("Could not install Ctrl-C handler: {}", e);
    }

    if let Err(e) = run(opt.command) {
        error!("{}", e);
        process::exit(1);
    }
}
