use crate::graph::HashMapGraph;
use crate::heuristic_elimination_order::{MinDegreeDecomposer, MinFillDecomposer};
use crate::tree_decomposition::TreeDecomposition;
use std::fmt;
use std::str::FromStr;

/// Computes a tree decomposition of a graph.
///
/// Implementations must return a tree whose bags cover every vertex and every
/// edge of `graph`, with the bags containing any vertex forming a subtree.
pub trait Decomposer {
    fn decompose(&self, graph: &HashMapGraph) -> TreeDecomposition;
}

impl<F> Decomposer for F
where
    F: Fn(&HashMapGraph) -> TreeDecomposition,
{
    fn decompose(&self, graph: &HashMapGraph) -> TreeDecomposition {
        self(graph)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpperboundHeuristicType {
    MinFill,
    MinDegree,
    /// Runs every heuristic and keeps the decomposition of smallest width.
    All,
}

impl Default for UpperboundHeuristicType {
    fn default() -> Self {
        Self::All
    }
}

impl Decomposer for UpperboundHeuristicType {
    fn decompose(&self, graph: &HashMapGraph) -> TreeDecomposition {
        match self {
            UpperboundHeuristicType::MinFill => MinFillDecomposer::with_graph(graph).compute(),
            UpperboundHeuristicType::MinDegree => MinDegreeDecomposer::with_graph(graph).compute(),
            UpperboundHeuristicType::All => {
                let a = MinFillDecomposer::with_graph(graph).compute();
                let b = MinDegreeDecomposer::with_graph(graph).compute();
                if b.max_bag_size < a.max_bag_size {
                    b
                } else {
                    a
                }
            }
        }
    }
}

impl FromStr for UpperboundHeuristicType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-fill" => Ok(Self::MinFill),
            "min-degree" => Ok(Self::MinDegree),
            "all" => Ok(Self::All),
            _ => Err(format!(
                "unknown heuristic '{}', expected one of min-fill, min-degree, all",
                s
            )),
        }
    }
}

impl fmt::Display for UpperboundHeuristicType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MinFill => f.write_str("min-fill"),
            Self::MinDegree => f.write_str("min-degree"),
            Self::All => f.write_str("all"),
        }
    }
}
