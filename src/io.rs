//! Comma separated instance files as consumed by the TD-IS solver.
//!
//! A graph file lists one `<vertex>,,<weight>` line per vertex followed by one
//! `<u>,<v>` line per edge. A tree decomposition file lists one
//! `<bag>,,<v1>;<v2>;...` line per bag followed by one `<bag>,<bag>,` line per
//! tree edge. Bags are named `N0`, `N1`, ... in the order they are stored.

use crate::error::InstanceError;
use crate::generator::WeightVector;
use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
use crate::tree_decomposition::TreeDecomposition;
use fxhash::{FxHashMap, FxHashSet};
use std::convert::TryFrom;
use std::io;
use std::io::{BufRead, Write};

pub struct GraphWriter<'a> {
    graph: &'a HashMapGraph,
    weights: &'a [usize],
}

impl<'a> GraphWriter<'a> {
    /// `weights[v]` must exist for every vertex `v` of `graph`.
    pub fn new(graph: &'a HashMapGraph, weights: &'a [usize]) -> Self {
        Self { graph, weights }
    }

    pub fn render(&self) -> String {
        let mut content = self
            .graph
            .sorted_vertices()
            .into_iter()
            .map(|v| format!("{},,{}", v, self.weights[v]))
            .collect::<Vec<_>>()
            .join("\n");
        content.push('\n');
        content.push_str(
            &self
                .graph
                .edges()
                .into_iter()
                .map(|(u, v)| format!("{},{}", u, v))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        content
    }

    pub fn output<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

pub struct TreeDecompositionWriter<'a> {
    td: &'a TreeDecomposition,
}

impl<'a> TreeDecompositionWriter<'a> {
    pub fn new(td: &'a TreeDecomposition) -> Self {
        Self { td }
    }

    pub fn render(&self) -> String {
        let names: FxHashMap<usize, String> = self
            .td
            .bags()
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id, format!("N{}", i)))
            .collect();

        let mut content = String::new();
        for bag in self.td.bags() {
            let members = bag
                .sorted_vertices()
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(";");
            content.push_str(&format!("{},,{}\n", names[&bag.id], members));
        }
        content.push_str(
            &self
                .td
                .edges()
                .into_iter()
                .map(|(a, b)| format!("{},{},", names[&a], names[&b]))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        content
    }

    pub fn output<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

/// One parsed, non-empty line: `(first, second, payload)`.
fn split_line(line: &str) -> Option<(&str, &str, &str)> {
    let mut splits = line.split(',');
    let first = splits.next()?.trim();
    if first.is_empty() {
        return None;
    }
    let second = splits.next().unwrap_or("").trim();
    let payload = splits.next().unwrap_or("").trim();
    Some((first, second, payload))
}

/// Assigns consecutive indices to names in order of first appearance.
#[derive(Debug, Default, Clone)]
struct NameTable {
    indices: FxHashMap<String, usize>,
    names: Vec<String>,
}

impl NameTable {
    fn register(&mut self, name: &str) -> (usize, bool) {
        if let Some(idx) = self.indices.get(name) {
            return (*idx, false);
        }
        let idx = self.names.len();
        self.indices.insert(name.to_string(), idx);
        self.names.push(name.to_string());
        (idx, true)
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ParsedGraph {
    pub graph: HashMapGraph,
    pub weights: WeightVector,
    /// `names[i]` is the label vertex `i` had in the file.
    pub names: Vec<String>,
    vertices: NameTable,
}

impl ParsedGraph {
    pub fn vertex_index(&self, name: &str) -> Option<usize> {
        self.vertices.get(name)
    }
}

pub struct GraphReader<T: BufRead>(pub T);

impl<T: BufRead> TryFrom<GraphReader<T>> for ParsedGraph {
    type Error = InstanceError;

    fn try_from(reader: GraphReader<T>) -> Result<Self, Self::Error> {
        let mut table = NameTable::default();
        let mut graph = HashMapGraph::new();
        let mut weights: WeightVector = Vec::new();

        let mut register = |name: &str, graph: &mut HashMapGraph, weights: &mut WeightVector| {
            let (idx, new) = table.register(name);
            if new {
                graph.add_vertex(idx);
                weights.push(0);
            }
            idx
        };

        for (i, line) in reader.0.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            let (first, second, payload) = match split_line(&line) {
                Some(splits) => splits,
                None => continue,
            };
            let u = register(first, &mut graph, &mut weights);

            if !second.is_empty() {
                let v = register(second, &mut graph, &mut weights);
                if u == v {
                    return Err(InstanceError::parse(
                        line_number,
                        format!("self loop at vertex '{}'", first),
                    ));
                }
                graph.add_edge(u, v);
                continue;
            }

            if payload.is_empty() {
                continue;
            }
            weights[u] = payload.parse().map_err(|e| {
                InstanceError::parse(
                    line_number,
                    format!("weight '{}' is not a positive integer: {}", payload, e),
                )
            })?;
        }

        Ok(ParsedGraph {
            graph,
            weights,
            names: table.names.clone(),
            vertices: table,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ParsedTreeDecomposition {
    /// Bags reference vertices by their index in the [`ParsedGraph`].
    pub tree_decomposition: TreeDecomposition,
    /// `names[i]` is the label bag `i` had in the file.
    pub names: Vec<String>,
}

pub struct TreeDecompositionReader<T: BufRead>(pub T);

impl<T: BufRead> TreeDecompositionReader<T> {
    pub fn read(self, graph: &ParsedGraph) -> Result<ParsedTreeDecomposition, InstanceError> {
        let mut table = NameTable::default();
        let mut bags: Vec<FxHashSet<usize>> = Vec::new();
        let mut edges: Vec<(usize, usize)> = Vec::new();

        let mut register = |name: &str, bags: &mut Vec<FxHashSet<usize>>| {
            let (idx, new) = table.register(name);
            if new {
                bags.push(FxHashSet::default());
            }
            idx
        };

        for (i, line) in self.0.lines().enumerate() {
            let line = line?;
            let line_number = i + 1;
            let (first, second, payload) = match split_line(&line) {
                Some(splits) => splits,
                None => continue,
            };
            let a = register(first, &mut bags);

            if !second.is_empty() {
                let b = register(second, &mut bags);
                if a == b {
                    return Err(InstanceError::parse(
                        line_number,
                        format!("self loop at bag '{}'", first),
                    ));
                }
                edges.push((a, b));
                continue;
            }

            for member in payload.split(';').map(str::trim).filter(|m| !m.is_empty()) {
                let v = graph.vertex_index(member).ok_or_else(|| {
                    InstanceError::parse(
                        line_number,
                        format!("bag '{}' contains unknown vertex '{}'", first, member),
                    )
                })?;
                bags[a].insert(v);
            }
        }

        let mut tree_decomposition = TreeDecomposition::default();
        for bag in bags {
            tree_decomposition.add_bag(bag);
        }
        for (a, b) in edges {
            tree_decomposition.add_edge(a, b);
        }
        Ok(ParsedTreeDecomposition {
            tree_decomposition,
            names: table.names,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::InstanceError;
    use crate::graph::{BaseGraph, HashMapGraph, MutableGraph};
    use crate::io::{
        GraphReader, GraphWriter, ParsedGraph, TreeDecompositionReader, TreeDecompositionWriter,
    };
    use crate::tree_decomposition::TreeDecomposition;
    use std::convert::TryFrom;
    use std::io::Cursor;

    fn parse_graph(content: &str) -> Result<ParsedGraph, InstanceError> {
        ParsedGraph::try_from(GraphReader(Cursor::new(content)))
    }

    fn path_decomposition() -> TreeDecomposition {
        let mut td = TreeDecomposition::default();
        td.add_bag([2, 1].iter().copied().collect());
        td.add_bag([0, 1].iter().copied().collect());
        td.add_bag([2, 3].iter().copied().collect());
        td.add_edge(0, 1);
        td.add_edge(2, 0);
        td
    }

    fn path_graph() -> HashMapGraph {
        let mut graph = HashMapGraph::new();
        graph.add_edge(1, 0);
        graph.add_edge(1, 2);
        graph.add_edge(3, 2);
        graph
    }

    #[test]
    fn render_graph() {
        let rendered = GraphWriter::new(&path_graph(), &[4, 1, 7, 2]).render();
        assert_eq!(rendered, "0,,4\n1,,1\n2,,7\n3,,2\n0,1\n1,2\n2,3");
    }

    #[test]
    fn render_graph_without_edges() {
        let graph = HashMapGraph::with_vertices(1);
        assert_eq!(GraphWriter::new(&graph, &[5]).render(), "0,,5\n");
    }

    #[test]
    fn render_complete_graph() {
        let mut graph = HashMapGraph::with_vertices(4);
        graph.make_clique(&[0, 1, 2, 3]);
        let rendered = GraphWriter::new(&graph, &[1, 2, 3, 4]).render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines.iter().filter(|l| l.contains(",,")).count(), 4);
        assert_eq!(lines[4..], ["0,1", "0,2", "0,3", "1,2", "1,3", "2,3"]);
    }

    #[test]
    fn render_tree_decomposition() {
        let rendered = TreeDecompositionWriter::new(&path_decomposition()).render();
        assert_eq!(rendered, "N0,,1;2\nN1,,0;1\nN2,,2;3\nN0,N1,\nN0,N2,");
    }

    #[test]
    fn render_single_bag() {
        let td = TreeDecomposition::with_root([0].iter().copied().collect());
        assert_eq!(TreeDecompositionWriter::new(&td).render(), "N0,,0\n");
    }

    #[test]
    fn graph_round_trip() {
        let graph = path_graph();
        let weights = vec![4, 1, 7, 2];
        let mut buffer = Vec::new();
        GraphWriter::new(&graph, &weights).output(&mut buffer).unwrap();

        let parsed = parse_graph(std::str::from_utf8(&buffer).unwrap()).unwrap();
        assert_eq!(parsed.graph.order(), 4);
        assert_eq!(parsed.weights, weights);
        assert_eq!(parsed.names, vec!["0", "1", "2", "3"]);
        assert_eq!(parsed.graph.edges(), graph.edges());
    }

    #[test]
    fn tree_decomposition_round_trip() {
        let graph = path_graph();
        let parsed_graph =
            parse_graph(&GraphWriter::new(&graph, &[1, 1, 1, 1]).render()).unwrap();
        let rendered = TreeDecompositionWriter::new(&path_decomposition()).render();

        let parsed = TreeDecompositionReader(Cursor::new(rendered))
            .read(&parsed_graph)
            .unwrap();
        assert_eq!(parsed.names, vec!["N0", "N1", "N2"]);
        let td = parsed.tree_decomposition;
        assert_eq!(td.edges(), vec![(0, 1), (0, 2)]);
        assert_eq!(td.bags()[0].sorted_vertices(), vec![1, 2]);
        assert!(td.verify(&parsed_graph.graph).is_ok());
    }

    #[test]
    fn named_vertices() {
        let parsed = parse_graph("a,,3\n\nb,,4\n,,9\nb,c\na,b,label\nc,,1").unwrap();
        assert_eq!(parsed.names, vec!["a", "b", "c"]);
        assert_eq!(parsed.weights, vec![3, 4, 1]);
        assert_eq!(parsed.graph.edges(), vec![(0, 1), (1, 2)]);
        assert_eq!(parsed.vertex_index("c"), Some(2));

        let td = TreeDecompositionReader(Cursor::new("X,,a;b\nY,,b ; c;\nX,Y,"))
            .read(&parsed)
            .unwrap();
        assert_eq!(td.tree_decomposition.bags()[1].sorted_vertices(), vec![1, 2]);
        assert!(td.tree_decomposition.verify(&parsed.graph).is_ok());
    }

    #[test]
    fn invalid_weight() {
        match parse_graph("0,,1\n1,,x\n0,1") {
            Err(InstanceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unknown_bag_member() {
        let parsed = parse_graph("0,,1\n1,,1\n0,1").unwrap();
        match TreeDecompositionReader(Cursor::new("N0,,0;1\nN1,,1;7\nN0,N1,")).read(&parsed) {
            Err(InstanceError::Parse { line, msg }) => {
                assert_eq!(line, 2);
                assert!(msg.contains("'7'"));
            }
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn self_loop() {
        assert!(matches!(
            parse_graph("0,,1\n0,0"),
            Err(InstanceError::Parse { line: 2, .. })
        ));
    }
}
