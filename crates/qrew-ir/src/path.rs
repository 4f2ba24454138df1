//! Contiguous walks along a single wire.

use crate::error::{IrError, IrResult};
use crate::graph::{CircuitGraph, EdgeIndex, NodeIndex};
use crate::qubit::WireId;

/// A contiguous run of edges along one wire.
///
/// A path of length `d` has `d` edges and `d + 1` nodes. The nodes the walk
/// steps onto (every node but the start) form the path's *window*, which is
/// what rewrite rules match against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePath {
    wire: WireId,
    nodes: Vec<NodeIndex>,
    edges: Vec<EdgeIndex>,
}

impl WirePath {
    /// Walk from `start` to `end` along `wire`.
    ///
    /// Fails with [`IrError::BrokenWire`] if `end` is not reachable, which
    /// only happens when the single-path invariant is broken.
    pub fn new(
        graph: &CircuitGraph,
        wire: WireId,
        start: NodeIndex,
        end: NodeIndex,
    ) -> IrResult<Self> {
        let path = Self::walk(graph, wire, start, Some(end), usize::MAX)?;
        if path.end() != end {
            return Err(IrError::BrokenWire {
                wire,
                from: format!("node {}", start.index()),
            });
        }
        Ok(path)
    }

    /// Walk from `start` towards `end`, stopping early after `max_len` edges.
    pub fn bounded(
        graph: &CircuitGraph,
        wire: WireId,
        start: NodeIndex,
        end: NodeIndex,
        max_len: usize,
    ) -> IrResult<Self> {
        Self::walk(graph, wire, start, Some(end), max_len)
    }

    /// Walk from `start` for up to `max_len` edges or until the wire's output.
    pub fn from_node(
        graph: &CircuitGraph,
        wire: WireId,
        start: NodeIndex,
        max_len: usize,
    ) -> IrResult<Self> {
        Self::walk(graph, wire, start, None, max_len)
    }

    /// The whole wire, Input sentinel to Output sentinel.
    pub fn full(graph: &CircuitGraph, wire: WireId) -> IrResult<Self> {
        Self::new(graph, wire, graph.input_of(wire)?, graph.output_of(wire)?)
    }

    fn walk(
        graph: &CircuitGraph,
        wire: WireId,
        start: NodeIndex,
        end: Option<NodeIndex>,
        max_len: usize,
    ) -> IrResult<Self> {
        let output = graph.output_of(wire)?;
        let mut nodes = vec![start];
        let mut edges = Vec::new();
        let mut current = start;

        while edges.len() < max_len && Some(current) != end && current != output {
            // Every node is visited at most once on a well-formed wire.
            if nodes.len() > graph.num_gates() + 2 {
                return Err(IrError::BrokenWire {
                    wire,
                    from: format!("node {}", start.index()),
                });
            }
            let edge = graph.out_edge(current, wire)?;
            current = graph.endpoints(edge)?.1;
            edges.push(edge);
            nodes.push(current);
        }

        if let Some(end) = end {
            if current == output && end != output && edges.len() < max_len {
                return Err(IrError::BrokenWire {
                    wire,
                    from: format!("node {}", start.index()),
                });
            }
        }

        Ok(Self { wire, nodes, edges })
    }

    /// The wire the path runs along.
    #[inline]
    pub fn wire(&self) -> WireId {
        self.wire
    }

    /// First node.
    #[inline]
    pub fn start(&self) -> NodeIndex {
        self.nodes[0]
    }

    /// Last node.
    #[inline]
    pub fn end(&self) -> NodeIndex {
        self.nodes[self.nodes.len() - 1]
    }

    /// Nodes strictly between start and end.
    pub fn inner_nodes(&self) -> &[NodeIndex] {
        match self.nodes.len() {
            0..=2 => &[],
            n => &self.nodes[1..n - 1],
        }
    }

    /// Nodes the walk steps onto: inner nodes followed by the end node.
    pub fn window(&self) -> &[NodeIndex] {
        &self.nodes[1..]
    }

    /// All nodes, start to end.
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Edges, in walk order.
    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    /// Number of edges (inner node count + 1 for a non-empty path).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the path has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// For every node on the path, the longest sub-path starting there that
    /// stays within this path and has at most `max_len` edges.
    ///
    /// The result has one entry per node, so it can be indexed by position.
    pub fn sub_paths(&self, max_len: usize) -> Vec<WirePath> {
        (0..self.nodes.len())
            .map(|i| {
                let last_edge = (i + max_len).min(self.edges.len());
                WirePath {
                    wire: self.wire,
                    nodes: self.nodes[i..=last_edge].to_vec(),
                    edges: self.edges[i..last_edge].to_vec(),
                }
            })
            .collect()
    }
}
