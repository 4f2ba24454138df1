//! Per-wire circuit graph.
//!
//! Every elementary qubit owns one *wire*: an Input sentinel, an Output
//! sentinel, and a single linear thread of edges between them. A gate
//! application becomes one [`GateNode`] threaded onto every wire it touches,
//! whether as a target or as a guard.
//!
//! The graph is stored in a [`StableDiGraph`], so node and edge indices stay
//! valid while rules remove other nodes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::Direction;
use petgraph::stable_graph::{
    EdgeIndex as PetEdgeIndex, NodeIndex as PetNodeIndex, StableDiGraph,
};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::instruction::{GateApplication, Guard, Instruction, Program};
use crate::qubit::{Declaration, QubitRef, WireId};

/// Node index type for the circuit graph.
pub type NodeIndex = PetNodeIndex<u32>;

/// Edge index type for the circuit graph.
pub type EdgeIndex = PetEdgeIndex<u32>;

/// A guard relation between a gate node and a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuardRelation {
    /// The guarding wire.
    pub wire: WireId,
    /// Anti-control (`negctrl`) if set.
    pub negated: bool,
}

/// Payload of a gate node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateNode {
    /// The gate performed.
    pub gate: Gate,
    targets: Vec<WireId>,
    guards: Vec<GuardRelation>,
    order: usize,
}

impl GateNode {
    /// Target wires, in order.
    #[inline]
    pub fn targets(&self) -> &[WireId] {
        &self.targets
    }

    /// Guard relations.
    #[inline]
    pub fn guards(&self) -> &[GuardRelation] {
        &self.guards
    }

    /// Program position the node was created at; used to flatten stably.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Distinct wires the node touches: targets first, then guard wires.
    pub fn wires(&self) -> Vec<WireId> {
        let mut seen = FxHashSet::default();
        self.targets
            .iter()
            .copied()
            .chain(self.guards.iter().map(|g| g.wire))
            .filter(|w| seen.insert(*w))
            .collect()
    }

    /// Whether the node sits on `wire`.
    pub fn touches(&self, wire: WireId) -> bool {
        self.is_target(wire) || self.is_guard(wire)
    }

    /// Whether `wire` is one of the targets.
    pub fn is_target(&self, wire: WireId) -> bool {
        self.targets.contains(&wire)
    }

    /// Whether `wire` guards this node.
    pub fn is_guard(&self, wire: WireId) -> bool {
        self.guards.iter().any(|g| g.wire == wire)
    }

    /// Guard relations held on `wire`.
    pub fn guards_on(&self, wire: WireId) -> impl Iterator<Item = &GuardRelation> {
        self.guards.iter().filter(move |g| g.wire == wire)
    }

    /// Whether the node carries no guards at all.
    #[inline]
    pub fn is_unguarded(&self) -> bool {
        self.guards.is_empty()
    }

    /// Whether the guard set of `self` is contained in that of `other`.
    pub fn guards_subset_of(&self, other: &GateNode) -> bool {
        self.guards.iter().all(|g| other.guards.contains(g))
    }

    /// Same gate, same targets in order, mutually equal guard sets.
    pub fn semantically_eq(&self, other: &GateNode) -> bool {
        self.gate == other.gate
            && self.targets == other.targets
            && self.guards_subset_of(other)
            && other.guards_subset_of(self)
    }
}

/// A node in the circuit graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CircuitNode {
    /// Input sentinel of a wire.
    Input(WireId),
    /// Output sentinel of a wire.
    Output(WireId),
    /// A gate application.
    Gate(GateNode),
}

impl CircuitNode {
    /// Check if this is an input node.
    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, CircuitNode::Input(_))
    }

    /// Check if this is an output node.
    #[inline]
    pub fn is_output(&self) -> bool {
        matches!(self, CircuitNode::Output(_))
    }

    /// Get the gate payload if this is a gate node.
    #[inline]
    pub fn as_gate(&self) -> Option<&GateNode> {
        match self {
            CircuitNode::Gate(gate) => Some(gate),
            _ => None,
        }
    }
}

/// An edge in the circuit graph; every edge belongs to exactly one wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireEdge {
    /// The wire this edge belongs to.
    pub wire: WireId,
}

#[derive(Debug, Clone)]
struct WireInfo {
    qubit: QubitRef,
    input: NodeIndex,
    output: NodeIndex,
}

/// Graph of gate nodes threaded onto per-qubit wires.
#[derive(Debug, Clone, Default)]
pub struct CircuitGraph {
    graph: StableDiGraph<CircuitNode, WireEdge, u32>,
    /// Indexed by `WireId`.
    wires: Vec<WireInfo>,
    lookup: FxHashMap<QubitRef, WireId>,
    declarations: Vec<Declaration>,
    next_order: usize,
}

impl CircuitGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a flat program.
    ///
    /// After construction each wire enumerates exactly the gate applications
    /// that touch it, in program order.
    pub fn from_program(program: &Program) -> IrResult<Self> {
        let mut graph = Self::new();
        for instruction in program {
            match instruction {
                Instruction::Declare(decl) => {
                    graph.declare(decl)?;
                }
                Instruction::Apply(app) => {
                    graph.apply(app)?;
                }
            }
        }
        Ok(graph)
    }

    /// Declare a qubit or register, creating one wire per elementary qubit.
    pub fn declare(&mut self, decl: &Declaration) -> IrResult<Vec<WireId>> {
        if self.declarations.iter().any(|d| d.name == decl.name) {
            return Err(IrError::DuplicateDeclaration(decl.name.clone()));
        }
        self.declarations.push(decl.clone());
        Ok(decl.qubits().into_iter().map(|q| self.add_wire(q)).collect())
    }

    fn add_wire(&mut self, qubit: QubitRef) -> WireId {
        let wire = WireId::from(self.wires.len());
        let input = self.graph.add_node(CircuitNode::Input(wire));
        let output = self.graph.add_node(CircuitNode::Output(wire));
        self.graph.add_edge(input, output, WireEdge { wire });
        self.lookup.insert(qubit.clone(), wire);
        self.wires.push(WireInfo {
            qubit,
            input,
            output,
        });
        wire
    }

    /// Resolve a qubit reference to its wire.
    pub fn wire_of(&self, qubit: &QubitRef) -> Option<WireId> {
        self.lookup.get(qubit).copied()
    }

    /// Append a gate application at the end of every wire it touches.
    pub fn apply(&mut self, app: &GateApplication) -> IrResult<NodeIndex> {
        let resolve = |qubit: &QubitRef| {
            self.wire_of(qubit).ok_or_else(|| IrError::UndeclaredQubit {
                qubit: qubit.clone(),
                gate_name: Some(app.gate.name().to_string()),
            })
        };
        let targets = app.targets.iter().map(resolve).collect::<IrResult<Vec<_>>>()?;
        let guards = app
            .guards
            .iter()
            .map(|g| {
                Ok(GuardRelation {
                    wire: resolve(&g.qubit)?,
                    negated: g.negated,
                })
            })
            .collect::<IrResult<Vec<_>>>()?;

        self.next_order += 1;
        let payload = GateNode {
            gate: app.gate.clone(),
            targets,
            guards,
            order: self.next_order,
        };
        let wires = payload.wires();
        let node = self.graph.add_node(CircuitNode::Gate(payload));
        for wire in wires {
            self.append(wire, node)?;
        }
        Ok(node)
    }

    /// Splice `node` into the terminal edge of `wire`.
    fn append(&mut self, wire: WireId, node: NodeIndex) -> IrResult<()> {
        let output = self.output_of(wire)?;
        let terminal = self.in_edge(output, wire)?;
        let (prev, _) = self.endpoints(terminal)?;
        self.graph.remove_edge(terminal);
        self.connect(prev, node, wire)?;
        self.connect(node, output, wire)?;
        Ok(())
    }

    /// Add an edge on `wire` from `from` to `to`.
    ///
    /// Input sentinels never gain inbound edges and Output sentinels never
    /// gain outbound edges.
    pub fn connect(&mut self, from: NodeIndex, to: NodeIndex, wire: WireId) -> IrResult<EdgeIndex> {
        match self.graph.node_weight(from).ok_or(IrError::InvalidNode)? {
            CircuitNode::Output(w) => return Err(IrError::OutboundFromOutput(*w)),
            CircuitNode::Gate(g) if !g.touches(wire) => {
                return Err(IrError::InvalidGraph(format!(
                    "gate node {} does not touch wire {wire}",
                    from.index()
                )));
            }
            _ => {}
        }
        match self.graph.node_weight(to).ok_or(IrError::InvalidNode)? {
            CircuitNode::Input(w) => return Err(IrError::InboundToInput(*w)),
            CircuitNode::Gate(g) if !g.touches(wire) => {
                return Err(IrError::InvalidGraph(format!(
                    "gate node {} does not touch wire {wire}",
                    to.index()
                )));
            }
            _ => {}
        }
        Ok(self.graph.add_edge(from, to, WireEdge { wire }))
    }

    /// Remove a gate node, reconnecting its predecessor and successor on
    /// every wire it touches.
    pub fn remove(&mut self, node: NodeIndex) -> IrResult<GateNode> {
        let wires = self
            .gate(node)
            .ok_or_else(|| IrError::InvalidGraph("Cannot remove a sentinel node".into()))?
            .wires();
        for wire in wires {
            self.splice_out(node, wire)?;
        }
        match self.graph.remove_node(node) {
            Some(CircuitNode::Gate(gate)) => Ok(gate),
            _ => Err(IrError::InvalidNode),
        }
    }

    /// Drop the guard relation between `node` and `wire`.
    ///
    /// If `wire` is not also a target of the node, the node is spliced out
    /// of that wire; all other wires are left untouched.
    pub fn remove_as_guard(&mut self, node: NodeIndex, wire: WireId) -> IrResult<()> {
        let gate = self.gate_node_mut(node)?;
        if !gate.is_guard(wire) {
            return Err(IrError::MissingGuard(wire));
        }
        gate.guards.retain(|g| g.wire != wire);
        let still_target = gate.is_target(wire);
        if !still_target {
            self.splice_out(node, wire)?;
        }
        Ok(())
    }

    /// Replace the gate a node performs, keeping its targets and guards.
    pub fn set_gate(&mut self, node: NodeIndex, gate: Gate) -> IrResult<()> {
        self.gate_node_mut(node)?.gate = gate;
        Ok(())
    }

    /// Rewrite the targets and guards of a node.
    ///
    /// The set of wires the node touches must stay the same, so the graph's
    /// edges remain valid.
    pub fn retarget(
        &mut self,
        node: NodeIndex,
        targets: Vec<WireId>,
        guards: Vec<GuardRelation>,
    ) -> IrResult<()> {
        let gate = self.gate_node_mut(node)?;
        let before: FxHashSet<WireId> = gate.wires().into_iter().collect();
        let after: FxHashSet<WireId> = targets
            .iter()
            .copied()
            .chain(guards.iter().map(|g| g.wire))
            .collect();
        if before != after {
            return Err(IrError::InvalidGraph(format!(
                "retargeting node {} would change the wires it touches",
                node.index()
            )));
        }
        gate.targets = targets;
        gate.guards = guards;
        Ok(())
    }

    /// Merge the edges into and out of `node` on `wire` into one edge.
    fn splice_out(&mut self, node: NodeIndex, wire: WireId) -> IrResult<()> {
        let incoming = self.in_edge(node, wire)?;
        let outgoing = self.out_edge(node, wire)?;
        let (pred, _) = self.endpoints(incoming)?;
        let (_, succ) = self.endpoints(outgoing)?;
        self.graph.remove_edge(incoming);
        self.graph.remove_edge(outgoing);
        self.graph.add_edge(pred, succ, WireEdge { wire });
        Ok(())
    }

    fn gate_node_mut(&mut self, node: NodeIndex) -> IrResult<&mut GateNode> {
        match self.graph.node_weight_mut(node) {
            Some(CircuitNode::Gate(gate)) => Ok(gate),
            Some(_) => Err(IrError::InvalidGraph(format!(
                "node {} is a sentinel, not a gate",
                node.index()
            ))),
            None => Err(IrError::InvalidNode),
        }
    }

    /// The unique edge on `wire` ending at `node`.
    pub fn in_edge(&self, node: NodeIndex, wire: WireId) -> IrResult<EdgeIndex> {
        self.single_edge(node, wire, Direction::Incoming)
    }

    /// The unique edge on `wire` starting at `node`.
    pub fn out_edge(&self, node: NodeIndex, wire: WireId) -> IrResult<EdgeIndex> {
        self.single_edge(node, wire, Direction::Outgoing)
    }

    fn single_edge(&self, node: NodeIndex, wire: WireId, dir: Direction) -> IrResult<EdgeIndex> {
        if !self.graph.contains_node(node) {
            return Err(IrError::InvalidNode);
        }
        let mut found = self
            .graph
            .edges_directed(node, dir)
            .filter(|e| e.weight().wire == wire)
            .map(|e| e.id());
        let label = match dir {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        };
        match (found.next(), found.next()) {
            (Some(edge), None) => Ok(edge),
            (None, _) => Err(IrError::InvalidGraph(format!(
                "node {} has no {label} edge on wire {wire}",
                node.index()
            ))),
            (Some(_), Some(_)) => Err(IrError::InvalidGraph(format!(
                "node {} has more than one {label} edge on wire {wire}",
                node.index()
            ))),
        }
    }

    /// Start and end node of an edge.
    pub fn endpoints(&self, edge: EdgeIndex) -> IrResult<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(edge).ok_or_else(|| {
            IrError::InvalidGraph(format!("edge {} is not in the graph", edge.index()))
        })
    }

    /// The wire an edge belongs to.
    pub fn edge_wire(&self, edge: EdgeIndex) -> IrResult<WireId> {
        self.graph
            .edge_weight(edge)
            .map(|e| e.wire)
            .ok_or_else(|| IrError::InvalidGraph(format!("edge {} is not in the graph", edge.index())))
    }

    /// Successor of `node` on `wire`.
    pub fn next_on(&self, node: NodeIndex, wire: WireId) -> IrResult<NodeIndex> {
        Ok(self.endpoints(self.out_edge(node, wire)?)?.1)
    }

    /// Predecessor of `node` on `wire`.
    pub fn prev_on(&self, node: NodeIndex, wire: WireId) -> IrResult<NodeIndex> {
        Ok(self.endpoints(self.in_edge(node, wire)?)?.0)
    }

    /// Get a node by index.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> Option<&CircuitNode> {
        self.graph.node_weight(node)
    }

    /// Get the gate payload of a node, `None` for sentinels or stale indices.
    #[inline]
    pub fn gate(&self, node: NodeIndex) -> Option<&GateNode> {
        self.graph.node_weight(node).and_then(CircuitNode::as_gate)
    }

    /// Whether the index refers to a live node.
    #[inline]
    pub fn contains(&self, node: NodeIndex) -> bool {
        self.graph.contains_node(node)
    }

    /// Wires a node sits on.
    pub fn wires_of(&self, node: NodeIndex) -> IrResult<Vec<WireId>> {
        match self.graph.node_weight(node).ok_or(IrError::InvalidNode)? {
            CircuitNode::Input(w) | CircuitNode::Output(w) => Ok(vec![*w]),
            CircuitNode::Gate(g) => Ok(g.wires()),
        }
    }

    /// All wires, in declaration order.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        (0..self.wires.len()).map(WireId::from)
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.wires.len()
    }

    fn wire_info(&self, wire: WireId) -> IrResult<&WireInfo> {
        self.wires
            .get(wire.0 as usize)
            .ok_or(IrError::UnknownWire(wire))
    }

    /// The program-level qubit a wire stands for.
    pub fn wire_qubit(&self, wire: WireId) -> IrResult<&QubitRef> {
        Ok(&self.wire_info(wire)?.qubit)
    }

    /// Input sentinel of a wire.
    pub fn input_of(&self, wire: WireId) -> IrResult<NodeIndex> {
        Ok(self.wire_info(wire)?.input)
    }

    /// Output sentinel of a wire.
    pub fn output_of(&self, wire: WireId) -> IrResult<NodeIndex> {
        Ok(self.wire_info(wire)?.output)
    }

    /// Declarations the graph was built from.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Number of gate nodes.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.graph.node_count().saturating_sub(2 * self.wires.len())
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gate nodes in a stable topological order.
    ///
    /// Uses Kahn's algorithm, always releasing the ready node with the
    /// smallest program position first, so an untouched graph flattens back
    /// to exactly its input order.
    pub fn topological_gates(&self) -> IrResult<Vec<NodeIndex>> {
        let mut indegree: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        let mut ready = BinaryHeap::new();
        for node in self.graph.node_indices() {
            let degree = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .count();
            if degree == 0 {
                ready.push(Reverse((self.sort_key(node), node.index())));
            }
            indegree.insert(node, degree);
        }

        let mut order = Vec::with_capacity(self.num_gates());
        let mut visited = 0usize;
        while let Some(Reverse((_, raw))) = ready.pop() {
            let node = NodeIndex::new(raw);
            visited += 1;
            if self.gate(node).is_some() {
                order.push(node);
            }
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let succ = edge.target();
                let degree = indegree
                    .get_mut(&succ)
                    .ok_or(IrError::InvalidNode)?;
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse((self.sort_key(succ), succ.index())));
                }
            }
        }

        if visited != self.graph.node_count() {
            return Err(IrError::InvalidGraph("graph contains a cycle".into()));
        }
        Ok(order)
    }

    fn sort_key(&self, node: NodeIndex) -> usize {
        match self.graph.node_weight(node) {
            Some(CircuitNode::Input(_)) | None => 0,
            Some(CircuitNode::Gate(g)) => g.order,
            Some(CircuitNode::Output(_)) => usize::MAX,
        }
    }

    /// Flatten back to a program: declarations first, then gates in stable
    /// topological order.
    pub fn to_program(&self) -> IrResult<Program> {
        let mut program = Program::new();
        for decl in &self.declarations {
            program.push(decl.clone());
        }
        for node in self.topological_gates()? {
            let gate = self.gate(node).ok_or(IrError::InvalidNode)?;
            let targets = gate
                .targets
                .iter()
                .map(|w| self.wire_qubit(*w).cloned())
                .collect::<IrResult<Vec<_>>>()?;
            let guards = gate
                .guards
                .iter()
                .map(|g| {
                    Ok(Guard {
                        qubit: self.wire_qubit(g.wire)?.clone(),
                        negated: g.negated,
                    })
                })
                .collect::<IrResult<Vec<_>>>()?;
            program.push(GateApplication::new(gate.gate.clone(), targets).with_guards(guards));
        }
        Ok(program)
    }

    /// Gate nodes along a wire, Input to Output.
    pub fn gates_on(&self, wire: WireId) -> IrResult<Vec<NodeIndex>> {
        let output = self.output_of(wire)?;
        let mut current = self.input_of(wire)?;
        let mut nodes = Vec::new();
        let max_steps = self.graph.node_count();
        for _ in 0..=max_steps {
            current = self.next_on(current, wire)?;
            if current == output {
                return Ok(nodes);
            }
            nodes.push(current);
        }
        Err(IrError::BrokenWire {
            wire,
            from: "input".into(),
        })
    }

    /// Verify the structural invariants of the graph.
    ///
    /// Checks that:
    /// - every wire is a single path from its Input to its Output sentinel
    /// - every gate node has exactly one inbound and one outbound edge on
    ///   each wire it touches, and none on other wires
    /// - every node lies on some wire
    pub fn verify_integrity(&self) -> IrResult<()> {
        let mut on_a_wire: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut edges_seen = 0usize;

        for wire in self.wires() {
            let info = self.wire_info(wire)?;
            if self.graph.edges_directed(info.input, Direction::Incoming).count() != 0 {
                return Err(IrError::InvalidGraph(format!(
                    "input of wire {wire} has inbound edges"
                )));
            }
            on_a_wire.insert(info.input);
            on_a_wire.insert(info.output);
            let gates = self.gates_on(wire)?;
            edges_seen += gates.len() + 1;
            for node in gates {
                let gate = self.gate(node).ok_or_else(|| {
                    IrError::InvalidGraph(format!("sentinel in the middle of wire {wire}"))
                })?;
                if !gate.touches(wire) {
                    return Err(IrError::InvalidGraph(format!(
                        "node {} is on wire {wire} without touching it",
                        node.index()
                    )));
                }
                on_a_wire.insert(node);
            }
        }

        for node in self.graph.node_indices() {
            if !on_a_wire.contains(&node) {
                return Err(IrError::InvalidGraph(format!(
                    "node {} is not on any wire",
                    node.index()
                )));
            }
            if let Some(gate) = self.gate(node) {
                for wire in gate.wires() {
                    self.in_edge(node, wire)?;
                    self.out_edge(node, wire)?;
                }
            }
        }

        if edges_seen != self.graph.edge_count() {
            return Err(IrError::InvalidGraph(format!(
                "{} edges in graph but {edges_seen} on wires",
                self.graph.edge_count()
            )));
        }
        Ok(())
    }
}
