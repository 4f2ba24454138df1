//! Static-control peephole elimination.

use qrew_ir::{CircuitGraph, GateNode, IrError, NodeIndex, StandardGate, WireId, WirePath};

use crate::error::{OptError, OptResult};
use crate::rule::Rule;

use super::gate_window;

/// Resolves a guard whose qubit is provably in a basis state.
///
/// Every qubit starts in |0⟩. If the only gates on the guard wire before the
/// guarded gate are unguarded single-qubit X, Y or Z, the wire is still in a
/// basis state, so the guard is either always or never satisfied. An always
/// satisfied guard is dropped; a gate whose guard is never satisfied is
/// removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticControl;

impl StaticControl {
    /// Window depth.
    pub const DEPTH: usize = 1;

    const NAME: &'static str = "peeping-control";
}

/// Basis state of `wire` just before `node`, if it can be tracked.
///
/// `true` stands for |1⟩. X and Y flip the state (up to phase), Z leaves it.
fn basis_state(graph: &CircuitGraph, wire: WireId, node: NodeIndex) -> OptResult<Option<bool>> {
    let path = WirePath::new(graph, wire, graph.input_of(wire)?, node)?;
    let mut state = false;
    for step in path.inner_nodes() {
        let gate = graph.gate(*step).ok_or(IrError::InvalidNode)?;
        if !gate.is_unguarded() || gate.targets() != [wire] {
            return Ok(None);
        }
        match gate.gate.as_standard() {
            Some(StandardGate::X | StandardGate::Y) => state = !state,
            Some(StandardGate::Z) => {}
            _ => return Ok(None),
        }
    }
    Ok(Some(state))
}

/// Whether every guard `gate` holds on `wire` is satisfied in `state`.
fn triggers(gate: &GateNode, wire: WireId, state: bool) -> bool {
    gate.guards_on(wire).all(|guard| state != guard.negated)
}

impl Rule for StaticControl {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_applicable(&self, graph: &CircuitGraph, path: &WirePath) -> OptResult<bool> {
        let Some(window) = gate_window(graph, path, Self::DEPTH) else {
            return Ok(false);
        };
        let [(node, gate)] = window.as_slice() else {
            return Ok(false);
        };
        let wire = path.wire();
        if !gate.is_guard(wire) || gate.is_target(wire) {
            return Ok(false);
        }
        Ok(basis_state(graph, wire, *node)?.is_some())
    }

    fn apply(&self, graph: &mut CircuitGraph, path: &WirePath) -> OptResult<()> {
        let wire = path.wire();
        let node = path.end();
        let state = basis_state(graph, wire, node)?
            .ok_or_else(|| OptError::invariant(Self::NAME, "guard wire state is unknown"))?;
        let gate = graph
            .gate(node)
            .ok_or_else(|| OptError::invariant(Self::NAME, "window does not end at a gate"))?;

        if triggers(gate, wire, state) {
            graph.remove_as_guard(node, wire)?;
        } else {
            graph.remove(node)?;
        }
        Ok(())
    }
}
