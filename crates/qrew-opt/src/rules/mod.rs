//! Built-in rewrite rules.
//!
//! | Rule | Depth | Identity |
//! |------|-------|----------|
//! | [`StaticControl`] | 1 | a guard whose qubit is in a known basis state is constant |
//! | [`NullGate`] | 2 | `G·G = I` for `G ∈ {H, X, Y, Z}` |
//! | [`HSandwich`] | 3 | `H·X·H = Z`, `H·Z·H = X` |
//! | [`ControlReversal`] | 3 | `(H⊗H)·CX(c→t)·(H⊗H) = CX(t→c)` |

pub mod control_reversal;
pub mod h_sandwich;
pub mod null_gate;
pub mod static_control;


pub use control_reversal::ControlReversal;
pub use h_sandwich::HSandwich;
pub use null_gate::NullGate;
pub use static_control::StaticControl;

use qrew_ir::{CircuitGraph, GateNode, IrError, NodeIndex, StandardGate, WireId, WirePath};

use crate::error::OptResult;

/// The gate payloads of a window, if it has exactly `depth` nodes and all of
/// them are gate nodes.
pub(crate) fn gate_window<'g>(
    graph: &'g CircuitGraph,
    path: &WirePath,
    depth: usize,
) -> Option<Vec<(NodeIndex, &'g GateNode)>> {
    if path.len() != depth {
        return None;
    }
    path.window()
        .iter()
        .map(|node| graph.gate(*node).map(|gate| (*node, gate)))
        .collect()
}

/// True if `second` directly follows `first` on every wire `first` touches.
pub(crate) fn follows_on_all(
    graph: &CircuitGraph,
    first: NodeIndex,
    second: NodeIndex,
) -> OptResult<bool> {
    let gate = graph.gate(first).ok_or(IrError::InvalidNode)?;
    for wire in gate.wires() {
        if graph.next_on(first, wire)? != second {
            return Ok(false);
        }
    }
    Ok(true)
}

/// An unguarded `kind` gate acting on `wire` alone.
pub(crate) fn is_plain(gate: &GateNode, kind: &StandardGate, wire: WireId) -> bool {
    gate.gate.is(kind) && gate.is_unguarded() && gate.targets() == [wire]
}
