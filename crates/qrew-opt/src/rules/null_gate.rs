//! Adjacent self-inverse gate cancellation.

use qrew_ir::{CircuitGraph, StandardGate, WirePath};

use crate::error::{OptError, OptResult};
use crate::rule::Rule;

use super::{follows_on_all, gate_window};

/// Cancels two consecutive, semantically equal applications of a
/// self-inverse single-qubit gate.
///
/// Guards must match as sets, and the pair must be adjacent on every wire
/// it touches, so `ctrl @ h a, b; ctrl @ h a, b;` cancels while
/// `ctrl @ h a, b; h b;` does not.
#[derive(Debug, Clone)]
pub struct NullGate {
    gate: StandardGate,
    name: String,
}

impl NullGate {
    /// Window depth.
    pub const DEPTH: usize = 2;

    /// Create a cancellation rule for `gate`.
    pub fn new(gate: StandardGate) -> Self {
        let name = format!("null-gate({})", gate.name());
        Self { gate, name }
    }

    /// One rule per self-inverse single-qubit gate.
    pub fn all() -> Vec<Self> {
        [StandardGate::H, StandardGate::X, StandardGate::Y, StandardGate::Z]
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// The gate this rule cancels.
    pub fn gate(&self) -> &StandardGate {
        &self.gate
    }
}

impl Rule for NullGate {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_applicable(&self, graph: &CircuitGraph, path: &WirePath) -> OptResult<bool> {
        let Some(window) = gate_window(graph, path, Self::DEPTH) else {
            return Ok(false);
        };
        let [(first, a), (second, b)] = window.as_slice() else {
            return Ok(false);
        };
        if !a.gate.is(&self.gate) || !a.semantically_eq(b) {
            return Ok(false);
        }
        follows_on_all(graph, *first, *second)
    }

    fn apply(&self, graph: &mut CircuitGraph, path: &WirePath) -> OptResult<()> {
        let [first, second] = path.window() else {
            return Err(OptError::invariant(&self.name, "window is not two nodes"));
        };
        graph.remove(*first)?;
        graph.remove(*second)?;
        Ok(())
    }
}
