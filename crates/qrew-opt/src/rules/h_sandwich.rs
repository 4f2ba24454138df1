//! Hadamard-conjugation substitution.

use qrew_ir::{CircuitGraph, StandardGate, WirePath};

use crate::error::{OptError, OptResult};
use crate::rule::Rule;

use super::gate_window;

/// Replaces `H·G·H` on one wire by the conjugated gate: `H·X·H = Z` and
/// `H·Z·H = X`.
///
/// The two Hadamards must be semantically equal. If they are guarded, their
/// guards must also guard the middle gate, and all three nodes must be
/// consecutive on every guard wire.
#[derive(Debug, Clone)]
pub struct HSandwich {
    middle: StandardGate,
    replacement: StandardGate,
    name: String,
}

impl HSandwich {
    /// Window depth.
    pub const DEPTH: usize = 3;

    /// Create a rule rewriting `H·middle·H` into `replacement`.
    pub fn new(middle: StandardGate, replacement: StandardGate) -> Self {
        let name = format!("h-sandwich({}->{})", middle.name(), replacement.name());
        Self {
            middle,
            replacement,
            name,
        }
    }

    /// The X-to-Z and Z-to-X rules.
    pub fn all() -> Vec<Self> {
        vec![
            Self::new(StandardGate::X, StandardGate::Z),
            Self::new(StandardGate::Z, StandardGate::X),
        ]
    }
}

impl Rule for HSandwich {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_applicable(&self, graph: &CircuitGraph, path: &WirePath) -> OptResult<bool> {
        let Some(window) = gate_window(graph, path, Self::DEPTH) else {
            return Ok(false);
        };
        let [(first, open), (second, middle), (third, close)] = window.as_slice() else {
            return Ok(false);
        };
        let wire = path.wire();

        if !open.gate.is(&StandardGate::H)
            || open.targets() != [wire]
            || !open.semantically_eq(close)
        {
            return Ok(false);
        }
        if !middle.gate.is(&self.middle)
            || middle.targets() != [wire]
            || !open.guards_subset_of(middle)
        {
            return Ok(false);
        }

        for guard in open.guards() {
            if graph.next_on(*first, guard.wire)? != *second
                || graph.next_on(*second, guard.wire)? != *third
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn apply(&self, graph: &mut CircuitGraph, path: &WirePath) -> OptResult<()> {
        let [first, second, third] = path.window() else {
            return Err(OptError::invariant(&self.name, "window is not three nodes"));
        };
        graph.remove(*first)?;
        graph.remove(*third)?;
        graph.set_gate(*second, self.replacement.clone().into())?;
        Ok(())
    }
}
