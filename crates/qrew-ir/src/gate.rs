//! Quantum gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Phase gate.
    P(ParameterExpression),
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
    /// Toffoli (CCX) gate.
    CCX,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::P(_) => "p",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
            StandardGate::CCX => "ccx",
        }
    }

    /// Number of target qubits the gate acts on (guards not included).
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CY | StandardGate::CZ | StandardGate::Swap => 2,
            StandardGate::CCX => 3,
            _ => 1,
        }
    }

    /// Gate parameters, in order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::P(p) | StandardGate::Rx(p) | StandardGate::Ry(p) | StandardGate::Rz(p) => {
                vec![p]
            }
            _ => vec![],
        }
    }

    /// Look up a gate by its lowercase name and parameter list.
    ///
    /// Returns `None` for unknown names or a parameter count the gate does not take.
    pub fn from_name(name: &str, mut params: Vec<ParameterExpression>) -> Option<Self> {
        let gate = match (name, params.len()) {
            ("x", 0) => StandardGate::X,
            ("y", 0) => StandardGate::Y,
            ("z", 0) => StandardGate::Z,
            ("h", 0) => StandardGate::H,
            ("s", 0) => StandardGate::S,
            ("sdg", 0) => StandardGate::Sdg,
            ("t", 0) => StandardGate::T,
            ("tdg", 0) => StandardGate::Tdg,
            ("cx", 0) => StandardGate::CX,
            ("cy", 0) => StandardGate::CY,
            ("cz", 0) => StandardGate::CZ,
            ("swap", 0) => StandardGate::Swap,
            ("ccx", 0) => StandardGate::CCX,
            ("p" | "phase", 1) => StandardGate::P(params.remove(0)),
            ("rx", 1) => StandardGate::Rx(params.remove(0)),
            ("ry", 1) => StandardGate::Ry(params.remove(0)),
            ("rz", 1) => StandardGate::Rz(params.remove(0)),
            _ => return None,
        };
        Some(gate)
    }
}

/// A user-defined gate the optimizer treats as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of target qubits.
    pub num_qubits: u32,
    /// Parameters of the gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParameterExpression>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<ParameterExpression>) -> Self {
        self.params = params;
        self
    }
}

/// The operation a gate application performs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom gate.
    Custom(CustomGate),
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            Gate::Standard(g) => g.name(),
            Gate::Custom(g) => &g.name,
        }
    }

    /// Get the number of target qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Standard(g) => g.num_qubits(),
            Gate::Custom(g) => g.num_qubits,
        }
    }

    /// Gate parameters, in order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            Gate::Standard(g) => g.parameters(),
            Gate::Custom(g) => g.params.iter().collect(),
        }
    }

    /// The standard gate, if this is one.
    #[inline]
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match self {
            Gate::Standard(g) => Some(g),
            Gate::Custom(_) => None,
        }
    }

    /// True if this is exactly the given parameterless standard gate.
    #[inline]
    pub fn is(&self, gate: &StandardGate) -> bool {
        self.as_standard() == Some(gate)
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::Standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::Custom(gate)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        let params = self.parameters();
        if !params.is_empty() {
            let rendered: Vec<String> = params.iter().map(ToString::to_string).collect();
            write!(f, "({})", rendered.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert!(StandardGate::H.parameters().is_empty());
        assert_eq!(
            StandardGate::P(ParameterExpression::Pi).parameters(),
            vec![&ParameterExpression::Pi]
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(StandardGate::from_name("x", vec![]), Some(StandardGate::X));
        assert_eq!(
            StandardGate::from_name("phase", vec![ParameterExpression::Pi]),
            Some(StandardGate::P(ParameterExpression::Pi))
        );
        assert_eq!(StandardGate::from_name("x", vec![ParameterExpression::Pi]), None);
        assert_eq!(StandardGate::from_name("frobnicate", vec![]), None);
    }

    #[test]
    fn test_gate_display() {
        assert_eq!(Gate::from(StandardGate::H).to_string(), "h");
        let rz = Gate::from(StandardGate::Rz(
            ParameterExpression::Pi / ParameterExpression::constant(2.0),
        ));
        assert_eq!(rz.to_string(), "rz(pi/2)");
        let custom = Gate::from(CustomGate::new("oracle", 2));
        assert_eq!(custom.to_string(), "oracle");
        assert!(Gate::from(StandardGate::X).is(&StandardGate::X));
        assert!(!custom.is(&StandardGate::X));
    }
}
