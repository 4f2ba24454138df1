//! Qubit references, declarations and wire identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one elementary qubit (one wire) inside a circuit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WireId(pub u32);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<u32> for WireId {
    fn from(id: u32) -> Self {
        WireId(id)
    }
}

impl From<usize> for WireId {
    fn from(id: usize) -> Self {
        WireId(u32::try_from(id).expect("WireId overflow: exceeds u32::MAX"))
    }
}

/// A reference to an elementary qubit as written in a program.
///
/// Either a plain qubit (`a`) or one slot of a register (`q[2]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitRef {
    /// Name of the declared qubit or register.
    pub register: String,
    /// Slot within the register, `None` for a plain qubit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl QubitRef {
    /// Reference a plain qubit.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            register: name.into(),
            index: None,
        }
    }

    /// Reference a slot of a register.
    pub fn indexed(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }
}

impl fmt::Display for QubitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(idx) => write!(f, "{}[{idx}]", self.register),
            None => write!(f, "{}", self.register),
        }
    }
}

/// A qubit or register declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name.
    pub name: String,
    /// Register size, `None` for a single qubit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl Declaration {
    /// Declare a single qubit.
    pub fn qubit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
        }
    }

    /// Declare a register of `size` qubits.
    pub fn register(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
        }
    }

    /// The elementary qubits this declaration introduces, in slot order.
    pub fn qubits(&self) -> Vec<QubitRef> {
        match self.size {
            Some(size) => (0..size)
                .map(|i| QubitRef::indexed(self.name.clone(), i))
                .collect(),
            None => vec![QubitRef::plain(self.name.clone())],
        }
    }

    /// Number of wires this declaration contributes.
    pub fn width(&self) -> u32 {
        self.size.unwrap_or(1)
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size {
            Some(size) => write!(f, "qubit[{size}] {}", self.name),
            None => write!(f, "qubit {}", self.name),
        }
    }
}
