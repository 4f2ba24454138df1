//! Error types for the IR crate.

use thiserror::Error;

use crate::qubit::{QubitRef, WireId};

/// Errors raised while building or mutating a circuit graph.
///
/// Apart from [`IrError::UndeclaredQubit`] and [`IrError::DuplicateDeclaration`],
/// which reject malformed input, every variant signals a broken graph
/// invariant and aborts the current optimization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate references a qubit that was never declared.
    #[error("Qubit '{qubit}' is not declared{}", format_gate_context(.gate_name))]
    UndeclaredQubit {
        /// The offending reference.
        qubit: QubitRef,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A qubit or register name was declared twice.
    #[error("Duplicate declaration of '{0}'")]
    DuplicateDeclaration(String),

    /// An Input sentinel may not receive an inbound edge.
    #[error("Cannot add an inbound edge to the input node of wire {0}")]
    InboundToInput(WireId),

    /// An Output sentinel may not emit an outbound edge.
    #[error("Cannot add an outbound edge to the output node of wire {0}")]
    OutboundFromOutput(WireId),

    /// A wire does not reach the requested node.
    #[error("Wire {wire} does not reach the end node while walking from {from}")]
    BrokenWire {
        /// The wire being walked.
        wire: WireId,
        /// Description of the walk start.
        from: String,
    },

    /// A node does not carry the guard relation it was asked to drop.
    #[error("Node has no guard on wire {0}")]
    MissingGuard(WireId),

    /// A node index that is not (or no longer) in the graph.
    #[error("Invalid node index")]
    InvalidNode,

    /// Unknown wire identifier.
    #[error("Unknown wire {0}")]
    UnknownWire(WireId),

    /// Generic structural violation.
    #[error("Invalid graph structure: {0}")]
    InvalidGraph(String),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
