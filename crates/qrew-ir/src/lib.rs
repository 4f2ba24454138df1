//! qrew Circuit Intermediate Representation
//!
//! This crate provides the data structures the qrew optimizer works on: a
//! flat, guard-annotated instruction list and the per-wire circuit graph it is
//! rewritten in.
//!
//! # Overview
//!
//! A [`Program`] is an ordered list of qubit declarations and gate
//! applications. Each [`GateApplication`] carries an ordered list of target
//! qubits and an unordered set of [`Guard`]s (`ctrl` / `negctrl`).
//!
//! [`CircuitGraph`] threads every gate application onto one *wire* per
//! elementary qubit it touches, between an Input and an Output sentinel.
//! Rewrite rules look at [`WirePath`] windows along a wire and mutate the
//! graph through [`CircuitGraph::remove`] and [`CircuitGraph::remove_as_guard`].
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitRef`], [`Declaration`] and the graph-level [`WireId`]
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for
//!   opaque operations
//! - **Parameters**: [`ParameterExpression`] for gate angles
//! - **Instructions**: [`Instruction`], [`GateApplication`], [`Program`]
//! - **Graph**: [`CircuitGraph`], [`CircuitNode`], [`GateNode`]
//! - **Paths**: [`WirePath`]
//!
//! # Example: Graph Round Trip
//!
//! ```rust
//! use qrew_ir::{CircuitGraph, GateApplication, Program, StandardGate};
//!
//! let mut program = Program::new();
//! let a = program.qubit("a");
//! let b = program.qubit("b");
//! program.gate(StandardGate::H, [a.clone()]);
//! program.push(GateApplication::new(StandardGate::X, [b]).ctrl(a));
//!
//! let graph = CircuitGraph::from_program(&program).unwrap();
//! assert_eq!(graph.num_wires(), 2);
//! assert_eq!(graph.num_gates(), 2);
//! assert_eq!(graph.to_program().unwrap(), program);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg` | 1 | S and S-dagger gates |
//! | `T`, `Tdg` | 1 | T and T-dagger gates |
//! | `P`, `Rx`, `Ry`, `Rz` | 1 | Phase and rotation gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |
//! | `CY`, `CZ` | 2 | Controlled-Y and Controlled-Z |
//! | `Swap` | 2 | SWAP gate |
//! | `CCX` | 3 | Toffoli (CCNOT) gate |

pub mod error;
pub mod gate;
pub mod graph;
pub mod instruction;
pub mod parameter;
pub mod path;
pub mod qubit;

pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, StandardGate};
pub use graph::{CircuitGraph, CircuitNode, EdgeIndex, GateNode, GuardRelation, NodeIndex, WireEdge};
pub use instruction::{GateApplication, Guard, Instruction, Program};
pub use parameter::ParameterExpression;
pub use path::WirePath;
pub use qubit::{Declaration, QubitRef, WireId};
