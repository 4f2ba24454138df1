//! qrew Circuit Optimizer
//!
//! This crate rewrites flat, guard-annotated quantum programs to use fewer
//! gates without changing what they compute.
//!
//! # Overview
//!
//! A program is turned into a [`CircuitGraph`](qrew_ir::CircuitGraph) with
//! one wire per qubit. The [`Optimizer`] then repeatedly scans every wire,
//! testing each enabled [`Rule`] on the window of its depth at every node,
//! applies the first match and starts over. When a full scan finds nothing,
//! the graph is flattened back into a program.
//!
//! # Rule Families
//!
//! | Family | Rules | Depth |
//! |--------|-------|-------|
//! | [`RuleSet::PEEPING_CONTROL`] | [`rules::StaticControl`] | 1 |
//! | [`RuleSet::NULL_GATE`] | [`rules::NullGate`] for H, X, Y, Z | 2 |
//! | [`RuleSet::H_SANDWICH_REDUCTION`] | [`rules::HSandwich`] for X→Z, Z→X | 3 |
//! | [`RuleSet::CONTROL_REVERSAL`] | [`rules::ControlReversal`] | 3 |
//!
//! # Example
//!
//! ```rust
//! use qrew_ir::{Program, StandardGate};
//! use qrew_opt::{RuleSet, optimize};
//!
//! let mut program = Program::new();
//! let a = program.qubit("a");
//! program.gate(StandardGate::H, [a.clone()]);
//! program.gate(StandardGate::X, [a.clone()]);
//! program.gate(StandardGate::H, [a]);
//!
//! let optimized = optimize(&program, RuleSet::ALL).unwrap();
//! assert_eq!(optimized.gate_count(), 1);
//! ```
//!
//! # Custom Rules
//!
//! Implement the [`Rule`] trait and wrap it in a [`RuleEntry`]:
//!
//! ```rust
//! use qrew_ir::{CircuitGraph, WirePath};
//! use qrew_opt::{OptResult, Rule};
//!
//! struct MyRule;
//!
//! impl Rule for MyRule {
//!     fn name(&self) -> &str { "my_rule" }
//!
//!     fn is_applicable(&self, _graph: &CircuitGraph, _path: &WirePath) -> OptResult<bool> {
//!         Ok(false)
//!     }
//!
//!     fn apply(&self, _graph: &mut CircuitGraph, _path: &WirePath) -> OptResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod rule;
pub mod rules;

pub use config::{DEFAULT_MAX_ITERATIONS, OptimizerConfig, RuleSet};
pub use driver::{OptimizationStats, Optimizer, optimize};
pub use error::{OptError, OptResult};
pub use rule::{Rule, RuleEntry};
