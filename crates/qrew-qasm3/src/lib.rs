//! Text format for qrew programs.
//!
//! A small, flat subset of `OpenQASM` 3: qubit and register declarations,
//! gate applications with `ctrl` / `negctrl` modifiers, and `qif q do ... end`
//! blocks that guard every gate in their body. There are no gate
//! definitions, classical bits or control flow beyond that.
//!
//! # Example
//!
//! ```rust
//! use qrew_qasm3::{emit, parse};
//!
//! let program = parse("qubit a; qubit c; ctrl @ h c, a;").unwrap();
//! assert_eq!(program.gate_count(), 1);
//! assert_eq!(emit(&program), "qubit a;\nqubit c;\nctrl(1) @ h c, a;\n");
//! ```
//!
//! # Example: Optimize and Print
//!
//! Output names are usually made canonical before printing, so that
//! equivalent programs produce identical text:
//!
//! ```rust
//! use qrew_opt::{RuleSet, optimize};
//! use qrew_qasm3::{emit, parse};
//!
//! let program = parse("qubit a; h a; x a; h a; y a;").unwrap();
//! let optimized = optimize(&program, RuleSet::ALL).unwrap();
//! assert_eq!(
//!     emit(&optimized.with_canonical_names()),
//!     "qubit id0;\nz id0;\ny id0;\n"
//! );
//! ```
//!
//! # Supported Gates
//!
//! Single-qubit: `x`, `y`, `z`, `h`, `s`, `sdg`, `t`, `tdg`
//!
//! Parameterized: `p(θ)` (alias `phase`), `rx(θ)`, `ry(θ)`, `rz(θ)`
//!
//! Multi-qubit: `cx`, `cy`, `cz`, `swap`, `ccx`
//!
//! Any other name parses as an opaque gate acting on all its operands.

mod emitter;
mod error;
mod lexer;
mod parser;

pub use emitter::{emit, emit_with_header};
pub use error::{ParseError, ParseResult};
pub use parser::parse;
