//! Flat, guard-annotated instruction lists.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{Declaration, QubitRef};

/// A control condition attached to a gate application.
///
/// A positive guard (`ctrl`) requires the qubit to be |1⟩, a negated one
/// (`negctrl`) requires |0⟩.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Guard {
    /// The guarding qubit.
    pub qubit: QubitRef,
    /// Whether the guard is an anti-control.
    #[serde(default)]
    pub negated: bool,
}

impl Guard {
    /// A `ctrl` guard.
    pub fn ctrl(qubit: QubitRef) -> Self {
        Self {
            qubit,
            negated: false,
        }
    }

    /// A `negctrl` guard.
    pub fn negctrl(qubit: QubitRef) -> Self {
        Self {
            qubit,
            negated: true,
        }
    }
}

/// A gate applied to an ordered list of targets under a set of guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateApplication {
    /// The gate performed.
    pub gate: Gate,
    /// Target qubits, in order.
    pub targets: Vec<QubitRef>,
    /// Guards; order carries no meaning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guards: Vec<Guard>,
}

impl GateApplication {
    /// Create an unguarded gate application.
    pub fn new(gate: impl Into<Gate>, targets: impl IntoIterator<Item = QubitRef>) -> Self {
        Self {
            gate: gate.into(),
            targets: targets.into_iter().collect(),
            guards: vec![],
        }
    }

    /// Add a `ctrl` guard.
    #[must_use]
    pub fn ctrl(mut self, qubit: QubitRef) -> Self {
        self.guards.push(Guard::ctrl(qubit));
        self
    }

    /// Add a `negctrl` guard.
    #[must_use]
    pub fn negctrl(mut self, qubit: QubitRef) -> Self {
        self.guards.push(Guard::negctrl(qubit));
        self
    }

    /// Replace the guard list.
    #[must_use]
    pub fn with_guards(mut self, guards: impl IntoIterator<Item = Guard>) -> Self {
        self.guards = guards.into_iter().collect();
        self
    }

    /// Whether any guard is attached.
    #[inline]
    pub fn is_guarded(&self) -> bool {
        !self.guards.is_empty()
    }

    /// Semantic equality: same gate, same targets in order, and guard sets
    /// that contain each other.
    pub fn semantically_eq(&self, other: &GateApplication) -> bool {
        self.gate == other.gate
            && self.targets == other.targets
            && self.guards.iter().all(|g| other.guards.contains(g))
            && other.guards.iter().all(|g| self.guards.contains(g))
    }
}

/// One entry of a flat program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    /// Declare a qubit or a register.
    Declare(Declaration),
    /// Apply a gate.
    Apply(GateApplication),
}

impl Instruction {
    /// Check if this is a gate application.
    pub fn is_gate(&self) -> bool {
        matches!(self, Instruction::Apply(_))
    }

    /// Get the gate application, if this is one.
    pub fn as_gate(&self) -> Option<&GateApplication> {
        match self {
            Instruction::Apply(app) => Some(app),
            Instruction::Declare(_) => None,
        }
    }

    /// Get the declaration, if this is one.
    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Instruction::Declare(decl) => Some(decl),
            Instruction::Apply(_) => None,
        }
    }
}

impl From<Declaration> for Instruction {
    fn from(decl: Declaration) -> Self {
        Instruction::Declare(decl)
    }
}

impl From<GateApplication> for Instruction {
    fn from(app: GateApplication) -> Self {
        Instruction::Apply(app)
    }
}

/// An ordered instruction list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: impl Into<Instruction>) -> &mut Self {
        self.instructions.push(instruction.into());
        self
    }

    /// Declare a single qubit and return a reference to it.
    pub fn qubit(&mut self, name: impl Into<String>) -> QubitRef {
        let decl = Declaration::qubit(name);
        let qubit = QubitRef::plain(decl.name.clone());
        self.instructions.push(Instruction::Declare(decl));
        qubit
    }

    /// Declare a register and return references to its slots.
    pub fn register(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitRef> {
        let decl = Declaration::register(name, size);
        let qubits = decl.qubits();
        self.instructions.push(Instruction::Declare(decl));
        qubits
    }

    /// Append an unguarded standard gate.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        targets: impl IntoIterator<Item = QubitRef>,
    ) -> &mut Self {
        self.push(GateApplication::new(gate, targets))
    }

    /// All instructions, in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Iterate over declarations.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.instructions.iter().filter_map(Instruction::as_declaration)
    }

    /// Iterate over gate applications.
    pub fn gates(&self) -> impl Iterator<Item = &GateApplication> {
        self.instructions.iter().filter_map(Instruction::as_gate)
    }

    /// Number of gate applications.
    pub fn gate_count(&self) -> usize {
        self.gates().count()
    }

    /// Total number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Consume the program, returning its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Rename every declaration to `id0`, `id1`, ... in declaration order.
    ///
    /// Register sizes and indices are kept. References to names that were
    /// never declared are left alone.
    pub fn with_canonical_names(&self) -> Program {
        let names: FxHashMap<&str, String> = self
            .declarations()
            .enumerate()
            .map(|(i, decl)| (decl.name.as_str(), format!("id{i}")))
            .collect();

        let rename = |qubit: &QubitRef| match names.get(qubit.register.as_str()) {
            Some(name) => QubitRef {
                register: name.clone(),
                index: qubit.index,
            },
            None => qubit.clone(),
        };

        self.instructions
            .iter()
            .map(|instruction| match instruction {
                Instruction::Declare(decl) => Instruction::Declare(Declaration {
                    name: names
                        .get(decl.name.as_str())
                        .cloned()
                        .unwrap_or_else(|| decl.name.clone()),
                    size: decl.size,
                }),
                Instruction::Apply(app) => Instruction::Apply(GateApplication {
                    gate: app.gate.clone(),
                    targets: app.targets.iter().map(rename).collect(),
                    guards: app
                        .guards
                        .iter()
                        .map(|g| Guard {
                            qubit: rename(&g.qubit),
                            negated: g.negated,
                        })
                        .collect(),
                }),
            })
            .collect()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
