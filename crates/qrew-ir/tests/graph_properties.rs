//! Property-based tests for the circuit graph.
//!
//! Builds random guarded programs, checks the per-wire single-path invariant,
//! and checks that flattening an untouched graph gives the program back.

use proptest::prelude::*;
use qrew_ir::{CircuitGraph, GateApplication, Program, QubitRef, StandardGate, WirePath};

/// A gate drawn from a small basis, with optional guards.
#[derive(Debug, Clone)]
struct GateOp {
    gate: StandardGate,
    target: u32,
    guards: Vec<(u32, bool)>,
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let gate = prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::Z),
        Just(StandardGate::T),
    ];
    (
        gate,
        0..num_qubits,
        prop::collection::vec((0..num_qubits, any::<bool>()), 0..=2),
    )
        .prop_map(|(gate, target, guards)| GateOp {
            gate,
            target,
            guards: guards.into_iter().filter(|(g, _)| *g != target).collect(),
        })
}

/// Generate a program over a register of 1-5 qubits with 0-20 gates.
fn arb_program() -> impl Strategy<Value = Program> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=20).prop_map(move |ops| {
            let mut program = Program::new();
            let q = program.register("q", num_qubits);
            for op in ops {
                let mut app = GateApplication::new(op.gate, [q[op.target as usize].clone()]);
                for (wire, negated) in op.guards {
                    let qubit: QubitRef = q[wire as usize].clone();
                    app = if negated { app.negctrl(qubit) } else { app.ctrl(qubit) };
                }
                program.push(app);
            }
            program
        })
    })
}

proptest! {
    /// Every wire is a single path and enumerates the gates touching it.
    #[test]
    fn test_build_preserves_wire_invariant(program in arb_program()) {
        let graph = CircuitGraph::from_program(&program).unwrap();
        prop_assert!(graph.verify_integrity().is_ok());
        prop_assert_eq!(graph.num_gates(), program.gate_count());

        for wire in graph.wires() {
            let qubit = graph.wire_qubit(wire).unwrap().clone();
            let expected = program
                .gates()
                .filter(|g| g.targets.contains(&qubit) || g.guards.iter().any(|c| c.qubit == qubit))
                .count();
            prop_assert_eq!(graph.gates_on(wire).unwrap().len(), expected);
        }
    }

    /// Flattening an untouched graph reproduces the input program.
    #[test]
    fn test_flatten_is_inverse_of_build(program in arb_program()) {
        let graph = CircuitGraph::from_program(&program).unwrap();
        prop_assert_eq!(graph.to_program().unwrap(), program);
    }

    /// Removing arbitrary gate nodes keeps every wire well formed.
    #[test]
    fn test_removal_keeps_integrity(program in arb_program(), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..5)) {
        let mut graph = CircuitGraph::from_program(&program).unwrap();
        for pick in picks {
            let nodes = graph.topological_gates().unwrap();
            if nodes.is_empty() {
                break;
            }
            graph.remove(nodes[pick.index(nodes.len())]).unwrap();
            prop_assert!(graph.verify_integrity().is_ok());
        }
        let flat = graph.to_program().unwrap();
        prop_assert_eq!(flat.gate_count(), graph.num_gates());
    }

    /// Sub-path windows agree with the full walk of each wire.
    #[test]
    fn test_sub_paths_cover_every_node(program in arb_program(), depth in 1_usize..=3) {
        let graph = CircuitGraph::from_program(&program).unwrap();
        for wire in graph.wires() {
            let full = WirePath::full(&graph, wire).unwrap();
            let subs = full.sub_paths(depth);
            prop_assert_eq!(subs.len(), full.nodes().len());
            for (sub, node) in subs.iter().zip(full.nodes()) {
                prop_assert_eq!(sub.start(), *node);
                prop_assert!(sub.len() <= depth);
            }
        }
    }
}
