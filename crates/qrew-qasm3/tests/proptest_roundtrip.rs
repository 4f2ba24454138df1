//! Property-based tests for the text round trip.
//!
//! Tests that program → text → program reproduces the program exactly.

use proptest::prelude::*;
use qrew_ir::{GateApplication, Guard, ParameterExpression, Program, QubitRef, StandardGate};
use qrew_qasm3::{emit, emit_with_header, parse};

/// Gate operations that can be appended to a program.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    X(u32),
    Y(u32),
    Z(u32),
    Rz(u32, f64),
    CX(u32, u32),
    Guarded(u32, Vec<(u32, bool)>),
}

impl GateOp {
    fn apply(self, program: &mut Program, qubits: &[QubitRef]) {
        let q = |i: u32| qubits[i as usize].clone();
        let app = match self {
            GateOp::H(t) => GateApplication::new(StandardGate::H, [q(t)]),
            GateOp::X(t) => GateApplication::new(StandardGate::X, [q(t)]),
            GateOp::Y(t) => GateApplication::new(StandardGate::Y, [q(t)]),
            GateOp::Z(t) => GateApplication::new(StandardGate::Z, [q(t)]),
            GateOp::Rz(t, theta) => GateApplication::new(
                StandardGate::Rz(ParameterExpression::constant(theta)),
                [q(t)],
            ),
            GateOp::CX(c, t) => GateApplication::new(StandardGate::CX, [q(c), q(t)]),
            GateOp::Guarded(t, guards) => {
                // Negated guards first, matching the emitted operand order.
                let mut guards: Vec<(u32, bool)> = guards
                    .into_iter()
                    .filter(|(g, _)| *g != t)
                    .collect();
                guards.sort_by_key(|(g, _)| *g);
                guards.dedup_by_key(|(g, _)| *g);
                guards.sort_by_key(|(_, negated)| !negated);
                GateApplication::new(StandardGate::X, [q(t)]).with_guards(
                    guards
                        .into_iter()
                        .map(|(g, negated)| Guard { qubit: q(g), negated }),
                )
            }
        };
        program.push(app);
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let single = prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits).prop_map(GateOp::Y),
        (0..num_qubits).prop_map(GateOp::Z),
        (0..num_qubits, -10.0_f64..10.0).prop_map(|(t, theta)| GateOp::Rz(t, theta)),
    ];
    if num_qubits < 2 {
        single.boxed()
    } else {
        prop_oneof![
            single,
            (0..num_qubits, 0..num_qubits)
                .prop_filter("Control and target must differ", |(c, t)| c != t)
                .prop_map(|(c, t)| GateOp::CX(c, t)),
            (
                0..num_qubits,
                prop::collection::vec((0..num_qubits, any::<bool>()), 0..=3)
            )
                .prop_map(|(t, guards)| GateOp::Guarded(t, guards)),
        ]
        .boxed()
    }
}

/// Programs over one register and a few plain qubits.
fn arb_program() -> impl Strategy<Value = Program> {
    (1_u32..=3, 0_u32..=2).prop_flat_map(|(register, plain)| {
        let total = register + plain;
        prop::collection::vec(arb_gate_op(total), 0..=15).prop_map(move |ops| {
            let mut program = Program::new();
            let mut qubits = program.register("q", register);
            for i in 0..plain {
                qubits.push(program.qubit(format!("p{i}")));
            }
            for op in ops {
                op.apply(&mut program, &qubits);
            }
            program
        })
    })
}

proptest! {
    /// Parsing emitted text gives back the same program.
    #[test]
    fn test_program_text_roundtrip(program in arb_program()) {
        let text = emit(&program);
        let parsed = parse(&text).expect("Failed to parse emitted text");
        prop_assert_eq!(&parsed, &program);
    }

    /// The header does not change what is parsed.
    #[test]
    fn test_header_roundtrip(program in arb_program()) {
        let parsed = parse(&emit_with_header(&program)).expect("Failed to parse emitted text");
        prop_assert_eq!(emit(&parsed), emit(&program));
    }

    /// Canonical names survive a round trip and stay canonical.
    #[test]
    fn test_canonical_names_are_stable(program in arb_program()) {
        let canonical = program.with_canonical_names();
        let parsed = parse(&emit(&canonical)).expect("Failed to parse emitted text");
        prop_assert_eq!(parsed.with_canonical_names(), canonical);
    }
}
