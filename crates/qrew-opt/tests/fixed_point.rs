//! End-to-end behavior of the optimizer on small programs.

use qrew_ir::{CustomGate, GateApplication, ParameterExpression, Program, StandardGate};
use qrew_opt::{Optimizer, OptimizerConfig, RuleSet, optimize};

#[test]
fn test_self_inverse_pairs_vanish() {
    for gate in [StandardGate::H, StandardGate::X, StandardGate::Y, StandardGate::Z] {
        let mut program = Program::new();
        let a = program.qubit("id0");
        program.gate(gate.clone(), [a.clone()]).gate(gate, [a]);

        let out = optimize(&program, RuleSet::NULL_GATE).unwrap();
        assert_eq!(out.gate_count(), 0);
        assert_eq!(out.declarations().count(), 1);
    }
}

#[test]
fn test_cancellation_cascades() {
    // x h h x collapses from the inside out.
    let mut program = Program::new();
    let a = program.qubit("a");
    program
        .gate(StandardGate::X, [a.clone()])
        .gate(StandardGate::H, [a.clone()])
        .gate(StandardGate::H, [a.clone()])
        .gate(StandardGate::X, [a]);

    let (out, stats) = Optimizer::from_rules(RuleSet::NULL_GATE)
        .optimize_with_stats(&program)
        .unwrap();
    assert_eq!(out.gate_count(), 0);
    assert_eq!(stats.iterations, 2);
}

#[test]
fn test_combined_rules_reach_fixed_point() {
    // The guard on c is toggled on and off again, so the guarded h never
    // fires; once it is gone the two outer h gates meet and cancel.
    let mut program = Program::new();
    let a = program.qubit("a");
    let c = program.qubit("c");
    program.gate(StandardGate::H, [a.clone()]);
    program
        .gate(StandardGate::X, [c.clone()])
        .gate(StandardGate::X, [c.clone()]);
    program.push(GateApplication::new(StandardGate::H, [a.clone()]).ctrl(c));
    program.gate(StandardGate::H, [a]);

    let (out, stats) = Optimizer::default().optimize_with_stats(&program).unwrap();
    assert_eq!(out.gate_count(), 0);
    assert_eq!(stats.iterations, 3);
    assert!(!stats.hit_iteration_cap);
}

#[test]
fn test_peephole_then_sandwich() {
    // x c makes the guard always true; stripping it exposes h x h.
    let mut program = Program::new();
    let a = program.qubit("a");
    let c = program.qubit("c");
    program.gate(StandardGate::X, [c.clone()]);
    program.gate(StandardGate::H, [a.clone()]);
    program.push(GateApplication::new(StandardGate::X, [a.clone()]).ctrl(c.clone()));
    program.gate(StandardGate::H, [a.clone()]);

    let out = optimize(&program, RuleSet::PEEPING_CONTROL | RuleSet::H_SANDWICH_REDUCTION).unwrap();
    let names: Vec<&str> = out.gates().map(|g| g.gate.name()).collect();
    assert_eq!(names, vec!["x", "z"]);
    assert!(out.gates().all(|g| !g.is_guarded()));
}

#[test]
fn test_opaque_gates_are_left_alone() {
    let mut program = Program::new();
    let q = program.register("q", 2);
    program.gate(StandardGate::T, [q[0].clone()]);
    program.gate(StandardGate::Rz(ParameterExpression::symbol("theta")), [q[1].clone()]);
    program.gate(StandardGate::Swap, [q[0].clone(), q[1].clone()]);
    program.push(GateApplication::new(
        CustomGate::new("oracle", 2),
        [q[0].clone(), q[1].clone()],
    ));

    assert_eq!(optimize(&program, RuleSet::ALL).unwrap(), program);
}

#[test]
fn test_config_drives_optimizer() {
    let mut program = Program::new();
    let a = program.qubit("a");
    program
        .gate(StandardGate::H, [a.clone()])
        .gate(StandardGate::X, [a.clone()])
        .gate(StandardGate::H, [a]);

    let config = OptimizerConfig::new().with_rules(RuleSet::NULL_GATE);
    let out = Optimizer::new(config).unwrap().optimize(&program).unwrap();
    assert_eq!(out, program);

    let out = Optimizer::default().optimize(&program).unwrap();
    assert_eq!(out.gate_count(), 1);
    assert!(out.gates().next().unwrap().gate.is(&StandardGate::Z));
}
