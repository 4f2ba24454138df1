//! Benchmarks for circuit graph construction and flattening
//!
//! Run with: cargo bench -p qrew-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qrew_ir::{CircuitGraph, GateApplication, Program, StandardGate, WirePath};

/// A ladder of H and guarded X gates over a register of `n` qubits.
fn ladder(n: u32, layers: usize) -> Program {
    let mut program = Program::new();
    let q = program.register("q", n);
    for _ in 0..layers {
        for i in 0..q.len() {
            program.gate(StandardGate::H, [q[i].clone()]);
            if i + 1 < q.len() {
                program.push(GateApplication::new(StandardGate::X, [q[i + 1].clone()]).ctrl(q[i].clone()));
            }
        }
    }
    program
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");

    for num_qubits in &[5u32, 20, 50] {
        let program = ladder(*num_qubits, 10);
        group.bench_with_input(
            BenchmarkId::new("from_program", num_qubits),
            &program,
            |b, program| {
                b.iter(|| CircuitGraph::from_program(black_box(program)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_flatten");

    for num_qubits in &[5u32, 20, 50] {
        let graph = CircuitGraph::from_program(&ladder(*num_qubits, 10)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("to_program", num_qubits),
            &graph,
            |b, graph| {
                b.iter(|| black_box(graph).to_program().unwrap());
            },
        );
    }

    group.finish();
}

fn bench_windows(c: &mut Criterion) {
    let graph = CircuitGraph::from_program(&ladder(20, 20)).unwrap();

    c.bench_function("sub_paths_depth_3", |b| {
        b.iter(|| {
            for wire in graph.wires() {
                let full = WirePath::full(&graph, wire).unwrap();
                black_box(full.sub_paths(3));
            }
        });
    });
}

criterion_group!(benches, bench_build, bench_flatten, bench_windows);
criterion_main!(benches);
