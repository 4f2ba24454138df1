//! Fixed-point optimization driver.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use qrew_ir::{CircuitGraph, Program, WirePath};

use crate::config::{OptimizerConfig, RuleSet};
use crate::error::OptResult;
use crate::rule::RuleEntry;

/// What an optimization run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationStats {
    /// Gate count of the input.
    pub gates_before: usize,
    /// Gate count of the output.
    pub gates_after: usize,
    /// Number of rule applications.
    pub iterations: usize,
    /// Applications per rule name.
    pub applications: BTreeMap<String, usize>,
    /// Whether the run stopped at the iteration cap instead of a fixed point.
    pub hit_iteration_cap: bool,
}

impl OptimizationStats {
    /// Number of gates removed.
    pub fn gates_removed(&self) -> usize {
        self.gates_before.saturating_sub(self.gates_after)
    }
}

/// Applies a set of rules to a circuit until none of them matches.
///
/// Each scan walks every wire; at every node it tries the rules in order of
/// ascending depth on the window of that depth starting there. The first
/// match is applied and the scan starts over, since the rewrite may have
/// invalidated windows further along.
#[derive(Debug)]
pub struct Optimizer {
    config: OptimizerConfig,
    rules: Vec<RuleEntry>,
}

impl Optimizer {
    /// Create an optimizer from a validated configuration.
    pub fn new(config: OptimizerConfig) -> OptResult<Self> {
        config.validate()?;
        let rules = config.rules();
        Ok(Self { config, rules })
    }

    /// Create an optimizer with default settings for the given families.
    pub fn from_rules(rules: RuleSet) -> Self {
        let config = OptimizerConfig::new().with_rules(rules);
        let rules = config.rules();
        Self { config, rules }
    }

    /// The configuration in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The concrete rules, in the order they are tried.
    pub fn rules(&self) -> &[RuleEntry] {
        &self.rules
    }

    /// Optimize a program.
    pub fn optimize(&self, program: &Program) -> OptResult<Program> {
        self.optimize_with_stats(program).map(|(program, _)| program)
    }

    /// Optimize a program and report what was done.
    #[instrument(skip(self, program))]
    pub fn optimize_with_stats(&self, program: &Program) -> OptResult<(Program, OptimizationStats)> {
        let mut graph = CircuitGraph::from_program(program)?;
        info!(
            "Optimizing {} gates on {} wires with {} rules",
            graph.num_gates(),
            graph.num_wires(),
            self.rules.len()
        );

        let stats = self.optimize_graph(&mut graph)?;
        let optimized = graph.to_program()?;

        info!(
            "Optimization finished after {} rewrites, gates: {} -> {}",
            stats.iterations, stats.gates_before, stats.gates_after
        );
        Ok((optimized, stats))
    }

    /// Rewrite a graph in place until no rule matches or the iteration cap
    /// is reached.
    pub fn optimize_graph(&self, graph: &mut CircuitGraph) -> OptResult<OptimizationStats> {
        let mut stats = OptimizationStats {
            gates_before: graph.num_gates(),
            ..OptimizationStats::default()
        };

        while let Some((index, path)) = self.find_match(graph)? {
            if stats.iterations >= self.config.max_iterations {
                warn!(
                    "Stopping after {} rewrites without reaching a fixed point",
                    stats.iterations
                );
                stats.hit_iteration_cap = true;
                break;
            }

            let entry = &self.rules[index];
            debug!(
                rule = entry.name(),
                wire = %path.wire(),
                node = path.end().index(),
                "Applying rule"
            );
            entry.rule.apply(graph, &path)?;
            if cfg!(debug_assertions) {
                graph.verify_integrity()?;
            }

            stats.iterations += 1;
            *stats
                .applications
                .entry(entry.name().to_string())
                .or_default() += 1;
        }

        stats.gates_after = graph.num_gates();
        Ok(stats)
    }

    /// Find the first (rule, window) pair that matches, in scan order.
    fn find_match(&self, graph: &CircuitGraph) -> OptResult<Option<(usize, WirePath)>> {
        for wire in graph.wires() {
            let full = WirePath::full(graph, wire)?;
            let mut windows: FxHashMap<usize, Vec<WirePath>> = FxHashMap::default();
            for entry in &self.rules {
                windows
                    .entry(entry.depth)
                    .or_insert_with(|| full.sub_paths(entry.depth));
            }

            for position in 0..full.nodes().len() {
                for (index, entry) in self.rules.iter().enumerate() {
                    let Some(path) = windows.get(&entry.depth).and_then(|w| w.get(position))
                    else {
                        continue;
                    };
                    trace!(rule = entry.name(), wire = %wire, position, "Testing window");
                    if entry.rule.is_applicable(graph, path)? {
                        return Ok(Some((index, path.clone())));
                    }
                }
            }
        }
        Ok(None)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::from_rules(RuleSet::ALL)
    }
}

/// Optimize `program` with the given rule families and default settings.
pub fn optimize(program: &Program, rules: RuleSet) -> OptResult<Program> {
    Optimizer::from_rules(rules).optimize(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrew_ir::{GateApplication, StandardGate};

    #[test]
    fn test_empty_rule_set_changes_nothing() {
        let mut program = Program::new();
        let a = program.qubit("a");
        program.gate(StandardGate::X, [a.clone()]).gate(StandardGate::X, [a]);

        let (out, stats) = Optimizer::from_rules(RuleSet::EMPTY)
            .optimize_with_stats(&program)
            .unwrap();
        assert_eq!(out, program);
        assert_eq!(stats.iterations, 0);
        assert!(!stats.hit_iteration_cap);
    }

    #[test]
    fn test_stats_count_applications() {
        let mut program = Program::new();
        let a = program.qubit("a");
        let b = program.qubit("b");
        program
            .gate(StandardGate::H, [a.clone()])
            .gate(StandardGate::H, [a.clone()])
            .gate(StandardGate::Z, [b.clone()])
            .gate(StandardGate::Z, [b.clone()])
            .gate(StandardGate::T, [a]);

        let (out, stats) = Optimizer::default().optimize_with_stats(&program).unwrap();
        assert_eq!(out.gate_count(), 1);
        assert_eq!(stats.gates_before, 5);
        assert_eq!(stats.gates_after, 1);
        assert_eq!(stats.gates_removed(), 4);
        assert_eq!(stats.iterations, 2);
        assert_eq!(stats.applications.get("null-gate(h)"), Some(&1));
        assert_eq!(stats.applications.get("null-gate(z)"), Some(&1));
    }

    #[test]
    fn test_iteration_cap_stops_early() {
        let mut program = Program::new();
        let a = program.qubit("a");
        for _ in 0..4 {
            program.gate(StandardGate::X, [a.clone()]);
        }
        let config = OptimizerConfig::new()
            .with_rules(RuleSet::NULL_GATE)
            .with_max_iterations(1);
        let (out, stats) = Optimizer::new(config)
            .unwrap()
            .optimize_with_stats(&program)
            .unwrap();
        assert_eq!(out.gate_count(), 2);
        assert!(stats.hit_iteration_cap);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = OptimizerConfig::new().with_max_iterations(0);
        assert!(Optimizer::new(config).is_err());
    }

    #[test]
    fn test_max_depth_disables_deep_rules() {
        let mut program = Program::new();
        let a = program.qubit("a");
        program
            .gate(StandardGate::H, [a.clone()])
            .gate(StandardGate::X, [a.clone()])
            .gate(StandardGate::H, [a]);
        let config = OptimizerConfig::new().with_max_depth(2);
        let out = Optimizer::new(config).unwrap().optimize(&program).unwrap();
        assert_eq!(out, program);
    }

    #[test]
    fn test_optimize_graph_in_place() {
        let mut program = Program::new();
        let a = program.qubit("a");
        let c = program.qubit("c");
        program.push(GateApplication::new(StandardGate::H, [a]).ctrl(c));
        let mut graph = CircuitGraph::from_program(&program).unwrap();

        let stats = Optimizer::from_rules(RuleSet::PEEPING_CONTROL)
            .optimize_graph(&mut graph)
            .unwrap();
        assert_eq!(stats.iterations, 1);
        assert_eq!(graph.num_gates(), 0);
        graph.verify_integrity().unwrap();
    }
}
