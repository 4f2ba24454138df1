//! The rewrite-rule interface.

use std::fmt;

use qrew_ir::{CircuitGraph, WirePath};

use crate::config::RuleSet;
use crate::error::OptResult;

/// A local rewrite over a window of one wire.
///
/// The driver hands every rule paths whose length is the rule's declared
/// depth (shorter only at the end of a wire). The window of the path, the
/// nodes the walk steps onto, is what the rule matches.
pub trait Rule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &str;

    /// Check whether the rule matches the window. Must not modify anything.
    fn is_applicable(&self, graph: &CircuitGraph, path: &WirePath) -> OptResult<bool>;

    /// Rewrite the graph. Only called right after `is_applicable` returned
    /// `true` for the same path.
    fn apply(&self, graph: &mut CircuitGraph, path: &WirePath) -> OptResult<()>;
}

/// A rule together with the family it belongs to and its window depth.
pub struct RuleEntry {
    /// The family that enabled this rule.
    pub family: RuleSet,
    /// Number of window nodes the rule looks at.
    pub depth: usize,
    /// The rule itself.
    pub rule: Box<dyn Rule>,
}

impl RuleEntry {
    /// Create a new entry.
    pub fn new(family: RuleSet, depth: usize, rule: impl Rule + 'static) -> Self {
        Self {
            family,
            depth,
            rule: Box::new(rule),
        }
    }

    /// Name of the wrapped rule.
    pub fn name(&self) -> &str {
        self.rule.name()
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry")
            .field("family", &self.family)
            .field("depth", &self.depth)
            .field("rule", &self.rule.name())
            .finish()
    }
}
