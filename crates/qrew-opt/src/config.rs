//! Rule-family selection and optimizer settings.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{OptError, OptResult};
use crate::rule::RuleEntry;
use crate::rules::{ControlReversal, HSandwich, NullGate, StaticControl};

/// A set of rule families.
///
/// Families combine with `|`; [`RuleSet::ALL`] is the union of every family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RuleSet(u8);

impl RuleSet {
    /// No rules.
    pub const EMPTY: RuleSet = RuleSet(0);
    /// Adjacent self-inverse gate cancellation.
    pub const NULL_GATE: RuleSet = RuleSet(1);
    /// Static-control peephole elimination.
    pub const PEEPING_CONTROL: RuleSet = RuleSet(1 << 1);
    /// Hadamard-conjugation substitution.
    pub const H_SANDWICH_REDUCTION: RuleSet = RuleSet(1 << 2);
    /// Control-direction reversal.
    pub const CONTROL_REVERSAL: RuleSet = RuleSet(1 << 3);
    /// Every family.
    pub const ALL: RuleSet = RuleSet(0b1111);

    /// Every single family with its command-line name.
    pub const FAMILIES: [(RuleSet, &'static str); 4] = [
        (RuleSet::NULL_GATE, "null-gate"),
        (RuleSet::PEEPING_CONTROL, "peeping-control"),
        (RuleSet::H_SANDWICH_REDUCTION, "h-sandwich"),
        (RuleSet::CONTROL_REVERSAL, "control-reversal"),
    ];

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    #[inline]
    pub fn from_bits_truncate(bits: u8) -> Self {
        RuleSet(bits & Self::ALL.0)
    }

    /// True if every family in `other` is also in `self`.
    #[inline]
    pub fn contains(self, other: RuleSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no family is selected.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The single families in this set, in canonical order.
    pub fn families(self) -> impl Iterator<Item = (RuleSet, &'static str)> {
        Self::FAMILIES
            .into_iter()
            .filter(move |(family, _)| self.contains(*family))
    }

    /// Resolve the selected families into concrete rules, ordered by
    /// ascending depth.
    pub fn instantiate(self) -> Vec<RuleEntry> {
        let mut rules = Vec::new();
        if self.contains(RuleSet::NULL_GATE) {
            rules.extend(NullGate::all().into_iter().map(|r| {
                RuleEntry::new(RuleSet::NULL_GATE, NullGate::DEPTH, r)
            }));
        }
        if self.contains(RuleSet::PEEPING_CONTROL) {
            rules.push(RuleEntry::new(
                RuleSet::PEEPING_CONTROL,
                StaticControl::DEPTH,
                StaticControl,
            ));
        }
        if self.contains(RuleSet::H_SANDWICH_REDUCTION) {
            rules.extend(HSandwich::all().into_iter().map(|r| {
                RuleEntry::new(RuleSet::H_SANDWICH_REDUCTION, HSandwich::DEPTH, r)
            }));
        }
        if self.contains(RuleSet::CONTROL_REVERSAL) {
            rules.push(RuleEntry::new(
                RuleSet::CONTROL_REVERSAL,
                ControlReversal::DEPTH,
                ControlReversal,
            ));
        }
        // Stable, so families keep their relative order within a depth.
        rules.sort_by_key(|entry| entry.depth);
        rules
    }
}

impl BitOr for RuleSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        RuleSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for RuleSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for RuleSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        RuleSet(self.0 & rhs.0)
    }
}

impl FromStr for RuleSet {
    type Err = OptError;

    /// Parse a comma-separated list such as `null-gate,h-sandwich`.
    fn from_str(s: &str) -> OptResult<Self> {
        let mut set = RuleSet::EMPTY;
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let name = name.to_ascii_lowercase();
            set |= match name.as_str() {
                "all" => RuleSet::ALL,
                "none" => RuleSet::EMPTY,
                _ => RuleSet::FAMILIES
                    .iter()
                    .find(|(_, n)| *n == name)
                    .map(|(family, _)| *family)
                    .ok_or_else(|| OptError::UnknownRuleFamily(name.clone()))?,
            };
        }
        Ok(set)
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == RuleSet::ALL {
            return write!(f, "all");
        }
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self.families().map(|(_, name)| name).collect();
        write!(f, "{}", names.join(","))
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names: Vec<&str> = self.families().map(|(_, name)| name).collect();
        names.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Text(String),
        }

        let text = match Repr::deserialize(deserializer)? {
            Repr::List(names) => names.join(","),
            Repr::Text(text) => text,
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Default cap on rule applications per optimization.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Settings for an [`Optimizer`](crate::Optimizer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Active rule families.
    pub rules: RuleSet,
    /// Rules deeper than this are skipped; `None` means no cap.
    pub max_depth: Option<usize>,
    /// Stop after this many rule applications.
    pub max_iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            rules: RuleSet::ALL,
            max_depth: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl OptimizerConfig {
    /// Create a configuration with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the active rule families.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Cap the rule depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Cap the number of rule applications.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check the settings for values that can never do useful work.
    pub fn validate(&self) -> OptResult<()> {
        if self.max_iterations == 0 {
            return Err(OptError::InvalidConfiguration(
                "max_iterations must be at least 1".into(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(OptError::InvalidConfiguration(
                "max_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The concrete rules this configuration enables.
    pub fn rules(&self) -> Vec<RuleEntry> {
        let mut rules = self.rules.instantiate();
        if let Some(max_depth) = self.max_depth {
            rules.retain(|entry| entry.depth <= max_depth);
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_union_of_families() {
        let union = RuleSet::FAMILIES
            .iter()
            .fold(RuleSet::EMPTY, |acc, (family, _)| acc | *family);
        assert_eq!(union, RuleSet::ALL);
        assert!(RuleSet::ALL.contains(RuleSet::NULL_GATE | RuleSet::CONTROL_REVERSAL));
        assert!(!RuleSet::NULL_GATE.contains(RuleSet::ALL));
        assert_eq!(RuleSet::from_bits_truncate(0xff), RuleSet::ALL);
    }

    #[test]
    fn test_parse_rule_list() {
        let set: RuleSet = "null-gate, h-sandwich".parse().unwrap();
        assert_eq!(set, RuleSet::NULL_GATE | RuleSet::H_SANDWICH_REDUCTION);
        assert_eq!("ALL".parse::<RuleSet>().unwrap(), RuleSet::ALL);
        assert_eq!("".parse::<RuleSet>().unwrap(), RuleSet::EMPTY);
        assert!(matches!(
            "null-gate,bogus".parse::<RuleSet>(),
            Err(OptError::UnknownRuleFamily(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_display_roundtrip() {
        for set in [
            RuleSet::EMPTY,
            RuleSet::ALL,
            RuleSet::PEEPING_CONTROL,
            RuleSet::NULL_GATE | RuleSet::CONTROL_REVERSAL,
        ] {
            assert_eq!(set.to_string().parse::<RuleSet>().unwrap(), set);
        }
        assert_eq!(RuleSet::ALL.to_string(), "all");
    }

    #[test]
    fn test_instantiate_orders_by_depth() {
        let rules = RuleSet::ALL.instantiate();
        assert_eq!(rules.len(), 8);
        let depths: Vec<usize> = rules.iter().map(|r| r.depth).collect();
        let mut sorted = depths.clone();
        sorted.sort_unstable();
        assert_eq!(depths, sorted);
        assert_eq!(rules[0].family, RuleSet::PEEPING_CONTROL);

        assert_eq!(RuleSet::NULL_GATE.instantiate().len(), 4);
        assert_eq!(RuleSet::H_SANDWICH_REDUCTION.instantiate().len(), 2);
        assert!(RuleSet::EMPTY.instantiate().is_empty());
    }

    #[test]
    fn test_max_depth_filters_rules() {
        let config = OptimizerConfig::new().with_max_depth(2);
        assert!(config.rules().iter().all(|r| r.depth <= 2));
        assert_eq!(config.rules().len(), 5);
    }

    #[test]
    fn test_validate() {
        assert!(OptimizerConfig::default().validate().is_ok());
        assert!(OptimizerConfig::new().with_max_iterations(0).validate().is_err());
        assert!(OptimizerConfig::new().with_max_depth(0).validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = "rules: [null-gate, peeping-control]\nmax_iterations: 50\n";
        let config: OptimizerConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.rules, RuleSet::NULL_GATE | RuleSet::PEEPING_CONTROL);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.max_depth, None);

        let yaml = "rules: all\nmax_depth: 2\n";
        let config: OptimizerConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.rules, RuleSet::ALL);
        assert_eq!(config.max_depth, Some(2));

        assert!(serde_yaml_ng::from_str::<OptimizerConfig>("depth: 3\n").is_err());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = OptimizerConfig::new()
            .with_rules(RuleSet::H_SANDWICH_REDUCTION)
            .with_max_iterations(7);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"h-sandwich\""));
        let back: OptimizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
