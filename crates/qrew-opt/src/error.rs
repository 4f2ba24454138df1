//! Error types for the optimizer crate.

use thiserror::Error;

/// Errors that can occur during optimization.
///
/// None of these are produced by valid input: a failure means a rule or the
/// graph broke an invariant, and the whole optimization is abandoned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OptError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] qrew_ir::IrError),

    /// A rule matched a window it could not rewrite.
    #[error("Rule '{rule}' failed: {reason}")]
    RuleInvariant { rule: String, reason: String },

    /// A rule family name that does not exist.
    #[error("Unknown rule family '{0}'")]
    UnknownRuleFamily(String),

    /// Invalid optimizer configuration.
    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfiguration(String),
}

impl OptError {
    pub(crate) fn invariant(rule: &str, reason: impl Into<String>) -> Self {
        OptError::RuleInvariant {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for optimization operations.
pub type OptResult<T> = Result<T, OptError>;
