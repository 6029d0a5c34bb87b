//! Errors raised while assembling a grammar.
//!
//! Parsing itself never fails: text no rule accepts becomes plain text. The
//! only failure mode is a malformed rule, reported when the rule is built.

use thiserror::Error;

/// A rule could not be constructed.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule's pattern is not a valid regular expression.
    #[error("invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

impl RuleError {
    /// Name of the rule that failed to build.
    pub fn rule(&self) -> &str {
        match self {
            RuleError::InvalidPattern { rule, .. } => rule,
        }
    }
}
