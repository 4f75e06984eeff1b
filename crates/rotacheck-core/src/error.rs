use thiserror::Error;

/// Configuration errors raised while building rules.
///
/// A value failing a rule is never an `Error`; it is reported as a
/// [`crate::ValidationMessage`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The rule definition cannot be turned into an executable rule.
    #[error("invalid rule: {0}")]
    InvalidRule(String),
    /// The rule pattern does not compile.
    #[error("invalid pattern for rule '{rule_id}': {source}")]
    InvalidPattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },
}

/// Convenience alias for results returned by rotacheck crates.
pub type Result<T> = std::result::Result<T, Error>;
