//! Error types for fluentsql-core

use compact_str::CompactString;
use thiserror::Error;

/// Core error type for fluentsql compilation failures.
#[derive(Debug, Error)]
pub enum FluentSqlError {
    /// Unsupported dialect string, INSERT values arity mismatch, or a
    /// missing required table/source name.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(CompactString),

    /// Unbalanced parentheses across WHERE/HAVING fragments, or a `?`
    /// placeholder with no corresponding binding at substitution time.
    #[error("Invalid statement structure: {0}")]
    InvalidStructure(CompactString),

    /// The Injection Validator rejected a value or Expression payload that
    /// would otherwise be inlined.
    #[error("Unsafe value rejected: {0}")]
    UnsafeValue(CompactString),

    /// A binding value of a type that cannot be formatted (array/object
    /// outside of `IN`, or similar).
    #[error("Unsupported binding type: {0}")]
    UnsupportedBindingType(CompactString),

    /// Internal: a `?` placeholder had no corresponding binding during
    /// inline substitution. Distinct from `InvalidStructure` because it can
    /// only happen from a programming error, never from caller input.
    #[error("Binding not found for placeholder at position {0}")]
    BindingNotFound(usize),
}

/// Result type for fluentsql compilation.
pub type Result<T> = core::result::Result<T, FluentSqlError>;
