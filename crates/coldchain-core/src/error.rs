//! Unified error types for the planning engine
//!
//! This module provides a common error type [`PlanError`] that can represent
//! errors from any part of the system. Domain-specific error types can be
//! converted to `PlanError` for uniform error handling at API boundaries.
//!
//! # Example
//!
//! ```ignore
//! use coldchain_core::{PlanError, PlanResult};
//!
//! fn plan(problem: &PlanProblem) -> PlanResult<()> {
//!     let report = validate(problem)?;
//!     solve(problem)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all planning operations.
///
/// Pre-flight data problems surface as validation issues rather than errors
/// (see [`crate::diagnostics`]); this enum covers the hard failures: broken
/// cross-references, malformed configuration, solver-level faults, and
/// internal index inconsistencies that indicate a bug.
#[derive(Error, Debug)]
pub enum PlanError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Solver/algorithm errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network structure errors (unknown codes, dangling references)
    #[error("Network error: {0}")]
    Network(String),

    /// Capacity parameter violations (loads beyond pallet/unit limits)
    #[error("Capacity error: {0}")]
    Capacity(String),

    /// Index-set inconsistencies inside the model builder; always a bug
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using PlanError.
pub type PlanResult<T> = Result<T, PlanError>;

// Conversion from anyhow::Error
impl From<anyhow::Error> for PlanError {
    fn from(err: anyhow::Error) -> Self {
        PlanError::Other(err.to_string())
    }
}

// Conversion from string-like types for convenience
impl From<String> for PlanError {
    fn from(s: String) -> Self {
        PlanError::Other(s)
    }
}

impl From<&str> for PlanError {
    fn from(s: &str) -> Self {
        PlanError::Other(s.to_string())
    }
}
