//! Error taxonomy for grammar construction, table lookup, and parsing.
//!
//! Organized by *kind*, not by call site, mirroring the taxonomy the spec
//! names: construction-time errors fail the constructor, recoverable
//! parse-time errors are handled by the recovery routine and never reach
//! here, and unrecoverable parse-time errors propagate out of `parse`.

use std::fmt;

use crate::grammar::Symbol;

pub type Result<T> = std::result::Result<T, CoreError>;

/// A single entry in a table-driven parse: where it happened and what the
/// stack/input looked like at the time, for user-visible diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub offending_input: Vec<u8>,
    pub stack_depth: usize,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (stack depth {}, offending input: {:?})",
            self.message,
            self.stack_depth,
            String::from_utf8_lossy(&self.offending_input)
        )
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),

    #[error("missing precondition: {0}")]
    MissingPrecondition(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unrecoverable parse error: {0}")]
    ParseErrorUnrecoverable(Diagnostic),

    #[error("error-recovery limit exceeded after {recovered} recovered errors (limit {limit})")]
    ErrorLimitExceeded { recovered: usize, limit: usize },

    #[error("table invariant violated: {0}")]
    TableInvariantViolated(String),

    #[error("unreachable: {0}")]
    Unreachable(String),
}

impl CoreError {
    pub fn empty_final_states() -> Self {
        Self::InvalidConstruction("FSM construction requires a non-empty final-state set".into())
    }

    pub fn unknown_machine_kind(kind: &str) -> Self {
        Self::InvalidConstruction(format!("unknown FSM kind: {kind}"))
    }

    pub fn empty_production_body(head: Symbol) -> Self {
        Self::InvalidConstruction(format!("production with head {head:?} has an empty body"))
    }

    pub fn terminal_as_head(sym: Symbol) -> Self {
        Self::InvalidConstruction(format!("terminal {sym:?} cannot be used as a production head"))
    }

    pub fn dot_out_of_range(dot: usize, len: usize) -> Self {
        Self::InvalidConstruction(format!("dot position {dot} out of range for body of length {len}"))
    }

    pub fn follow_before_first() -> Self {
        Self::MissingPrecondition("FOLLOW requested before FIRST has been computed".into())
    }
}
