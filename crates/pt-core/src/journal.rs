//! Construction-time and parse-time diagnostics.
//!
//! Grammars and tables are built once; the `Journal` accumulates `Report`s
//! emitted while doing so. At parse time a fresh, per-call `Journal` (see
//! [`crate::parser::ll::LLParser::parse`] / [`crate::parser::lr::LRParser::parse`])
//! records recovered-error events so a caller can inspect what panic-mode
//! recovery did without the driver needing to print anything itself.

use std::fmt;

use crate::error::Diagnostic;

/// Caller-tunable policy knobs named by the spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// spec.md §4.6 — default 5.
    pub error_recovery_limit: usize,
    /// spec.md §4.2 — default whitespace policy for the lexer.
    pub default_whitespace_policy: crate::lexer::WhitespacePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_recovery_limit: 5,
            default_whitespace_policy: crate::lexer::WhitespacePolicy::Strip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// A construction-time note (non-fatal) — e.g. a grammar warning.
    Construction,
    /// A panic-mode recovery happened; counted against the recovery limit.
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub message: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

/// A diagnostic sink threaded through grammar construction and, separately,
/// through a single `parse` call (a fresh `Journal` per call, per the
/// lifecycle rule in spec.md §3: "Stacks, cursors, and lookahead buffers
/// live for the duration of a single `parse` invocation").
#[derive(Debug, Clone, Default)]
pub struct Journal {
    config: Config,
    reports: Vec<Report>,
    recovered_count: usize,
}

impl Journal {
    pub fn new(config: Config) -> Self {
        Self { config, reports: Vec::new(), recovered_count: 0 }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn note(&mut self, message: impl Into<String>) {
        self.reports.push(Report { kind: ReportKind::Construction, message: message.into() });
    }

    /// Record a panic-mode recovery event. Returns `false` once the
    /// configured recovery limit has been reached — the caller (a parser
    /// driver) must treat that as `ErrorLimitExceeded`.
    pub fn record_recovery(&mut self, message: impl Into<String>) -> bool {
        self.recovered_count += 1;
        self.reports.push(Report { kind: ReportKind::Recovered, message: message.into() });
        self.recovered_count <= self.config.error_recovery_limit
    }

    pub fn recovered_count(&self) -> usize {
        self.recovered_count
    }

    pub fn diagnostic(&self, message: impl Into<String>, offending_input: &[u8], stack_depth: usize) -> Diagnostic {
        Diagnostic { message: message.into(), offending_input: offending_input.to_vec(), stack_depth }
    }
}
