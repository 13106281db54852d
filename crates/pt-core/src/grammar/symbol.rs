//! Grammar symbols: a tagged value drawn from a terminal or non-terminal
//! enumeration, with the total ordering spec.md §3 requires (terminals
//! precede non-terminals; within a kind, ordering is by enumerator index).

use std::fmt;

/// `Terminal(0)` is always `EPSILON`, `Terminal(1)` is always `EOF`. Callers
/// number their remaining terminals starting at 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(u32),
    NonTerminal(u32),
}

impl Symbol {
    pub const EPSILON: Symbol = Symbol::Terminal(0);
    pub const EOF: Symbol = Symbol::Terminal(1);

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }

    pub fn is_epsilon(&self) -> bool {
        *self == Symbol::EPSILON
    }

    pub fn is_eof(&self) -> bool {
        *self == Symbol::EOF
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(0) => write!(f, "ε"),
            Symbol::Terminal(1) => write!(f, "$"),
            Symbol::Terminal(i) => write!(f, "t{i}"),
            Symbol::NonTerminal(i) => write!(f, "N{i}"),
        }
    }
}

/// An ordered sequence of symbols with a cacheable FIRST set (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolString(pub Vec<Symbol>);

impl SymbolString {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self(symbols)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.0
    }
}

impl fmt::Display for SymbolString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "ε");
        }
        let rendered: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

impl From<Vec<Symbol>> for SymbolString {
    fn from(v: Vec<Symbol>) -> Self {
        Self(v)
    }
}
