//! The LL(1) parsing table: `non-terminal × terminal -> entry` (spec.md §3).

use std::rc::Rc;

use crate::error::{CoreError, Result};
use crate::grammar::{ProductionElement, Symbol, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    Synchronized,
    NotSynchronized,
}

/// An opaque callback invoked during panic-mode recovery when the table
/// entry under an error carries one (spec.md §3, §4.7 step 3).
pub type ErrorAction<Attr> = Rc<dyn Fn(&mut Vec<ProductionElement<Attr>>, Symbol, &Token<Attr>) -> SyncOutcome>;

#[derive(Clone)]
pub enum LLEntry<Attr> {
    Error,
    Production(usize),
    ErrorAction(ErrorAction<Attr>),
}

impl<Attr> std::fmt::Debug for LLEntry<Attr> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLEntry::Error => write!(f, "Error"),
            LLEntry::Production(i) => write!(f, "Production({i})"),
            LLEntry::ErrorAction(_) => write!(f, "ErrorAction(..)"),
        }
    }
}

/// Dimensions are fixed by the enumerations' declared counts (spec.md §3).
pub struct LLTable<Attr> {
    num_non_terminals: usize,
    num_terminals: usize,
    entries: Vec<LLEntry<Attr>>,
}

impl<Attr> LLTable<Attr> {
    pub fn new(num_non_terminals: usize, num_terminals: usize) -> Self {
        let mut entries = Vec::with_capacity(num_non_terminals * num_terminals);
        for _ in 0..(num_non_terminals * num_terminals) {
            entries.push(LLEntry::Error);
        }
        Self { num_non_terminals, num_terminals, entries }
    }

    fn index(&self, non_terminal: Symbol, terminal: Symbol) -> Result<usize> {
        let (Symbol::NonTerminal(n), Symbol::Terminal(t)) = (non_terminal, terminal) else {
            return Err(CoreError::InvalidInput("LL table indexed with wrong symbol kinds".into()));
        };
        let (n, t) = (n as usize, t as usize);
        if n >= self.num_non_terminals || t >= self.num_terminals {
            return Err(CoreError::InvalidInput(format!(
                "LL table index ({n}, {t}) out of declared bounds ({}, {})",
                self.num_non_terminals, self.num_terminals
            )));
        }
        Ok(n * self.num_terminals + t)
    }

    pub fn set(&mut self, non_terminal: Symbol, terminal: Symbol, entry: LLEntry<Attr>) -> Result<()> {
        let i = self.index(non_terminal, terminal)?;
        self.entries[i] = entry;
        Ok(())
    }

    pub fn get(&self, non_terminal: Symbol, terminal: Symbol) -> Result<&LLEntry<Attr>> {
        let i = self.index(non_terminal, terminal)?;
        Ok(&self.entries[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_default_to_error() {
        let table: LLTable<()> = LLTable::new(2, 2);
        assert!(matches!(table.get(Symbol::NonTerminal(0), Symbol::Terminal(1)).unwrap(), LLEntry::Error));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut table: LLTable<()> = LLTable::new(2, 2);
        table.set(Symbol::NonTerminal(0), Symbol::Terminal(1), LLEntry::Production(3)).unwrap();
        assert!(matches!(table.get(Symbol::NonTerminal(0), Symbol::Terminal(1)).unwrap(), LLEntry::Production(3)));
    }

    #[test]
    fn out_of_bounds_index_is_an_error() {
        let table: LLTable<()> = LLTable::new(2, 2);
        assert!(table.get(Symbol::NonTerminal(5), Symbol::Terminal(0)).is_err());
    }

    #[test]
    fn indexing_with_wrong_symbol_kinds_is_an_error() {
        let table: LLTable<()> = LLTable::new(2, 2);
        assert!(table.get(Symbol::Terminal(0), Symbol::NonTerminal(0)).is_err());
    }
}
