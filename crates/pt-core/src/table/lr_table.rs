//! The LR(1) parsing table: an action table (`state × terminal -> entry`)
//! and a goto table (`state × non-terminal -> entry`) — spec.md §3. States
//! are dense non-negative integers; state 0 is the start state.
//!
//! The table does not itself hold a grammar reference (unlike the spec's
//! literal description) to avoid threading an extra lifetime parameter
//! through every table-consuming call site; drivers are handed the table
//! and the grammar side by side, which is equivalent in practice since
//! both are constructed together and used read-only for the rest of the
//! program.

use std::collections::HashMap;

use crate::error::{CoreError, Result};
use crate::grammar::Symbol;

pub const LR_START_STATE: u32 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LREntry {
    Shift(u32),
    Reduce(usize),
    Goto(u32),
    Accept,
    Error,
}

impl LREntry {
    pub fn is_error(&self) -> bool {
        matches!(self, LREntry::Error)
    }

    pub fn is_goto(&self) -> bool {
        matches!(self, LREntry::Goto(_))
    }
}

#[derive(Default)]
pub struct LRTable {
    action: HashMap<(u32, Symbol), LREntry>,
    goto: HashMap<(u32, Symbol), LREntry>,
}

impl LRTable {
    pub fn new() -> Self {
        Self { action: HashMap::new(), goto: HashMap::new() }
    }

    pub fn set_action(&mut self, state: u32, terminal: Symbol, entry: LREntry) -> Result<()> {
        if !terminal.is_terminal() {
            return Err(CoreError::InvalidInput("action table indexed by a non-terminal symbol".into()));
        }
        self.action.insert((state, terminal), entry);
        Ok(())
    }

    pub fn set_goto(&mut self, state: u32, non_terminal: Symbol, entry: LREntry) -> Result<()> {
        if !non_terminal.is_non_terminal() {
            return Err(CoreError::InvalidInput("goto table indexed by a terminal symbol".into()));
        }
        self.goto.insert((state, non_terminal), entry);
        Ok(())
    }

    /// A missing entry is treated as `Error` (spec.md §3 "An empty entry is
    /// treated as error").
    pub fn action(&self, state: u32, terminal: Symbol) -> LREntry {
        self.action.get(&(state, terminal)).copied().unwrap_or(LREntry::Error)
    }

    pub fn goto(&self, state: u32, non_terminal: Symbol) -> LREntry {
        self.goto.get(&(state, non_terminal)).copied().unwrap_or(LREntry::Error)
    }

    /// All non-terminals for which `state` has a non-error GOTO entry —
    /// used by LR panic-mode recovery (spec.md §4.7).
    pub fn goto_non_terminals(&self, state: u32) -> Vec<Symbol> {
        self.goto
            .iter()
            .filter(|((s, _), entry)| *s == state && !entry.is_error())
            .map(|((_, nt), _)| *nt)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_default_to_error() {
        let table = LRTable::new();
        assert_eq!(table.action(0, Symbol::Terminal(2)), LREntry::Error);
        assert_eq!(table.goto(0, Symbol::NonTerminal(0)), LREntry::Error);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut table = LRTable::new();
        table.set_action(0, Symbol::Terminal(2), LREntry::Shift(1)).unwrap();
        table.set_goto(0, Symbol::NonTerminal(0), LREntry::Goto(2)).unwrap();
        assert_eq!(table.action(0, Symbol::Terminal(2)), LREntry::Shift(1));
        assert_eq!(table.goto(0, Symbol::NonTerminal(0)), LREntry::Goto(2));
    }

    #[test]
    fn action_table_rejects_non_terminal_index() {
        let mut table = LRTable::new();
        assert!(table.set_action(0, Symbol::NonTerminal(0), LREntry::Shift(1)).is_err());
    }

    #[test]
    fn goto_table_rejects_terminal_index() {
        let mut table = LRTable::new();
        assert!(table.set_goto(0, Symbol::Terminal(2), LREntry::Goto(1)).is_err());
    }

    #[test]
    fn goto_non_terminals_excludes_error_entries() {
        let mut table = LRTable::new();
        table.set_goto(0, Symbol::NonTerminal(0), LREntry::Goto(1)).unwrap();
        table.set_goto(0, Symbol::NonTerminal(1), LREntry::Error).unwrap();
        assert_eq!(table.goto_non_terminals(0), vec![Symbol::NonTerminal(0)]);
    }
}
