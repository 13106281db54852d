//! The LL(1) parser driver (spec.md §4.5) and its panic-mode recovery
//! (spec.md §4.7 "LL panic").

use crate::error::{CoreError, Result};
use crate::grammar::{Grammar, ProductionElement, Symbol, Token};
use crate::journal::Journal;
use crate::parser::TokenStream;
use crate::table::{LLEntry, LLTable, SyncOutcome};

pub struct LLParser<'g, Attr, Data, PResult> {
    grammar: &'g Grammar<Attr, Data, PResult>,
    table: &'g LLTable<Attr>,
}

impl<'g, Attr: Clone, Data, PResult> LLParser<'g, Attr, Data, PResult> {
    pub fn new(grammar: &'g Grammar<Attr, Data, PResult>, table: &'g LLTable<Attr>) -> Self {
        Self { grammar, table }
    }

    /// Drive the stack of production elements to empty (spec.md §4.5
    /// "Main loop"). Acceptance: empty stack with the input cursor at EOF.
    pub fn parse<TS: TokenStream<Attr>>(&self, journal: &mut Journal, tokens: &mut TS) -> Result<()> {
        let mut stack: Vec<ProductionElement<Attr>> = vec![ProductionElement::Sym(self.grammar.start_symbol())];
        let mut current = tokens.next_token();
        let mut gave_up = false;

        while let Some(top) = stack.pop() {
            match top {
                ProductionElement::Sym(sym) => {
                    match self.parse_symbol(journal, &mut stack, sym, &mut current, tokens)? {
                        SymbolOutcome::Resumed => {}
                        SymbolOutcome::GaveUp => gave_up = true,
                    }
                }
                ProductionElement::Synthesized { data, action } | ProductionElement::Action { data, action } => {
                    if let Some(action) = action {
                        action(&mut stack, &data);
                    }
                }
            }
        }

        if gave_up {
            return Err(CoreError::ParseErrorUnrecoverable(journal.diagnostic(
                "LL panic-mode recovery exhausted the input without synchronizing",
                tokens.remaining_input(),
                0,
            )));
        }

        if current.name == Symbol::EOF {
            Ok(())
        } else {
            Err(CoreError::Unreachable("LL parser stack emptied with input remaining".into()))
        }
    }

    fn parse_symbol<TS: TokenStream<Attr>>(
        &self,
        journal: &mut Journal,
        stack: &mut Vec<ProductionElement<Attr>>,
        sym: Symbol,
        current: &mut Token<Attr>,
        tokens: &mut TS,
    ) -> Result<SymbolOutcome> {
        if sym.is_terminal() {
            if sym.is_epsilon() {
                return Ok(SymbolOutcome::Resumed);
            }
            if current.name == sym {
                *current = tokens.next_token();
                Ok(SymbolOutcome::Resumed)
            } else {
                self.panic_terminal(journal, sym, current)?;
                Ok(SymbolOutcome::Resumed)
            }
        } else {
            let entry = self.table.get(sym, current.name)?.clone();
            match entry {
                LLEntry::Production(idx) => {
                    let prod = self.grammar.production(idx)?;
                    if prod.body.is_empty() {
                        return Err(CoreError::TableInvariantViolated(format!(
                            "production {idx} referenced by the LL table has an empty body"
                        )));
                    }
                    for elem in prod.body.iter().rev() {
                        stack.push(elem.clone());
                    }
                    Ok(SymbolOutcome::Resumed)
                }
                LLEntry::Error | LLEntry::ErrorAction(_) => self.panic_non_terminal(journal, stack, sym, current, tokens),
            }
        }
    }

    fn panic_terminal(&self, journal: &mut Journal, expected: Symbol, current: &Token<Attr>) -> Result<()> {
        let ok = journal.record_recovery(format!(
            "expected terminal {expected}, found {}; treating {expected} as matched",
            current.name
        ));
        if !ok {
            return Err(CoreError::ErrorLimitExceeded { recovered: journal.recovered_count(), limit: journal.config().error_recovery_limit });
        }
        Ok(())
    }

    fn panic_non_terminal<TS: TokenStream<Attr>>(
        &self,
        journal: &mut Journal,
        stack: &mut Vec<ProductionElement<Attr>>,
        non_terminal: Symbol,
        current: &mut Token<Attr>,
        tokens: &mut TS,
    ) -> Result<SymbolOutcome> {
        // Step 1: an EPSILON-entry for A is absorbed silently, no recovery
        // counted.
        if let Ok(LLEntry::Production(idx)) = self.table.get(non_terminal, Symbol::EPSILON) {
            journal.note(format!("silently absorbing error on {non_terminal} via its ε-production"));
            let prod = self.grammar.production(*idx)?;
            for elem in prod.body.iter().rev() {
                stack.push(elem.clone());
            }
            return Ok(SymbolOutcome::Resumed);
        }

        // Steps 2-4: scan forward token-by-token looking for a token under
        // which `non_terminal`'s table entry is non-error, or an
        // ErrorAction that reports synchronization.
        loop {
            if current.name == Symbol::EOF {
                let ok = journal.record_recovery(format!("reached EOF while recovering on {non_terminal}"));
                if !ok {
                    return Err(CoreError::ErrorLimitExceeded {
                        recovered: journal.recovered_count(),
                        limit: journal.config().error_recovery_limit,
                    });
                }
                return Ok(SymbolOutcome::GaveUp);
            }

            let entry = self.table.get(non_terminal, current.name)?.clone();
            match entry {
                LLEntry::Production(_) => {
                    journal.record_recovery(format!("synchronized {non_terminal} on {}", current.name));
                    stack.push(ProductionElement::Sym(non_terminal));
                    return Ok(SymbolOutcome::Resumed);
                }
                LLEntry::ErrorAction(action) => {
                    let outcome = action(stack, non_terminal, current);
                    if outcome == SyncOutcome::Synchronized {
                        let ok = journal.record_recovery(format!("error action synchronized {non_terminal} on {}", current.name));
                        if !ok {
                            return Err(CoreError::ErrorLimitExceeded {
                                recovered: journal.recovered_count(),
                                limit: journal.config().error_recovery_limit,
                            });
                        }
                        *current = tokens.next_token();
                        stack.push(ProductionElement::Sym(non_terminal));
                        return Ok(SymbolOutcome::Resumed);
                    }
                    *current = tokens.next_token();
                }
                LLEntry::Error => {
                    *current = tokens.next_token();
                }
            }
        }
    }
}

enum SymbolOutcome {
    Resumed,
    GaveUp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Production;
    use crate::table::LLEntry;
    use std::collections::VecDeque;

    const S: Symbol = Symbol::NonTerminal(0);
    const A: Symbol = Symbol::NonTerminal(1);
    const SMALL_A: Symbol = Symbol::Terminal(2);
    const SMALL_B: Symbol = Symbol::Terminal(3);

    /// `S -> A b`, `A -> a A | ε`.
    fn grammar() -> Grammar<(), (), ()> {
        let productions = vec![
            Production::new(S, vec![ProductionElement::Sym(A), ProductionElement::Sym(SMALL_B)]).unwrap(),
            Production::new(A, vec![ProductionElement::Sym(SMALL_A), ProductionElement::Sym(A)]).unwrap(),
            Production::new(A, vec![ProductionElement::Sym(Symbol::EPSILON)]).unwrap(),
        ];
        Grammar::new(productions).unwrap()
    }

    fn build_table(g: &Grammar<(), (), ()>) -> LLTable<()> {
        let mut table = LLTable::new(2, 4);
        let follow = g.compute_follow();
        for prod in g.productions() {
            let alpha: Vec<Symbol> = prod.symbols().collect();
            let first_alpha = g.first_of_string(&alpha);
            for &t in first_alpha.iter().filter(|s| !s.is_epsilon()) {
                table.set(prod.head, t, LLEntry::Production(prod.index)).unwrap();
            }
            if first_alpha.contains(&Symbol::EPSILON) {
                for &t in follow.get(&prod.head).cloned().unwrap_or_default().iter() {
                    table.set(prod.head, t, LLEntry::Production(prod.index)).unwrap();
                }
            }
        }
        table
    }

    struct WordStream {
        words: VecDeque<Symbol>,
    }

    impl WordStream {
        fn new(words: &[Symbol]) -> Self {
            Self { words: words.iter().copied().collect() }
        }
    }

    impl TokenStream<()> for WordStream {
        fn next_token(&mut self) -> Token<()> {
            Token::new(self.words.pop_front().unwrap_or(Symbol::EOF), ())
        }
        fn remaining_input(&self) -> &[u8] {
            &[]
        }
    }

    #[test]
    fn accepts_bare_b_via_epsilon() {
        let g = grammar();
        let table = build_table(&g);
        let parser = LLParser::new(&g, &table);
        let mut journal = Journal::default();
        let mut stream = WordStream::new(&[SMALL_B]);
        assert!(parser.parse(&mut journal, &mut stream).is_ok());
    }

    #[test]
    fn accepts_repeated_a_prefix() {
        let g = grammar();
        let table = build_table(&g);
        let parser = LLParser::new(&g, &table);
        let mut journal = Journal::default();
        let mut stream = WordStream::new(&[SMALL_A, SMALL_A, SMALL_A, SMALL_B]);
        assert!(parser.parse(&mut journal, &mut stream).is_ok());
    }

    #[test]
    fn rejects_missing_terminator() {
        let g = grammar();
        let table = build_table(&g);
        let parser = LLParser::new(&g, &table);
        let mut journal = Journal::default();
        // A single `a` with nothing after it: panic-mode recovery exhausts
        // the input trying to find a `b` and the parse is unrecoverable.
        let mut stream = WordStream::new(&[SMALL_A]);
        assert!(parser.parse(&mut journal, &mut stream).is_err());
    }
}
