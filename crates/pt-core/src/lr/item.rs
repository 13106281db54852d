//! LR items: `(production, dot, lookaheads)`.
//!
//! Grounded in `examples/acweathersby-radlr/src/lib/sherpa-core/grammar/new/compile/types/item.rs`
//! (`len`/`sym_index` fields, `increment`/`is_complete`/`get_type`) and
//! `examples/acweathersby-radlr/source/lib/sherpa-core/grammar/item.rs`
//! (the simpler `BTreeSet`-worklist `create_closure`, which this module's
//! CLOSURE follows rather than the newer graph-shaped `ItemRef` machinery —
//! that machinery solves a GLR-shaped problem out of this spec's scope).
//!
//! The dot is stored as a **symbol-index** (counts only grammar-symbol
//! elements, per spec.md §3's definition of item "length"), not as a raw
//! index into the production body. This is the "cleaner representation"
//! spec.md §9's design notes explicitly allow in place of dual
//! actual/symbol bookkeeping, since CLOSURE/GOTO/FIRST only ever need to
//! know which grammar symbol the dot precedes. [`Item::body_index`]
//! recovers the underlying body index on demand for callers (e.g.
//! diagnostics) that need it.

use std::fmt;

use crate::grammar::{Grammar, Production, Symbol};

/// An LR item. Empty `lookaheads` denotes an LR(0) item.
#[derive(Clone)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub lookaheads: std::collections::BTreeSet<Symbol>,
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("production", &self.production)
            .field("dot", &self.dot)
            .field("lookaheads", &self.lookaheads)
            .finish()
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.production == other.production && self.dot == other.dot && self.lookaheads == other.lookaheads
    }
}
impl Eq for Item {}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Item {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.production, self.dot, &self.lookaheads).cmp(&(other.production, other.dot, &other.lookaheads))
    }
}

impl std::hash::Hash for Item {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.production.hash(state);
        self.dot.hash(state);
        for s in &self.lookaheads {
            s.hash(state);
        }
    }
}

impl Item {
    /// Construct an item against a grammar, validating both that
    /// `production` names a real production and that `0 <= dot <=
    /// symbol_len` (spec.md §3's item invariant; §7 names an out-of-range
    /// dot as an `Invalid-construction` error). Unlike [`Item::start`],
    /// this is the fallible entry point for callers that did not derive
    /// `dot` themselves via CLOSURE/GOTO/`advance`.
    pub fn new<Attr, Data, PResult>(
        grammar: &Grammar<Attr, Data, PResult>,
        production: usize,
        dot: usize,
        lookaheads: std::collections::BTreeSet<Symbol>,
    ) -> crate::error::Result<Self> {
        let prod = grammar.production(production)?;
        let len = prod.symbol_len();
        if dot > len {
            return Err(crate::error::CoreError::dot_out_of_range(dot, len));
        }
        Ok(Self { production, dot, lookaheads })
    }

    pub fn start(production: usize, lookaheads: std::collections::BTreeSet<Symbol>) -> Self {
        Self { production, dot: 0, lookaheads }
    }

    /// `(production, dot)`, ignoring lookaheads — two items share a core
    /// iff this is equal (spec.md §3).
    pub fn core(&self) -> (usize, usize) {
        (self.production, self.dot)
    }

    pub fn is_complete<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> bool {
        let prod = grammar.production(self.production).expect("item references a valid production");
        self.dot >= prod.symbol_len()
    }

    /// The grammar symbol immediately after the dot, or `None` if complete.
    pub fn next_symbol<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> Option<Symbol> {
        let prod = grammar.production(self.production).expect("item references a valid production");
        prod.symbols().nth(self.dot)
    }

    /// The remaining symbols after the one immediately following the dot
    /// (the `β` in `[H -> α . X β, a]`) — used for FIRST(β a) in CLOSURE.
    pub fn beta<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> Vec<Symbol> {
        let prod = grammar.production(self.production).expect("item references a valid production");
        prod.symbols().skip(self.dot + 1).collect()
    }

    /// Advance the dot past the next grammar symbol. Returns `None` if the
    /// item is already complete.
    pub fn advance<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> Option<Item> {
        if self.is_complete(grammar) {
            return None;
        }
        Some(Item { production: self.production, dot: self.dot + 1, lookaheads: self.lookaheads.clone() })
    }

    /// Recover the index into the production's raw body vector that the
    /// dot's symbol-count corresponds to, skipping non-symbol elements —
    /// the "actual dot position" spec.md §3/§9 describe, recovered lazily.
    pub fn body_index<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> usize {
        let prod = grammar.production(self.production).expect("item references a valid production");
        let mut seen = 0;
        for (i, elem) in prod.body.iter().enumerate() {
            if elem.is_symbol() {
                if seen == self.dot {
                    return i;
                }
                seen += 1;
            }
        }
        prod.body.len()
    }

    pub fn debug_string<Attr: fmt::Debug, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> String {
        let prod = grammar.production(self.production).expect("item references a valid production");
        let symbols: Vec<Symbol> = prod.symbols().collect();
        let mut out = format!("{} ->", prod.head);
        for (i, s) in symbols.iter().enumerate() {
            if i == self.dot {
                out.push_str(" .");
            }
            out.push(' ');
            out.push_str(&s.to_string());
        }
        if self.dot == symbols.len() {
            out.push_str(" .");
        }
        if !self.lookaheads.is_empty() {
            let la: Vec<String> = self.lookaheads.iter().map(|s| s.to_string()).collect();
            out.push_str(&format!(", {{{}}}", la.join("/")));
        }
        out
    }
}

/// Given a production's existing instance, keep production/head info
/// intact but align the helper's generic parameters with the grammar it
/// came from (used by `Production`-generic call sites that only have
/// `Attr` in scope).
pub fn start_items_of<Attr, Data, PResult>(
    grammar: &Grammar<Attr, Data, PResult>,
    head: Symbol,
    lookaheads: std::collections::BTreeSet<Symbol>,
) -> Vec<Item> {
    grammar
        .productions()
        .iter()
        .filter(|p| p.head == head)
        .map(|p: &Production<Attr, Data, PResult>| Item::start(p.index, lookaheads.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Production, ProductionElement};
    use std::collections::BTreeSet;

    const S: Symbol = Symbol::NonTerminal(0);
    const A: Symbol = Symbol::NonTerminal(1);
    const SMALL_A: Symbol = Symbol::Terminal(2);
    const SMALL_B: Symbol = Symbol::Terminal(3);

    /// `S -> A b`, `A -> a A | ε` — production 2 is the ε-production.
    fn grammar() -> Grammar<(), (), ()> {
        let productions = vec![
            Production::new(S, vec![ProductionElement::Sym(A), ProductionElement::Sym(SMALL_B)]).unwrap(),
            Production::new(A, vec![ProductionElement::Sym(SMALL_A), ProductionElement::Sym(A)]).unwrap(),
            Production::new(A, vec![ProductionElement::Sym(Symbol::EPSILON)]).unwrap(),
        ];
        Grammar::new(productions).unwrap()
    }

    #[test]
    fn epsilon_production_is_complete_at_dot_zero() {
        let g = grammar();
        let item = Item::start(2, BTreeSet::new());
        assert_eq!(item.dot, 0);
        assert!(item.is_complete(&g));
        assert_eq!(item.next_symbol(&g), None);
    }

    #[test]
    fn new_accepts_dot_at_or_before_symbol_len() {
        let g = grammar();
        assert!(Item::new(&g, 1, 0, BTreeSet::new()).is_ok());
        assert!(Item::new(&g, 1, 2, BTreeSet::new()).is_ok());
        // Production 1 (`A -> a A`) has symbol_len 2; dot == 0 for the
        // ε-production (index 2) is also the only valid dot.
        assert!(Item::new(&g, 2, 0, BTreeSet::new()).is_ok());
    }

    #[test]
    fn new_rejects_out_of_range_dot() {
        let g = grammar();
        assert!(Item::new(&g, 1, 3, BTreeSet::new()).is_err());
        assert!(Item::new(&g, 2, 1, BTreeSet::new()).is_err());
    }

    #[test]
    fn new_rejects_out_of_range_production() {
        let g = grammar();
        assert!(Item::new(&g, 99, 0, BTreeSet::new()).is_err());
    }
}
