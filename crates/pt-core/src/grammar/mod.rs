//! Productions, symbols, symbol strings, and the FIRST/FOLLOW machinery.
//!
//! Grounded in `examples/acweathersby-radlr/source/lib/sherpa-core/types/grammar.rs`
//! (production vector + per-non-terminal FIRST/FOLLOW caching) and
//! `examples/other_examples/32204bbb_azazo1-auto_canonical_lr1__src-grammar.rs.rs`
//! (`Production`/`Grammar` shape, augmented-start-symbol handling).

mod first_follow;
mod production;
mod symbol;

pub use first_follow::SymbolSet;
pub use production::{AcceptAction, LLAction, LRStackElement, Production, ProductionElement, ReduceAction, Token};
pub use symbol::{Symbol, SymbolString};

use crate::error::{CoreError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// An ordered collection of productions; caches FIRST per non-terminal and
/// FOLLOW per non-terminal once computed. The first production's head is
/// the augmented start symbol (spec.md §3).
pub struct Grammar<Attr, Data, PResult> {
    productions: Vec<Production<Attr, Data, PResult>>,
    first: RefCell<Option<HashMap<Symbol, SymbolSet>>>,
    follow: RefCell<Option<HashMap<Symbol, SymbolSet>>>,
}

impl<Attr, Data, PResult> Grammar<Attr, Data, PResult> {
    /// Build a grammar from productions in order; the first production's
    /// head becomes the augmented start symbol. Assigns each production's
    /// `index` to its position in the vector.
    pub fn new(mut productions: Vec<Production<Attr, Data, PResult>>) -> Result<Self> {
        if productions.is_empty() {
            return Err(CoreError::InvalidConstruction("a grammar requires at least one production".into()));
        }
        for (i, p) in productions.iter_mut().enumerate() {
            p.index = i;
        }
        Ok(Self { productions, first: RefCell::new(None), follow: RefCell::new(None) })
    }

    pub fn productions(&self) -> &[Production<Attr, Data, PResult>] {
        &self.productions
    }

    pub fn production(&self, index: usize) -> Result<&Production<Attr, Data, PResult>> {
        self.productions.get(index).ok_or_else(|| CoreError::InvalidInput(format!("production index {index} out of range")))
    }

    pub fn start_symbol(&self) -> Symbol {
        self.productions[0].head
    }

    pub fn productions_for(&self, head: Symbol) -> impl Iterator<Item = &Production<Attr, Data, PResult>> {
        self.productions.iter().filter(move |p| p.head == head)
    }

    /// Compute (or return the cached) FIRST table. Eager, idempotent:
    /// running this twice never changes the result (spec.md §8
    /// "Monotonicity").
    pub fn compute_first(&self) -> HashMap<Symbol, SymbolSet> {
        if let Some(cached) = self.first.borrow().as_ref() {
            return cached.clone();
        }
        let computed = first_follow::compute_first(&self.productions);
        *self.first.borrow_mut() = Some(computed.clone());
        computed
    }

    pub fn first_of(&self, symbol: Symbol) -> SymbolSet {
        if symbol.is_terminal() {
            let mut s = SymbolSet::new();
            s.insert(symbol);
            return s;
        }
        self.compute_first().get(&symbol).cloned().unwrap_or_default()
    }

    pub fn first_of_string(&self, symbols: &[Symbol]) -> SymbolSet {
        let first = self.compute_first();
        first_follow::first_of_string(symbols, &first)
    }

    /// Compute (or return the cached) FOLLOW table. FOLLOW may only be
    /// computed after FIRST (spec.md §3 invariant); this computes FIRST
    /// itself if it hasn't run yet, matching the spec's "once computed"
    /// caching semantics without forcing callers to sequence the two
    /// calls manually.
    pub fn compute_follow(&self) -> HashMap<Symbol, SymbolSet> {
        if let Some(cached) = self.follow.borrow().as_ref() {
            return cached.clone();
        }
        let first = self.compute_first();
        let computed = first_follow::compute_follow(&self.productions, self.start_symbol(), &first);
        *self.follow.borrow_mut() = Some(computed.clone());
        computed
    }

    /// As `compute_follow`, but fails with `MissingPrecondition` if FIRST
    /// has not already been computed — exposed for callers that want the
    /// strict ordering the spec text describes literally (spec.md §4.3
    /// "Precondition: FIRST has been computed; otherwise fail").
    pub fn follow_strict(&self) -> Result<HashMap<Symbol, SymbolSet>> {
        if self.first.borrow().is_none() {
            return Err(CoreError::follow_before_first());
        }
        Ok(self.compute_follow())
    }

    pub fn follow_of(&self, symbol: Symbol) -> SymbolSet {
        self.compute_follow().get(&symbol).cloned().unwrap_or_default()
    }
}
