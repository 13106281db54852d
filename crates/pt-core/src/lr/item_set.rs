//! Item sets, CLOSURE, GOTO, and core-equivalence (spec.md §4.4).

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};

use crate::grammar::{Grammar, Symbol};
use crate::lr::item::Item;

/// A collection of items plus a lazily computed CLOSURE cache. Equality is
/// set equality of items (spec.md §3).
#[derive(Clone)]
pub struct ItemSet {
    items: Vec<Item>,
    closure_cache: RefCell<Option<Vec<Item>>>,
}

impl std::fmt::Debug for ItemSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSet").field("items", &self.items).finish()
    }
}

impl Default for ItemSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.as_set() == other.as_set()
    }
}
impl Eq for ItemSet {}

impl FromIterator<Item> for ItemSet {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut set = ItemSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl ItemSet {
    pub fn new() -> Self {
        Self { items: Vec::new(), closure_cache: RefCell::new(None) }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn as_set(&self) -> BTreeSet<Item> {
        self.items.iter().cloned().collect()
    }

    /// Multiset equality under core-only projection (spec.md §3
    /// "core equality").
    pub fn core_key(&self) -> BTreeSet<(usize, usize)> {
        self.items.iter().map(|i| i.core()).collect()
    }

    fn invalidate_cache(&self) {
        *self.closure_cache.borrow_mut() = None;
    }

    /// Insert an item: if an item with an identical core exists, union the
    /// lookaheads into it; else append. Returns whether the set changed.
    pub fn insert(&mut self, item: Item) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|i| i.core() == item.core()) {
            let before = existing.lookaheads.len();
            existing.lookaheads.extend(item.lookaheads);
            let changed = existing.lookaheads.len() != before;
            if changed {
                self.invalidate_cache();
            }
            changed
        } else {
            self.items.push(item);
            self.invalidate_cache();
            true
        }
    }

    /// Insert every item of `other`, per-item (spec.md §4.4 "merge").
    pub fn merge(&mut self, other: &ItemSet) -> bool {
        let mut changed = false;
        for item in &other.items {
            changed |= self.insert(item.clone());
        }
        changed
    }

    /// CLOSURE(I): the smallest superset of `self` such that for every item
    /// `[H -> α . B β, a]` and every production `B -> γ`, the item
    /// `[B -> . γ, b]` for each `b ∈ FIRST(β a)` is also present. LR(0)
    /// items (empty lookaheads) skip lookahead generation entirely. An
    /// empty item set closes to itself.
    pub fn closure<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>) -> ItemSet {
        if let Some(cached) = self.closure_cache.borrow().as_ref() {
            return ItemSet { items: cached.clone(), closure_cache: RefCell::new(Some(cached.clone())) };
        }
        if self.items.is_empty() {
            let result = ItemSet::new();
            *self.closure_cache.borrow_mut() = Some(Vec::new());
            return result;
        }

        let mut result = ItemSet::new();
        for item in &self.items {
            result.insert(item.clone());
        }

        let mut worklist: VecDeque<Item> = self.items.iter().cloned().collect();
        while let Some(item) = worklist.pop_front() {
            let Some(next_sym) = item.next_symbol(grammar) else { continue };
            if !next_sym.is_non_terminal() {
                continue;
            }
            let is_lr0 = item.lookaheads.is_empty();
            let lookaheads: BTreeSet<Symbol> = if is_lr0 {
                BTreeSet::new()
            } else {
                let beta = item.beta(grammar);
                let mut la = BTreeSet::new();
                for &a in &item.lookaheads {
                    let mut beta_a = beta.clone();
                    beta_a.push(a);
                    la.extend(grammar.first_of_string(&beta_a).into_iter().filter(|s| !s.is_epsilon()));
                }
                la
            };

            for prod in grammar.productions_for(next_sym) {
                let new_item = Item::start(prod.index, lookaheads.clone());
                let core = new_item.core();
                // `insert` itself reports whether the core is new or the
                // union grew the lookaheads — either way the (possibly
                // updated) item needs to be worklisted so its own closure
                // contribution reflects the full lookahead set.
                if result.insert(new_item) {
                    let full_item = result.items.iter().find(|i| i.core() == core).cloned().unwrap();
                    worklist.push_back(full_item);
                }
            }
        }

        *self.closure_cache.borrow_mut() = Some(result.items.clone());
        result
    }

    /// GOTO(I, X): closure of `I` is computed if not already cached, then
    /// the set of items with the dot advanced past `X` is closed again.
    pub fn goto<Attr, Data, PResult>(&self, grammar: &Grammar<Attr, Data, PResult>, x: Symbol) -> ItemSet {
        let closed = self.closure(grammar);
        let mut advanced = ItemSet::new();
        for item in &closed.items {
            if item.next_symbol(grammar) == Some(x) {
                if let Some(next) = item.advance(grammar) {
                    advanced.insert(next);
                }
            }
        }
        advanced.closure(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Production, ProductionElement, Symbol};
    use crate::lr::item::start_items_of;

    const SP: Symbol = Symbol::NonTerminal(0);
    const S: Symbol = Symbol::NonTerminal(1);
    const LPAREN: Symbol = Symbol::Terminal(2);
    const RPAREN: Symbol = Symbol::Terminal(3);
    const ATOM: Symbol = Symbol::Terminal(4);

    /// `S' -> S`, `S -> ( S ) | a`.
    fn grammar() -> Grammar<(), (), ()> {
        let productions = vec![
            Production::new(SP, vec![ProductionElement::Sym(S)]).unwrap(),
            Production::new(S, vec![ProductionElement::Sym(LPAREN), ProductionElement::Sym(S), ProductionElement::Sym(RPAREN)]).unwrap(),
            Production::new(S, vec![ProductionElement::Sym(ATOM)]).unwrap(),
        ];
        Grammar::new(productions).unwrap()
    }

    #[test]
    fn closure_is_idempotent_on_goto_results() {
        let g = grammar();
        let initial: ItemSet = start_items_of(&g, SP, BTreeSet::from([Symbol::EOF])).into_iter().collect();
        let state0 = initial.closure(&g);

        let after_lparen = state0.goto(&g, LPAREN);
        assert!(!after_lparen.is_empty());
        assert_eq!(after_lparen.closure(&g), after_lparen);

        let after_atom = state0.goto(&g, ATOM);
        assert!(!after_atom.is_empty());
        assert_eq!(after_atom.closure(&g), after_atom);
    }

    #[test]
    fn closure_of_empty_set_is_empty() {
        let g = grammar();
        let empty = ItemSet::new();
        assert!(empty.closure(&g).is_empty());
    }

    #[test]
    fn closure_adds_both_alternatives_of_s() {
        let g = grammar();
        let initial: ItemSet = start_items_of(&g, SP, BTreeSet::from([Symbol::EOF])).into_iter().collect();
        let closed = initial.closure(&g);
        // S -> . ( S ) and S -> . a should both appear, plus the kernel item.
        assert_eq!(closed.items().len(), 3);
    }

    /// `S' -> S`, `S -> A b`, `A -> a A | ε` — a nullable non-terminal must
    /// reduce on its own, not wait for a `GOTO` on the literal `EPSILON`
    /// symbol (which no lexer ever emits).
    fn nullable_grammar() -> Grammar<(), (), ()> {
        const SPRIME: Symbol = Symbol::NonTerminal(0);
        const SS: Symbol = Symbol::NonTerminal(1);
        const AA: Symbol = Symbol::NonTerminal(2);
        const SMALL_B: Symbol = Symbol::Terminal(5);
        let productions = vec![
            Production::new(SPRIME, vec![ProductionElement::Sym(SS)]).unwrap(),
            Production::new(SS, vec![ProductionElement::Sym(AA), ProductionElement::Sym(SMALL_B)]).unwrap(),
            Production::new(AA, vec![ProductionElement::Sym(ATOM), ProductionElement::Sym(AA)]).unwrap(),
            Production::new(AA, vec![ProductionElement::Sym(Symbol::EPSILON)]).unwrap(),
        ];
        Grammar::new(productions).unwrap()
    }

    #[test]
    fn closure_reduces_epsilon_item_without_a_goto_on_epsilon() {
        let g = nullable_grammar();
        let initial: ItemSet = start_items_of(&g, g.start_symbol(), BTreeSet::from([Symbol::EOF])).into_iter().collect();
        let closed = initial.closure(&g);

        // The ε-production's item, [A -> ., la], must already be complete
        // in the closure — it never appears as `next_symbol == Some(EPSILON)`.
        let eps_item = closed.items().iter().find(|i| i.production == 3).expect("epsilon item present");
        assert!(eps_item.is_complete(&g));
        assert_eq!(eps_item.next_symbol(&g), None);

        // GOTO on the literal EPSILON symbol must never be how a caller
        // advances past a nullable non-terminal.
        assert!(closed.goto(&g, Symbol::EPSILON).is_empty());

        // GOTO on the real terminal ATOM still reaches `A -> a . A`.
        let after_atom = closed.goto(&g, ATOM);
        assert!(!after_atom.is_empty());
    }

    #[test]
    fn insert_merges_lookaheads_of_items_with_the_same_core() {
        let mut set = ItemSet::new();
        let a = crate::lr::item::Item::start(1, BTreeSet::from([Symbol::EOF]));
        let b = crate::lr::item::Item::start(1, BTreeSet::from([RPAREN]));
        assert!(set.insert(a));
        assert!(set.insert(b)); // same core, lookaheads grow -> changed
        assert_eq!(set.items().len(), 1);
        assert_eq!(set.items()[0].lookaheads, BTreeSet::from([Symbol::EOF, RPAREN]));
    }
}
