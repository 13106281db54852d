//! FIRST and FOLLOW fixed-point algorithms (spec.md §4.3).
//!
//! Grounded in the tri-state FIRST-set cache of
//! `examples/other_examples/32204bbb_azazo1-auto_canonical_lr1__src-grammar.rs.rs`
//! (`FirstSet::{Presence, Calculating, NotPresence}`), adapted here into a
//! full-pass fixed point over every production each round (spec.md §9's
//! note on the self-referencing-head branch) rather than a per-symbol
//! recursive probe, since the spec's own algorithm is stated as a global
//! repeat-until-stable pass.

use std::collections::BTreeSet;

use crate::grammar::{Production, Symbol};

pub type SymbolSet = BTreeSet<Symbol>;

/// One fixed-point pass of the spec.md §4.3 algorithm over every
/// production. Returns `true` if any FIRST set grew during this pass.
fn first_pass<Attr, Data, PResult>(
    productions: &[Production<Attr, Data, PResult>],
    first: &mut std::collections::HashMap<Symbol, SymbolSet>,
) -> bool {
    let mut changed = false;
    for prod in productions {
        let head = prod.head;
        let symbols: Vec<Symbol> = prod.symbols().collect();
        let n = symbols.len();
        if n == 0 {
            // An empty body (after stripping non-symbol elements) derives
            // EPSILON directly.
            changed |= first.entry(head).or_default().insert(Symbol::EPSILON);
            continue;
        }
        for (i, &sym) in symbols.iter().enumerate() {
            if sym.is_terminal() {
                changed |= first.entry(head).or_default().insert(sym);
                break;
            }
            // sym is a non-terminal (possibly `head` itself).
            let sym_first = first.entry(sym).or_default().clone();
            let without_eps: SymbolSet = sym_first.iter().copied().filter(|s| !s.is_epsilon()).collect();
            {
                let entry = first.entry(head).or_default();
                for s in &without_eps {
                    changed |= entry.insert(*s);
                }
            }
            let derives_epsilon = sym_first.contains(&Symbol::EPSILON);
            if derives_epsilon && i + 1 == n {
                changed |= first.entry(head).or_default().insert(Symbol::EPSILON);
            }
            if !derives_epsilon {
                break;
            }
            // else continue to i+1
        }
    }
    changed
}

/// Compute FIRST for every non-terminal reachable from `productions`,
/// iterating full passes until a pass adds nothing (monotone convergence
/// in a finite lattice, spec.md §4.3).
pub fn compute_first<Attr, Data, PResult>(
    productions: &[Production<Attr, Data, PResult>],
) -> std::collections::HashMap<Symbol, SymbolSet> {
    let mut first = std::collections::HashMap::new();
    loop {
        if !first_pass(productions, &mut first) {
            break;
        }
    }
    first
}

/// FIRST of an arbitrary symbol string, using a fully-computed FIRST table
/// (spec.md §4.3 "FIRST is also defined for arbitrary symbol strings").
/// FIRST of an empty sequence is `{EPSILON}`.
pub fn first_of_string(symbols: &[Symbol], first: &std::collections::HashMap<Symbol, SymbolSet>) -> SymbolSet {
    let mut result = SymbolSet::new();
    if symbols.is_empty() {
        result.insert(Symbol::EPSILON);
        return result;
    }
    for (i, &sym) in symbols.iter().enumerate() {
        if sym.is_terminal() {
            result.insert(sym);
            return result;
        }
        let sym_first = first.get(&sym).cloned().unwrap_or_default();
        result.extend(sym_first.iter().copied().filter(|s| !s.is_epsilon()));
        let derives_epsilon = sym_first.contains(&Symbol::EPSILON);
        if i + 1 == symbols.len() && derives_epsilon {
            result.insert(Symbol::EPSILON);
        }
        if !derives_epsilon {
            return result;
        }
    }
    result
}

/// Compute FOLLOW for every non-terminal. Precondition: `first` must
/// already be fully computed (spec.md §4.3 "Precondition").
pub fn compute_follow<Attr, Data, PResult>(
    productions: &[Production<Attr, Data, PResult>],
    start: Symbol,
    first: &std::collections::HashMap<Symbol, SymbolSet>,
) -> std::collections::HashMap<Symbol, SymbolSet> {
    let mut follow: std::collections::HashMap<Symbol, SymbolSet> = std::collections::HashMap::new();
    follow.entry(start).or_default().insert(Symbol::EOF);

    loop {
        let mut changed = false;
        for prod in productions {
            let symbols: Vec<Symbol> = prod.symbols().collect();
            for (i, &sym) in symbols.iter().enumerate() {
                if !sym.is_non_terminal() {
                    continue;
                }
                let beta = &symbols[i + 1..];
                let beta_first = first_of_string(beta, first);
                let additions: SymbolSet = beta_first.iter().copied().filter(|s| !s.is_epsilon()).collect();
                {
                    let entry = follow.entry(sym).or_default();
                    for s in &additions {
                        changed |= entry.insert(*s);
                    }
                }
                if beta.is_empty() || beta_first.contains(&Symbol::EPSILON) {
                    let head_follow = follow.entry(prod.head).or_default().clone();
                    let entry = follow.entry(sym).or_default();
                    for s in &head_follow {
                        changed |= entry.insert(*s);
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }
    follow
}
