//! Table construction is a caller concern (spec.md §1 Non-goals: "the
//! caller constructs grammar and table values programmatically"). These
//! two functions are that caller-side logic for the demo grammar: one
//! drives FIRST/FOLLOW into an `LLTable`, the other drives the canonical
//! LR(1) collection (via `ItemSet`/CLOSURE/GOTO) into an `LRTable`.

use std::collections::{BTreeSet, VecDeque};

use pt_core::error::Result;
use pt_core::grammar::{Grammar, Symbol};
use pt_core::lr::{start_items_of, ItemSet};
use pt_core::table::{LLEntry, LLTable, LREntry, LRTable};

pub fn build_ll_table<Attr: Clone, Data, PResult>(
    grammar: &Grammar<Attr, Data, PResult>,
    num_non_terminals: usize,
    num_terminals: usize,
) -> Result<LLTable<Attr>> {
    let mut table = LLTable::new(num_non_terminals, num_terminals);
    let follow = grammar.compute_follow();

    for prod in grammar.productions() {
        let alpha: Vec<Symbol> = prod.symbols().collect();
        let first_alpha = grammar.first_of_string(&alpha);

        for &t in first_alpha.iter().filter(|s| !s.is_epsilon()) {
            table.set(prod.head, t, LLEntry::Production(prod.index))?;
        }
        if first_alpha.contains(&Symbol::EPSILON) {
            let follow_head = follow.get(&prod.head).cloned().unwrap_or_default();
            for t in follow_head {
                table.set(prod.head, t, LLEntry::Production(prod.index))?;
            }
        }
    }

    Ok(table)
}

/// Canonical LR(1) table construction: breadth-first over the collection
/// of CLOSURE/GOTO-derived item sets reachable from the closure of the
/// augmented start item, recording shift/goto transitions and reduce/
/// accept entries at every complete item (spec.md §4.4, §4.6).
pub fn build_lr_table<Attr, Data, PResult>(grammar: &Grammar<Attr, Data, PResult>) -> Result<LRTable> {
    let start = grammar.start_symbol();
    let initial_kernel: ItemSet = start_items_of(grammar, start, BTreeSet::from([Symbol::EOF])).into_iter().collect();
    let initial_state = initial_kernel.closure(grammar);

    let mut states: Vec<ItemSet> = vec![initial_state];
    let mut worklist: VecDeque<usize> = VecDeque::from([0]);
    let mut table = LRTable::new();

    while let Some(state_idx) = worklist.pop_front() {
        let state = states[state_idx].clone();

        let mut symbols_after_dot: BTreeSet<Symbol> = BTreeSet::new();
        for item in state.items() {
            if let Some(sym) = item.next_symbol(grammar) {
                symbols_after_dot.insert(sym);
            }
        }

        for sym in symbols_after_dot {
            let goto_set = state.goto(grammar, sym);
            if goto_set.is_empty() {
                continue;
            }
            let target_idx = match states.iter().position(|s| *s == goto_set) {
                Some(i) => i,
                None => {
                    states.push(goto_set);
                    worklist.push_back(states.len() - 1);
                    states.len() - 1
                }
            };
            if sym.is_terminal() {
                table.set_action(state_idx as u32, sym, LREntry::Shift(target_idx as u32))?;
            } else {
                table.set_goto(state_idx as u32, sym, LREntry::Goto(target_idx as u32))?;
            }
        }

        for item in state.items() {
            if !item.is_complete(grammar) {
                continue;
            }
            for &lookahead in &item.lookaheads {
                if item.production == 0 && lookahead == Symbol::EOF {
                    table.set_action(state_idx as u32, lookahead, LREntry::Accept)?;
                } else {
                    table.set_action(state_idx as u32, lookahead, LREntry::Reduce(item.production))?;
                }
            }
        }
    }

    Ok(table)
}
