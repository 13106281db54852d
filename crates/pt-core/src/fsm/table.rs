//! The two-level `state × byte -> {state}` transition table.

use super::{StateId, DEAD_STATE};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Distinguishes a DFA (single next state per `(state, byte)`) from an NFA
/// or ε-NFA (a set of next states, plus optional ε-transitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsmKind {
    Dfa,
    Nfa,
    EpsilonNfa,
}

/// `None`/missing entries denote the dead state (spec.md §4.1).
#[derive(Debug, Clone)]
pub struct TransitionTable {
    kind: FsmKind,
    transitions: BTreeMap<(StateId, u8), BTreeSet<StateId>>,
    /// ε-transitions, only consulted when `kind == EpsilonNfa`.
    epsilon: BTreeMap<StateId, BTreeSet<StateId>>,
}

impl TransitionTable {
    pub fn new(kind: FsmKind) -> Self {
        Self { kind, transitions: BTreeMap::new(), epsilon: BTreeMap::new() }
    }

    pub fn kind(&self) -> FsmKind {
        self.kind
    }

    pub fn add_transition(&mut self, from: StateId, byte: u8, to: StateId) {
        self.transitions.entry((from, byte)).or_default().insert(to);
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.epsilon.entry(from).or_default().insert(to);
    }

    /// The set of states reachable from `state` on `byte`. Empty if the
    /// entry is missing (the dead state).
    pub fn transition(&self, state: StateId, byte: u8) -> BTreeSet<StateId> {
        if state == DEAD_STATE {
            return BTreeSet::new();
        }
        self.transitions.get(&(state, byte)).cloned().unwrap_or_default()
    }

    /// Classical worklist ε-closure expansion, guarded against revisiting
    /// states already in the running set (spec.md §4.1 "NFA-specific").
    pub fn epsilon_closure(&self, seed: BTreeSet<StateId>) -> BTreeSet<StateId> {
        if self.kind != FsmKind::EpsilonNfa {
            return seed;
        }
        let mut closure = seed.clone();
        let mut queue: VecDeque<StateId> = seed.into_iter().collect();
        while let Some(state) = queue.pop_front() {
            if let Some(targets) = self.epsilon.get(&state) {
                for &t in targets {
                    if closure.insert(t) {
                        queue.push_back(t);
                    }
                }
            }
        }
        closure
    }
}
