//! Finite-state-machine engine: deterministic and nondeterministic
//! transition tables, three match modes.
//!
//! Grounded in the teacher's transition-graph worklist style
//! (`source/lib/hctk-core/intermediate/transition.rs`), generalized here to
//! a standalone byte-level matcher since the teacher's own transition graph
//! is wired directly to its grammar rather than exposed as a reusable FSM.

mod table;

pub use table::{FsmKind, TransitionTable};

use crate::error::{CoreError, Result};
use std::collections::BTreeSet;

/// Numerical state id. `0` is the dead state; `1` is the start state.
pub type StateId = u32;

pub const DEAD_STATE: StateId = 0;
pub const START_STATE: StateId = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    WholeString,
    LongestPrefix,
    LongestSubstring,
}

/// Result of running the FSM over an input slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub accepted: bool,
    pub reached_final_states: BTreeSet<StateId>,
    pub span: (usize, usize),
    pub input: &'a [u8],
}

impl<'a> MatchResult<'a> {
    fn reject(input: &'a [u8]) -> Self {
        Self { accepted: false, reached_final_states: BTreeSet::new(), span: (0, 0), input }
    }

    pub fn matched(&self) -> &'a [u8] {
        &self.input[self.span.0..self.span.1]
    }
}

/// A finite-state machine: a transition table plus a final-state set.
#[derive(Debug, Clone)]
pub struct Fsm {
    table: TransitionTable,
    final_states: BTreeSet<StateId>,
}

impl Fsm {
    pub fn new(table: TransitionTable, final_states: BTreeSet<StateId>) -> Result<Self> {
        if final_states.is_empty() {
            return Err(CoreError::empty_final_states());
        }
        Ok(Self { table, final_states })
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.final_states.contains(&state)
    }

    pub fn final_states(&self) -> &BTreeSet<StateId> {
        &self.final_states
    }

    /// Advance a configuration (set of "live" states — a singleton for a
    /// DFA) by one input byte, expanding ε-closures for ε-NFAs.
    fn step(&self, configuration: &BTreeSet<StateId>, byte: u8) -> BTreeSet<StateId> {
        let mut next = BTreeSet::new();
        for &state in configuration {
            for reached in self.table.transition(state, byte) {
                next.insert(reached);
            }
        }
        self.table.epsilon_closure(next)
    }

    fn initial_configuration(&self) -> BTreeSet<StateId> {
        self.table.epsilon_closure(BTreeSet::from([START_STATE]))
    }

    fn configuration_is_final(&self, configuration: &BTreeSet<StateId>) -> bool {
        configuration.iter().any(|s| self.is_final(*s))
    }

    fn reached_final_in(&self, configuration: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        configuration.intersection(&self.final_states).copied().collect()
    }

    /// Run the FSM starting at a given offset of `input`, returning the
    /// longest accepted prefix length of `input[start..]` (not a full
    /// `MatchResult` — used as the inner loop of longest-substring mode).
    fn longest_prefix_len_from(&self, input: &[u8], start: usize) -> Option<usize> {
        let mut configuration = self.initial_configuration();
        let mut best: Option<usize> = if self.configuration_is_final(&configuration) { Some(0) } else { None };
        for (i, &byte) in input[start..].iter().enumerate() {
            configuration = self.step(&configuration, byte);
            if configuration.is_empty() {
                break;
            }
            if self.configuration_is_final(&configuration) {
                best = Some(i + 1);
            }
        }
        best
    }

    pub fn run<'a>(&self, input: &'a [u8], mode: MatchMode) -> Result<MatchResult<'a>> {
        match mode {
            MatchMode::WholeString => Ok(self.run_whole_string(input)),
            MatchMode::LongestPrefix => Ok(self.run_longest_prefix(input)),
            MatchMode::LongestSubstring => Ok(self.run_longest_substring(input)),
        }
    }

    fn run_whole_string<'a>(&self, input: &'a [u8]) -> MatchResult<'a> {
        let mut configuration = self.initial_configuration();
        for &byte in input {
            configuration = self.step(&configuration, byte);
            if configuration.is_empty() {
                return MatchResult::reject(input);
            }
        }
        if self.configuration_is_final(&configuration) {
            MatchResult {
                accepted: true,
                reached_final_states: self.reached_final_in(&configuration),
                span: (0, input.len()),
                input,
            }
        } else {
            MatchResult::reject(input)
        }
    }

    fn run_longest_prefix<'a>(&self, input: &'a [u8]) -> MatchResult<'a> {
        // Record the configuration reached after each byte, then scan in
        // reverse for the largest accepting index, per spec.md §4.1.
        let mut configuration = self.initial_configuration();
        let mut history = vec![configuration.clone()];
        for &byte in input {
            configuration = self.step(&configuration, byte);
            history.push(configuration.clone());
            if configuration.is_empty() {
                break;
            }
        }
        for i in (0..history.len()).rev() {
            if self.configuration_is_final(&history[i]) {
                return MatchResult {
                    accepted: true,
                    reached_final_states: self.reached_final_in(&history[i]),
                    span: (0, i),
                    input,
                };
            }
        }
        MatchResult::reject(input)
    }

    fn run_longest_substring<'a>(&self, input: &'a [u8]) -> MatchResult<'a> {
        let mut best: Option<(usize, usize)> = None;
        for start in 0..=input.len() {
            if let Some(len) = self.longest_prefix_len_from(input, start) {
                if len == 0 {
                    continue;
                }
                // Ties broken by first occurrence: only replace a shorter match.
                if best.map(|(_, blen)| len > blen).unwrap_or(true) {
                    best = Some((start, len));
                }
            }
        }
        match best {
            Some((start, len)) => {
                let configuration = {
                    let mut c = self.initial_configuration();
                    for &byte in &input[start..start + len] {
                        c = self.step(&c, byte);
                    }
                    c
                };
                MatchResult {
                    accepted: true,
                    reached_final_states: self.reached_final_in(&configuration),
                    span: (start, start + len),
                    input,
                }
            }
            None => MatchResult::reject(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `a b*` — state 1 is start, state 2 (reached after `a`, and every
    /// `b` thereafter) is the only final state.
    fn ab_star() -> Fsm {
        let mut table = TransitionTable::new(FsmKind::Dfa);
        table.add_transition(START_STATE, b'a', 2);
        table.add_transition(2, b'b', 2);
        Fsm::new(table, BTreeSet::from([2])).unwrap()
    }

    #[test]
    fn whole_string_accepts_exact_match() {
        let fsm = ab_star();
        assert!(fsm.run(b"abb", MatchMode::WholeString).unwrap().accepted);
        assert!(!fsm.run(b"abc", MatchMode::WholeString).unwrap().accepted);
    }

    #[test]
    fn longest_prefix_returns_largest_accepting_span() {
        let fsm = ab_star();
        let result = fsm.run(b"abbx", MatchMode::LongestPrefix).unwrap();
        assert!(result.accepted);
        assert_eq!(result.span, (0, 3));
        assert_eq!(result.matched(), b"abb");
    }

    #[test]
    fn longest_prefix_rejects_when_no_prefix_matches() {
        let fsm = ab_star();
        let result = fsm.run(b"xyz", MatchMode::LongestPrefix).unwrap();
        assert!(!result.accepted);
    }

    #[test]
    fn longest_substring_finds_first_longest_occurrence() {
        let fsm = ab_star();
        let result = fsm.run(b"xxabby", MatchMode::LongestSubstring).unwrap();
        assert!(result.accepted);
        assert_eq!(result.span, (2, 5));
        assert_eq!(result.matched(), b"abb");
    }

    #[test]
    fn construction_rejects_empty_final_states() {
        let table = TransitionTable::new(FsmKind::Dfa);
        assert!(Fsm::new(table, BTreeSet::new()).is_err());
    }
}
