//! Finite-state lexing and LL(1)/LR(1) parser construction toolkit.
//!
//! Four layers, bottom-up:
//! - [`fsm`] / [`lexer`] — byte-level matching and tokenization.
//! - [`grammar`] — symbols, productions, and FIRST/FOLLOW.
//! - [`lr`] — LR items, item sets, CLOSURE/GOTO (the table-generator side).
//! - [`table`] / [`parser`] — LL(1)/LR(1) tables and their driving loops.
//!
//! [`journal`] and [`error`] are the ambient diagnostic and error-handling
//! layers threaded through all of the above.

pub mod error;
pub mod fsm;
pub mod grammar;
pub mod journal;
pub mod lexer;
pub mod lr;
pub mod parser;
pub mod table;

pub use error::{CoreError, Result};
pub use journal::{Config, Journal};
