//! The classic expression grammar used by spec.md §8's concrete scenarios,
//! built twice: once in its canonical (left-recursive) form for the LR(1)
//! driver, once in right-recursive form for the LL(1) driver.

use pt_core::error::Result;
use pt_core::grammar::{Grammar, Production, ProductionElement, Symbol};

pub const PLUS: Symbol = Symbol::Terminal(2);
pub const STAR: Symbol = Symbol::Terminal(3);
pub const LPAREN: Symbol = Symbol::Terminal(4);
pub const RPAREN: Symbol = Symbol::Terminal(5);
pub const ID: Symbol = Symbol::Terminal(6);

fn sym(s: Symbol) -> ProductionElement<i64> {
    ProductionElement::Sym(s)
}

/// `S' -> E`, `E -> E + T | T`, `T -> T * F | F`, `F -> ( E ) | id`, with
/// postfix reduce/accept actions that fold the parse into an `i64` value
/// (spec.md §8 scenarios 1-4).
pub fn build_lr_grammar() -> Result<Grammar<i64, i64, i64>> {
    const SP: Symbol = Symbol::NonTerminal(0);
    const E: Symbol = Symbol::NonTerminal(1);
    const T: Symbol = Symbol::NonTerminal(2);
    const F: Symbol = Symbol::NonTerminal(3);

    let productions = vec![
        Production::new(SP, vec![sym(E)])?.with_accept_action(std::rc::Rc::new(|_stack, e_value, result| {
            *result = *e_value;
        })),
        Production::new(E, vec![sym(E), sym(PLUS), sym(T)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[0].data + children[2].data;
        })),
        Production::new(E, vec![sym(T)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[0].data;
        })),
        Production::new(T, vec![sym(T), sym(STAR), sym(F)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[0].data * children[2].data;
        })),
        Production::new(T, vec![sym(F)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[0].data;
        })),
        Production::new(F, vec![sym(LPAREN), sym(E), sym(RPAREN)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[1].data;
        })),
        Production::new(F, vec![sym(ID)])?.with_reduce_action(std::rc::Rc::new(|children, data| {
            *data = children[0].data;
        })),
    ];

    Grammar::new(productions)
}

/// `E -> T E'`, `E' -> + T E' | ε`, `T -> F T'`, `T' -> * F T' | ε`,
/// `F -> ( E ) | id` — the right-recursive form spec.md §8 requires for
/// LL(1); no semantic actions are needed since the LL scenarios only check
/// acceptance and derivation order.
pub fn build_ll_grammar() -> Result<Grammar<i64, (), ()>> {
    const E: Symbol = Symbol::NonTerminal(0);
    const EPRIME: Symbol = Symbol::NonTerminal(1);
    const T: Symbol = Symbol::NonTerminal(2);
    const TPRIME: Symbol = Symbol::NonTerminal(3);
    const F: Symbol = Symbol::NonTerminal(4);

    let productions = vec![
        Production::new(E, vec![sym(T), sym(EPRIME)])?,
        Production::new(EPRIME, vec![sym(PLUS), sym(T), sym(EPRIME)])?,
        Production::new(EPRIME, vec![sym(Symbol::EPSILON)])?,
        Production::new(T, vec![sym(F), sym(TPRIME)])?,
        Production::new(TPRIME, vec![sym(STAR), sym(F), sym(TPRIME)])?,
        Production::new(TPRIME, vec![sym(Symbol::EPSILON)])?,
        Production::new(F, vec![sym(LPAREN), sym(E), sym(RPAREN)])?,
        Production::new(F, vec![sym(ID)])?,
    ];

    Grammar::new(productions)
}
