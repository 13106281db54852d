//! Production elements, productions, and the semantic-action capability set.
//!
//! Design note: the source this spec distills stored semantic actions as
//! untyped function pointers cast at call sites (spec.md §9 "Opaque
//! callback pointers"). Here the three action-call shapes named in
//! spec.md §6 are three distinct type aliases over `Rc<dyn Fn>`, and a
//! production carries two explicit optional fields — `reduce_action` and
//! `accept_action` — rather than one field with an ignored parameter
//! (Open Question #1 in DESIGN.md).

use std::fmt;
use std::rc::Rc;

use crate::grammar::Symbol;

/// The token the lexer hands to a parser driver: a terminal name plus an
/// opaque, caller-defined attribute payload (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<Attr> {
    pub name: Symbol,
    pub attribute: Attr,
}

impl<Attr> Token<Attr> {
    pub fn new(name: Symbol, attribute: Attr) -> Self {
        Self { name, attribute }
    }
}

/// `(state, opaque data, last-consumed token)` — spec.md §3 "LR stack
/// element". `Data` is the caller-defined value carrying semantic
/// attributes between reductions.
#[derive(Debug, Clone)]
pub struct LRStackElement<Data> {
    pub state: u32,
    pub data: Data,
    pub last_token: Option<Symbol>,
}

/// `(stack, record-data) -> void` — spec.md §6, used by both the
/// Synthesized and Action record variants of [`ProductionElement`].
pub type LLAction<Attr> = Rc<dyn Fn(&mut Vec<ProductionElement<Attr>>, &Attr)>;

/// `(stack, new-state) -> void` — the LR postfix reduce action. `stack`
/// here is the slice of stack elements popped for this reduction (the
/// production's children), and `new_state` is the `Data` payload being
/// constructed for the state about to be pushed.
pub type ReduceAction<Data> = Rc<dyn Fn(&[LRStackElement<Data>], &mut Data)>;

/// `(stack, new-state, parser-result) -> void` — the LR postfix accept
/// action, invoked only for the augmented start production.
pub type AcceptAction<Data, PResult> = Rc<dyn Fn(&[LRStackElement<Data>], &mut Data, &mut PResult)>;

/// A production-body element: a grammar symbol, a synthesized record, or
/// an action record (spec.md §3). Only `Sym` elements count toward the
/// "length" used for LR reductions.
#[derive(Clone)]
pub enum ProductionElement<Attr> {
    Sym(Symbol),
    Synthesized { data: Attr, action: Option<LLAction<Attr>> },
    Action { data: Attr, action: Option<LLAction<Attr>> },
}

impl<Attr: fmt::Debug> fmt::Debug for ProductionElement<Attr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionElement::Sym(s) => write!(f, "Sym({s:?})"),
            ProductionElement::Synthesized { data, .. } => write!(f, "Synthesized({data:?})"),
            ProductionElement::Action { data, .. } => write!(f, "Action({data:?})"),
        }
    }
}

impl<Attr> ProductionElement<Attr> {
    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            ProductionElement::Sym(s) => Some(*s),
            _ => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, ProductionElement::Sym(_))
    }
}

/// A head plus a body, plus an index assigned on insertion into a
/// [`crate::grammar::Grammar`], plus an optional postfix reduce/accept
/// action. Equality ignores index and actions (spec.md §3).
#[derive(Clone)]
pub struct Production<Attr, Data, PResult> {
    pub head: Symbol,
    pub body: Vec<ProductionElement<Attr>>,
    pub index: usize,
    pub reduce_action: Option<ReduceAction<Data>>,
    pub accept_action: Option<AcceptAction<Data, PResult>>,
}

impl<Attr, Data, PResult> fmt::Debug for Production<Attr, Data, PResult>
where
    Attr: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("head", &self.head)
            .field("body", &self.body)
            .field("index", &self.index)
            .finish()
    }
}

impl<Attr, Data, PResult> PartialEq for Production<Attr, Data, PResult> {
    fn eq(&self, other: &Self) -> bool {
        if self.head != other.head || self.body.len() != other.body.len() {
            return false;
        }
        self.body.iter().zip(other.body.iter()).all(|(a, b)| match (a, b) {
            (ProductionElement::Sym(x), ProductionElement::Sym(y)) => x == y,
            (ProductionElement::Synthesized { .. }, ProductionElement::Synthesized { .. }) => true,
            (ProductionElement::Action { .. }, ProductionElement::Action { .. }) => true,
            _ => false,
        })
    }
}
impl<Attr, Data, PResult> Eq for Production<Attr, Data, PResult> {}

impl<Attr, Data, PResult> Production<Attr, Data, PResult> {
    pub fn new(head: Symbol, body: Vec<ProductionElement<Attr>>) -> crate::error::Result<Self> {
        if body.is_empty() {
            return Err(crate::error::CoreError::empty_production_body(head));
        }
        if head.is_terminal() {
            return Err(crate::error::CoreError::terminal_as_head(head));
        }
        Ok(Self { head, body, index: 0, reduce_action: None, accept_action: None })
    }

    pub fn with_reduce_action(mut self, action: ReduceAction<Data>) -> Self {
        self.reduce_action = Some(action);
        self
    }

    pub fn with_accept_action(mut self, action: AcceptAction<Data, PResult>) -> Self {
        self.accept_action = Some(action);
        self
    }

    /// Symbols only, skipping synthesized/action elements and the literal
    /// `EPSILON` sentinel — this is the sequence CLOSURE/GOTO/FIRST operate
    /// over. An ε-production (`body = [Sym(EPSILON)]`, the only legal way
    /// to encode one per spec.md §3's non-empty-body invariant) therefore
    /// yields an empty sequence here, the same as if its body had been
    /// empty outright.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.body.iter().filter_map(|e| e.as_symbol()).filter(|s| !s.is_epsilon())
    }

    /// Number of grammar-symbol elements — the "length" LR reductions pop.
    /// `0` for an ε-production, so its item is complete at dot `0`.
    pub fn symbol_len(&self) -> usize {
        self.symbols().count()
    }
}

impl<Attr: fmt::Debug, Data, PResult> fmt::Display for Production<Attr, Data, PResult> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body: Vec<String> = self.body.iter().map(|e| format!("{e:?}")).collect();
        write!(f, "{} -> {}", self.head, body.join(" "))
    }
}
