//! A whitespace-split `TokenStream` for the demo grammar: words `+`, `*`,
//! `(`, `)` map to their terminals; anything else is an `id`, carrying its
//! parsed integer value (or `1` for a literal `id` placeholder) as the
//! token attribute.

use std::collections::VecDeque;

use pt_core::grammar::{Symbol, Token};
use pt_core::parser::TokenStream;

use crate::grammar::{ID, LPAREN, PLUS, RPAREN, STAR};

pub struct WordTokenStream<'a> {
    words: VecDeque<&'a str>,
    source: &'a [u8],
}

impl<'a> WordTokenStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { words: input.split_whitespace().collect(), source: input.as_bytes() }
    }
}

impl<'a> TokenStream<i64> for WordTokenStream<'a> {
    fn next_token(&mut self) -> Token<i64> {
        match self.words.pop_front() {
            None => Token::new(Symbol::EOF, 0),
            Some("+") => Token::new(PLUS, 0),
            Some("*") => Token::new(STAR, 0),
            Some("(") => Token::new(LPAREN, 0),
            Some(")") => Token::new(RPAREN, 0),
            Some(word) => Token::new(ID, word.parse::<i64>().unwrap_or(1)),
        }
    }

    fn remaining_input(&self) -> &[u8] {
        self.source
    }
}
