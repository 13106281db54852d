//! Demo binary: builds the `E/T/F` grammar of spec.md §8 in both its
//! left-recursive (LR) and right-recursive (LL) forms, derives a table for
//! each via `tablegen`, and parses a whitespace-separated token string.

use clap::{Parser, Subcommand};
use pt_core::journal::{Config, Journal};
use pt_core::parser::{ll::LLParser, lr::LRParser};

mod grammar;
mod tablegen;
mod tokens;

#[derive(Parser)]
#[command(name = "pt", version)]
#[command(about = "Demo driver for pt-core's LL(1)/LR(1) parser construction toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse input with the canonical LR(1) table, folding it into an integer result.
    Lr { input: String },
    /// Parse input with the right-recursive LL(1) table.
    Ll { input: String },
}

fn main() {
    let cli = Cli::parse();
    let mut journal = Journal::new(Config::default());

    match cli.command {
        Commands::Lr { input } => {
            let grammar = grammar::build_lr_grammar().expect("demo grammar is well-formed");
            let table = tablegen::build_lr_table(&grammar).expect("demo grammar admits an LR(1) table");
            let mut stream = tokens::WordTokenStream::new(&input);
            let parser = LRParser::new(&grammar, &table);
            match parser.parse(&mut journal, &mut stream, 0i64, |tok| tok.attribute) {
                Ok(value) => println!("accepted: {value}"),
                Err(e) => println!("rejected: {e}"),
            }
        }
        Commands::Ll { input } => {
            let grammar = grammar::build_ll_grammar().expect("demo grammar is well-formed");
            let table = tablegen::build_ll_table(&grammar, 5, 7).expect("demo grammar admits an LL(1) table");
            let mut stream = tokens::WordTokenStream::new(&input);
            let parser = LLParser::new(&grammar, &table);
            match parser.parse(&mut journal, &mut stream) {
                Ok(()) => println!("accepted"),
                Err(e) => println!("rejected: {e}"),
            }
        }
    }

    for report in journal.reports() {
        println!("{report}");
    }
}
