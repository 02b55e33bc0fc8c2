//! Pedido XML - order extraction from buyer XML exports
//!
//! A CLI tool that extracts order lines from XML documents, totals quantities
//! per item and exports the result as a spreadsheet or delimited text.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
