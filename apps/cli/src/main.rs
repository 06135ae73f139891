//! PromptCraft CLI: turn a free-text query into a C.R.E.A.T.E. prompt.
//!
//! The document goes to stdout; logs and evaluation reports go to stderr.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
