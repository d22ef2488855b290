//! Command implementations.
//!
//! Each submodule handles one CLI command.

mod disasm;
mod info;
mod symbols;

use std::path::Path;

use poff::{Container, LoadConfig};
use tracing::error;

use crate::cli::{Cli, Commands};
use crate::terminal;

/// Dispatch CLI command to the appropriate handler.
pub fn run_command(cli: &Cli) -> i32 {
    match &cli.command {
        Commands::Info { input, load } => info::cmd_info(input, &load.config()),
        Commands::Disasm {
            input,
            zero_fill,
            load,
        } => disasm::cmd_disasm(input, &load.config(), *zero_fill, cli.silent),
        Commands::Symbols { input, load } => symbols::cmd_symbols(input, &load.config()),
    }
}

/// Load an object file, reporting failures to the user.
fn load_or_report(input: &Path, config: &LoadConfig) -> Option<Container> {
    match poff::load_path(input, config) {
        Ok(container) => Some(container),
        Err(e) => {
            error!(error = %e, path = %input.display(), "failed to load object file");
            terminal::error(&format!("{}: {}", input.display(), e.class().description()));
            None
        }
    }
}
