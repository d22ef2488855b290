//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use poff::{DecodeConfig, LoadConfig, TruncationPolicy};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "poff")]
#[command(about = "POFF object file inspector and P-code disassembler")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging for poff crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output (only show errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the file header and section table
    Info {
        /// Input POFF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// Verify and disassemble the code section
    Disasm {
        /// Input POFF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Treat operands cut off by the end of the code section as zero
        #[arg(long)]
        zero_fill: bool,

        #[command(flatten)]
        load: LoadArgs,
    },
    /// List the symbol table
    Symbols {
        /// Input POFF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        load: LoadArgs,
    },
}

/// Loader options shared by all commands.
#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// Reject files with more than one section for the same role
    #[arg(long)]
    pub strict_sections: bool,
}

impl LoadArgs {
    pub fn config(&self) -> LoadConfig {
        if self.strict_sections {
            LoadConfig::strict()
        } else {
            LoadConfig::default()
        }
    }
}

pub fn decode_config(zero_fill: bool) -> DecodeConfig {
    DecodeConfig {
        truncation: if zero_fill {
            TruncationPolicy::ZeroFill
        } else {
            TruncationPolicy::Error
        },
    }
}
