//! Disasm command.

use std::io::{self, Write};
use std::path::Path;

use poff::{InsnDecoder, LoadConfig};
use tracing::{error, info};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS, decode_config};
use crate::commands::load_or_report;
use crate::terminal;

/// Handle the `disasm` command.
///
/// Runs a verify pass over the code section, resets the decoder, then prints
/// the listing in a second pass.
pub fn cmd_disasm(input: &Path, config: &LoadConfig, zero_fill: bool, silent: bool) -> i32 {
    let Some(container) = load_or_report(input, config) else {
        return EXIT_FAILURE;
    };

    let mut decoder = InsnDecoder::for_container(&container, decode_config(zero_fill));
    let summary = match poff::verify_pass(&mut decoder) {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "verify pass failed");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };
    info!(
        instructions = summary.instructions,
        bytes = summary.bytes,
        "verified code section"
    );

    decoder.reset();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let listed = match poff::write_listing(&container, &mut decoder, &mut out) {
        Ok(count) => count,
        Err(e) => {
            error!(error = %e, "listing failed");
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };
    let _ = out.flush();

    if listed != summary.instructions {
        terminal::error(&format!(
            "listing decoded {listed} instructions, verify pass decoded {}",
            summary.instructions
        ));
        return EXIT_FAILURE;
    }

    if !silent {
        if summary.trailing_bytes > 0 {
            terminal::warning(&format!(
                "{} bytes follow the END opcode",
                summary.trailing_bytes
            ));
        }
        let end = if summary.explicit_end {
            "END"
        } else {
            "end of section"
        };
        terminal::success(&format!(
            "{} instructions, {} bytes, terminated by {end}",
            summary.instructions, summary.bytes
        ));
    }
    EXIT_SUCCESS
}
