//! Symbols command.

use std::path::Path;

use poff::{LoadConfig, SectionRole, SymbolKind};
use tracing::error;

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::commands::load_or_report;
use crate::terminal::{self, Alignment, Table};

fn kind_name(kind: Option<SymbolKind>) -> &'static str {
    match kind {
        Some(SymbolKind::None) => "none",
        Some(SymbolKind::Data) => "data",
        Some(SymbolKind::ReadOnlyData) => "rodata",
        Some(SymbolKind::Procedure) => "proc",
        Some(SymbolKind::Function) => "func",
        None => "?",
    }
}

/// Handle the `symbols` command.
pub fn cmd_symbols(input: &Path, config: &LoadConfig) -> i32 {
    let Some(container) = load_or_report(input, config) else {
        return EXIT_FAILURE;
    };
    if !container.has_section(SectionRole::Symbols) {
        terminal::warning("no symbol table");
        return EXIT_SUCCESS;
    }

    let mut table = Table::new(vec!["value", "size", "kind", "name"]).with_alignments(vec![
        Alignment::Right,
        Alignment::Right,
        Alignment::Left,
        Alignment::Left,
    ]);

    for symbol in container.symbols() {
        let row = symbol.and_then(|symbol| {
            let mut name = container.symbol_name(&symbol)?.to_string();
            if symbol.is_undefined() {
                name.push_str(" (undefined)");
            }
            Ok(vec![
                format!("{:#06x}", symbol.value),
                symbol.size.to_string(),
                kind_name(symbol.kind()).to_string(),
                name,
            ])
        });
        match row {
            Ok(row) => table.add_row(row),
            Err(e) => {
                error!(error = %e, "bad symbol table");
                terminal::error(&format!("not a valid object file: {e}"));
                return EXIT_FAILURE;
            }
        }
    }

    table.print();
    EXIT_SUCCESS
}
