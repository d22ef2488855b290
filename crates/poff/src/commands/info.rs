//! Info command.

use std::path::Path;

use poff::{LoadConfig, SectionRole, SectionType};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::commands::load_or_report;
use crate::terminal::{self, Alignment, Table};

/// Handle the `info` command.
pub fn cmd_info(input: &Path, config: &LoadConfig) -> i32 {
    let Some(container) = load_or_report(input, config) else {
        return EXIT_FAILURE;
    };
    let header = container.header();

    terminal::header("File header");
    terminal::field("magic", &String::from_utf8_lossy(&header.magic));
    terminal::field("version", &header.version.to_string());
    let file_type = header
        .kind()
        .map_or_else(|| format!("unknown ({:#04x})", header.file_type), |k| k.name().to_string());
    terminal::field("type", &file_type);
    let name = container
        .module_name()
        .map_or_else(|e| format!("<{e}>"), str::to_string);
    terminal::field("name", &name);
    terminal::field("entry", &format!("{:#06x}", header.entry));
    terminal::field("sections", &header.shnum.to_string());

    terminal::header("Sections");
    let mut table = Table::new(vec!["role", "type", "flags", "offset", "size"]).with_alignments(vec![
        Alignment::Left,
        Alignment::Left,
        Alignment::Left,
        Alignment::Right,
        Alignment::Right,
    ]);
    for (role, sh) in container.sections().iter() {
        let sh_type = SectionType::from_raw(sh.sh_type).map_or("?", SectionType::name);
        table.add_row(vec![
            role.to_string(),
            sh_type.to_string(),
            flag_string(sh.is_writable(), sh.is_alloc(), sh.is_executable()),
            format!("{:#x}", sh.offset),
            sh.size.to_string(),
        ]);
    }
    table.print();

    let missing: Vec<_> = SectionRole::ALL
        .into_iter()
        .filter(|role| !container.has_section(*role))
        .map(SectionRole::name)
        .collect();
    if !missing.is_empty() {
        println!("\n  absent: {}", missing.join(", "));
    }

    EXIT_SUCCESS
}

fn flag_string(write: bool, alloc: bool, exec: bool) -> String {
    [(write, 'w'), (alloc, 'a'), (exec, 'x')]
        .iter()
        .map(|&(set, c)| if set { c } else { '-' })
        .collect()
}
