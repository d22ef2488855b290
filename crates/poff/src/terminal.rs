//! Styled output helpers for CLI commands.

use std::io::{self, Write};

use console::style;

/// Print a success message.
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print a section header to stdout.
pub fn header(message: &str) {
    println!("\n{}", style(message).bold());
}

/// Print a `key: value` line to stdout.
pub fn field(key: &str, value: &str) {
    println!("  {:<14} {}", style(format!("{key}:")).dim(), value);
}

// ============================================================================
// Table output
// ============================================================================

/// Column alignment.
#[derive(Clone, Copy, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
}

/// A builder for plain column-aligned tables.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    alignments: Vec<Alignment>,
}

impl Table {
    /// Create a new table with headers.
    pub fn new(headers: Vec<&str>) -> Self {
        let count = headers.len();
        Self {
            headers: headers.into_iter().map(String::from).collect(),
            rows: Vec::new(),
            alignments: vec![Alignment::Left; count],
        }
    }

    /// Set column alignments.
    pub fn with_alignments(mut self, alignments: Vec<Alignment>) -> Self {
        self.alignments = alignments;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from(" ");
        for (i, cell) in cells.iter().enumerate() {
            let w = widths.get(i).copied().unwrap_or(0);
            let formatted = match self.alignments.get(i).copied().unwrap_or_default() {
                Alignment::Left => format!(" {cell:<w$}"),
                Alignment::Right => format!(" {cell:>w$}"),
            };
            line.push_str(&formatted);
        }
        line.trim_end().to_string()
    }

    /// Render the table, header row first.
    pub fn render(&self) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(String::len).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.len());
                }
            }
        }

        let mut output = String::new();
        output.push_str(&style(self.render_row(&self.headers, &widths)).bold().to_string());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&self.render_row(row, &widths));
            output.push('\n');
        }
        output
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
        let _ = io::stdout().flush();
    }
}
