//! Passes over a decoded program.
//!
//! A pass drives an [`InsnDecoder`] from its current position to the end of
//! the stream. Call [`InsnDecoder::reset`] between passes to start over
//! without reloading the container.

use std::io::Write;

use poff_file::{Container, SectionRole};
use poff_insn::InsnDecoder;
use tracing::{debug, warn};

use crate::Result;

/// Result of [`verify_pass`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifySummary {
    /// Instructions decoded, including an explicit `END`.
    pub instructions: usize,
    /// Bytes consumed by those instructions.
    pub bytes: usize,
    /// Whether the stream was closed by an `END` opcode rather than by the
    /// physical end of the section.
    pub explicit_end: bool,
    /// Bytes left in the section after the end of the stream.
    pub trailing_bytes: usize,
}

/// Decode the whole stream and summarize it.
///
/// # Errors
///
/// Returns an error if an instruction's operands run past the section end.
pub fn verify_pass(decoder: &mut InsnDecoder<'_>) -> Result<VerifySummary> {
    let mut summary = VerifySummary::default();

    loop {
        let decoded = decoder.decode()?;
        if decoded.size == 0 {
            break;
        }
        summary.instructions += 1;
        summary.bytes += usize::from(decoded.size);
        if decoded.is_end() {
            summary.explicit_end = true;
            break;
        }
    }

    summary.trailing_bytes = decoder.cursor().remaining();
    if summary.trailing_bytes > 0 {
        warn!(bytes = summary.trailing_bytes, "code follows the END opcode");
    }
    debug!(
        instructions = summary.instructions,
        bytes = summary.bytes,
        explicit_end = summary.explicit_end,
        "verify pass complete"
    );
    Ok(summary)
}

/// Maximum raw bytes shown per listing line (the longest encoding).
const RAW_COLUMN: usize = 4 * 3;

/// Write one line per instruction: offset, raw bytes, instruction text, and
/// the source line when the container has line numbers.
///
/// Returns the number of instructions listed.
///
/// # Errors
///
/// Returns an error on a decode failure, a malformed line or file table, or a
/// write failure.
pub fn write_listing<W: Write>(
    container: &Container,
    decoder: &mut InsnDecoder<'_>,
    out: &mut W,
) -> Result<usize> {
    let lines = if container.has_section(SectionRole::LineNumbers) {
        Some(container.line_table()?)
    } else {
        None
    };
    let code = decoder.cursor().data();
    let mut count = 0;

    loop {
        let decoded = decoder.decode()?;
        if decoded.size == 0 {
            break;
        }

        let raw = &code[decoded.offset..decoded.offset + usize::from(decoded.size)];
        let raw: Vec<String> = raw.iter().map(|b| format!("{b:02x}")).collect();
        write!(
            out,
            "{:06x}:  {:<width$} {}",
            decoded.offset,
            raw.join(" "),
            decoded.insn,
            width = RAW_COLUMN
        )?;

        let offset = u32::try_from(decoded.offset).unwrap_or(u32::MAX);
        if let Some(line) = lines.as_ref().and_then(|table| table.lookup(offset)) {
            let file = container.file_name(line.file)?;
            write!(out, "  ; {file}:{}", line.line)?;
        }
        writeln!(out)?;

        count += 1;
        if decoded.is_end() {
            break;
        }
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use poff_insn::ProgramCursor;
    use poff_insn::opcode::{END, NOP, OPERAND8, OPERAND16};

    #[test]
    fn test_verify_program() {
        let code = [NOP, OPERAND8 | 1, 5, END];
        let mut decoder = InsnDecoder::new(ProgramCursor::new(&code));
        let summary = verify_pass(&mut decoder).unwrap();
        assert_eq!(
            summary,
            VerifySummary {
                instructions: 3,
                bytes: 4,
                explicit_end: true,
                trailing_bytes: 0,
            }
        );
    }

    #[test]
    fn test_verify_unit() {
        let code = [NOP, OPERAND16 | 2, 0, 1];
        let mut decoder = InsnDecoder::new(ProgramCursor::new(&code));
        let summary = verify_pass(&mut decoder).unwrap();
        assert_eq!(summary.instructions, 2);
        assert!(!summary.explicit_end);
    }

    #[test]
    fn test_verify_trailing_bytes() {
        let code = [END, NOP, NOP];
        let mut decoder = InsnDecoder::new(ProgramCursor::new(&code));
        let summary = verify_pass(&mut decoder).unwrap();
        assert_eq!(summary.instructions, 1);
        assert_eq!(summary.trailing_bytes, 2);
    }

    #[test]
    fn test_verify_truncated() {
        let code = [OPERAND16 | 2, 0];
        let mut decoder = InsnDecoder::new(ProgramCursor::new(&code));
        assert!(matches!(
            verify_pass(&mut decoder),
            Err(crate::Error::Decode(_))
        ));
    }
}
