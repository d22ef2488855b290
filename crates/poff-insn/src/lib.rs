//! P-code instruction stream decoder.
//!
//! Reads the code section of a loaded [`poff_file::Container`] one
//! variable-length instruction at a time.

mod config;
mod cursor;
mod decoder;
pub mod disasm;
pub mod opcode;

pub use config::*;
pub use cursor::*;
pub use decoder::*;

use thiserror::Error;

/// Instruction decoding errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Opcode {opcode:#04x} at offset {offset:#x} has operands past the end of the code section")]
    TruncatedOperand { offset: usize, opcode: u8 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;
