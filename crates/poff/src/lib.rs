//! POFF - portable object file tools
//!
//! Loads POFF object files and decodes the P-code in their code section.
//!
//! # Example
//!
//! ```ignore
//! use poff::{load_path, InsnDecoder, DecodeConfig, LoadConfig};
//!
//! let container = load_path("hello.o".as_ref(), &LoadConfig::default())?;
//! let mut decoder = InsnDecoder::for_container(&container, DecodeConfig::default());
//! let summary = poff::verify_pass(&mut decoder)?;
//! decoder.reset();
//! poff::write_listing(&container, &mut decoder, &mut std::io::stdout())?;
//! ```

// Re-export from sub-crates
pub use poff_file::{
    Container, DuplicatePolicy, ErrorClass, FileHeader, FileType, LineTable, LoadConfig,
    LoadError, LoadStage, SectionHeader, SectionRole, SectionTable, SectionType, Symbol,
    SymbolKind, TableError,
};
pub use poff_insn::{
    DecodeConfig, DecodeError, DecodedInsn, DecoderState, InsnDecoder, Instruction,
    ProgramCursor, TruncationPolicy, open_code_cursor,
};

mod error;
mod passes;

pub use error::*;
pub use passes::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

/// Load a POFF file from disk.
///
/// # Errors
///
/// Returns [`Error::Open`] if the file cannot be opened and [`Error::Load`]
/// if it is not a loadable POFF file.
pub fn load_path(path: &Path, config: &LoadConfig) -> Result<Container> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let container = Container::load_with(&mut BufReader::new(file), config)?;
    debug!(path = %path.display(), "loaded object file");
    Ok(container)
}
