//! Reader for POFF portable object files.
//!
//! A POFF file is a fixed header, a table of section headers, and raw section
//! payloads. [`Container::load`] validates the header, resolves each section
//! header to a [`SectionRole`], and buffers every present section in memory.

mod config;
mod constants;
mod container;
mod header;
mod loader;
mod section;
mod tables;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::*;
pub use constants::*;
pub use container::*;
pub use header::*;
pub use section::*;
pub use tables::*;

use std::fmt;
use std::io;

use thiserror::Error;

/// Step of the load that was running when an I/O error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadStage {
    FileHeader,
    SectionHeader(usize),
    SectionData(SectionRole),
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileHeader => f.write_str("file header"),
            Self::SectionHeader(index) => write!(f, "section header {index}"),
            Self::SectionData(role) => write!(f, "{role} section data"),
        }
    }
}

/// Broad class of a load failure, for user-facing diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input is not a well-formed POFF file.
    Format,
    /// The byte source failed or ended early.
    Io,
    /// A section buffer could not be allocated.
    OutOfMemory,
}

impl ErrorClass {
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Format => "not a valid object file",
            Self::Io => "could not read object file",
            Self::OutOfMemory => "out of memory",
        }
    }
}

/// POFF loading errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {stage}: {source}")]
    Io {
        stage: LoadStage,
        #[source]
        source: io::Error,
    },
    #[error("Invalid POFF magic number {0:02x?}")]
    BadMagic([u8; 4]),
    #[error("Unsupported POFF version {0} (expected {expected})", expected = POFF_VERSION_CURRENT)]
    UnsupportedVersion(u8),
    #[error("Unknown type {sh_type:#04x} in section header {index}")]
    UnknownSectionType { index: usize, sh_type: u8 },
    #[error("Section header {index} duplicates the {role} section")]
    DuplicateSection { index: usize, role: SectionRole },
    #[error("Out of memory allocating {size} bytes for the {role} section")]
    OutOfMemory { role: SectionRole, size: u32 },
}

impl LoadError {
    pub(crate) fn io(stage: LoadStage, source: io::Error) -> Self {
        Self::Io { stage, source }
    }

    /// Classify the error.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Io { .. } => ErrorClass::Io,
            Self::OutOfMemory { .. } => ErrorClass::OutOfMemory,
            Self::BadMagic(_)
            | Self::UnsupportedVersion(_)
            | Self::UnknownSectionType { .. }
            | Self::DuplicateSection { .. } => ErrorClass::Format,
        }
    }
}

/// Errors from interpreting the auxiliary tables of a loaded container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("No {0} section present")]
    Missing(SectionRole),
    #[error("{role} table truncated at byte {offset}")]
    Truncated { role: SectionRole, offset: usize },
    #[error("Bad string table reference at offset {0}")]
    BadString(u32),
    #[error("File table index {0} out of range")]
    BadFileIndex(u16),
}

pub type Result<T> = std::result::Result<T, LoadError>;
