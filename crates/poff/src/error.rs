use std::path::PathBuf;

use thiserror::Error;

/// Toolchain errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read object file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {}", .0.class().description(), .0)]
    Load(#[from] poff_file::LoadError),
    #[error("not a valid object file: {0}")]
    Decode(#[from] poff_insn::DecodeError),
    #[error("not a valid object file: {0}")]
    Table(#[from] poff_file::TableError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Broad class of the failure.
    #[must_use]
    pub const fn class(&self) -> poff_file::ErrorClass {
        match self {
            Self::Load(e) => e.class(),
            Self::Decode(_) | Self::Table(_) => poff_file::ErrorClass::Format,
            Self::Open { .. } | Self::Io(_) => poff_file::ErrorClass::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
