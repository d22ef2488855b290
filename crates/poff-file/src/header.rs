//! POFF header structures.

use crate::constants::{
    FHT_EXEC, FHT_NONE, FHT_PROGRAM, FHT_SHLIB, FHT_UNIT, FILE_HEADER_SIZE, POFF_MAGIC,
    SECTION_HEADER_SIZE, SHF_ALLOC, SHF_EXEC, SHF_WRITE,
};

/// Read big-endian u16 from bytes.
#[inline]
pub(crate) fn read_be16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

/// Read big-endian u32 from bytes.
#[inline]
pub(crate) fn read_be32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// POFF file header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: [u8; 4],
    pub version: u8,
    /// Raw file type (`FHT_*`).
    pub file_type: u8,
    /// Stride between consecutive section header records.
    pub shsize: u16,
    pub shnum: u16,
    /// String table offset of the module name.
    pub name: u32,
    pub entry: u32,
    /// File offset of the first section header.
    pub shoff: u32,
}

impl FileHeader {
    /// Decode a header record. Does not validate magic or version.
    #[must_use]
    pub fn from_bytes(raw: &[u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            magic: [raw[0], raw[1], raw[2], raw[3]],
            version: raw[4],
            file_type: raw[5],
            shsize: read_be16(raw, 6),
            shnum: read_be16(raw, 8),
            name: read_be32(raw, 10),
            entry: read_be32(raw, 14),
            shoff: read_be32(raw, 18),
        }
    }

    /// Check if the magic bytes identify a POFF file.
    #[must_use]
    pub fn has_valid_magic(&self) -> bool {
        self.magic == POFF_MAGIC
    }

    /// Decoded file type, if it is one of the known values.
    #[must_use]
    pub const fn kind(&self) -> Option<FileType> {
        FileType::from_raw(self.file_type)
    }
}

/// Kind of module stored in a POFF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileType {
    None,
    Executable,
    SharedLibrary,
    Program,
    Unit,
}

impl FileType {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            FHT_NONE => Some(Self::None),
            FHT_EXEC => Some(Self::Executable),
            FHT_SHLIB => Some(Self::SharedLibrary),
            FHT_PROGRAM => Some(Self::Program),
            FHT_UNIT => Some(Self::Unit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Executable => "executable",
            Self::SharedLibrary => "shared library",
            Self::Program => "program",
            Self::Unit => "unit",
        }
    }
}

/// Section header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionHeader {
    /// Raw type tag (`SHT_*`).
    pub sh_type: u8,
    /// Flag bits (`SHF_*`).
    pub flags: u8,
    pub entsize: u16,
    pub name: u32,
    pub addr: u32,
    pub offset: u32,
    pub size: u32,
}

impl SectionHeader {
    /// Decode a section header record.
    #[must_use]
    pub fn from_bytes(raw: &[u8; SECTION_HEADER_SIZE]) -> Self {
        Self {
            sh_type: raw[0],
            flags: raw[1],
            entsize: read_be16(raw, 2),
            name: read_be32(raw, 4),
            addr: read_be32(raw, 8),
            offset: read_be32(raw, 12),
            size: read_be32(raw, 16),
        }
    }

    /// Check if the section holds executable code.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        (self.flags & SHF_EXEC) != 0
    }

    #[must_use]
    pub const fn is_writable(&self) -> bool {
        (self.flags & SHF_WRITE) != 0
    }

    #[must_use]
    pub const fn is_alloc(&self) -> bool {
        (self.flags & SHF_ALLOC) != 0
    }
}
