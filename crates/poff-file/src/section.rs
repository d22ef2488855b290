//! Section roles, the resolved section table, and per-role data buffers.

use std::fmt;

use tracing::{trace, warn};

use crate::config::DuplicatePolicy;
use crate::constants::{
    SHF_EXEC, SHT_DEBUG, SHT_FILETAB, SHT_LINENO, SHT_PROGDATA, SHT_REL, SHT_STRTAB, SHT_SYMTAB,
};
use crate::header::SectionHeader;
use crate::{LoadError, Result};

/// Raw section type tag, decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionType {
    ProgData,
    SymbolTable,
    StringTable,
    Relocations,
    FileTable,
    LineNumbers,
    DebugFunctions,
}

impl SectionType {
    /// Decode a type tag. The format has no "unknown, skip" tag.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            SHT_PROGDATA => Some(Self::ProgData),
            SHT_SYMTAB => Some(Self::SymbolTable),
            SHT_STRTAB => Some(Self::StringTable),
            SHT_REL => Some(Self::Relocations),
            SHT_FILETAB => Some(Self::FileTable),
            SHT_LINENO => Some(Self::LineNumbers),
            SHT_DEBUG => Some(Self::DebugFunctions),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProgData => "progdata",
            Self::SymbolTable => "symtab",
            Self::StringTable => "strtab",
            Self::Relocations => "rel",
            Self::FileTable => "filetab",
            Self::LineNumbers => "lineno",
            Self::DebugFunctions => "debug",
        }
    }
}

/// Semantic purpose of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionRole {
    Code,
    ReadOnlyData,
    Symbols,
    Strings,
    Relocations,
    FileNames,
    LineNumbers,
    DebugInfo,
}

impl SectionRole {
    pub const COUNT: usize = 8;

    /// All roles, in load order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Code,
        Self::ReadOnlyData,
        Self::Symbols,
        Self::Strings,
        Self::Relocations,
        Self::FileNames,
        Self::LineNumbers,
        Self::DebugInfo,
    ];

    /// Role a section header is routed to.
    ///
    /// Program data goes to `Code` when executable and `ReadOnlyData` otherwise.
    #[must_use]
    pub const fn for_section(sh_type: SectionType, flags: u8) -> Self {
        match sh_type {
            SectionType::ProgData => {
                if (flags & SHF_EXEC) != 0 {
                    Self::Code
                } else {
                    Self::ReadOnlyData
                }
            }
            SectionType::SymbolTable => Self::Symbols,
            SectionType::StringTable => Self::Strings,
            SectionType::Relocations => Self::Relocations,
            SectionType::FileTable => Self::FileNames,
            SectionType::LineNumbers => Self::LineNumbers,
            SectionType::DebugFunctions => Self::DebugInfo,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::ReadOnlyData => "rodata",
            Self::Symbols => "symbols",
            Self::Strings => "strings",
            Self::Relocations => "relocations",
            Self::FileNames => "file names",
            Self::LineNumbers => "line numbers",
            Self::DebugInfo => "debug info",
        }
    }
}

impl fmt::Display for SectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One section header slot per role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionTable {
    slots: [Option<SectionHeader>; SectionRole::COUNT],
}

impl SectionTable {
    /// Map raw headers (in file order) to roles.
    ///
    /// Fails on the first unrecognized type tag; no partial table is returned.
    /// When two headers map to the same role the later one replaces the earlier
    /// one, unless `duplicates` is [`DuplicatePolicy::Reject`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownSectionType`] for an unrecognized tag and
    /// [`LoadError::DuplicateSection`] for a repeated role under
    /// [`DuplicatePolicy::Reject`].
    pub fn resolve(headers: &[SectionHeader], duplicates: DuplicatePolicy) -> Result<Self> {
        let mut table = Self::default();

        for (index, sh) in headers.iter().enumerate() {
            let sh_type = SectionType::from_raw(sh.sh_type).ok_or(LoadError::UnknownSectionType {
                index,
                sh_type: sh.sh_type,
            })?;
            let role = SectionRole::for_section(sh_type, sh.flags);
            trace!(index, role = role.name(), offset = sh.offset, size = sh.size, "resolved section");

            if table.get(role).is_some() {
                match duplicates {
                    DuplicatePolicy::LastWins => {
                        warn!(index, role = role.name(), "duplicate section replaces earlier header");
                    }
                    DuplicatePolicy::Reject => {
                        return Err(LoadError::DuplicateSection { index, role });
                    }
                }
            }
            table.slots[role.index()] = Some(sh.clone());
        }

        Ok(table)
    }

    /// Header mapped to `role`, if any.
    #[must_use]
    pub const fn get(&self, role: SectionRole) -> Option<&SectionHeader> {
        self.slots[role.index()].as_ref()
    }

    #[must_use]
    pub const fn has(&self, role: SectionRole) -> bool {
        self.slots[role.index()].is_some()
    }

    /// Present roles with their headers, in load order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionRole, &SectionHeader)> {
        SectionRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|sh| (role, sh)))
    }

    /// Number of roles with a header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Owned payload buffers, one per present role.
///
/// An absent role and a present zero-length section are different states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionStore {
    buffers: [Option<Vec<u8>>; SectionRole::COUNT],
}

impl SectionStore {
    pub(crate) fn insert(&mut self, role: SectionRole, data: Vec<u8>) {
        self.buffers[role.index()] = Some(data);
    }

    /// Payload for `role`, or `None` when the section is absent.
    #[must_use]
    pub fn get(&self, role: SectionRole) -> Option<&[u8]> {
        self.buffers[role.index()].as_deref()
    }

    #[must_use]
    pub const fn has(&self, role: SectionRole) -> bool {
        self.buffers[role.index()].is_some()
    }

    /// Total buffered bytes across all roles.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.buffers.iter().flatten().map(Vec::len).sum()
    }
}
