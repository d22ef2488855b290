//! Loaded POFF container.

use crate::header::FileHeader;
use crate::section::{SectionRole, SectionStore, SectionTable};
use crate::TableError;

/// A fully loaded POFF file.
///
/// Owns every section payload. Nothing is mutated after loading.
#[derive(Clone, Debug)]
pub struct Container {
    pub(crate) header: FileHeader,
    pub(crate) sections: SectionTable,
    pub(crate) data: SectionStore,
}

impl Container {
    #[must_use]
    pub const fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Resolved section headers.
    #[must_use]
    pub const fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// Buffered section payloads.
    #[must_use]
    pub const fn store(&self) -> &SectionStore {
        &self.data
    }

    /// Check if the file carried a section for `role`.
    #[must_use]
    pub fn has_section(&self, role: SectionRole) -> bool {
        self.data.has(role)
    }

    /// Payload of the section for `role`, `None` if absent.
    #[must_use]
    pub fn section_data(&self, role: SectionRole) -> Option<&[u8]> {
        self.data.get(role)
    }

    /// Code section bytes. Empty when there is no code section.
    #[must_use]
    pub fn program(&self) -> &[u8] {
        self.data.get(SectionRole::Code).unwrap_or(&[])
    }

    #[must_use]
    pub const fn entry_point(&self) -> u32 {
        self.header.entry
    }

    /// Module name from the string table.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no string table or the name offset is bad.
    pub fn module_name(&self) -> Result<&str, TableError> {
        self.string_at(self.header.name)
    }
}
