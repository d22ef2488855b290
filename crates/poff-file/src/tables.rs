//! Typed views over the auxiliary sections of a loaded container.
//!
//! Parsing is lazy: each view walks the buffered section bytes on demand.
//! An absent section behaves like an empty table; use
//! [`Container::has_section`] to tell the two apart.

use std::marker::PhantomData;

use crate::constants::{
    DEBUG_FUNC_HEADER_SIZE, FILE_ENTRY_SIZE, LINE_ENTRY_SIZE, RELOC_ENTRY_SIZE, RLT_LDST, RLT_NONE,
    RLT_PCAL, STF_UNDEFINED, STT_DATA, STT_FUNC, STT_NONE, STT_PROC, STT_RODATA, SYMBOL_ENTRY_SIZE,
};
use crate::container::Container;
use crate::header::{read_be16, read_be32};
use crate::section::SectionRole;
use crate::TableError;

/// Kind of a symbol table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    None,
    Data,
    ReadOnlyData,
    Procedure,
    Function,
}

/// Symbol table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    /// Raw kind (`STT_*`).
    pub kind: u8,
    pub align: u8,
    /// Flag bits (`STF_*`).
    pub flags: u8,
    /// String table offset of the name.
    pub name: u32,
    pub value: u32,
    pub size: u32,
}

impl Symbol {
    #[must_use]
    pub const fn kind(&self) -> Option<SymbolKind> {
        match self.kind {
            STT_NONE => Some(SymbolKind::None),
            STT_DATA => Some(SymbolKind::Data),
            STT_RODATA => Some(SymbolKind::ReadOnlyData),
            STT_PROC => Some(SymbolKind::Procedure),
            STT_FUNC => Some(SymbolKind::Function),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        (self.flags & STF_UNDEFINED) != 0
    }
}

/// Kind of a relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelocKind {
    None,
    /// Procedure or function call.
    Call,
    /// Load or store of data.
    LoadStore,
}

/// Relocation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relocation {
    /// Symbol index (high 24 bits) and kind (low 8 bits).
    pub info: u32,
    /// Offset into the code section.
    pub offset: u32,
}

impl Relocation {
    #[must_use]
    pub const fn symbol_index(&self) -> u32 {
        self.info >> 8
    }

    #[must_use]
    pub const fn kind(&self) -> Option<RelocKind> {
        match (self.info & 0xFF) as u8 {
            RLT_NONE => Some(RelocKind::None),
            RLT_PCAL => Some(RelocKind::Call),
            RLT_LDST => Some(RelocKind::LoadStore),
            _ => None,
        }
    }
}

/// Line number entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineNumber {
    pub line: u16,
    /// Index into the file table.
    pub file: u16,
    /// Offset into the code section.
    pub offset: u32,
}

/// Debug record for a procedure or function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugFunction {
    pub value: u32,
    pub size: u32,
    /// Sizes of the parameters.
    pub params: Vec<u32>,
}

/// Fixed-size table record.
pub trait Record: Sized {
    const SIZE: usize;
    const ROLE: SectionRole;

    /// Decode from exactly `SIZE` bytes.
    fn parse(raw: &[u8]) -> Self;
}

impl Record for Symbol {
    const SIZE: usize = SYMBOL_ENTRY_SIZE;
    const ROLE: SectionRole = SectionRole::Symbols;

    fn parse(raw: &[u8]) -> Self {
        Self {
            kind: raw[0],
            align: raw[1],
            flags: raw[2],
            name: read_be32(raw, 4),
            value: read_be32(raw, 8),
            size: read_be32(raw, 12),
        }
    }
}

impl Record for Relocation {
    const SIZE: usize = RELOC_ENTRY_SIZE;
    const ROLE: SectionRole = SectionRole::Relocations;

    fn parse(raw: &[u8]) -> Self {
        Self {
            info: read_be32(raw, 0),
            offset: read_be32(raw, 4),
        }
    }
}

impl Record for LineNumber {
    const SIZE: usize = LINE_ENTRY_SIZE;
    const ROLE: SectionRole = SectionRole::LineNumbers;

    fn parse(raw: &[u8]) -> Self {
        Self {
            line: read_be16(raw, 0),
            file: read_be16(raw, 2),
            offset: read_be32(raw, 4),
        }
    }
}

/// File table entry: string table offset of a file name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileEntry(pub u32);

impl Record for FileEntry {
    const SIZE: usize = FILE_ENTRY_SIZE;
    const ROLE: SectionRole = SectionRole::FileNames;

    fn parse(raw: &[u8]) -> Self {
        Self(read_be32(raw, 0))
    }
}

/// Line number records sorted by code offset.
#[derive(Clone, Debug, Default)]
pub struct LineTable {
    lines: Vec<LineNumber>,
}

impl LineTable {
    /// Record with the greatest offset not past `code_offset`. Records with
    /// equal offsets keep table order, so the last one wins.
    #[must_use]
    pub fn lookup(&self, code_offset: u32) -> Option<&LineNumber> {
        let idx = self.lines.partition_point(|l| l.offset <= code_offset);
        idx.checked_sub(1).map(|i| &self.lines[i])
    }

    /// Records in offset order.
    pub fn lines(&self) -> impl Iterator<Item = &LineNumber> {
        self.lines.iter()
    }
}

/// Iterator over fixed-size records.
///
/// Yields one `Truncated` error for a trailing partial record, then stops.
pub struct Records<'a, T> {
    data: &'a [u8],
    offset: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Record> Records<'a, T> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            _marker: PhantomData,
        }
    }
}

impl<T: Record> Iterator for Records<'_, T> {
    type Item = Result<T, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        if start >= self.data.len() {
            return None;
        }
        self.offset = start + T::SIZE;
        if self.offset > self.data.len() {
            self.offset = self.data.len();
            return Some(Err(TableError::Truncated {
                role: T::ROLE,
                offset: start,
            }));
        }
        Some(Ok(T::parse(&self.data[start..start + T::SIZE])))
    }
}

/// Iterator over variable-length debug function records.
pub struct DebugFunctions<'a> {
    data: &'a [u8],
    offset: usize,
}

impl DebugFunctions<'_> {
    const fn truncated(&mut self, at: usize) -> Result<DebugFunction, TableError> {
        self.offset = self.data.len();
        Err(TableError::Truncated {
            role: SectionRole::DebugInfo,
            offset: at,
        })
    }
}

impl Iterator for DebugFunctions<'_> {
    type Item = Result<DebugFunction, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        if start >= self.data.len() {
            return None;
        }
        if start + DEBUG_FUNC_HEADER_SIZE > self.data.len() {
            return Some(self.truncated(start));
        }

        let value = read_be32(self.data, start);
        let size = read_be32(self.data, start + 4);
        let nparms = read_be32(self.data, start + 8) as usize;

        let params_start = start + DEBUG_FUNC_HEADER_SIZE;
        let params_end = nparms
            .checked_mul(4)
            .and_then(|len| params_start.checked_add(len));
        let Some(params_end) = params_end.filter(|&end| end <= self.data.len()) else {
            return Some(self.truncated(start));
        };

        let params = (params_start..params_end)
            .step_by(4)
            .map(|off| read_be32(self.data, off))
            .collect();
        self.offset = params_end;

        Some(Ok(DebugFunction {
            value,
            size,
            params,
        }))
    }
}

impl Container {
    fn table(&self, role: SectionRole) -> &[u8] {
        self.section_data(role).unwrap_or(&[])
    }

    /// NUL-terminated string at `offset` in the string table.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no string table, the offset is out of
    /// range, or the string is unterminated or not UTF-8.
    pub fn string_at(&self, offset: u32) -> Result<&str, TableError> {
        let strings = self
            .section_data(SectionRole::Strings)
            .ok_or(TableError::Missing(SectionRole::Strings))?;
        let start = offset as usize;
        let tail = strings.get(start..).ok_or(TableError::BadString(offset))?;
        let len = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(TableError::BadString(offset))?;
        std::str::from_utf8(&tail[..len]).map_err(|_| TableError::BadString(offset))
    }

    #[must_use]
    pub fn symbols(&self) -> Records<'_, Symbol> {
        Records::new(self.table(SectionRole::Symbols))
    }

    #[must_use]
    pub fn relocations(&self) -> Records<'_, Relocation> {
        Records::new(self.table(SectionRole::Relocations))
    }

    #[must_use]
    pub fn file_entries(&self) -> Records<'_, FileEntry> {
        Records::new(self.table(SectionRole::FileNames))
    }

    #[must_use]
    pub fn line_numbers(&self) -> Records<'_, LineNumber> {
        Records::new(self.table(SectionRole::LineNumbers))
    }

    #[must_use]
    pub fn debug_functions(&self) -> DebugFunctions<'_> {
        DebugFunctions {
            data: self.table(SectionRole::DebugInfo),
            offset: 0,
        }
    }

    /// Name of a symbol, resolved through the string table.
    ///
    /// # Errors
    ///
    /// Returns an error if the name offset does not resolve.
    pub fn symbol_name(&self, symbol: &Symbol) -> Result<&str, TableError> {
        self.string_at(symbol.name)
    }

    /// Look up a symbol by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol or string table is malformed.
    pub fn lookup_symbol(&self, name: &str) -> Result<Option<Symbol>, TableError> {
        for symbol in self.symbols() {
            let symbol = symbol?;
            if self.symbol_name(&symbol)? == name {
                return Ok(Some(symbol));
            }
        }
        Ok(None)
    }

    /// File name for a file table index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the name is bad.
    pub fn file_name(&self, index: u16) -> Result<&str, TableError> {
        let entry = self
            .file_entries()
            .nth(usize::from(index))
            .ok_or(TableError::BadFileIndex(index))??;
        self.string_at(entry.0)
    }

    /// Line number table sorted by code offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the line number table is truncated.
    pub fn line_table(&self) -> Result<LineTable, TableError> {
        let mut lines = self.line_numbers().collect::<Result<Vec<_>, _>>()?;
        lines.sort_by_key(|l| l.offset);
        Ok(LineTable { lines })
    }

    /// Line number record covering a code offset. See [`LineTable::lookup`].
    ///
    /// Builds a [`LineTable`] on every call; keep one around for repeated
    /// lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if the line number table is truncated.
    pub fn line_for_offset(&self, code_offset: u32) -> Result<Option<LineNumber>, TableError> {
        Ok(self.line_table()?.lookup(code_offset).copied())
    }
}
