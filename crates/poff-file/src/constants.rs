//! POFF format constants (format version 1).

// File header
pub const POFF_MAGIC: [u8; 4] = *b"POFF";
pub const POFF_VERSION_CURRENT: u8 = 1;
pub const FILE_HEADER_SIZE: usize = 22;

// File types (fh_type). Not validated by the loader.
pub const FHT_NONE: u8 = 0;
pub const FHT_EXEC: u8 = 1;
pub const FHT_SHLIB: u8 = 2;
pub const FHT_PROGRAM: u8 = 3;
pub const FHT_UNIT: u8 = 4;

// Section header
pub const SECTION_HEADER_SIZE: usize = 20;

// Section types
pub const SHT_PROGDATA: u8 = 1;
pub const SHT_SYMTAB: u8 = 2;
pub const SHT_STRTAB: u8 = 3;
pub const SHT_REL: u8 = 4;
pub const SHT_FILETAB: u8 = 5;
pub const SHT_LINENO: u8 = 6;
pub const SHT_DEBUG: u8 = 7;

// Section flags
pub const SHF_WRITE: u8 = 0x01;
pub const SHF_ALLOC: u8 = 0x02;
pub const SHF_EXEC: u8 = 0x04;

// Symbol table entries
pub const SYMBOL_ENTRY_SIZE: usize = 16;
pub const STT_NONE: u8 = 0;
pub const STT_DATA: u8 = 1;
pub const STT_RODATA: u8 = 2;
pub const STT_PROC: u8 = 3;
pub const STT_FUNC: u8 = 4;
pub const STF_UNDEFINED: u8 = 0x01;

// Relocation entries
pub const RELOC_ENTRY_SIZE: usize = 8;
pub const RLT_NONE: u8 = 0;
pub const RLT_PCAL: u8 = 1; // procedure/function call
pub const RLT_LDST: u8 = 2; // load/store of data

// File table entries (string table offsets)
pub const FILE_ENTRY_SIZE: usize = 4;

// Line number entries
pub const LINE_ENTRY_SIZE: usize = 8;

// Debug function records (fixed part; followed by nparms u32 sizes)
pub const DEBUG_FUNC_HEADER_SIZE: usize = 12;
