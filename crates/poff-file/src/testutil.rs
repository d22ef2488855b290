//! In-memory POFF image builder for tests.

use crate::constants::{
    FHT_PROGRAM, FILE_HEADER_SIZE, POFF_MAGIC, POFF_VERSION_CURRENT, SECTION_HEADER_SIZE,
};

pub struct ImageBuilder {
    file_type: u8,
    name: u32,
    entry: u32,
    stride: u16,
    sections: Vec<(u8, u8, Vec<u8>)>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            file_type: FHT_PROGRAM,
            name: 0,
            entry: 0,
            stride: SECTION_HEADER_SIZE as u16,
            sections: Vec::new(),
        }
    }

    pub fn name(mut self, name: u32) -> Self {
        self.name = name;
        self
    }

    pub fn entry(mut self, entry: u32) -> Self {
        self.entry = entry;
        self
    }

    /// Section header stride; must be at least `SECTION_HEADER_SIZE`.
    pub fn stride(mut self, stride: u16) -> Self {
        self.stride = stride;
        self
    }

    pub fn section(mut self, sh_type: u8, flags: u8, data: &[u8]) -> Self {
        self.sections.push((sh_type, flags, data.to_vec()));
        self
    }

    /// Layout: file header, section headers, then payloads in order.
    pub fn build(self) -> Vec<u8> {
        let shoff = FILE_HEADER_SIZE;
        let mut data_offset = shoff + self.sections.len() * usize::from(self.stride);

        let mut out = Vec::new();
        out.extend_from_slice(&POFF_MAGIC);
        out.push(POFF_VERSION_CURRENT);
        out.push(self.file_type);
        out.extend_from_slice(&self.stride.to_be_bytes());
        out.extend_from_slice(&(self.sections.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.name.to_be_bytes());
        out.extend_from_slice(&self.entry.to_be_bytes());
        out.extend_from_slice(&(shoff as u32).to_be_bytes());

        for (sh_type, flags, data) in &self.sections {
            let start = out.len();
            out.push(*sh_type);
            out.push(*flags);
            out.extend_from_slice(&0u16.to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&(data_offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            out.resize(start + usize::from(self.stride), 0);
            data_offset += data.len();
        }

        for (_, _, data) in &self.sections {
            out.extend_from_slice(data);
        }
        out
    }
}
