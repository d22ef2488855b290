//! Shared fixtures: builds POFF images in memory and on disk.

#![allow(dead_code)]

use std::path::PathBuf;

use poff_file::{
    FHT_PROGRAM, FHT_UNIT, FILE_HEADER_SIZE, POFF_MAGIC, POFF_VERSION_CURRENT,
    SECTION_HEADER_SIZE,
};
use tempfile::TempDir;

pub struct ImageBuilder {
    file_type: u8,
    name: u32,
    entry: u32,
    sections: Vec<(u8, u8, Vec<u8>)>,
}

impl ImageBuilder {
    pub fn program() -> Self {
        Self {
            file_type: FHT_PROGRAM,
            name: 0,
            entry: 0,
            sections: Vec::new(),
        }
    }

    pub fn unit() -> Self {
        Self {
            file_type: FHT_UNIT,
            ..Self::program()
        }
    }

    pub fn name(mut self, name: u32) -> Self {
        self.name = name;
        self
    }

    pub fn section(mut self, sh_type: u8, flags: u8, data: &[u8]) -> Self {
        self.sections.push((sh_type, flags, data.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let shoff = FILE_HEADER_SIZE;
        let mut data_offset = shoff + self.sections.len() * SECTION_HEADER_SIZE;

        let mut out = Vec::new();
        out.extend_from_slice(&POFF_MAGIC);
        out.push(POFF_VERSION_CURRENT);
        out.push(self.file_type);
        out.extend_from_slice(&(SECTION_HEADER_SIZE as u16).to_be_bytes());
        out.extend_from_slice(&(self.sections.len() as u16).to_be_bytes());
        out.extend_from_slice(&self.name.to_be_bytes());
        out.extend_from_slice(&self.entry.to_be_bytes());
        out.extend_from_slice(&(shoff as u32).to_be_bytes());

        for (sh_type, flags, data) in &self.sections {
            out.push(*sh_type);
            out.push(*flags);
            out.extend_from_slice(&[0; 10]);
            out.extend_from_slice(&(data_offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            data_offset += data.len();
        }
        for (_, _, data) in &self.sections {
            out.extend_from_slice(data);
        }
        out
    }

    /// Write the image into a fresh temp dir; keep the dir alive while the
    /// path is in use.
    pub fn write(&self) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("test.o");
        std::fs::write(&path, self.build()).expect("write image");
        (dir, path)
    }
}

pub fn symbol(kind: u8, flags: u8, name: u32, value: u32, size: u32) -> Vec<u8> {
    let mut out = vec![kind, 0, flags, 0];
    out.extend_from_slice(&name.to_be_bytes());
    out.extend_from_slice(&value.to_be_bytes());
    out.extend_from_slice(&size.to_be_bytes());
    out
}

pub fn line(line: u16, file: u16, offset: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&line.to_be_bytes());
    out.extend_from_slice(&file.to_be_bytes());
    out.extend_from_slice(&offset.to_be_bytes());
    out
}
