//! Container loader.
//!
//! Reads the file header, the section header table and every present section
//! from a seekable byte source. Any failure aborts the load; a partially
//! populated container is never returned.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use tracing::{debug, trace};

use crate::config::LoadConfig;
use crate::constants::{FILE_HEADER_SIZE, POFF_MAGIC, POFF_VERSION_CURRENT, SECTION_HEADER_SIZE};
use crate::container::Container;
use crate::header::{FileHeader, SectionHeader};
use crate::section::{SectionRole, SectionStore, SectionTable, SectionType};
use crate::{LoadError, LoadStage, Result};

impl Container {
    /// Load a container with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns a format error for a bad magic, version or section type, an I/O
    /// error if the source fails or is shorter than the headers declare, and
    /// an out-of-memory error if a section buffer cannot be allocated.
    pub fn load<R: Read + Seek>(source: &mut R) -> Result<Self> {
        Self::load_with(source, &LoadConfig::default())
    }

    /// Load a container.
    ///
    /// # Errors
    ///
    /// See [`Container::load`]. With [`crate::DuplicatePolicy::Reject`] a
    /// repeated section role is also a format error.
    pub fn load_with<R: Read + Seek>(source: &mut R, config: &LoadConfig) -> Result<Self> {
        let header = read_file_header(source)?;
        let headers = read_section_headers(source, &header)?;
        let sections = SectionTable::resolve(&headers, config.duplicates)?;
        let data = read_all_section_data(source, &sections)?;

        debug!(
            version = header.version,
            file_type = header.file_type,
            sections = sections.len(),
            bytes = data.total_size(),
            "loaded POFF container"
        );

        Ok(Self {
            header,
            sections,
            data,
        })
    }

    /// Load a container from an in-memory image.
    ///
    /// # Errors
    ///
    /// See [`Container::load`].
    pub fn from_bytes(image: &[u8]) -> Result<Self> {
        Self::load(&mut Cursor::new(image))
    }
}

fn seek_to<R: Seek>(source: &mut R, offset: u64, stage: LoadStage) -> Result<()> {
    source
        .seek(SeekFrom::Start(offset))
        .map(|_| ())
        .map_err(|e| LoadError::io(stage, e))
}

fn short_read(stage: LoadStage, expected: usize, actual: usize) -> LoadError {
    LoadError::io(
        stage,
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {expected} bytes, got {actual}"),
        ),
    )
}

/// Read and verify the file header.
///
/// The identification bytes are checked before the length, so a short file
/// that is clearly not POFF reports a format error.
fn read_file_header<R: Read + Seek>(source: &mut R) -> Result<FileHeader> {
    let stage = LoadStage::FileHeader;
    seek_to(source, 0, stage)?;

    let mut raw = Vec::with_capacity(FILE_HEADER_SIZE);
    source
        .by_ref()
        .take(FILE_HEADER_SIZE as u64)
        .read_to_end(&mut raw)
        .map_err(|e| LoadError::io(stage, e))?;

    if raw.len() >= POFF_MAGIC.len() && raw[..POFF_MAGIC.len()] != POFF_MAGIC {
        return Err(LoadError::BadMagic([raw[0], raw[1], raw[2], raw[3]]));
    }
    if raw.len() > 4 && raw[4] != POFF_VERSION_CURRENT {
        return Err(LoadError::UnsupportedVersion(raw[4]));
    }

    let raw: [u8; FILE_HEADER_SIZE] = raw
        .as_slice()
        .try_into()
        .map_err(|_| short_read(stage, FILE_HEADER_SIZE, raw.len()))?;
    Ok(FileHeader::from_bytes(&raw))
}

/// Read every section header, stepping by the declared record stride.
fn read_section_headers<R: Read + Seek>(
    source: &mut R,
    header: &FileHeader,
) -> Result<Vec<SectionHeader>> {
    let mut headers = Vec::with_capacity(usize::from(header.shnum));
    let mut offset = u64::from(header.shoff);

    for index in 0..usize::from(header.shnum) {
        let stage = LoadStage::SectionHeader(index);
        seek_to(source, offset, stage)?;

        let mut raw = [0u8; SECTION_HEADER_SIZE];
        source
            .read_exact(&mut raw)
            .map_err(|e| LoadError::io(stage, e))?;
        let sh = SectionHeader::from_bytes(&raw);

        // An unknown tag ends the load here, before any later header is read.
        if SectionType::from_raw(sh.sh_type).is_none() {
            return Err(LoadError::UnknownSectionType {
                index,
                sh_type: sh.sh_type,
            });
        }

        headers.push(sh);
        offset += u64::from(header.shsize);
    }

    Ok(headers)
}

/// Buffer the payload of one section.
fn read_section_data<R: Read + Seek>(
    source: &mut R,
    role: SectionRole,
    sh: &SectionHeader,
) -> Result<Vec<u8>> {
    let stage = LoadStage::SectionData(role);
    let oom = || LoadError::OutOfMemory {
        role,
        size: sh.size,
    };

    seek_to(source, u64::from(sh.offset), stage)?;

    let size = usize::try_from(sh.size).map_err(|_| oom())?;
    let mut data = Vec::new();
    data.try_reserve_exact(size).map_err(|_| oom())?;

    let read = source
        .by_ref()
        .take(u64::from(sh.size))
        .read_to_end(&mut data)
        .map_err(|e| LoadError::io(stage, e))?;
    if read != size {
        return Err(short_read(stage, size, read));
    }

    trace!(role = role.name(), offset = sh.offset, size, "read section data");
    Ok(data)
}

fn read_all_section_data<R: Read + Seek>(
    source: &mut R,
    sections: &SectionTable,
) -> Result<SectionStore> {
    let mut store = SectionStore::default();
    for (role, sh) in sections.iter() {
        let data = read_section_data(source, role, sh)?;
        store.insert(role, data);
    }
    Ok(store)
}
