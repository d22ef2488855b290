//! Sequential read access to a program section.

use poff_file::Container;

/// Read cursor over a code section buffer.
///
/// Borrows the buffer, so it cannot outlive the container it came from.
#[derive(Clone, Debug)]
pub struct ProgramCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ProgramCursor<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Next unread byte, or `None` at the end of the section.
    ///
    /// Once the end is reached every further call returns `None` and the
    /// position stays put.
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    /// Rewind to the start of the section.
    pub const fn reset(&mut self) {
        self.pos = 0;
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// The whole underlying section.
    #[must_use]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }
}

/// Open a cursor over a container's code section.
///
/// A container without a code section yields an empty cursor.
#[must_use]
pub fn open_code_cursor(container: &Container) -> ProgramCursor<'_> {
    ProgramCursor::new(container.program())
}
