//! Loader configuration.

/// What to do when two section headers resolve to the same role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the header that appears last in the section table.
    #[default]
    LastWins,
    /// Fail the load with [`crate::LoadError::DuplicateSection`].
    Reject,
}

/// Options for [`crate::Container::load_with`].
#[derive(Clone, Debug, Default)]
pub struct LoadConfig {
    pub duplicates: DuplicatePolicy,
}

impl LoadConfig {
    /// Configuration that rejects duplicate sections.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }
}
