//! Decoder configuration.

/// What to do when the code section ends inside an instruction's operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    /// Report [`crate::DecodeError::TruncatedOperand`].
    #[default]
    Error,
    /// Treat the missing operand bytes as zero.
    ZeroFill,
}

/// Options for [`crate::InsnDecoder`].
#[derive(Clone, Debug, Default)]
pub struct DecodeConfig {
    pub truncation: TruncationPolicy,
}
