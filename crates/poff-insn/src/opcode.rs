//! P-code opcode space.
//!
//! The two high bits of an opcode say which operands follow it; the low six
//! bits select the operation within that operand class.

/// An 8-bit operand (arg1) follows the opcode.
pub const OPERAND8: u8 = 0x40;
/// A big-endian 16-bit operand (arg2) follows the opcode (and arg1, if any).
pub const OPERAND16: u8 = 0x80;
/// Mask selecting the operation within an operand class.
pub const OP_MASK: u8 = 0x3F;

/// No operation.
pub const NOP: u8 = 0x00;
/// Logical end of the instruction stream.
pub const END: u8 = 0x3F;

/// Check if an 8-bit operand follows `op`.
#[inline]
#[must_use]
pub const fn has_arg1(op: u8) -> bool {
    (op & OPERAND8) != 0
}

/// Check if a 16-bit operand follows `op`.
#[inline]
#[must_use]
pub const fn has_arg2(op: u8) -> bool {
    (op & OPERAND16) != 0
}

/// Encoded length of an instruction with opcode `op` (1 to 4 bytes).
#[inline]
#[must_use]
pub const fn encoded_len(op: u8) -> u8 {
    1 + (has_arg1(op) as u8) + 2 * (has_arg2(op) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_len() {
        assert_eq!(encoded_len(NOP), 1);
        assert_eq!(encoded_len(END), 1);
        assert_eq!(encoded_len(OPERAND8 | 0x05), 2);
        assert_eq!(encoded_len(OPERAND16 | 0x05), 3);
        assert_eq!(encoded_len(OPERAND8 | OPERAND16 | 0x05), 4);
    }

    #[test]
    fn test_end_has_no_operands() {
        assert!(!has_arg1(END));
        assert!(!has_arg2(END));
    }
}
