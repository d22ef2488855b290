//! Variable-length P-code instruction decoder.
//!
//! Each instruction is an opcode byte optionally followed by an 8-bit operand
//! and/or a big-endian 16-bit operand, as selected by the opcode's flag bits.
//! The stream ends either at an explicit `END` opcode (programs) or at the
//! physical end of the section (units). Both look the same to callers: a
//! decoded `END` instruction, repeated on every later call until [`reset`].
//!
//! [`reset`]: InsnDecoder::reset

use poff_file::Container;
use tracing::{debug, trace};

use crate::config::{DecodeConfig, TruncationPolicy};
use crate::cursor::{ProgramCursor, open_code_cursor};
use crate::opcode::{self, END, OPERAND8, OPERAND16};
use crate::{DecodeError, Result};

/// A decoded instruction.
///
/// Operands not carried by the opcode are always zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub op: u8,
    pub arg1: u8,
    pub arg2: u16,
}

impl Instruction {
    /// The end-of-stream instruction.
    pub const END: Self = Self {
        op: END,
        arg1: 0,
        arg2: 0,
    };

    /// Create an instruction, dropping operands the opcode does not carry.
    #[must_use]
    pub const fn new(op: u8, arg1: u8, arg2: u16) -> Self {
        Self {
            op,
            arg1: if opcode::has_arg1(op) { arg1 } else { 0 },
            arg2: if opcode::has_arg2(op) { arg2 } else { 0 },
        }
    }

    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.op == END
    }

    /// Encoded length in bytes.
    #[must_use]
    pub const fn encoded_len(&self) -> u8 {
        opcode::encoded_len(self.op)
    }

    /// Append the encoded form to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.op);
        if opcode::has_arg1(self.op) {
            out.push(self.arg1);
        }
        if opcode::has_arg2(self.op) {
            out.extend_from_slice(&self.arg2.to_be_bytes());
        }
    }
}

/// An instruction together with where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInsn {
    /// Offset of the opcode byte in the code section.
    pub offset: usize,
    /// Bytes consumed (0 for the end of stream, otherwise 1 to 4).
    pub size: u8,
    pub insn: Instruction,
}

impl DecodedInsn {
    const fn end_of_stream(offset: usize) -> Self {
        Self {
            offset,
            size: 0,
            insn: Instruction::END,
        }
    }

    /// Check if this is the end of the stream, explicit or physical.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.insn.is_end()
    }
}

/// Decoder state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecoderState {
    /// Decoding normally.
    Active,
    /// The end of the stream has been seen; only a reset leaves this state.
    Latched,
}

/// Decoder over one program section.
#[derive(Clone, Debug)]
pub struct InsnDecoder<'a> {
    cursor: ProgramCursor<'a>,
    state: DecoderState,
    config: DecodeConfig,
}

impl<'a> InsnDecoder<'a> {
    #[must_use]
    pub fn new(cursor: ProgramCursor<'a>) -> Self {
        Self::with_config(cursor, DecodeConfig::default())
    }

    #[must_use]
    pub const fn with_config(cursor: ProgramCursor<'a>, config: DecodeConfig) -> Self {
        Self {
            cursor,
            state: DecoderState::Active,
            config,
        }
    }

    /// Decoder over a container's code section.
    #[must_use]
    pub fn for_container(container: &'a Container, config: DecodeConfig) -> Self {
        Self::with_config(open_code_cursor(container), config)
    }

    /// Decode the next instruction.
    ///
    /// After the end of the stream every call returns `END` with size 0 and
    /// consumes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::TruncatedOperand`] if the section ends inside an
    /// operand and the truncation policy is [`TruncationPolicy::Error`]. The
    /// decoder is latched afterwards.
    pub fn decode(&mut self) -> Result<DecodedInsn> {
        let offset = self.cursor.position();

        if self.state == DecoderState::Latched {
            return Ok(DecodedInsn::end_of_stream(offset));
        }

        let Some(op) = self.cursor.next_byte() else {
            trace!(offset, "physical end of code section");
            self.state = DecoderState::Latched;
            return Ok(DecodedInsn::end_of_stream(offset));
        };

        if op == END {
            debug!(offset, "logical end of program");
            self.state = DecoderState::Latched;
        }

        let arg1 = if (op & OPERAND8) != 0 {
            self.operand_byte(offset, op)?
        } else {
            0
        };

        let arg2 = if (op & OPERAND16) != 0 {
            let hi = self.operand_byte(offset, op)?;
            let lo = self.operand_byte(offset, op)?;
            u16::from_be_bytes([hi, lo])
        } else {
            0
        };

        let size = self.cursor.position() - offset;
        Ok(DecodedInsn {
            offset,
            size: size as u8,
            insn: Instruction { op, arg1, arg2 },
        })
    }

    fn operand_byte(&mut self, offset: usize, opcode: u8) -> Result<u8> {
        if let Some(byte) = self.cursor.next_byte() {
            return Ok(byte);
        }
        match self.config.truncation {
            TruncationPolicy::ZeroFill => {
                debug!(offset, opcode, "zero-filling truncated operand");
                Ok(0)
            }
            TruncationPolicy::Error => {
                self.state = DecoderState::Latched;
                Err(DecodeError::TruncatedOperand { offset, opcode })
            }
        }
    }

    /// Rewind to the start of the section and clear the end latch.
    pub const fn reset(&mut self) {
        self.cursor.reset();
        self.state = DecoderState::Active;
    }

    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.state
    }

    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.state == DecoderState::Latched
    }

    /// Current offset into the code section.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor.position()
    }

    #[must_use]
    pub const fn cursor(&self) -> &ProgramCursor<'a> {
        &self.cursor
    }
}

/// Yields instructions up to and including an explicit `END`; stops without
/// yielding anything at the physical end of the section.
impl Iterator for InsnDecoder<'_> {
    type Item = Result<DecodedInsn>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_latched() {
            return None;
        }
        match self.decode() {
            Ok(decoded) if decoded.size == 0 => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::NOP;

    fn decoder(bytes: &[u8]) -> InsnDecoder<'_> {
        InsnDecoder::new(ProgramCursor::new(bytes))
    }

    fn encode(insns: &[Instruction]) -> Vec<u8> {
        let mut out = Vec::new();
        for insn in insns {
            insn.encode(&mut out);
        }
        out
    }

    #[test]
    fn test_no_operands() {
        let mut dec = decoder(&[0x05]);
        let d = dec.decode().unwrap();
        assert_eq!(d.insn, Instruction { op: 0x05, arg1: 0, arg2: 0 });
        assert_eq!(d.size, 1);
        assert_eq!(d.offset, 0);
    }

    #[test]
    fn test_byte_operand_round_trip() {
        let insn = Instruction::new(OPERAND8 | 0x12, 0xAB, 0xFFFF);
        let bytes = encode(&[insn]);
        assert_eq!(bytes, vec![0x52, 0xAB]);

        let d = decoder(&bytes).decode().unwrap();
        assert_eq!(d.insn.op, 0x52);
        assert_eq!(d.insn.arg1, 0xAB);
        assert_eq!(d.insn.arg2, 0);
        assert_eq!(d.size, 2);
    }

    #[test]
    fn test_word_operand_is_big_endian() {
        let d = decoder(&[OPERAND16 | 0x01, 0x12, 0x34]).decode().unwrap();
        assert_eq!(d.insn.arg1, 0);
        assert_eq!(d.insn.arg2, 0x1234);
        assert_eq!(d.size, 3);
    }

    #[test]
    fn test_both_operands_round_trip() {
        let insn = Instruction::new(OPERAND8 | OPERAND16 | 0x07, 0x9C, 0xBEEF);
        let bytes = encode(&[insn]);
        assert_eq!(bytes, vec![0xC7, 0x9C, 0xBE, 0xEF]);

        let d = decoder(&bytes).decode().unwrap();
        assert_eq!(d.insn, insn);
        assert_eq!(d.size, 4);
    }

    #[test]
    fn test_sequence_offsets() {
        let bytes = [NOP, OPERAND8 | 0x01, 7, OPERAND16 | 0x02, 0, 9, END];
        let decoded: Vec<_> = decoder(&bytes).collect::<Result<_>>().unwrap();
        let offsets: Vec<_> = decoded.iter().map(|d| (d.offset, d.size)).collect();
        assert_eq!(offsets, vec![(0, 1), (1, 2), (3, 3), (6, 1)]);
        assert!(decoded.last().unwrap().is_end());
    }

    #[test]
    fn test_explicit_end_latches() {
        let mut dec = decoder(&[END]);

        let first = dec.decode().unwrap();
        assert!(first.is_end());
        assert_eq!(first.size, 1);
        assert_eq!(dec.state(), DecoderState::Latched);

        let second = dec.decode().unwrap();
        assert!(second.is_end());
        assert_eq!(second.size, 0);
        assert_eq!(dec.state(), DecoderState::Latched);

        dec.reset();
        assert_eq!(dec.state(), DecoderState::Active);
        let third = dec.decode().unwrap();
        assert_eq!(third.offset, 0);
        assert_eq!(third.size, 1);
        assert!(third.is_end());
    }

    #[test]
    fn test_empty_section_is_end() {
        let mut dec = decoder(&[]);
        let d = dec.decode().unwrap();
        assert_eq!(d.insn, Instruction::END);
        assert_eq!(d.size, 0);
        assert!(dec.is_latched());
    }

    #[test]
    fn test_latched_never_advances() {
        let mut dec = decoder(&[END, NOP, NOP]);
        dec.decode().unwrap();
        let pos = dec.position();
        for _ in 0..5 {
            let d = dec.decode().unwrap();
            assert!(d.is_end());
            assert_eq!(d.size, 0);
            assert_eq!(dec.position(), pos);
        }
    }

    #[test]
    fn test_unit_without_end() {
        let mut dec = decoder(&[NOP, OPERAND8 | 0x03, 1]);
        assert_eq!(dec.decode().unwrap().insn.op, NOP);
        assert_eq!(dec.decode().unwrap().insn.arg1, 1);
        let end = dec.decode().unwrap();
        assert!(end.is_end());
        assert_eq!(end.size, 0);
        assert_eq!(end.offset, 3);
    }

    #[test]
    fn test_unknown_opcode_is_returned() {
        let d = decoder(&[0x2A]).decode().unwrap();
        assert_eq!(d.insn.op, 0x2A);
    }

    #[test]
    fn test_truncated_operand_is_error() {
        let mut dec = decoder(&[NOP, OPERAND16 | 0x01, 0x12]);
        dec.decode().unwrap();
        let err = dec.decode().unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedOperand {
                offset: 1,
                opcode: 0x81
            }
        );
        assert!(dec.is_latched());
        assert!(dec.decode().unwrap().is_end());
    }

    #[test]
    fn test_truncated_operand_zero_fill() {
        let config = DecodeConfig {
            truncation: TruncationPolicy::ZeroFill,
        };
        let mut dec = InsnDecoder::with_config(ProgramCursor::new(&[OPERAND8 | OPERAND16, 5, 0x12]), config);
        let d = dec.decode().unwrap();
        assert_eq!(d.insn.arg1, 5);
        assert_eq!(d.insn.arg2, 0x1200);
        assert_eq!(d.size, 3);
        assert!(dec.decode().unwrap().is_end());
    }

    #[test]
    fn test_iterator_stops_at_physical_end() {
        let count = decoder(&[NOP, NOP, NOP]).count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_iterator_includes_explicit_end() {
        let ops: Vec<_> = decoder(&[NOP, END, NOP])
            .map(|d| d.unwrap().insn.op)
            .collect();
        assert_eq!(ops, vec![NOP, END]);
    }
}
