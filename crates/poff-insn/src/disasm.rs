//! Instruction text formatting.

use std::fmt;

use crate::decoder::Instruction;
use crate::opcode::{self, END, NOP, OP_MASK};

/// Mnemonic for an opcode.
///
/// Only `nop` and `end` have names; everything else is shown by operand class
/// and operation number.
#[must_use]
pub fn mnemonic(op: u8) -> String {
    match op {
        NOP => "nop".to_string(),
        END => "end".to_string(),
        _ => {
            let class = match (opcode::has_arg1(op), opcode::has_arg2(op)) {
                (false, false) => "op",
                (true, false) => "op.b",
                (false, true) => "op.w",
                (true, true) => "op.bw",
            };
            format!("{class} {:#04x}", op & OP_MASK)
        }
    }
}

/// Format an instruction as assembly text.
#[must_use]
pub fn format_instr(insn: &Instruction) -> String {
    let name = mnemonic(insn.op);
    match (opcode::has_arg1(insn.op), opcode::has_arg2(insn.op)) {
        (false, false) => name,
        (true, false) => format!("{name} {}", insn.arg1),
        (false, true) => format!("{name} {:#06x}", insn.arg2),
        (true, true) => format!("{name} {}, {:#06x}", insn.arg1, insn.arg2),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_instr(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::{OPERAND8, OPERAND16};

    #[test]
    fn test_named_opcodes() {
        assert_eq!(format_instr(&Instruction::END), "end");
        assert_eq!(format_instr(&Instruction::new(NOP, 0, 0)), "nop");
    }

    #[test]
    fn test_operand_classes() {
        assert_eq!(format_instr(&Instruction::new(0x05, 0, 0)), "op 0x05");
        assert_eq!(
            format_instr(&Instruction::new(OPERAND8 | 0x05, 18, 0)),
            "op.b 0x05 18"
        );
        assert_eq!(
            format_instr(&Instruction::new(OPERAND16 | 0x05, 0, 0x1234)),
            "op.w 0x05 0x1234"
        );
        assert_eq!(
            Instruction::new(OPERAND8 | OPERAND16 | 0x05, 18, 0x1234).to_string(),
            "op.bw 0x05 18, 0x1234"
        );
    }
}
