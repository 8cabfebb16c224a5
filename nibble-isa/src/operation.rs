//! Decoded form of an instruction record.
//!
//! Every opcode maps to exactly one variant. Bytes outside the opcode table
//! decode to [`Operation::Nop`], which the machine executes as an empty cycle.

use crate::types::{Instruction, Opcode, Operands};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reserved, no effect
    Inc,
    /// Reserved, no effect
    Dec,
    Mov { dst: u8, src: u8 },
    Movc(u8),
    Lsl(u8),
    Lsr(u8),
    Jmp(i8),
    /// Jump taken only when the end-of-stream flag is set
    Jfe(i8),
    Ret,
    Add { dst: u8, src: u8 },
    Sub { dst: u8, src: u8 },
    Xor { dst: u8, src: u8 },
    Or { dst: u8, src: u8 },
    In(u8),
    Out(u8),
    /// Unknown opcode byte
    Nop(u8),
}

impl Operation {
    pub fn decode(instr: Instruction) -> Self {
        let Operands { low, high } = instr.operands();

        let Some(opcode) = Opcode::from_u8(instr.opcode) else {
            return Operation::Nop(instr.opcode);
        };

        match opcode {
            Opcode::Inc => Operation::Inc,
            Opcode::Dec => Operation::Dec,
            Opcode::Mov => Operation::Mov { dst: low, src: high },
            Opcode::Movc => Operation::Movc(instr.operand),
            Opcode::Lsl => Operation::Lsl(low),
            Opcode::Lsr => Operation::Lsr(low),
            Opcode::Jmp => Operation::Jmp(instr.displacement()),
            Opcode::Jfe => Operation::Jfe(instr.displacement()),
            Opcode::Ret => Operation::Ret,
            Opcode::Add => Operation::Add { dst: low, src: high },
            Opcode::Sub => Operation::Sub { dst: low, src: high },
            Opcode::Xor => Operation::Xor { dst: low, src: high },
            Opcode::Or => Operation::Or { dst: low, src: high },
            Opcode::In => Operation::In(low),
            Opcode::Out => Operation::Out(low),
        }
    }
}
