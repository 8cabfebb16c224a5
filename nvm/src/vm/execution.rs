use std::io::{BufRead, Write};

use super::{PointerUpdate, VMState, VM};
use nibble_isa::{Instruction, Operation};
use crate::constants::ACCUMULATOR;
use crate::error::{Result, VmError};

impl VM {
    pub(super) fn execute_instruction<R: BufRead, W: Write>(
        &mut self,
        instr: Instruction,
        input: &mut R,
        output: &mut W,
    ) -> Result<PointerUpdate> {
        match Operation::decode(instr) {
            // Reserved opcodes
            Operation::Inc | Operation::Dec => {},

            Operation::Mov { dst, src } => {
                self.registers[dst as usize] = self.registers[src as usize];
            },
            Operation::Movc(value) => {
                self.registers[ACCUMULATOR] = value;
            },
            Operation::Lsl(reg) => {
                self.registers[reg as usize] <<= 1;
            },
            Operation::Lsr(reg) => {
                self.registers[reg as usize] >>= 1;
            },

            Operation::Jmp(displacement) => return self.jump(displacement),
            Operation::Jfe(displacement) => {
                if self.eof {
                    return self.jump(displacement);
                }
            },
            Operation::Ret => {
                self.state = VMState::Halted;
            },

            Operation::Add { dst, src } => {
                let (d, s) = (dst as usize, src as usize);
                self.registers[d] = self.registers[d].wrapping_add(self.registers[s]);
            },
            Operation::Sub { dst, src } => {
                let (d, s) = (dst as usize, src as usize);
                self.registers[d] = self.registers[d].wrapping_sub(self.registers[s]);
            },
            Operation::Xor { dst, src } => {
                self.registers[dst as usize] ^= self.registers[src as usize];
            },
            Operation::Or { dst, src } => {
                self.registers[dst as usize] |= self.registers[src as usize];
            },

            // IN/OUT address the register pre-decoded when the pointer moved here
            Operation::In(reg) => {
                debug_assert_eq!(reg, self.operands.low);
                self.read_input(input)?;
            },
            Operation::Out(reg) => {
                debug_assert_eq!(reg, self.operands.low);
                self.write_output(output)?;
            },

            Operation::Nop(opcode) => {
                log::trace!("Ignoring unknown opcode 0x{:02X}", opcode);
            },
        }

        Ok(PointerUpdate::Advance)
    }

    /// Move the pointer by a signed byte displacement relative to the
    /// current instruction.
    fn jump(&mut self, displacement: i8) -> Result<PointerUpdate> {
        let offset = self.instruction_pointer;
        let target = offset as isize + displacement as isize;

        if !self.program.contains(target) {
            return Err(VmError::JumpOutOfBounds { offset, displacement });
        }

        self.instruction_pointer = target as usize;
        self.predecode();
        Ok(PointerUpdate::Moved)
    }

    /// Exhaustion is checked before the read: an IN on an empty stream sets
    /// the EOF flag and leaves the register untouched.
    fn read_input<R: BufRead>(&mut self, input: &mut R) -> Result<()> {
        let next = input.fill_buf()?.first().copied();

        match next {
            Some(byte) => {
                input.consume(1);
                self.registers[self.operands.low as usize] = byte;
                self.eof = false;
            },
            None => {
                if !self.eof {
                    log::debug!("Data stream exhausted at 0x{:02X}", self.instruction_pointer);
                }
                self.eof = true;
            },
        }

        Ok(())
    }

    fn write_output<W: Write>(&mut self, output: &mut W) -> Result<()> {
        if !self.eof {
            output.write_all(&[self.registers[self.operands.low as usize]])?;
        }
        Ok(())
    }
}
