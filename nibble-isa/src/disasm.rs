use crate::types::{Instruction, Opcode, OperandFormat, INSTRUCTION_SIZE};

pub fn register_name(index: u8) -> String {
    format!("R{}", index)
}

/// Render one instruction as assembly text, e.g. `MOV R1, R2` or `JMP -4`.
pub fn format_instruction(instr: &Instruction) -> String {
    let Some(opcode) = Opcode::from_u8(instr.opcode) else {
        return format!("NOP 0x{:02X}", instr.opcode);
    };
    let operands = instr.operands();

    match opcode.format() {
        OperandFormat::None => opcode.to_string(),
        OperandFormat::RegReg => format!(
            "{} {}, {}",
            opcode,
            register_name(operands.low),
            register_name(operands.high)
        ),
        OperandFormat::Reg => format!("{} {}", opcode, register_name(operands.low)),
        OperandFormat::Immediate => format!("{} 0x{:02X}", opcode, instr.operand),
        OperandFormat::Displacement => format!("{} {:+}", opcode, instr.displacement()),
    }
}

/// Disassemble a raw program image, one line per record.
///
/// Each line carries the byte offset, the raw bytes, and the decoded text.
/// A trailing odd byte is shown as a truncated record.
pub fn format_listing(program: &[u8]) -> Vec<String> {
    let mut lines = Vec::with_capacity(program.len() / INSTRUCTION_SIZE + 1);

    for (index, chunk) in program.chunks(INSTRUCTION_SIZE).enumerate() {
        let offset = index * INSTRUCTION_SIZE;
        match Instruction::from_bytes(chunk) {
            Some(instr) => lines.push(format!(
                "[{:02X}] {:02X} {:02X}  {}",
                offset, instr.opcode, instr.operand, format_instruction(&instr)
            )),
            None => lines.push(format!("[{:02X}] {:02X}     <truncated>", offset, chunk[0])),
        }
    }

    lines
}
