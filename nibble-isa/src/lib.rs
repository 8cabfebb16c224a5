pub mod types;
pub mod operation;
pub mod disasm;

pub use types::{
    Instruction, Opcode, OperandFormat, Operands, encode_program,
    INSTRUCTION_SIZE, PROGRAM_MEMORY_SIZE, REGISTER_COUNT,
};

pub use operation::Operation;
pub use disasm::{format_instruction, format_listing, register_name};
