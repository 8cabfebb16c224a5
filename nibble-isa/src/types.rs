/// Bytes per instruction record: one opcode byte followed by one operand byte.
pub const INSTRUCTION_SIZE: usize = 2;

/// Number of general-purpose registers. Every nibble indexes a valid register.
pub const REGISTER_COUNT: usize = 16;

/// Capacity of program memory in bytes.
pub const PROGRAM_MEMORY_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Inc = 0x01,
    Dec = 0x02,
    Mov = 0x03,
    Movc = 0x04,
    Lsl = 0x05,
    Lsr = 0x06,
    Jmp = 0x07,
    Jfe = 0x0A,
    Ret = 0x0B,
    Add = 0x0C,
    Sub = 0x0D,
    Xor = 0x0E,
    Or = 0x0F,
    In = 0x10,
    Out = 0x11,
}

/// How the operand byte of an instruction is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandFormat {
    /// Operand byte is ignored
    None,
    /// Low nibble = destination, high nibble = source
    RegReg,
    /// Low nibble = register, high nibble unused
    Reg,
    /// Whole byte is an unsigned literal
    Immediate,
    /// Whole byte is a signed byte displacement
    Displacement,
}

impl Opcode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Opcode::Inc),
            0x02 => Some(Opcode::Dec),
            0x03 => Some(Opcode::Mov),
            0x04 => Some(Opcode::Movc),
            0x05 => Some(Opcode::Lsl),
            0x06 => Some(Opcode::Lsr),
            0x07 => Some(Opcode::Jmp),
            0x0A => Some(Opcode::Jfe),
            0x0B => Some(Opcode::Ret),
            0x0C => Some(Opcode::Add),
            0x0D => Some(Opcode::Sub),
            0x0E => Some(Opcode::Xor),
            0x0F => Some(Opcode::Or),
            0x10 => Some(Opcode::In),
            0x11 => Some(Opcode::Out),
            _ => None,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Mov => "MOV",
            Opcode::Movc => "MOVC",
            Opcode::Lsl => "LSL",
            Opcode::Lsr => "LSR",
            Opcode::Jmp => "JMP",
            Opcode::Jfe => "JFE",
            Opcode::Ret => "RET",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Xor => "XOR",
            Opcode::Or => "OR",
            Opcode::In => "IN",
            Opcode::Out => "OUT",
        }
    }

    pub fn format(&self) -> OperandFormat {
        match self {
            Opcode::Inc | Opcode::Dec | Opcode::Ret => OperandFormat::None,

            Opcode::Mov | Opcode::Add | Opcode::Sub |
            Opcode::Xor | Opcode::Or => OperandFormat::RegReg,

            Opcode::Lsl | Opcode::Lsr | Opcode::In | Opcode::Out => OperandFormat::Reg,

            Opcode::Movc => OperandFormat::Immediate,

            Opcode::Jmp | Opcode::Jfe => OperandFormat::Displacement,
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Register fields unpacked from an operand byte.
///
/// `low` is bits 0-3 (destination, or the only register), `high` is bits 4-7
/// (source). Both are always below [`REGISTER_COUNT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Operands {
    pub low: u8,
    pub high: u8,
}

impl Operands {
    pub fn from_byte(operand: u8) -> Self {
        Self {
            low: operand & 0x0F,
            high: (operand >> 4) & 0x0F,
        }
    }
}

/// A single 2-byte instruction record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub operand: u8,
}

impl Instruction {
    pub fn new(opcode: u8, operand: u8) -> Self {
        Self { opcode, operand }
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < INSTRUCTION_SIZE {
            return None;
        }
        Some(Self {
            opcode: bytes[0],
            operand: bytes[1],
        })
    }

    pub fn to_bytes(&self) -> [u8; INSTRUCTION_SIZE] {
        [self.opcode, self.operand]
    }

    pub fn operands(&self) -> Operands {
        Operands::from_byte(self.operand)
    }

    /// Operand byte read as a signed displacement in bytes.
    pub fn displacement(&self) -> i8 {
        self.operand as i8
    }

    // Typed constructors

    pub fn reg_reg(opcode: Opcode, dst: u8, src: u8) -> Self {
        Self::new(opcode as u8, (dst & 0x0F) | ((src & 0x0F) << 4))
    }

    pub fn reg(opcode: Opcode, reg: u8) -> Self {
        Self::new(opcode as u8, reg & 0x0F)
    }

    pub fn mov(dst: u8, src: u8) -> Self {
        Self::reg_reg(Opcode::Mov, dst, src)
    }

    pub fn movc(value: u8) -> Self {
        Self::new(Opcode::Movc as u8, value)
    }

    pub fn jmp(displacement: i8) -> Self {
        Self::new(Opcode::Jmp as u8, displacement as u8)
    }

    pub fn jfe(displacement: i8) -> Self {
        Self::new(Opcode::Jfe as u8, displacement as u8)
    }

    pub fn ret() -> Self {
        Self::new(Opcode::Ret as u8, 0)
    }

    pub fn input(reg: u8) -> Self {
        Self::reg(Opcode::In, reg)
    }

    pub fn output(reg: u8) -> Self {
        Self::reg(Opcode::Out, reg)
    }
}

/// Flattens instruction records into the byte image loaded by the VM.
pub fn encode_program(instructions: &[Instruction]) -> Vec<u8> {
    instructions.iter().flat_map(|i| i.to_bytes()).collect()
}
