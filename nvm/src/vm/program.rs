use std::io::Read;

use nibble_isa::Instruction;
use crate::constants::{INSTRUCTION_SIZE, PROGRAM_MEMORY_SIZE};
use crate::error::Result;

/// Fixed-capacity program memory
///
/// Bytes past the loaded length stay zero and decode as `NOP 0x00`.
#[derive(Debug)]
pub struct ProgramStore {
    bytes: [u8; PROGRAM_MEMORY_SIZE],
    len: usize,
    loaded: bool,
}

impl Default for ProgramStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramStore {
    pub fn new() -> Self {
        Self {
            bytes: [0; PROGRAM_MEMORY_SIZE],
            len: 0,
            loaded: false,
        }
    }

    /// Copy a program image into memory, truncating at capacity.
    /// Returns the number of bytes kept.
    pub fn load(&mut self, program: &[u8]) -> usize {
        let len = program.len().min(PROGRAM_MEMORY_SIZE);
        if program.len() > PROGRAM_MEMORY_SIZE {
            log::warn!(
                "Program is {} bytes, truncating to {} bytes of program memory",
                program.len(), PROGRAM_MEMORY_SIZE
            );
        }

        self.bytes = [0; PROGRAM_MEMORY_SIZE];
        self.bytes[..len].copy_from_slice(&program[..len]);
        self.len = len;
        self.loaded = true;
        len
    }

    /// Read at most `PROGRAM_MEMORY_SIZE` bytes from a stream.
    pub fn load_from<R: Read>(&mut self, reader: R) -> Result<usize> {
        // One byte over capacity so truncation is still reported
        let mut buffer = Vec::with_capacity(PROGRAM_MEMORY_SIZE + 1);
        reader.take(PROGRAM_MEMORY_SIZE as u64 + 1).read_to_end(&mut buffer)?;
        Ok(self.load(&buffer))
    }

    /// Instruction record starting at any byte offset, if a whole record fits.
    pub fn fetch(&self, offset: usize) -> Option<Instruction> {
        let end = offset.checked_add(INSTRUCTION_SIZE)?;
        if end > PROGRAM_MEMORY_SIZE {
            return None;
        }
        Instruction::from_bytes(&self.bytes[offset..end])
    }

    /// Whether a whole record can be fetched at a (possibly negative) offset.
    pub fn contains(&self, offset: isize) -> bool {
        offset >= 0 && self.fetch(offset as usize).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The loaded bytes, without the zero fill.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
