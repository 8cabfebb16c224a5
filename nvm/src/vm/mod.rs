//! VM module - fetch/decode/execute machine for the nibble instruction set

mod execution;
mod program;
mod state;

pub use program::ProgramStore;
pub use state::{PointerUpdate, VMState};

use std::io::{BufRead, Read, Write};

use nibble_isa::{format_instruction, Instruction, Operands};
use crate::constants::*;
use crate::error::{Result, VmError};
use crate::settings::MachineSettings;

/// The Nibble Virtual Machine
#[derive(Debug)]
pub struct VM {
    program: ProgramStore,

    registers: [u8; REGISTER_COUNT],

    // Byte offset of the current instruction record
    instruction_pointer: usize,

    // Register fields of the record at the pointer, refreshed on every move
    operands: Operands,

    // Set when an IN found the data stream exhausted
    eof: bool,

    state: VMState,

    steps: u64,
    max_steps: Option<u64>,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    pub fn new() -> Self {
        VM {
            program: ProgramStore::new(),
            registers: [0; REGISTER_COUNT],
            instruction_pointer: 0,
            operands: Operands::default(),
            eof: false,
            state: VMState::Ready,
            steps: 0,
            max_steps: None,
        }
    }

    pub fn with_settings(settings: &MachineSettings) -> Self {
        let mut vm = Self::new();
        vm.max_steps = settings.max_steps;
        vm
    }

    pub fn set_max_steps(&mut self, max_steps: Option<u64>) {
        self.max_steps = max_steps;
    }

    /// Replace the program image. The machine goes back to `Ready`, so the
    /// next run starts at offset 0 with freshly decoded operands.
    pub fn load_program(&mut self, program: &[u8]) -> usize {
        self.reset();
        let kept = self.program.load(program);
        log::debug!("Loaded {} bytes of program ({} instructions)", kept, kept / INSTRUCTION_SIZE);
        kept
    }

    pub fn load_program_from<R: Read>(&mut self, reader: R) -> Result<usize> {
        self.reset();
        let kept = self.program.load_from(reader)?;
        log::debug!("Loaded {} bytes of program ({} instructions)", kept, kept / INSTRUCTION_SIZE);
        Ok(kept)
    }

    /// Load `program` and run it to completion against `input`.
    pub fn run_program<R: BufRead, W: Write>(
        &mut self,
        program: &[u8],
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        self.load_program(program);
        self.run(input, output)
    }

    /// Run until RET, a program fault, or the step limit.
    ///
    /// Output is flushed whichever way the loop ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        match self.state {
            VMState::Ready => self.start()?,
            VMState::Running => {},
            VMState::Halted => return Ok(()),
            VMState::Faulted { offset } => return Err(VmError::Faulted { offset }),
        }

        let mut result = Ok(());
        while matches!(self.state, VMState::Running) {
            if let Err(e) = self.step(input, output) {
                result = Err(e);
                break;
            }
        }

        let flushed = output.flush();
        result?;
        flushed?;
        Ok(())
    }

    /// Execute a single fetch/decode/execute cycle.
    pub fn step<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        match self.state {
            VMState::Running => {},
            VMState::Ready => self.start()?,
            VMState::Halted => return Ok(()),
            VMState::Faulted { offset } => return Err(VmError::Faulted { offset }),
        }

        let offset = self.instruction_pointer;

        if let Some(limit) = self.max_steps {
            if self.steps >= limit {
                return Err(self.fault(offset, VmError::StepLimitExceeded { limit }));
            }
        }

        let Some(instr) = self.program.fetch(offset) else {
            return Err(self.fault(offset, VmError::PointerOutOfBounds { offset }));
        };

        log::trace!("[{:02X}] {:<12} eof={}", offset, format_instruction(&instr), self.eof);

        let update = match self.execute_instruction(instr, input, output) {
            Ok(update) => update,
            Err(e) => return Err(self.fault(offset, e)),
        };
        self.steps += 1;

        if matches!(self.state, VMState::Halted) {
            log::debug!("Halted at 0x{:02X} after {} instructions", offset, self.steps);
            return Ok(());
        }

        if update == PointerUpdate::Advance {
            self.instruction_pointer += INSTRUCTION_SIZE;
            self.predecode();
        }

        Ok(())
    }

    /// Clear registers, pointer and flags. The loaded program is kept.
    pub fn reset(&mut self) {
        self.registers = [0; REGISTER_COUNT];
        self.instruction_pointer = 0;
        self.operands = Operands::default();
        self.eof = false;
        self.steps = 0;
        self.state = VMState::Ready;
    }

    fn start(&mut self) -> Result<()> {
        if !self.program.is_loaded() {
            return Err(VmError::NotLoaded);
        }
        self.instruction_pointer = 0;
        self.predecode();
        self.state = VMState::Running;
        log::debug!("Starting execution at 0x00");
        Ok(())
    }

    fn fault(&mut self, offset: usize, error: VmError) -> VmError {
        log::debug!("Fault at 0x{:02X}: {}", offset, error);
        self.state = VMState::Faulted { offset };
        error
    }

    fn predecode(&mut self) {
        self.operands = self
            .program
            .fetch(self.instruction_pointer)
            .map(|instr| instr.operands())
            .unwrap_or_default();
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn register(&self, index: usize) -> u8 {
        self.registers[index]
    }

    pub fn instruction_pointer(&self) -> usize {
        self.instruction_pointer
    }

    pub fn eof(&self) -> bool {
        self.eof
    }

    pub fn state(&self) -> VMState {
        self.state
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn program(&self) -> &ProgramStore {
        &self.program
    }

    pub fn current_instruction(&self) -> Option<Instruction> {
        self.program.fetch(self.instruction_pointer)
    }
}
