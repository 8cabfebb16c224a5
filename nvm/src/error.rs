//! Error types for the Nibble VM
//!
//! Load failures are reported before any instruction executes. Program
//! faults stop the run loop and carry the offending instruction offset.
//! Running out of input is not an error: it is the EOF flag.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmError {
    #[error("Failed to open program file '{}': {source}", path.display())]
    ProgramLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open data file '{}': {source}", path.display())]
    DataStreamUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No program loaded")]
    NotLoaded,

    #[error("Program fault at offset {offset:#04x}: jump by {displacement} leaves program memory")]
    JumpOutOfBounds { offset: usize, displacement: i8 },

    #[error("Program fault: instruction pointer {offset:#04x} is past the end of program memory")]
    PointerOutOfBounds { offset: usize },

    #[error("Step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Machine faulted earlier at offset {offset:#04x}; reset before running again")]
    Faulted { offset: usize },

    #[error("Invalid settings file '{}': {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl VmError {
    /// Whether the error was raised by the program itself rather than by loading.
    pub fn is_program_fault(&self) -> bool {
        matches!(
            self,
            VmError::JumpOutOfBounds { .. }
                | VmError::PointerOutOfBounds { .. }
                | VmError::StepLimitExceeded { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, VmError>;
