//! Central configuration and constants for the Nibble VM

pub use nibble_isa::{INSTRUCTION_SIZE, PROGRAM_MEMORY_SIZE, REGISTER_COUNT};

// Index of the accumulator register written by MOVC
pub const ACCUMULATOR: usize = 0;

// Settings file location under the user config directory
pub const SETTINGS_DIR: &str = "nvm";
pub const SETTINGS_FILE: &str = "settings.json";

// Registers per line in state dumps
pub const DEBUG_REGISTERS_PER_LINE: usize = 8;
