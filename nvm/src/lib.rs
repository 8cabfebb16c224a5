pub mod vm;
pub mod cli;
pub mod constants;
pub mod debug;
pub mod error;
pub mod runner;
pub mod settings;

// Re-export commonly used types
pub use vm::{VM, VMState, ProgramStore};
pub use error::VmError;
pub use settings::MachineSettings;
