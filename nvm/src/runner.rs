//! File-based entry point: open the program and data files, then run.
//!
//! Both files are opened before the first instruction executes, so a
//! missing data file never leaves a half-run machine behind.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::debug;
use crate::error::{Result, VmError};
use crate::settings::MachineSettings;
use crate::vm::VM;

/// Load `program_path` into a fresh machine and stream `data_path` through it.
///
/// The machine is returned after it halts so callers can inspect its state.
/// With `dump_registers` set the register file goes to stderr however the
/// run ends.
pub fn run_files<W: Write>(
    program_path: &Path,
    data_path: &Path,
    output: &mut W,
    settings: &MachineSettings,
) -> Result<VM> {
    let mut vm = VM::with_settings(settings);
    load_program_file(&mut vm, program_path)?;

    let mut input = open_data_file(data_path)?;

    log::debug!("Streaming {} through {}", data_path.display(), program_path.display());
    let result = vm.run(&mut input, output);

    if settings.dump_registers {
        debug::print_state(&vm);
    }
    if let Err(e) = &result {
        if e.is_program_fault() {
            log::debug!("Run ended by program fault after {} instructions", vm.steps());
        }
    }

    result?;
    Ok(vm)
}

/// Open and load a program file into `vm`.
pub fn load_program_file(vm: &mut VM, program_path: &Path) -> Result<usize> {
    let file = File::open(program_path).map_err(|source| VmError::ProgramLoad {
        path: program_path.to_path_buf(),
        source,
    })?;

    vm.load_program_from(file).map_err(|e| match e {
        VmError::Io(source) => VmError::ProgramLoad {
            path: program_path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Open the data stream consumed by IN.
pub fn open_data_file(data_path: &Path) -> Result<BufReader<File>> {
    let data = File::open(data_path).map_err(|source| VmError::DataStreamUnavailable {
        path: data_path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(data))
}
