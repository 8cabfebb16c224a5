use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::runner::run_files;
use crate::settings::MachineSettings;

#[derive(Parser, Debug)]
#[command(
    name = "nvm",
    about = "Nibble Virtual Machine - stream a data file through a byte-code program",
    long_about = "The Nibble Virtual Machine (NVM) loads up to 256 bytes of 2-byte instructions\n\
                  and runs them against a data file, one byte per IN and OUT instruction.\n\
                  Output goes to stdout unless --output is given.",
    version
)]
pub struct Cli {
    /// Program file to execute
    pub program_file: PathBuf,

    /// Data file consumed by IN instructions
    #[arg(required_unless_present = "disassemble")]
    pub data_file: Option<PathBuf>,

    /// Write OUT bytes to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Fault after executing this many instructions
    #[arg(short = 'm', long)]
    pub max_steps: Option<u64>,

    /// Settings file (default: $XDG_CONFIG_HOME/nvm/settings.json)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log VM lifecycle events
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Log every executed instruction
    #[arg(long)]
    pub trace: bool,

    /// Print the register file to stderr when the run ends
    #[arg(long)]
    pub dump_registers: bool,

    /// Print a listing of the program and exit without running it
    #[arg(long)]
    pub disassemble: bool,

    /// Do not append a newline to stdout after the run
    #[arg(long)]
    pub no_newline: bool,
}

impl Cli {
    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.trace {
            "trace"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Command-line flags take precedence over the settings file.
    pub fn apply_overrides(&self, mut settings: MachineSettings) -> MachineSettings {
        if self.max_steps.is_some() {
            settings.max_steps = self.max_steps;
        }
        if self.dump_registers {
            settings.dump_registers = true;
        }
        settings
    }

    /// Settings file named by `--config`, else the default location, with
    /// command-line overrides applied.
    pub fn load_settings(&self) -> Result<MachineSettings> {
        let settings = match &self.config {
            Some(path) => MachineSettings::load_from(path)?,
            None => MachineSettings::load(),
        };
        let settings = self.apply_overrides(settings);
        log::debug!("Effective settings: {}", settings.to_json());
        Ok(settings)
    }

    /// Carry out the command. OUT bytes go to `stdout` unless `--output` names
    /// a file; a normal halt on stdout ends with a newline.
    pub fn execute<W: Write>(&self, stdout: &mut W) -> Result<()> {
        if self.disassemble {
            let program = fs::read(&self.program_file).with_context(|| {
                format!("Failed to open program file '{}'", self.program_file.display())
            })?;
            for line in nibble_isa::format_listing(&program) {
                writeln!(stdout, "{line}")?;
            }
            return Ok(());
        }

        let Some(data_file) = &self.data_file else {
            anyhow::bail!("No data file given");
        };
        let settings = self.load_settings()?;

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
                let mut output = BufWriter::new(file);
                run_files(&self.program_file, data_file, &mut output, &settings)?;
            }
            None => {
                run_files(&self.program_file, data_file, &mut *stdout, &settings)?;
                if !self.no_newline {
                    writeln!(stdout)?;
                }
            }
        }

        Ok(())
    }
}
