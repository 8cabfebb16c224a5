use colored::*;
use nibble_isa::{format_instruction, register_name};

use crate::constants::{DEBUG_REGISTERS_PER_LINE, REGISTER_COUNT};
use crate::vm::{VMState, VM};

/// Render the machine state: pointer, flags, registers and the instruction
/// at the pointer.
pub fn format_state(vm: &VM) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "─".repeat(64).bright_black()));
    out.push_str(&format!(
        "{}: 0x{:02X}  {}: {}  {}: {}  {}: {}\n",
        "IP".bright_cyan().bold(),
        vm.instruction_pointer(),
        "State".bright_cyan().bold(),
        format_vm_state(&vm.state()),
        "EOF".bright_cyan().bold(),
        if vm.eof() { "set".yellow() } else { "clear".normal() },
        "Steps".bright_cyan().bold(),
        vm.steps(),
    ));

    if let Some(instr) = vm.current_instruction() {
        out.push_str(&format!(
            "{}: {}\n",
            "Next".bright_cyan().bold(),
            format_instruction(&instr).bright_white()
        ));
    }

    out.push_str(&format!("{}\n", "Registers:".bright_cyan().bold()));
    for row in (0..REGISTER_COUNT).step_by(DEBUG_REGISTERS_PER_LINE) {
        let cells: Vec<String> = (row..(row + DEBUG_REGISTERS_PER_LINE).min(REGISTER_COUNT))
            .map(|i| {
                let value = vm.register(i);
                let text = format!("{:>3}={:02X}", register_name(i as u8), value);
                if value == 0 {
                    text.bright_black().to_string()
                } else {
                    text.green().to_string()
                }
            })
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ")));
    }

    out
}

pub fn print_state(vm: &VM) {
    eprint!("{}", format_state(vm));
}

fn format_vm_state(state: &VMState) -> ColoredString {
    match state {
        VMState::Ready => state.to_string().normal(),
        VMState::Running => state.to_string().green(),
        VMState::Halted => state.to_string().bright_red().bold(),
        VMState::Faulted { .. } => state.to_string().red().bold(),
    }
}
