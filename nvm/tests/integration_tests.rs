use std::io::{self, Cursor};

use nibble_isa::{encode_program, Instruction, Opcode, PROGRAM_MEMORY_SIZE};
use nvm::{MachineSettings, VMState, VmError, VM};
use pretty_assertions::assert_eq;

/// XOR every input byte with 0x20 until the data stream runs out.
fn case_flip_program() -> Vec<u8> {
    encode_program(&[
        Instruction::movc(0x20),                     // 0
        Instruction::mov(2, 0),                      // 2
        Instruction::input(1),                       // 4
        Instruction::jfe(8),                         // 6 -> 14
        Instruction::reg_reg(Opcode::Xor, 1, 2),     // 8
        Instruction::output(1),                      // 10
        Instruction::jmp(-8),                        // 12 -> 4
        Instruction::ret(),                          // 14
    ])
}

fn run_bytes(vm: &mut VM, program: &[u8], data: &[u8]) -> (Result<(), VmError>, Vec<u8>) {
    let mut input = Cursor::new(data.to_vec());
    let mut output: Vec<u8> = Vec::new();
    let result = vm.run_program(program, &mut input, &mut output);
    (result, output)
}

#[test]
fn test_movc_out_ret_emits_single_byte() {
    let mut vm = VM::new();
    let (result, output) = run_bytes(&mut vm, &[0x04, 0x41, 0x11, 0x00, 0x0B, 0x00], b"ignored");

    result.unwrap();
    assert_eq!(output, vec![0x41]);
    assert_eq!(vm.state(), VMState::Halted);
    assert!(!vm.eof());
}

#[test]
fn test_stream_transformation() {
    let mut vm = VM::new();
    let (result, output) = run_bytes(&mut vm, &case_flip_program(), b"HELLO");

    result.unwrap();
    assert_eq!(output, b"hello".to_vec());
    assert!(vm.eof());
    assert_eq!(vm.instruction_pointer(), 14);
}

#[test]
fn test_stream_transformation_empty_data() {
    let mut vm = VM::new();
    let (result, output) = run_bytes(&mut vm, &case_flip_program(), b"");

    result.unwrap();
    assert!(output.is_empty());
    assert_eq!(vm.steps(), 5);
}

#[test]
fn test_empty_program_runs_off_the_end() {
    let mut vm = VM::new();
    let (result, output) = run_bytes(&mut vm, &[], &[]);

    match result {
        Err(VmError::PointerOutOfBounds { offset }) => assert_eq!(offset, PROGRAM_MEMORY_SIZE),
        other => panic!("expected PointerOutOfBounds, got {other:?}"),
    }
    assert!(output.is_empty());
    assert_eq!(vm.steps(), (PROGRAM_MEMORY_SIZE / 2) as u64);
    assert_eq!(vm.state(), VMState::Faulted { offset: PROGRAM_MEMORY_SIZE });
}

#[test]
fn test_program_beyond_capacity_is_truncated() {
    let mut program = vec![0u8; PROGRAM_MEMORY_SIZE];
    program.extend([0x0B, 0x00]);

    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &program, &[]);

    assert_eq!(vm.program().len(), PROGRAM_MEMORY_SIZE);
    assert!(matches!(result, Err(VmError::PointerOutOfBounds { .. })));
}

#[test]
fn test_backward_jump_out_of_bounds_faults() {
    let mut vm = VM::new();
    let program = encode_program(&[Instruction::movc(1), Instruction::jmp(-4)]);
    let (result, _) = run_bytes(&mut vm, &program, &[]);

    match result {
        Err(VmError::JumpOutOfBounds { offset, displacement }) => {
            assert_eq!(offset, 2);
            assert_eq!(displacement, -4);
        }
        other => panic!("expected JumpOutOfBounds, got {other:?}"),
    }
    assert_eq!(vm.state(), VMState::Faulted { offset: 2 });
    assert_eq!(vm.instruction_pointer(), 2);
    assert_eq!(vm.register(0), 1);
}

#[test]
fn test_forward_jump_bounds() {
    // 100 NOPs, then a jump at offset 200
    let mut program = vec![0u8; 200];
    program.extend([Opcode::Jmp as u8, 55]);
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &program, &[]);
    assert!(matches!(
        result,
        Err(VmError::JumpOutOfBounds { offset: 200, displacement: 55 })
    ));

    // Landing on the last whole record is allowed
    let mut program = vec![0u8; 200];
    program.extend([Opcode::Jmp as u8, 54]);
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &program, &[]);
    assert!(matches!(result, Err(VmError::PointerOutOfBounds { offset: 256 })));
}

#[test]
fn test_jump_to_odd_offset() {
    // JMP +3 lands inside the byte stream: 04 5A = MOVC 0x5A, 0B 00 = RET
    let program = [0x07, 0x03, 0xAA, 0x04, 0x5A, 0x0B, 0x00];
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &program, &[]);

    result.unwrap();
    assert_eq!(vm.register(0), 0x5A);
    assert_eq!(vm.instruction_pointer(), 5);
}

#[test]
fn test_step_limit() {
    let settings = MachineSettings { max_steps: Some(10), dump_registers: false };
    let mut vm = VM::with_settings(&settings);
    let (result, _) = run_bytes(&mut vm, &encode_program(&[Instruction::jmp(0)]), &[]);

    assert!(matches!(result, Err(VmError::StepLimitExceeded { limit: 10 })));
    assert_eq!(vm.steps(), 10);
    assert!(result.unwrap_err().is_program_fault());
}

#[test]
fn test_run_requires_loaded_program() {
    let mut vm = VM::new();
    let mut output: Vec<u8> = Vec::new();
    let result = vm.run(&mut io::empty(), &mut output);

    assert!(matches!(result, Err(VmError::NotLoaded)));
    assert_eq!(vm.state(), VMState::Ready);
}

#[test]
fn test_halted_machine_does_not_rerun() {
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &[0x04, 0x41, 0x11, 0x00, 0x0B, 0x00], &[]);
    result.unwrap();

    let mut output: Vec<u8> = Vec::new();
    vm.run(&mut io::empty(), &mut output).unwrap();
    assert!(output.is_empty());
    assert_eq!(vm.steps(), 3);
}

#[test]
fn test_faulted_machine_needs_reset() {
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &encode_program(&[Instruction::jmp(-2)]), &[]);
    assert!(result.is_err());

    let mut output: Vec<u8> = Vec::new();
    let again = vm.run(&mut io::empty(), &mut output);
    assert!(matches!(again, Err(VmError::Faulted { offset: 0 })));

    vm.reset();
    assert_eq!(vm.state(), VMState::Ready);
    assert_eq!(vm.steps(), 0);
    let again = vm.run(&mut io::empty(), &mut output);
    assert!(matches!(again, Err(VmError::JumpOutOfBounds { offset: 0, displacement: -2 })));
}

#[test]
fn test_reset_keeps_program() {
    let mut vm = VM::new();
    let (result, first) = run_bytes(&mut vm, &case_flip_program(), b"abc");
    result.unwrap();
    assert_eq!(first, b"ABC".to_vec());

    vm.reset();
    assert_eq!(vm.registers(), &[0u8; 16]);
    assert!(!vm.eof());

    let mut output: Vec<u8> = Vec::new();
    vm.run(&mut Cursor::new(b"xyz".to_vec()), &mut output).unwrap();
    assert_eq!(output, b"XYZ".to_vec());
}

#[test]
fn test_single_step() {
    let mut vm = VM::new();
    vm.load_program(&[0x04, 0x41, 0x11, 0x00, 0x0B, 0x00]);
    let mut input = io::empty();
    let mut output: Vec<u8> = Vec::new();

    vm.step(&mut input, &mut output).unwrap();
    assert_eq!(vm.state(), VMState::Running);
    assert_eq!(vm.instruction_pointer(), 2);
    assert_eq!(vm.current_instruction(), Some(Instruction::output(0)));

    vm.step(&mut input, &mut output).unwrap();
    vm.step(&mut input, &mut output).unwrap();
    assert_eq!(vm.state(), VMState::Halted);
    assert_eq!(output, vec![0x41]);
}

#[test]
fn test_loading_after_halt_runs_new_program() {
    let mut vm = VM::new();
    let (result, _) = run_bytes(&mut vm, &[0x0B, 0x00], &[]);
    result.unwrap();
    assert_eq!(vm.state(), VMState::Halted);

    let (result, output) = run_bytes(&mut vm, &[0x04, 0x41, 0x11, 0x00, 0x0B, 0x00], &[]);
    result.unwrap();
    assert_eq!(output, vec![0x41]);
    assert_eq!(vm.state(), VMState::Halted);
    assert_eq!(vm.steps(), 3);
}

#[test]
fn test_loading_mid_run_decodes_new_operands() {
    let mut vm = VM::new();
    vm.load_program(&[0x00, 0x00, 0x10, 0x00, 0x0B, 0x00]);
    let mut output: Vec<u8> = Vec::new();
    vm.step(&mut io::empty(), &mut output).unwrap();
    assert_eq!(vm.instruction_pointer(), 2);

    // Same shape, but IN now targets r7
    let (result, _) = run_bytes(&mut vm, &[0x00, 0x00, 0x10, 0x07, 0x0B, 0x00], &[0x99]);
    result.unwrap();
    assert_eq!(vm.register(7), 0x99);
    assert_eq!(vm.register(0), 0);
    assert_eq!(vm.steps(), 3);
}
