//! Instruction-level tests: encoded words driven through the processor

use mipsim::error::SimulationError;
use mipsim::Processor;

const TEXT_BASE: u32 = 0x00400000;
const DATA_BASE: u32 = 0x10000000;

const ZERO: u8 = 0;
const V0: u8 = 2;
const A0: u8 = 4;
const T0: u8 = 8;
const T1: u8 = 9;
const T2: u8 = 10;
const T3: u8 = 11;
const T4: u8 = 12;
const T5: u8 = 13;
const RA: u8 = 31;

fn r_type(rs: u8, rt: u8, rd: u8, shamt: u8, function: u8) -> u32 {
    ((rs as u32) << 21)
        | ((rt as u32) << 16)
        | ((rd as u32) << 11)
        | ((shamt as u32) << 6)
        | function as u32
}

fn i_type(op_code: u8, rs: u8, rt: u8, immediate: u16) -> u32 {
    ((op_code as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | immediate as u32
}

fn j_type(op_code: u8, target: u32) -> u32 {
    ((op_code as u32) << 26) | (target >> 2)
}

/// ori $v0, $zero, 10; syscall
fn exit_sequence() -> Vec<u32> {
    vec![i_type(0x0D, ZERO, V0, 10), r_type(0, 0, 0, 0, 0x0C)]
}

fn processor_with_program(words: &[u32]) -> Processor {
    let bytes: Vec<u8> = words.iter().flat_map(|word| word.to_le_bytes()).collect();
    let mut processor = Processor::new();
    processor
        .memory
        .map_region(TEXT_BASE, bytes.len() as u32, &bytes)
        .unwrap();
    processor.set_entry(TEXT_BASE);
    processor
}

fn run(processor: &mut Processor) {
    while processor.running {
        processor.step().unwrap();
    }
}

fn run_until_error(processor: &mut Processor) -> SimulationError {
    while processor.running {
        if let Err(error) = processor.step() {
            return error;
        }
    }
    panic!("program exited without a fault");
}

#[test]
fn addiu_sign_extends_the_immediate() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 0xFFFF), // addiu $t0, $zero, -1
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T0), 0xFFFFFFFF);
}

#[test]
fn logical_immediates_zero_extend() {
    let mut program = vec![
        i_type(0x0D, ZERO, T0, 0xFFFF), // ori  $t0, $zero, 0xFFFF
        i_type(0x0C, ZERO, T1, 0xFFFF), // andi $t1, $zero, 0xFFFF
        i_type(0x0E, T0, T2, 0xF00F),   // xori $t2, $t0, 0xF00F
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T0), 0x0000FFFF);
    assert_eq!(processor.registers.get(T1), 0);
    assert_eq!(processor.registers.get(T2), 0x00000FF0);
}

#[test]
fn lui_shifts_into_the_upper_half() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0x8765), // lui $t0, 0x8765
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T0), 0x87650000);
}

#[test]
fn constant_shifts() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0x8000), // lui $t0, 0x8000
        r_type(0, T0, T1, 1, 0x03),     // sra $t1, $t0, 1
        r_type(0, T0, T2, 31, 0x02),    // srl $t2, $t0, 31
        i_type(0x09, ZERO, T3, 3),      // addiu $t3, $zero, 3
        r_type(0, T3, T4, 4, 0x00),     // sll $t4, $t3, 4
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // Arithmetic right shift preserves the sign bit
    assert_eq!(processor.registers.get(T1), 0xC0000000);
    assert_eq!(processor.registers.get(T2), 1);
    assert_eq!(processor.registers.get(T4), 48);
}

#[test]
fn variable_shifts_mask_to_five_bits() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 1),  // addiu $t0, $zero, 1
        i_type(0x09, ZERO, T1, 33), // addiu $t1, $zero, 33
        r_type(T1, T0, T2, 0, 0x04), // sllv $t2, $t0, $t1
        i_type(0x0F, ZERO, T3, 0x8000), // lui $t3, 0x8000
        r_type(T1, T3, T4, 0, 0x06), // srlv $t4, $t3, $t1
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // Shift count 33 counts as 1
    assert_eq!(processor.registers.get(T2), 2);
    assert_eq!(processor.registers.get(T4), 0x40000000);
}

#[test]
fn add_variants_wrap_silently() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0xFFFF), // lui $t0, 0xFFFF
        i_type(0x0D, T0, T0, 0xFFFF),   // ori $t0, $t0, 0xFFFF
        i_type(0x09, ZERO, T1, 1),      // addiu $t1, $zero, 1
        r_type(T0, T1, T2, 0, 0x21),    // addu $t2, $t0, $t1
        r_type(T0, T1, T3, 0, 0x20),    // add  $t3, $t0, $t1
        r_type(T1, T0, T4, 0, 0x23),    // subu $t4, $t1, $t0
        r_type(T1, T0, T5, 0, 0x22),    // sub  $t5, $t1, $t0
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0);
    assert_eq!(processor.registers.get(T3), 0);
    // 1 - (-1) == 2
    assert_eq!(processor.registers.get(T4), 2);
    assert_eq!(processor.registers.get(T5), 2);
}

#[test]
fn bitwise_operations() {
    let mut program = vec![
        i_type(0x0D, ZERO, T0, 0xFF00), // ori $t0, $zero, 0xFF00
        i_type(0x0D, ZERO, T1, 0x0FF0), // ori $t1, $zero, 0x0FF0
        r_type(T0, T1, T2, 0, 0x24),    // and $t2, $t0, $t1
        r_type(T0, T1, T3, 0, 0x25),    // or  $t3, $t0, $t1
        r_type(T0, T1, T4, 0, 0x26),    // xor $t4, $t0, $t1
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0x0F00);
    assert_eq!(processor.registers.get(T3), 0xFFF0);
    assert_eq!(processor.registers.get(T4), 0xF0F0);
}

#[test]
fn signed_and_unsigned_compares_differ() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 0xFFFF), // addiu $t0, $zero, -1
        i_type(0x09, ZERO, T1, 1),      // addiu $t1, $zero, 1
        r_type(T0, T1, T2, 0, 0x2A),    // slt  $t2, $t0, $t1
        r_type(T0, T1, T3, 0, 0x2B),    // sltu $t3, $t0, $t1
        i_type(0x0A, T0, T4, 0),        // slti $t4, $t0, 0
        i_type(0x0B, ZERO, T5, 0xFFFF), // sltiu $t5, $zero, -1
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // -1 < 1 signed, but 0xFFFFFFFF > 1 unsigned
    assert_eq!(processor.registers.get(T2), 1);
    assert_eq!(processor.registers.get(T3), 0);
    assert_eq!(processor.registers.get(T4), 1);
    // The immediate sign-extends to 0xFFFFFFFF before the unsigned compare
    assert_eq!(processor.registers.get(T5), 1);
}

#[test]
fn mult_splits_the_product_across_hi_lo() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 1),   // lui $t0, 1
        r_type(T0, T0, 0, 0, 0x18),  // mult $t0, $t0
        r_type(0, 0, T1, 0, 0x10),   // mfhi $t1
        r_type(0, 0, T2, 0, 0x12),   // mflo $t2
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // 0x10000 * 0x10000 == 2^32
    assert_eq!(processor.registers.get(T1), 1);
    assert_eq!(processor.registers.get(T2), 0);
}

#[test]
fn mult_and_multu_extend_differently() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 0xFFFF), // addiu $t0, $zero, -1
        r_type(T0, T0, 0, 0, 0x18),     // mult $t0, $t0
        r_type(0, 0, T1, 0, 0x10),      // mfhi $t1
        r_type(0, 0, T2, 0, 0x12),      // mflo $t2
        r_type(T0, T0, 0, 0, 0x19),     // multu $t0, $t0
        r_type(0, 0, T3, 0, 0x10),      // mfhi $t3
        r_type(0, 0, T4, 0, 0x12),      // mflo $t4
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // (-1) * (-1) == 1
    assert_eq!(processor.registers.get(T1), 0);
    assert_eq!(processor.registers.get(T2), 1);
    // 0xFFFFFFFF * 0xFFFFFFFF == 0xFFFFFFFE_00000001
    assert_eq!(processor.registers.get(T3), 0xFFFFFFFE);
    assert_eq!(processor.registers.get(T4), 1);
}

#[test]
fn div_writes_quotient_and_remainder() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 7),      // addiu $t0, $zero, 7
        i_type(0x09, ZERO, T1, 0xFFFE), // addiu $t1, $zero, -2
        r_type(T0, T1, 0, 0, 0x1A),     // div $t0, $t1
        r_type(0, 0, T2, 0, 0x12),      // mflo $t2
        r_type(0, 0, T3, 0, 0x10),      // mfhi $t3
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T2) as i32, -3);
    assert_eq!(processor.registers.get(T3) as i32, 1);
}

#[test]
fn division_by_zero_is_not_fatal() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 3),  // addiu $t0, $zero, 3
        r_type(T0, T0, 0, 0, 0x18), // mult $t0, $t0
        r_type(T0, ZERO, 0, 0, 0x1A), // div $t0, $zero
        r_type(0, 0, T1, 0, 0x12),  // mflo $t1
        r_type(0, 0, T2, 0, 0x10),  // mfhi $t2
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    // HI/LO keep their previous values
    assert_eq!(processor.registers.get(T1), 9);
    assert_eq!(processor.registers.get(T2), 0);
}

#[test]
fn beq_taken_skips_and_bne_falls_through() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 5), // addiu $t0, $zero, 5
        i_type(0x09, ZERO, T1, 5), // addiu $t1, $zero, 5
        i_type(0x04, T0, T1, 2),   // beq $t0, $t1, +2
        i_type(0x09, ZERO, T2, 1), // addiu $t2, $zero, 1 (skipped)
        i_type(0x09, ZERO, T3, 1), // addiu $t3, $zero, 1 (skipped)
        i_type(0x05, T0, T1, 2),   // bne $t0, $t1, +2
        i_type(0x09, ZERO, T4, 1), // addiu $t4, $zero, 1 (executes)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0);
    assert_eq!(processor.registers.get(T3), 0);
    assert_eq!(processor.registers.get(T4), 1);
}

#[test]
fn blez_and_bgtz_test_the_sign() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 0xFFFF), // addiu $t0, $zero, -1
        i_type(0x06, T0, ZERO, 1),      // blez $t0, +1 (taken)
        i_type(0x09, ZERO, T1, 1),      // addiu $t1, $zero, 1 (skipped)
        i_type(0x07, T0, ZERO, 1),      // bgtz $t0, +1 (not taken)
        i_type(0x09, ZERO, T2, 2),      // addiu $t2, $zero, 2 (executes)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T1), 0);
    assert_eq!(processor.registers.get(T2), 2);
}

#[test]
fn regimm_branches_link_and_dispatch_on_rt() {
    let mut program = vec![
        i_type(0x09, ZERO, T0, 0xFFFF), // addiu $t0, $zero, -1
        i_type(0x01, T0, 0x10, 1),      // bltzal $t0, +1 (taken, links)
        i_type(0x09, ZERO, T1, 1),      // addiu $t1, $zero, 1 (skipped)
        i_type(0x01, T0, 0x01, 1),      // bgez $t0, +1 (not taken)
        i_type(0x09, ZERO, T2, 2),      // addiu $t2, $zero, 2 (executes)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T1), 0);
    assert_eq!(processor.registers.get(T2), 2);
    // The link register points two words past the branch
    assert_eq!(processor.registers.get(RA), TEXT_BASE + 3 * 4);
}

#[test]
fn jump_target_composition() {
    let mut program = vec![
        j_type(0x02, TEXT_BASE + 0x10), // j past the next three words
        i_type(0x09, ZERO, T0, 1),      // skipped
        i_type(0x09, ZERO, T0, 2),      // skipped
        i_type(0x09, ZERO, T0, 3),      // skipped
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    processor.step().unwrap();
    assert_eq!(processor.program_counter, TEXT_BASE + 0x10);

    run(&mut processor);
    assert_eq!(processor.registers.get(T0), 0);
}

#[test]
fn jal_links_and_jr_returns() {
    let program = vec![
        j_type(0x03, TEXT_BASE + 0x18), // jal subroutine
        i_type(0x09, ZERO, T0, 1),      // addiu $t0, $zero, 1 (skipped)
        i_type(0x09, ZERO, T1, 2),      // addiu $t1, $zero, 2 (return lands here)
        i_type(0x0D, ZERO, V0, 10),     // ori $v0, $zero, 10
        r_type(0, 0, 0, 0, 0x0C),       // syscall
        0,                              // nop
        i_type(0x09, ZERO, T2, 9),      // subroutine: addiu $t2, $zero, 9
        r_type(RA, 0, 0, 0, 0x08),      // jr $ra
    ];
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(RA), TEXT_BASE + 8);
    assert_eq!(processor.registers.get(T0), 0);
    assert_eq!(processor.registers.get(T1), 2);
    assert_eq!(processor.registers.get(T2), 9);
}

#[test]
fn word_store_load_round_trip() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0x1000), // lui $t0, 0x1000
        i_type(0x0F, ZERO, T1, 0xCAFE), // lui $t1, 0xCAFE
        i_type(0x0D, T1, T1, 0xBABE),   // ori $t1, $t1, 0xBABE
        i_type(0x2B, T0, T1, 4),        // sw $t1, 4($t0)
        i_type(0x23, T0, T2, 4),        // lw $t2, 4($t0)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);
    processor.memory.map_region(DATA_BASE, 16, &[]).unwrap();

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0xCAFEBABE);
    assert_eq!(processor.memory.get_word(DATA_BASE + 4).unwrap(), 0xCAFEBABE);
}

#[test]
fn lb_sign_extends_each_lane() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0x1000), // lui $t0, 0x1000
        i_type(0x09, ZERO, T1, 0xFF),   // addiu $t1, $zero, 0xFF
        i_type(0x2B, T0, T1, 0),        // sw $t1, 0($t0)
        i_type(0x20, T0, T2, 0),        // lb $t2, 0($t0)
        i_type(0x20, T0, T3, 1),        // lb $t3, 1($t0)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);
    processor.memory.map_region(DATA_BASE, 16, &[]).unwrap();

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0xFFFFFFFF);
    assert_eq!(processor.registers.get(T3), 0);
}

#[test]
fn sb_replaces_a_single_lane() {
    let mut program = vec![
        i_type(0x0F, ZERO, T0, 0x1000), // lui $t0, 0x1000
        i_type(0x09, ZERO, T1, 0xAA),   // addiu $t1, $zero, 0xAA
        i_type(0x28, T0, T1, 2),        // sb $t1, 2($t0)
        i_type(0x23, T0, T2, 0),        // lw $t2, 0($t0)
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);
    processor
        .memory
        .map_region(DATA_BASE, 16, &[0x11, 0x22, 0x33, 0x44])
        .unwrap();

    run(&mut processor);

    assert_eq!(processor.registers.get(T2), 0x44AA2211);
}

#[test]
fn register_zero_is_a_sink() {
    let mut program = vec![
        i_type(0x09, ZERO, ZERO, 5), // addiu $zero, $zero, 5
        i_type(0x0F, ZERO, ZERO, 5), // lui $zero, 5
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(ZERO), 0);
}

#[test]
fn load_from_unmapped_address_faults() {
    let program = vec![
        i_type(0x23, ZERO, T0, 0), // lw $t0, 0($zero)
    ];
    let mut processor = processor_with_program(&program);

    match run_until_error(&mut processor) {
        SimulationError::UnmappedAddress(0) => {}
        other => panic!("expected unmapped fault, got {}", other),
    }
}

#[test]
fn misaligned_load_faults() {
    let program = vec![
        i_type(0x0F, ZERO, T0, 0x40), // lui $t0, 0x40
        i_type(0x23, T0, T1, 2),      // lw $t1, 2($t0)
    ];
    let mut processor = processor_with_program(&program);

    match run_until_error(&mut processor) {
        SimulationError::MisalignedAddress(0x00400002) => {}
        other => panic!("expected misaligned fault, got {}", other),
    }
}

#[test]
fn unknown_op_code_faults() {
    let mut processor = processor_with_program(&[0xFC000000]);

    match run_until_error(&mut processor) {
        SimulationError::UnknownOpCode(0x3F) => {}
        other => panic!("expected unknown op code, got {}", other),
    }
}

#[test]
fn unknown_r_type_function_faults() {
    let mut processor = processor_with_program(&[r_type(0, 0, 0, 0, 0x3F)]);

    match run_until_error(&mut processor) {
        SimulationError::UnknownFunction(0x3F) => {}
        other => panic!("expected unknown function, got {}", other),
    }
}

#[test]
fn unknown_branch_condition_faults() {
    let mut processor = processor_with_program(&[i_type(0x01, T0, 0x05, 1)]);

    match run_until_error(&mut processor) {
        SimulationError::UnknownBranchCondition(0x05) => {}
        other => panic!("expected unknown branch condition, got {}", other),
    }
}

#[test]
fn exit_syscall_stops_the_processor() {
    let program = exit_sequence();
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert!(!processor.running);
    // The exit syscall still performs its PC update
    assert_eq!(processor.program_counter, TEXT_BASE + 2 * 4);
}

#[test]
fn unknown_syscall_is_skipped() {
    let mut program = vec![
        i_type(0x0D, ZERO, V0, 99), // ori $v0, $zero, 99
        r_type(0, 0, 0, 0, 0x0C),   // syscall (unknown, skipped)
        i_type(0x09, ZERO, T0, 7),  // addiu $t0, $zero, 7
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(T0), 7);
}

#[test]
fn print_int_scenario() {
    // addiu $a0, $zero, 7; addiu $a0, $a0, 35; print_int; exit
    let mut program = vec![
        i_type(0x09, ZERO, A0, 7),
        i_type(0x09, A0, A0, 35),
        i_type(0x0D, ZERO, V0, 1),
        r_type(0, 0, 0, 0, 0x0C),
    ];
    program.extend(exit_sequence());
    let mut processor = processor_with_program(&program);

    run(&mut processor);

    assert_eq!(processor.registers.get(A0), 42);
    assert!(!processor.running);
}
