use crate::constants::{
    FUNCTION_ADD, FUNCTION_ADDU, FUNCTION_AND, FUNCTION_DIV, FUNCTION_DIVU, FUNCTION_JR,
    FUNCTION_MFHI, FUNCTION_MFLO, FUNCTION_MULT, FUNCTION_MULTU, FUNCTION_OR, FUNCTION_SLL,
    FUNCTION_SLLV, FUNCTION_SLT, FUNCTION_SLTU, FUNCTION_SRA, FUNCTION_SRL, FUNCTION_SRLV,
    FUNCTION_SUB, FUNCTION_SUBU, FUNCTION_SYSCALL, FUNCTION_XOR, OP_ADDI, OP_ADDIU, OP_ANDI,
    OP_BEQ, OP_BGTZ, OP_BLEZ, OP_BNE, OP_J, OP_JAL, OP_LB, OP_LUI, OP_LW, OP_ORI, OP_REGIMM,
    OP_R_TYPE, OP_SB, OP_SLTI, OP_SLTIU, OP_SW, OP_XORI, REG_SP, STACK_BASE, STACK_SIZE,
};
use crate::elf::ElfExecutable;
use crate::error::SimulationError;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::registers::Registers;

/// A MIPS processor
#[derive(Debug)]
pub struct Processor {
    pub registers: Registers,
    pub program_counter: u32,
    pub memory: Memory,
    pub running: bool,
}

impl Processor {
    pub fn new() -> Self {
        Processor {
            registers: Registers::new(),
            memory: Memory::new(),
            program_counter: 0,
            running: true,
        }
    }

    /// Map an executable's loadable segments, reserve the stack, and point
    /// the processor at the entry point
    pub fn load_executable(&mut self, executable: &ElfExecutable) -> Result<(), SimulationError> {
        for segment in &executable.segments {
            info!(
                "Mapping 0x{:x} bytes of virtual memory at address 0x{:08x}",
                segment.mem_size, segment.vaddr
            );
            self.memory
                .map_region(segment.vaddr, segment.mem_size, &segment.data)?;
        }

        info!(
            "Mapping 0x{:x} bytes of virtual memory for stack at address 0x{:08x}",
            STACK_SIZE, STACK_BASE
        );
        self.memory.map_region(STACK_BASE, STACK_SIZE, &[])?;
        self.registers.set(REG_SP, STACK_BASE + STACK_SIZE - 4);

        info!("Virtual address of entry point is 0x{:08x}", executable.entry);
        self.set_entry(executable.entry);
        Ok(())
    }

    pub fn set_entry(&mut self, address: u32) {
        self.program_counter = address;
    }

    /// Fetch, decode, and execute one instruction
    pub fn step(&mut self) -> Result<(), SimulationError> {
        let instruction = Instruction(self.memory.get_word(self.program_counter)?);
        self.execute(instruction)
    }

    /// Advance past the current instruction. Every non-control-flow handler
    /// ends with this; control-flow handlers assign the PC themselves.
    pub(crate) fn advance_program_counter(&mut self) {
        self.program_counter = self.program_counter.wrapping_add(4);
    }

    /// Set the PC to a jump or branch target
    pub(crate) fn jump_to(&mut self, address: u32) {
        self.program_counter = address;
    }

    pub fn execute(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        match instruction.op_code() {
            OP_R_TYPE => match instruction.function() {
                FUNCTION_SLL => self.op_sll(instruction),
                FUNCTION_SRL => self.op_srl(instruction),
                FUNCTION_SRA => self.op_sra(instruction),
                FUNCTION_SLLV => self.op_sllv(instruction),
                FUNCTION_SRLV => self.op_srlv(instruction),
                FUNCTION_JR => self.op_jr(instruction),
                FUNCTION_SYSCALL => return self.op_syscall(),
                FUNCTION_MFHI => self.op_mfhi(instruction),
                FUNCTION_MFLO => self.op_mflo(instruction),
                FUNCTION_MULT => self.op_mult(instruction),
                FUNCTION_MULTU => self.op_multu(instruction),
                FUNCTION_DIV => self.op_div(instruction),
                FUNCTION_DIVU => self.op_divu(instruction),
                FUNCTION_ADD => self.op_add(instruction),
                FUNCTION_ADDU => self.op_addu(instruction),
                FUNCTION_SUB => self.op_sub(instruction),
                FUNCTION_SUBU => self.op_subu(instruction),
                FUNCTION_AND => self.op_and(instruction),
                FUNCTION_OR => self.op_or(instruction),
                FUNCTION_XOR => self.op_xor(instruction),
                FUNCTION_SLT => self.op_slt(instruction),
                FUNCTION_SLTU => self.op_sltu(instruction),
                function => return Err(SimulationError::UnknownFunction(function)),
            },
            OP_REGIMM => return self.op_regimm(instruction),
            OP_J => self.op_j(instruction),
            OP_JAL => self.op_jal(instruction),
            OP_BEQ => self.op_beq(instruction),
            OP_BNE => self.op_bne(instruction),
            OP_BLEZ => self.op_blez(instruction),
            OP_BGTZ => self.op_bgtz(instruction),
            OP_ADDI => self.op_addi(instruction),
            OP_ADDIU => self.op_addiu(instruction),
            OP_SLTI => self.op_slti(instruction),
            OP_SLTIU => self.op_sltiu(instruction),
            OP_ANDI => self.op_andi(instruction),
            OP_ORI => self.op_ori(instruction),
            OP_XORI => self.op_xori(instruction),
            OP_LUI => self.op_lui(instruction),
            OP_LB => return self.op_lb(instruction),
            OP_LW => return self.op_lw(instruction),
            OP_SB => return self.op_sb(instruction),
            OP_SW => return self.op_sw(instruction),
            op_code => return Err(SimulationError::UnknownOpCode(op_code)),
        }

        Ok(())
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}
