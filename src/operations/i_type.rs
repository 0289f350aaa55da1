use crate::error::SimulationError;
use crate::instruction::Instruction;
use crate::math::add_unsigned;
use crate::Processor;

impl Processor {
    /// The target of a conditional branch: the instruction after the branch
    /// plus the sign-extended immediate in words
    pub(crate) fn branch_target(&self, instruction: Instruction) -> u32 {
        let offset = (instruction.immediate() as i32) << 2;
        add_unsigned(self.program_counter.wrapping_add(4), offset)
    }

    /// Resolve a conditional branch: jump to the target when taken,
    /// otherwise fall through
    pub(crate) fn branch_if(&mut self, taken: bool, target: u32) {
        if taken {
            self.jump_to(target);
        } else {
            self.advance_program_counter();
        }
    }

    pub(crate) fn op_beq(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!(
            "beq ${}, ${}, 0x{:08x}",
            instruction.s_register(),
            instruction.t_register(),
            target
        );
        let s_value = self.registers.get(instruction.s_register());
        let t_value = self.registers.get(instruction.t_register());
        self.branch_if(s_value == t_value, target);
    }

    pub(crate) fn op_bne(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!(
            "bne ${}, ${}, 0x{:08x}",
            instruction.s_register(),
            instruction.t_register(),
            target
        );
        let s_value = self.registers.get(instruction.s_register());
        let t_value = self.registers.get(instruction.t_register());
        self.branch_if(s_value != t_value, target);
    }

    pub(crate) fn op_blez(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("blez ${}, 0x{:08x}", instruction.s_register(), target);
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value <= 0, target);
    }

    pub(crate) fn op_bgtz(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("bgtz ${}, 0x{:08x}", instruction.s_register(), target);
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value > 0, target);
    }

    /// Add immediate. Overflow wraps silently.
    pub(crate) fn op_addi(&mut self, instruction: Instruction) {
        debug!(
            "addi ${}, ${}, {}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate()
        );
        let value = add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        );
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter()
    }

    /// Add immediate unsigned
    pub(crate) fn op_addiu(&mut self, instruction: Instruction) {
        debug!(
            "addiu ${}, ${}, {}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate()
        );
        let value = add_unsigned(
            self.registers.get(instruction.s_register()),
            instruction.immediate() as i32,
        );
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter()
    }

    /// Set if less than immediate (signed)
    pub(crate) fn op_slti(&mut self, instruction: Instruction) {
        debug!(
            "slti ${}, ${}, {}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate()
        );
        let s_value = self.registers.get(instruction.s_register()) as i32;
        let immediate = instruction.immediate() as i32;
        self.registers
            .set(instruction.t_register(), (s_value < immediate) as u32);
        self.advance_program_counter();
    }

    /// Set if less than immediate unsigned. The immediate sign-extends to 32
    /// bits first, then both sides compare as unsigned.
    pub(crate) fn op_sltiu(&mut self, instruction: Instruction) {
        debug!(
            "sltiu ${}, ${}, {}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate()
        );
        let s_value = self.registers.get(instruction.s_register());
        let immediate = instruction.immediate() as i32 as u32;
        self.registers
            .set(instruction.t_register(), (s_value < immediate) as u32);
        self.advance_program_counter();
    }

    /// And immediate (zero-extended)
    pub(crate) fn op_andi(&mut self, instruction: Instruction) {
        debug!(
            "andi ${}, ${}, 0x{:x}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate_unsigned()
        );
        let a = self.registers.get(instruction.s_register());
        self.registers
            .set(instruction.t_register(), a & instruction.immediate_unsigned());
        self.advance_program_counter();
    }

    /// Or immediate (zero-extended)
    pub(crate) fn op_ori(&mut self, instruction: Instruction) {
        debug!(
            "ori ${}, ${}, 0x{:x}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate_unsigned()
        );
        let a = self.registers.get(instruction.s_register());
        self.registers
            .set(instruction.t_register(), a | instruction.immediate_unsigned());
        self.advance_program_counter();
    }

    /// Xor immediate (zero-extended)
    pub(crate) fn op_xori(&mut self, instruction: Instruction) {
        debug!(
            "xori ${}, ${}, 0x{:x}",
            instruction.t_register(),
            instruction.s_register(),
            instruction.immediate_unsigned()
        );
        let a = self.registers.get(instruction.s_register());
        self.registers
            .set(instruction.t_register(), a ^ instruction.immediate_unsigned());
        self.advance_program_counter();
    }

    /// Load upper immediate
    pub(crate) fn op_lui(&mut self, instruction: Instruction) {
        debug!(
            "lui ${}, 0x{:x}",
            instruction.t_register(),
            instruction.immediate_unsigned()
        );
        let value = instruction.immediate_unsigned() << 16;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
    }

    /// Load byte (sign-extended)
    pub(crate) fn op_lb(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        debug!(
            "lb ${}, {}(${})",
            instruction.t_register(),
            instruction.immediate(),
            instruction.s_register()
        );
        let s_address = self.registers.get(instruction.s_register());
        let address = add_unsigned(s_address, instruction.immediate() as i32);
        let byte = self.memory.get_byte(address)?;
        self.registers
            .set(instruction.t_register(), byte as i8 as i32 as u32);
        self.advance_program_counter();
        Ok(())
    }

    /// Load word
    pub(crate) fn op_lw(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        debug!(
            "lw ${}, {}(${})",
            instruction.t_register(),
            instruction.immediate(),
            instruction.s_register()
        );
        let s_address = self.registers.get(instruction.s_register());
        let value = self
            .memory
            .get_word(add_unsigned(s_address, instruction.immediate() as i32))?;
        self.registers.set(instruction.t_register(), value);
        self.advance_program_counter();
        Ok(())
    }

    /// Store byte (read-modify-write of the containing word)
    pub(crate) fn op_sb(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        debug!(
            "sb ${}, {}(${})",
            instruction.t_register(),
            instruction.immediate(),
            instruction.s_register()
        );
        let s_address = self.registers.get(instruction.s_register());
        let address = add_unsigned(s_address, instruction.immediate() as i32);
        let value = self.registers.get(instruction.t_register()) as u8;
        self.memory.set_byte(address, value)?;
        self.advance_program_counter();
        Ok(())
    }

    /// Store word
    pub(crate) fn op_sw(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        debug!(
            "sw ${}, {}(${})",
            instruction.t_register(),
            instruction.immediate(),
            instruction.s_register()
        );
        let s_address = self.registers.get(instruction.s_register());
        let address = add_unsigned(s_address, instruction.immediate() as i32);
        let value = self.registers.get(instruction.t_register());
        self.memory.set_word(address, value)?;
        self.advance_program_counter();
        Ok(())
    }
}
