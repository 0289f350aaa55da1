use crate::instruction::Instruction;
use crate::Processor;

impl Processor {
    /// Shift left logical
    pub(crate) fn op_sll(&mut self, instruction: Instruction) {
        if instruction.0 == 0 {
            // noop
            self.advance_program_counter();
            return;
        }

        debug!(
            "sll ${}, ${}, {}",
            instruction.d_register(),
            instruction.t_register(),
            instruction.shift_amount()
        );
        let value = self.registers.get(instruction.t_register()) << instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Shift right logical
    pub(crate) fn op_srl(&mut self, instruction: Instruction) {
        debug!(
            "srl ${}, ${}, {}",
            instruction.d_register(),
            instruction.t_register(),
            instruction.shift_amount()
        );
        let value = self.registers.get(instruction.t_register()) >> instruction.shift_amount();
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Shift right arithmetic (sign-preserving)
    pub(crate) fn op_sra(&mut self, instruction: Instruction) {
        debug!(
            "sra ${}, ${}, {}",
            instruction.d_register(),
            instruction.t_register(),
            instruction.shift_amount()
        );
        let value =
            (self.registers.get(instruction.t_register()) as i32) >> instruction.shift_amount();
        self.registers.set(instruction.d_register(), value as u32);
        self.advance_program_counter()
    }

    /// Shift left logical variable. Only the low 5 bits of $s count.
    pub(crate) fn op_sllv(&mut self, instruction: Instruction) {
        debug!(
            "sllv ${}, ${}, ${}",
            instruction.d_register(),
            instruction.t_register(),
            instruction.s_register()
        );
        let amount = self.registers.get(instruction.s_register()) & 0x1F;
        let value = self.registers.get(instruction.t_register()) << amount;
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Shift right logical variable
    pub(crate) fn op_srlv(&mut self, instruction: Instruction) {
        debug!(
            "srlv ${}, ${}, ${}",
            instruction.d_register(),
            instruction.t_register(),
            instruction.s_register()
        );
        let amount = self.registers.get(instruction.s_register()) & 0x1F;
        let value = self.registers.get(instruction.t_register()) >> amount;
        self.registers.set(instruction.d_register(), value);
        self.advance_program_counter()
    }

    /// Jump register
    pub(crate) fn op_jr(&mut self, instruction: Instruction) {
        let address = self.registers.get(instruction.s_register());
        debug!("jr ${} (0x{:08x})", instruction.s_register(), address);
        self.jump_to(address);
    }

    /// Move from HI
    pub(crate) fn op_mfhi(&mut self, instruction: Instruction) {
        debug!("mfhi ${}", instruction.d_register());
        self.registers
            .set(instruction.d_register(), self.registers.hi_register);
        self.advance_program_counter();
    }

    /// Move from LO
    pub(crate) fn op_mflo(&mut self, instruction: Instruction) {
        debug!("mflo ${}", instruction.d_register());
        self.registers
            .set(instruction.d_register(), self.registers.lo_register);
        self.advance_program_counter();
    }

    /// Multiply signed. The 64-bit product is split across HI:LO.
    pub(crate) fn op_mult(&mut self, instruction: Instruction) {
        debug!(
            "mult ${}, ${}",
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register()) as i32 as i64;
        let t = self.registers.get(instruction.t_register()) as i32 as i64;
        let product = (s * t) as u64;

        self.registers.hi_register = (product >> 32) as u32;
        self.registers.lo_register = product as u32;
        self.advance_program_counter();
    }

    /// Multiply unsigned
    pub(crate) fn op_multu(&mut self, instruction: Instruction) {
        debug!(
            "multu ${}, ${}",
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register()) as u64;
        let t = self.registers.get(instruction.t_register()) as u64;
        let product = s * t;

        self.registers.hi_register = (product >> 32) as u32;
        self.registers.lo_register = product as u32;
        self.advance_program_counter();
    }

    /// Divide signed: quotient to LO, remainder to HI. Division by zero
    /// leaves HI/LO unchanged.
    pub(crate) fn op_div(&mut self, instruction: Instruction) {
        debug!(
            "div ${}, ${}",
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register()) as i32;
        let t = self.registers.get(instruction.t_register()) as i32;

        if t == 0 {
            warn!("division by zero at 0x{:08x}", self.program_counter);
        } else {
            self.registers.lo_register = s.wrapping_div(t) as u32;
            self.registers.hi_register = s.wrapping_rem(t) as u32;
        }

        self.advance_program_counter();
    }

    /// Divide unsigned
    pub(crate) fn op_divu(&mut self, instruction: Instruction) {
        debug!(
            "divu ${}, ${}",
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());

        if t == 0 {
            warn!("division by zero at 0x{:08x}", self.program_counter);
        } else {
            self.registers.lo_register = s / t;
            self.registers.hi_register = s % t;
        }

        self.advance_program_counter();
    }

    /// Add. Overflow wraps silently.
    pub(crate) fn op_add(&mut self, instruction: Instruction) {
        debug!(
            "add ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_add(b));
        self.advance_program_counter();
    }

    /// Add unsigned
    pub(crate) fn op_addu(&mut self, instruction: Instruction) {
        debug!(
            "addu ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_add(b));
        self.advance_program_counter();
    }

    /// Subtract. Overflow wraps silently.
    pub(crate) fn op_sub(&mut self, instruction: Instruction) {
        debug!(
            "sub ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_sub(b));
        self.advance_program_counter();
    }

    /// Subtract unsigned
    pub(crate) fn op_subu(&mut self, instruction: Instruction) {
        debug!(
            "subu ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), a.wrapping_sub(b));
        self.advance_program_counter();
    }

    /// Bitwise And
    pub(crate) fn op_and(&mut self, instruction: Instruction) {
        debug!(
            "and ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a & b);
        self.advance_program_counter();
    }

    /// Bitwise Or
    pub(crate) fn op_or(&mut self, instruction: Instruction) {
        debug!(
            "or ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a | b);
        self.advance_program_counter();
    }

    /// Bitwise Xor
    pub(crate) fn op_xor(&mut self, instruction: Instruction) {
        debug!(
            "xor ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let a = self.registers.get(instruction.s_register());
        let b = self.registers.get(instruction.t_register());
        self.registers.set(instruction.d_register(), a ^ b);
        self.advance_program_counter();
    }

    /// Set if less than (signed)
    pub(crate) fn op_slt(&mut self, instruction: Instruction) {
        debug!(
            "slt ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register()) as i32;
        let t = self.registers.get(instruction.t_register()) as i32;
        self.registers
            .set(instruction.d_register(), (s < t) as u32);
        self.advance_program_counter();
    }

    /// Set if less than (unsigned)
    pub(crate) fn op_sltu(&mut self, instruction: Instruction) {
        debug!(
            "sltu ${}, ${}, ${}",
            instruction.d_register(),
            instruction.s_register(),
            instruction.t_register()
        );
        let s = self.registers.get(instruction.s_register());
        let t = self.registers.get(instruction.t_register());
        self.registers
            .set(instruction.d_register(), (s < t) as u32);
        self.advance_program_counter();
    }
}
