use crate::constants::{REGIMM_BGEZ, REGIMM_BGEZAL, REGIMM_BLTZ, REGIMM_BLTZAL, REG_RA};
use crate::error::SimulationError;
use crate::instruction::Instruction;
use crate::Processor;

/// The REGIMM opcode family: branch-on-sign instructions whose secondary
/// dispatch is on the rt field.
impl Processor {
    pub(crate) fn op_regimm(&mut self, instruction: Instruction) -> Result<(), SimulationError> {
        match instruction.t_register() {
            REGIMM_BLTZ => self.op_bltz(instruction),
            REGIMM_BGEZ => self.op_bgez(instruction),
            REGIMM_BLTZAL => self.op_bltzal(instruction),
            REGIMM_BGEZAL => self.op_bgezal(instruction),
            condition => return Err(SimulationError::UnknownBranchCondition(condition)),
        }

        Ok(())
    }

    fn op_bltz(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("bltz ${}, 0x{:08x}", instruction.s_register(), target);
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value < 0, target);
    }

    fn op_bgez(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("bgez ${}, 0x{:08x}", instruction.s_register(), target);
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value >= 0, target);
    }

    /// Branch on less than zero and link. The link register is written
    /// whether or not the branch is taken.
    fn op_bltzal(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("bltzal ${}, 0x{:08x}", instruction.s_register(), target);
        self.registers
            .set(REG_RA, self.program_counter.wrapping_add(8));
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value < 0, target);
    }

    /// Branch on greater than or equal to zero and link
    fn op_bgezal(&mut self, instruction: Instruction) {
        let target = self.branch_target(instruction);
        debug!("bgezal ${}, 0x{:08x}", instruction.s_register(), target);
        self.registers
            .set(REG_RA, self.program_counter.wrapping_add(8));
        let s_value = self.registers.get(instruction.s_register()) as i32;
        self.branch_if(s_value >= 0, target);
    }
}
