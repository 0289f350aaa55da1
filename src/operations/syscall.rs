use crate::constants::{
    REG_A0, REG_A1, REG_V0, SYSCALL_EXIT, SYSCALL_PRINT_INT, SYSCALL_PRINT_STR, SYSCALL_READ_INT,
    SYSCALL_READ_STR,
};
use crate::error::SimulationError;
use crate::Processor;
use std::io;
use std::io::Write;

impl Processor {
    /// Dispatch on the syscall number in $v0. Unknown numbers are logged and
    /// skipped; the program continues at the next instruction either way.
    pub(crate) fn op_syscall(&mut self) -> Result<(), SimulationError> {
        let operation = self.registers.get(REG_V0);
        debug!("syscall {}", operation);

        match operation {
            SYSCALL_PRINT_INT => self.syscall_print_int()?,
            SYSCALL_PRINT_STR => self.syscall_print_str()?,
            SYSCALL_READ_INT => self.syscall_read_int()?,
            SYSCALL_READ_STR => self.syscall_read_str()?,
            SYSCALL_EXIT => {
                info!("Program exited via syscall");
                self.running = false;
            }
            _ => warn!("unknown syscall operation {}", operation),
        }

        self.advance_program_counter();
        Ok(())
    }

    /// Print $a0 as a signed decimal followed by a newline
    fn syscall_print_int(&mut self) -> Result<(), SimulationError> {
        let value = self.registers.get(REG_A0) as i32;
        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        writeln!(stdout, "{}", value)?;
        Ok(())
    }

    /// Print the NUL-terminated guest string at $a0
    ///
    /// The guest pointer is never handed to the host; the bytes are walked
    /// through simulated memory one at a time.
    fn syscall_print_str(&mut self) -> Result<(), SimulationError> {
        let str_address = self.registers.get(REG_A0);
        let bytes = self.memory.get_str(str_address)?;

        let stdout = io::stdout();
        let mut stdout = stdout.lock();
        stdout.write_all(&bytes)?;
        // Prompts often end without a newline; make them visible before a
        // blocking read
        stdout.flush()?;
        Ok(())
    }

    /// Read a signed decimal integer from stdin into $v0
    fn syscall_read_int(&mut self) -> Result<(), SimulationError> {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;

        let value = match line.trim().parse::<i32>() {
            Ok(value) => value,
            Err(_) => {
                warn!("read_int: {:?} is not a valid integer", line.trim());
                0
            }
        };

        self.registers.set(REG_V0, value as u32);
        Ok(())
    }

    /// Read a line from stdin into guest memory at $a0, copying at most
    /// $a1 - 1 bytes and NUL-terminating
    fn syscall_read_str(&mut self) -> Result<(), SimulationError> {
        let buffer_address = self.registers.get(REG_A0);
        let buffer_len = self.registers.get(REG_A1);

        if buffer_len == 0 {
            // No room for even the terminator
            return Ok(());
        }

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;

        let count = line.len().min(buffer_len as usize - 1);
        for (i, byte) in line.as_bytes()[..count].iter().enumerate() {
            self.memory.set_byte(buffer_address + i as u32, *byte)?;
        }
        self.memory.set_byte(buffer_address + count as u32, 0)?;

        Ok(())
    }
}
