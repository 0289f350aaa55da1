use std::io;
use thiserror::Error;

/// A fatal simulation fault. Any of these ends the simulation with a
/// non-zero exit status.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("SEGFAULT: attempted to access nonexistent virtual address 0x{0:08x}")]
    UnmappedAddress(u32),

    #[error("SEGFAULT: address 0x{0:08x} is not aligned")]
    MisalignedAddress(u32),

    #[error("region at 0x{vaddr:08x} (0x{len:x} bytes) overlaps an existing region")]
    OverlappingRegion { vaddr: u32, len: u32 },

    #[error("unknown op code 0x{0:02x}")]
    UnknownOpCode(u8),

    #[error("unknown R-type function 0x{0:02x}")]
    UnknownFunction(u8),

    #[error("unknown branch condition 0x{0:02x}")]
    UnknownBranchCondition(u8),

    #[error(transparent)]
    Io(#[from] io::Error),
}
