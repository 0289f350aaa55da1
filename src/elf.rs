//! Parsing of 32-bit little-endian MIPS ELF executables
//!
//! Only the pieces the simulator needs are read: the identification and
//! header fields that gate execution, and the PT_LOAD program headers that
//! become memory regions.

use std::io;
use std::io::{Read, Seek, SeekFrom};

pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;
pub const EI_NIDENT: usize = 16;

/// 32-bit objects
pub const ELF_CLASS_32: u8 = 1;
/// Little-endian data encoding
pub const ELF_DATA_2_LSB: u8 = 1;
/// Executable file
pub const ELF_TYPE_EXEC: u16 = 2;
/// MIPS R3000
pub const ELF_MACHINE_MIPS: u16 = 8;
/// Current object file version
pub const ELF_VERSION_CURRENT: u32 = 1;
/// Loadable program segment
pub const PT_LOAD: u32 = 1;

/// Size of a 32-bit ELF program header entry
pub const PROGRAM_HEADER_SIZE: u16 = 32;

/// The fields of an ELF32 file header the simulator consumes
#[derive(Debug)]
pub struct ElfHeader {
    pub entry: u32,
    pub program_header_offset: u32,
    pub program_header_size: u16,
    pub program_header_count: u16,
}

impl ElfHeader {
    /// Parse and validate the input as the header of a little-endian 32-bit
    /// MIPS executable
    pub fn parse<R: Read>(input: &mut R) -> io::Result<Self> {
        let mut ident = [0u8; EI_NIDENT];
        input.read_exact(&mut ident)?;

        if ident[..4] != ELF_MAGIC {
            return Err(invalid_data("bad ELF magic"));
        }
        if ident[EI_CLASS] != ELF_CLASS_32 {
            return Err(invalid_data("not an ELFCLASS32 file"));
        }
        if ident[EI_DATA] != ELF_DATA_2_LSB {
            return Err(invalid_data("not little endian"));
        }

        let e_type = read_u16(input)?;
        let e_machine = read_u16(input)?;
        let e_version = read_u32(input)?;
        let entry = read_u32(input)?;
        let program_header_offset = read_u32(input)?;
        let _section_header_offset = read_u32(input)?;
        let _flags = read_u32(input)?;
        let _header_size = read_u16(input)?;
        let program_header_size = read_u16(input)?;
        let program_header_count = read_u16(input)?;

        if e_type != ELF_TYPE_EXEC {
            return Err(invalid_data("not an executable file"));
        }
        if e_machine != ELF_MACHINE_MIPS {
            return Err(invalid_data("not a MIPS binary"));
        }
        if e_version != ELF_VERSION_CURRENT {
            return Err(invalid_data("not the right ELF version"));
        }
        if program_header_size != PROGRAM_HEADER_SIZE {
            return Err(invalid_data("invalid program header entry size"));
        }

        Ok(Self {
            entry,
            program_header_offset,
            program_header_size,
            program_header_count,
        })
    }
}

/// An ELF32 program header entry
#[derive(Debug)]
pub struct ProgramHeader {
    pub p_type: u32,
    pub offset: u32,
    pub vaddr: u32,
    pub file_size: u32,
    pub mem_size: u32,
}

impl ProgramHeader {
    pub fn parse<R: Read>(input: &mut R) -> io::Result<Self> {
        let p_type = read_u32(input)?;
        let offset = read_u32(input)?;
        let vaddr = read_u32(input)?;
        let _paddr = read_u32(input)?;
        let file_size = read_u32(input)?;
        let mem_size = read_u32(input)?;
        let _flags = read_u32(input)?;
        let _align = read_u32(input)?;

        Ok(Self {
            p_type,
            offset,
            vaddr,
            file_size,
            mem_size,
        })
    }
}

/// One loadable segment: `mem_size` bytes at `vaddr`, initialized from the
/// leading `data` bytes and zero-padded beyond
#[derive(Debug)]
pub struct ProgramSegment {
    pub vaddr: u32,
    pub mem_size: u32,
    pub data: Vec<u8>,
}

/// A loaded MIPS executable: the entry point plus its loadable segments
#[derive(Debug)]
pub struct ElfExecutable {
    pub entry: u32,
    pub segments: Vec<ProgramSegment>,
}

impl ElfExecutable {
    /// Parse the input as a MIPS ELF executable
    pub fn parse<R: Read + Seek>(input: &mut R) -> io::Result<Self> {
        let header = ElfHeader::parse(input)?;

        let mut program_headers = Vec::with_capacity(header.program_header_count as usize);
        input.seek(SeekFrom::Start(header.program_header_offset as u64))?;
        for _ in 0..header.program_header_count {
            program_headers.push(ProgramHeader::parse(input)?);
        }

        // Non-LOAD headers are skipped so they can never shadow a loadable
        // segment.
        let mut segments = Vec::new();
        for program_header in program_headers {
            if program_header.p_type != PT_LOAD {
                continue;
            }

            let mut data = vec![0u8; program_header.file_size as usize];
            input.seek(SeekFrom::Start(program_header.offset as u64))?;
            input.read_exact(&mut data)?;

            segments.push(ProgramSegment {
                vaddr: program_header.vaddr,
                mem_size: program_header.mem_size,
                data,
            });
        }

        Ok(Self {
            entry: header.entry,
            segments,
        })
    }
}

fn invalid_data(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.to_string())
}

fn read_u16<R: Read>(input: &mut R) -> io::Result<u16> {
    let mut bytes = [0; 2];
    input.read_exact(&mut bytes)?;
    Ok(u16::from_le_bytes(bytes))
}

fn read_u32<R: Read>(input: &mut R) -> io::Result<u32> {
    let mut bytes = [0; 4];
    input.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}
