use crate::error::SimulationError;
use std::cmp::Ordering;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// One contiguous region of virtual memory (corresponds to an ELF program
/// header, or the stack reservation).
///
/// Backing storage is addressed as 32-bit words, so a region's length in
/// bytes is always a multiple of 4.
pub struct Region {
    vaddr: u32,
    data: Vec<u32>,
}

impl Region {
    fn len(&self) -> u32 {
        (self.data.len() * 4) as u32
    }

    fn contains(&self, address: u32) -> bool {
        address >= self.vaddr && address - self.vaddr < self.len()
    }
}

/// An implementation of region-based virtual memory
///
/// Regions are disjoint and kept ordered by base address, so containment
/// lookup is a binary search. Word access off the end of every region or at
/// a misaligned offset is a fault.
#[derive(Default)]
pub struct Memory {
    regions: Vec<Region>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a new region of `len` bytes at `vaddr`, initialized from `init`
    /// and zero-padded beyond it. The length rounds up to a whole number of
    /// words. The region must not overlap any existing region.
    pub fn map_region(&mut self, vaddr: u32, len: u32, init: &[u8]) -> Result<(), SimulationError> {
        let len = len.max(init.len() as u32);
        let word_count = ((len + 3) / 4) as usize;
        let mut data = vec![0u32; word_count];

        for (i, chunk) in init.chunks(4).enumerate() {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            data[i] = u32::from_le_bytes(bytes);
        }

        let region = Region { vaddr, data };
        let index = self
            .regions
            .partition_point(|existing| existing.vaddr < vaddr);

        let overlaps_next = self
            .regions
            .get(index)
            .map_or(false, |next| region.contains(next.vaddr));
        let overlaps_previous = index
            .checked_sub(1)
            .map_or(false, |i| self.regions[i].contains(vaddr));

        if overlaps_next || overlaps_previous {
            return Err(SimulationError::OverlappingRegion {
                vaddr,
                len: region.len(),
            });
        }

        self.regions.insert(index, region);
        Ok(())
    }

    /// Get the word (4 bytes) at the address
    ///
    /// The address must fall inside a region and be word-aligned relative to
    /// the region base.
    pub fn get_word(&self, address: u32) -> Result<u32, SimulationError> {
        let region = self.find_region(address)?;
        let offset = address - region.vaddr;

        if offset & 3 != 0 {
            return Err(SimulationError::MisalignedAddress(address));
        }

        Ok(region.data[(offset / 4) as usize])
    }

    /// Set the word (4 bytes) at the address
    pub fn set_word(&mut self, address: u32, value: u32) -> Result<(), SimulationError> {
        let region = self.find_region_mut(address)?;
        let offset = address - region.vaddr;

        if offset & 3 != 0 {
            return Err(SimulationError::MisalignedAddress(address));
        }

        region.data[(offset / 4) as usize] = value;
        Ok(())
    }

    /// Get the byte at the address
    ///
    /// Byte access decomposes into an aligned word read: the byte at
    /// address `a` is lane `a % 4` of the word at `a & !3` (little-endian,
    /// lane 0 is bits [7:0]).
    pub fn get_byte(&self, address: u32) -> Result<u8, SimulationError> {
        let word = self.get_word(address & !3)?;
        Ok((word >> (8 * (address & 3))) as u8)
    }

    /// Set the byte at the address by read-modify-write of its word
    pub fn set_byte(&mut self, address: u32, value: u8) -> Result<(), SimulationError> {
        let word = self.get_word(address & !3)?;
        let shift = 8 * (address & 3);
        let word = (word & !(0xFF << shift)) | ((value as u32) << shift);
        self.set_word(address & !3, word)
    }

    /// Get a NUL-terminated byte string starting from the address. The
    /// terminator is not included.
    pub fn get_str(&self, address: u32) -> Result<Vec<u8>, SimulationError> {
        let mut bytes = Vec::new();

        for i in address.. {
            let byte = self.get_byte(i)?;

            if byte == 0 {
                break;
            }

            bytes.push(byte);
        }

        Ok(bytes)
    }

    fn find_region(&self, address: u32) -> Result<&Region, SimulationError> {
        self.region_index(address)
            .map(|index| &self.regions[index])
            .ok_or(SimulationError::UnmappedAddress(address))
    }

    fn find_region_mut(&mut self, address: u32) -> Result<&mut Region, SimulationError> {
        let index = self
            .region_index(address)
            .ok_or(SimulationError::UnmappedAddress(address))?;
        Ok(&mut self.regions[index])
    }

    fn region_index(&self, address: u32) -> Option<usize> {
        self.regions
            .binary_search_by(|region| {
                if address < region.vaddr {
                    Ordering::Greater
                } else if region.contains(address) {
                    Ordering::Equal
                } else {
                    Ordering::Less
                }
            })
            .ok()
    }
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Memory({} regions)", self.regions.len())
    }
}
