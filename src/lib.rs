#[macro_use]
extern crate log;

mod constants;
mod instruction;
mod math;
mod memory;
mod operations;
mod processor;
mod registers;

pub mod elf;
pub mod error;

pub use {instruction::*, memory::*, processor::*, registers::*};
