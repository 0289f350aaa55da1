use env_logger::Env;
use mipsim::elf::ElfExecutable;
use mipsim::Processor;
use std::error::Error;
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
struct CliArgs {
    /// Path to a little-endian 32-bit MIPS ELF executable
    #[structopt(parse(from_os_str))]
    file_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Setup logging and parse CLI args
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
    let args = CliArgs::from_args();

    let file_data = fs::read(&args.file_path)?;
    let executable = ElfExecutable::parse(&mut Cursor::new(file_data))?;

    let mut processor = Processor::new();
    processor.load_executable(&executable)?;

    while processor.running {
        processor.step()?;
    }

    Ok(())
}
