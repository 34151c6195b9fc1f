use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use crate::chip8::DEFAULT_INSTRUCTION_FREQUENCY;

pub const ROM_EXTENSION: &str = "ch8";

#[derive(Parser, Debug)]
#[command(name = "chip8")]
#[command(about = "A CHIP-8 interpreter", long_about = None)]
pub struct Config {
    /// ROM name without the .ch8 extension; asked for on stdin when omitted
    pub rom: Option<String>,

    /// Directory ROMs are looked up in
    #[arg(long, default_value = "roms")]
    pub rom_dir: PathBuf,

    /// Instructions executed per 60Hz frame
    #[arg(short, long, default_value_t = DEFAULT_INSTRUCTION_FREQUENCY as u32)]
    pub frequency: u32,

    /// Window pixels per CHIP-8 pixel
    #[arg(long, default_value_t = 10)]
    pub scale: u32,

    /// Run without a window and print the final frame
    #[arg(long)]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    pub frames: u64,

    /// Seed for the CXNN random number generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Trace every executed instruction
    #[arg(short, long)]
    pub debug: bool,
}

impl Config {
    /// `<rom-dir>/<name>.ch8`
    pub fn resolve_rom_path(&self, name: &str) -> PathBuf {
        self.rom_dir.join(format!("{}.{}", name, ROM_EXTENSION))
    }

    /// default `env_logger` filter, `RUST_LOG` still wins
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "trace"
        } else {
            "info"
        }
    }
}

/// Ask for a ROM name, the way the interpreter does when started bare.
pub fn prompt_rom_name(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<String> {
    write!(output, "Insert a ROM: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let name = line.trim();
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no ROM name given",
        ));
    }
    Ok(name.to_string())
}
