use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use chip8::config::{self, Config};
use chip8::emulator::Emulator;
use chip8::frontend::headless::HeadlessFrontend;
use chip8::Chip8;

fn main() {
    let config = Config::parse();
    let env = env_logger::Env::default().default_filter_or(config.log_filter());
    env_logger::Builder::from_env(env).init();

    if let Err(e) = run(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    let name = match &config.rom {
        Some(name) => name.clone(),
        None => {
            let stdin = io::stdin();
            config::prompt_rom_name(&mut stdin.lock(), &mut io::stdout())
                .context("no ROM selected")?
        }
    };
    let path = config.resolve_rom_path(&name);

    let mut emu = match config.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    emu.load_rom_file(&path)
        .with_context(|| format!("couldn't load ROM '{}'", name))?;
    emu.set_instruction_frequency(config.frequency);

    if config.headless {
        return run_headless(emu, config.frames);
    }
    run_windowed(emu, config)
}

fn run_headless(emu: Chip8, frames: u64) -> Result<()> {
    let mut emulator = Emulator::new(emu, HeadlessFrontend::new(frames));
    emulator.run_unpaced()?;
    print!("{}", emulator.frontend().last_frame());
    Ok(())
}

#[cfg(feature = "sdl")]
fn run_windowed(emu: Chip8, config: &Config) -> Result<()> {
    use chip8::frontend::sdl::SdlFrontend;

    let frontend = SdlFrontend::new(config.scale)?;
    info!("Esc quits, P pauses, +/- change speed");
    Emulator::new(emu, frontend).run()?;
    Ok(())
}

#[cfg(not(feature = "sdl"))]
fn run_windowed(emu: Chip8, config: &Config) -> Result<()> {
    info!("Built without the `sdl` feature, running headless");
    run_headless(emu, config.frames)
}
