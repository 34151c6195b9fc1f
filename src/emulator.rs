//! Real-time driver: pumps frontend events, paces frames at 60Hz, keeps the
//! buzzer in step with the sound timer and presents each finished frame.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::chip8::Chip8;
use crate::error::Result;
use crate::frontend::Frontend;
use crate::scheduler::{FrameScheduler, FRAME_DURATION};

pub struct Emulator<F: Frontend> {
    chip8: Chip8,
    frontend: F,
    scheduler: FrameScheduler,
    buzzing: bool,
    frames: u64,
}

impl<F: Frontend> Emulator<F> {
    pub fn new(chip8: Chip8, frontend: F) -> Self {
        Self {
            chip8,
            frontend,
            scheduler: FrameScheduler::new(),
            buzzing: false,
            frames: 0,
        }
    }

    /// Handle pending frontend requests and let `elapsed` pass. Runs a frame
    /// if that crossed a frame boundary. Returns false once the frontend asks
    /// to quit.
    pub fn step(&mut self, elapsed: Duration) -> Result<bool> {
        let control = self.frontend.pump()?;
        if control.quit {
            return Ok(false);
        }
        if control.toggle_pause {
            let paused = !self.chip8.paused();
            self.chip8.set_paused(paused);
            debug!("Paused: {}", paused);
        }
        if control.frequency_delta != 0 {
            let wanted = self.chip8.instruction_frequency() as i32 + control.frequency_delta;
            let set = self.chip8.set_instruction_frequency(wanted.max(0) as u32);
            debug!("Instruction frequency: {} per frame", set);
        }

        if !self.scheduler.advance(elapsed) {
            return Ok(true);
        }
        self.chip8.run_frame(&mut self.frontend)?;
        self.sync_buzzer();
        self.frontend.present(self.chip8.framebuffer())?;
        self.frames += 1;
        Ok(true)
    }

    /// Run against the wall clock until the frontend quits.
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Running at {} instructions per frame",
            self.chip8.instruction_frequency()
        );
        let mut last = Instant::now();
        loop {
            let now = Instant::now();
            let elapsed = now - last;
            last = now;
            if !self.step(elapsed)? {
                break;
            }
            thread::sleep(self.scheduler.until_next_frame());
        }
        info!("Stopped after {} frames", self.frames);
        Ok(())
    }

    /// Run as fast as possible, one frame per step, until the frontend quits.
    pub fn run_unpaced(&mut self) -> Result<()> {
        while self.step(FRAME_DURATION)? {}
        info!("Stopped after {} frames", self.frames);
        Ok(())
    }

    fn sync_buzzer(&mut self) {
        let active = self.chip8.sound_active();
        if active == self.buzzing {
            return;
        }
        if active {
            self.frontend.start();
        } else {
            self.frontend.stop();
        }
        self.buzzing = active;
    }

    pub fn chip8(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
