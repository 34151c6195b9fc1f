//! The boundary between the interpreter and the machine it runs on: pixels,
//! keys and the beeper.

pub mod headless;
#[cfg(feature = "sdl")]
pub mod sdl;

use crate::chip8::Framebuffer;
use crate::error::Result;

pub use crate::chip8::KeySource;

/// Presents a finished frame.
pub trait Screen {
    fn present(&mut self, framebuffer: &Framebuffer) -> Result<()>;
}

/// Plays a tone while the sound timer runs.
pub trait Buzzer {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Requests collected from the frontend since the last pump.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub quit: bool,
    pub toggle_pause: bool,
    /// change to cycles per frame
    pub frequency_delta: i32,
}

pub trait Frontend: KeySource + Screen + Buzzer {
    /// drain pending window events
    fn pump(&mut self) -> Result<Control>;
}
