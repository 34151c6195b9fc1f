//! A CHIP-8 interpreter.
//!
//! [`Chip8`] holds the whole machine: 4K of memory with the fontset at 0x000,
//! sixteen 8-bit registers, the address register, a 16-deep call stack, the
//! delay and sound timers, the keypad and a 64x32 framebuffer. It knows
//! nothing about time or windows. [`Chip8::run_frame`] runs one 60Hz frame
//! worth of instructions and ticks the timers once, and
//! [`emulator::Emulator`] calls it against the wall clock, feeding keys from
//! and presenting frames to a [`frontend::Frontend`].
//!
//! ```
//! use chip8::Chip8;
//!
//! let mut chip8 = Chip8::with_seed(0);
//! // V0 = 0x2A; jump to self
//! chip8.load_rom(&[0x60, 0x2A, 0x12, 0x02]).unwrap();
//! chip8.run_frame(&mut [false; 16]).unwrap();
//! assert_eq!(chip8.registers()[0], 0x2A);
//! assert_eq!(chip8.pc(), 0x202);
//! ```

pub mod chip8;
pub mod config;
pub mod emulator;
pub mod error;
pub mod frontend;
pub mod scheduler;

pub use crate::chip8::Chip8;
pub use crate::error::{Chip8Error, Result};
