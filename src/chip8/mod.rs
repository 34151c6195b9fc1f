mod display;
mod keypad;
mod memory;
mod opcodes;
mod stack;

use std::fs;
use std::path::Path;

use log::{info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Chip8Error, Result};

pub use display::{Framebuffer, HEIGHT, WIDTH};
pub use keypad::{KeySource, Keypad, KEY_COUNT};
pub use memory::{Memory, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
pub use opcodes::{Opcode, ProgramCounter};
pub use stack::{Stack, STACK_DEPTH};

/// cycles per 60Hz frame, so roughly 960 instructions a second
pub const DEFAULT_INSTRUCTION_FREQUENCY: u8 = 16;

pub struct Chip8 {
    // CHIP-8 VM
    opcode: Opcode,   // current opcode
    memory: Memory,   // system memory
    v: [u8; 16],      // registers V0-VE (VF is flag for some instructions)
    i: u16,           // address register
    pc: u16,          // program counter
    gfx: Framebuffer, // pixels state
    delay_timer: u8,
    sound_timer: u8, // timers count down at 60Hz
    stack: Stack,
    keypad: Keypad, // hex keypad state

    // emulator resources
    rng: StdRng,
    instruction_frequency: u8,
    paused: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// deterministic CXNN results, for tests and replays
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            opcode: Opcode(0),
            memory: Memory::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START, // programs start at 0x200
            gfx: Framebuffer::new(),
            delay_timer: 0,
            sound_timer: 0,
            stack: Stack::new(),
            keypad: Keypad::new(),

            rng,
            instruction_frequency: DEFAULT_INSTRUCTION_FREQUENCY,
            paused: false,
        }
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.memory.load_program(rom)?;
        info!("Loaded ROM [size: {}]", rom.len());
        Ok(())
    }

    pub fn load_rom_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let rom = fs::read(path).map_err(|source| Chip8Error::RomIo {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Reading ROM from {}", path.display());
        self.load_rom(&rom)
    }

    /// Poll input, then fetch, decode and execute one instruction.
    pub fn emulate_cycle(&mut self, keys: &mut dyn KeySource) -> Result<()> {
        // process input before decoding so skips and waits see one snapshot
        self.keypad.poll(keys);

        // two-byte opcodes
        self.opcode = Opcode(self.memory.read_word(self.pc as usize)?);
        trace!("{:03X}: {:04X}", self.pc, self.opcode.0);

        let next = self.execute(self.opcode)?;
        self.pc = match next {
            ProgramCounter::Next => self.pc + 2,
            ProgramCounter::Skip => self.pc + 4,
            ProgramCounter::Wait => self.pc,
            ProgramCounter::Jump(target) => {
                if target as usize >= MEMORY_SIZE {
                    return Err(Chip8Error::InvalidJump {
                        pc: self.pc,
                        target,
                    });
                }
                target
            }
        };
        Ok(())
    }

    /// One 60Hz frame: `instruction_frequency` cycles followed by a single
    /// timer decrement. Does nothing while paused.
    pub fn run_frame(&mut self, keys: &mut dyn KeySource) -> Result<()> {
        if self.paused {
            return Ok(());
        }
        for _ in 0..self.instruction_frequency {
            self.emulate_cycle(keys)?;
        }
        self.tick_timers();
        Ok(())
    }

    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn instruction_frequency(&self) -> u8 {
        self.instruction_frequency
    }

    /// clamped to 1..=255, returns what was actually set
    pub fn set_instruction_frequency(&mut self, cycles_per_frame: u32) -> u8 {
        self.instruction_frequency = cycles_per_frame.clamp(1, u8::MAX as u32) as u8;
        self.instruction_frequency
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.gfx
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn stack(&self) -> &[u16] {
        self.stack.frames()
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn last_key(&self) -> Option<u8> {
        self.keypad.last_pressed()
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const NO_KEYS: [bool; KEY_COUNT] = [false; KEY_COUNT];

    #[test]
    fn test_reset_state() {
        let c = Chip8::with_seed(1);
        assert_eq!(c.pc(), 0x200);
        assert_eq!(c.index(), 0);
        assert_eq!(c.registers(), &[0; 16]);
        assert!(c.stack().is_empty());
        assert_eq!(c.delay_timer(), 0);
        assert_eq!(c.sound_timer(), 0);
        assert_eq!(&c.memory()[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(c.instruction_frequency(), DEFAULT_INSTRUCTION_FREQUENCY);
    }

    #[test]
    fn test_timer_decay_floors_at_zero() {
        let mut c = Chip8::with_seed(1);
        c.delay_timer = 5;
        for _ in 0..5 {
            c.tick_timers();
        }
        assert_eq!(c.delay_timer(), 0);
        c.tick_timers();
        c.tick_timers();
        assert_eq!(c.delay_timer(), 0);
    }

    #[test]
    fn test_run_frame_runs_frequency_cycles_then_ticks() {
        let mut c = Chip8::with_seed(1);
        // 0x200: 7001 (V0 += 1), 0x202: 1200 (jump back)
        c.load_rom(&[0x70, 0x01, 0x12, 0x00]).unwrap();
        c.set_instruction_frequency(10);
        c.sound_timer = 2;
        c.run_frame(&mut { NO_KEYS }).unwrap();
        assert_eq!(c.registers()[0], 5);
        assert_eq!(c.sound_timer(), 1);
        assert!(c.sound_active());
        c.run_frame(&mut { NO_KEYS }).unwrap();
        assert!(!c.sound_active());
    }

    #[test]
    fn test_paused_frame_is_a_noop() {
        let mut c = Chip8::with_seed(1);
        c.load_rom(&[0x70, 0x01, 0x12, 0x00]).unwrap();
        c.delay_timer = 3;
        c.set_paused(true);
        c.run_frame(&mut { NO_KEYS }).unwrap();
        assert_eq!(c.pc(), 0x200);
        assert_eq!(c.delay_timer(), 3);
        c.set_paused(false);
        c.run_frame(&mut { NO_KEYS }).unwrap();
        assert_eq!(c.delay_timer(), 2);
    }

    #[test]
    fn test_instruction_frequency_clamped() {
        let mut c = Chip8::with_seed(1);
        assert_eq!(c.set_instruction_frequency(0), 1);
        assert_eq!(c.set_instruction_frequency(10_000), 255);
        assert_eq!(c.set_instruction_frequency(30), 30);
    }

    #[test]
    fn test_fetch_past_memory_is_fatal() {
        let mut c = Chip8::with_seed(1);
        c.pc = 0xfff;
        assert!(matches!(
            c.emulate_cycle(&mut { NO_KEYS }),
            Err(Chip8Error::MemoryOutOfBounds { addr: 0xfff, len: 2 })
        ));
    }

    #[test]
    fn test_jump_outside_memory_is_fatal() {
        let mut c = Chip8::with_seed(1);
        // V0 = FF; JP V0, FFF
        c.load_rom(&[0x60, 0xff, 0xbf, 0xff]).unwrap();
        c.emulate_cycle(&mut { NO_KEYS }).unwrap();
        match c.emulate_cycle(&mut { NO_KEYS }) {
            Err(Chip8Error::InvalidJump { pc, target }) => {
                assert_eq!(pc, 0x202);
                assert_eq!(target, 0x10fe);
            }
            other => panic!("expected InvalidJump, got {:?}", other),
        }
        assert_eq!(c.pc(), 0x202);
    }

    #[test]
    fn test_load_rom_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&[0x00, 0xe0, 0x12, 0x00]).unwrap();
        let mut c = Chip8::with_seed(1);
        c.load_rom_file(f.path()).unwrap();
        assert_eq!(&c.memory()[0x200..0x204], &[0x00, 0xe0, 0x12, 0x00]);
    }

    #[test]
    fn test_load_missing_rom_file() {
        let mut c = Chip8::with_seed(1);
        let err = c.load_rom_file("does/not/exist.ch8").unwrap_err();
        assert!(matches!(err, Chip8Error::RomIo { .. }));
    }
}
