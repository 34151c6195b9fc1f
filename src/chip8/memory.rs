use crate::error::{Chip8Error, Result};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// bytes per font glyph, so glyph `d` lives at `d * FONT_GLYPH_SIZE`
pub const FONT_GLYPH_SIZE: u16 = 5;

const FONTSET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4K of system memory. Every access is range-checked and reports
/// `MemoryOutOfBounds` instead of panicking.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = Box::new([0; MEMORY_SIZE]);
        // CHIP-8 systems had the interpreter in the first 512 bytes of memory
        // since we're emulating that we can just store the fontset there
        bytes[..FONTSET.len()].copy_from_slice(&FONTSET);
        Self { bytes }
    }

    /// copy a ROM image to 0x200; nothing is written if it doesn't fit
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.write(PROGRAM_START as usize, rom)
    }

    pub fn read_byte(&self, addr: usize) -> Result<u8> {
        Ok(self.slice(addr, 1)?[0])
    }

    /// big-endian instruction word at `addr`
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let word = self.slice(addr, 2)?;
        Ok((word[0] as u16) << 8 | word[1] as u16)
    }

    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        let range = Self::range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn write(&mut self, addr: usize, data: &[u8]) -> Result<()> {
        let range = Self::range(addr, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..]
    }

    fn range(addr: usize, len: usize) -> Result<std::ops::Range<usize>> {
        match addr.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(addr..end),
            _ => Err(Chip8Error::MemoryOutOfBounds { addr, len }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_installed_rest_zeroed() {
        let m = Memory::new();
        assert_eq!(m.slice(0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(m.slice(75, 5).unwrap(), &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert!(m.as_slice()[80..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_program_load_ok() {
        let mut m = Memory::new();
        m.load_program(&[0x00, 0xe0]).unwrap(); // clear screen
        assert_eq!(m.read_word(0x200).unwrap(), 0x00e0);
    }

    #[test]
    fn test_program_fills_memory_exactly() {
        let mut m = Memory::new();
        let rom = vec![0xab; MAX_ROM_SIZE];
        m.load_program(&rom).unwrap();
        assert_eq!(m.read_byte(0xfff).unwrap(), 0xab);
    }

    #[test]
    fn test_program_too_large_leaves_memory_alone() {
        let mut m = Memory::new();
        let rom = vec![0xff; MAX_ROM_SIZE + 1];
        match m.load_program(&rom) {
            Err(Chip8Error::RomTooLarge { size, max }) => {
                assert_eq!(size, 3585);
                assert_eq!(max, 3584);
            }
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
        assert_eq!(m.read_byte(0x200).unwrap(), 0);
    }

    #[test]
    fn test_read_word_at_last_byte_fails() {
        let m = Memory::new();
        assert!(m.read_word(0xffe).is_ok());
        assert!(matches!(
            m.read_word(0xfff),
            Err(Chip8Error::MemoryOutOfBounds { addr: 0xfff, len: 2 })
        ));
    }

    #[test]
    fn test_write_out_of_bounds_is_atomic() {
        let mut m = Memory::new();
        assert!(m.write(0xffe, &[1, 2, 3]).is_err());
        assert_eq!(m.slice(0xffe, 2).unwrap(), &[0, 0]);
    }
}
