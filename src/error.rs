use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Chip8Error {
    #[error("Failed to read ROM {}: {source}", path.display())]
    RomIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ROM is {size} bytes, at most {max} fit in program memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("Memory access out of bounds: {len} byte(s) at 0x{addr:04X}")]
    MemoryOutOfBounds { addr: usize, len: usize },

    #[error("Stack overflow: CALL at 0x{pc:03X} exceeds {depth} nested levels")]
    StackOverflow { pc: u16, depth: usize },

    #[error("Stack underflow: RETURN at 0x{pc:03X} with an empty stack")]
    StackUnderflow { pc: u16 },

    #[error("Jump target 0x{target:04X} at 0x{pc:03X} is outside memory")]
    InvalidJump { pc: u16, target: u16 },

    #[error("Key index 0x{key:02X} at 0x{pc:03X} is not on the keypad")]
    InvalidKey { pc: u16, key: u8 },

    #[error("Frontend error: {0}")]
    Frontend(String),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_hex_formatted() {
        let e = Chip8Error::StackUnderflow { pc: 0x2a4 };
        assert_eq!(
            e.to_string(),
            "Stack underflow: RETURN at 0x2A4 with an empty stack"
        );

        let e = Chip8Error::MemoryOutOfBounds {
            addr: 0xffe,
            len: 3,
        };
        assert_eq!(
            e.to_string(),
            "Memory access out of bounds: 3 byte(s) at 0x0FFE"
        );
    }

    #[test]
    fn test_rom_io_keeps_source() {
        use std::error::Error as _;
        let e = Chip8Error::RomIo {
            path: PathBuf::from("roms/missing.ch8"),
            source: io::Error::new(io::ErrorKind::NotFound, "nope"),
        };
        assert!(e.to_string().starts_with("Failed to read ROM roms/missing.ch8"));
        assert!(e.source().is_some());
    }
}
