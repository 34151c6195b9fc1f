use crate::error::{Chip8Error, Result};

pub const STACK_DEPTH: usize = 16;

/// fixed-capacity return address stack
#[derive(Debug, Default)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pc` is the address of the CALL itself, used for error reporting too
    pub fn push(&mut self, pc: u16) -> Result<()> {
        if self.sp == STACK_DEPTH {
            return Err(Chip8Error::StackOverflow {
                pc,
                depth: STACK_DEPTH,
            });
        }
        self.slots[self.sp] = pc;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc });
        }
        self.sp -= 1;
        let addr = self.slots[self.sp];
        self.slots[self.sp] = 0;
        Ok(addr)
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// live return addresses, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.sp]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_lifo() {
        let mut s = Stack::new();
        s.push(0x200).unwrap();
        s.push(0x300).unwrap();
        assert_eq!(s.frames(), &[0x200, 0x300]);
        assert_eq!(s.pop(0).unwrap(), 0x300);
        assert_eq!(s.pop(0).unwrap(), 0x200);
        assert_eq!(s.sp(), 0);
    }

    #[test]
    fn test_overflow_on_seventeenth_push() {
        let mut s = Stack::new();
        for i in 0..STACK_DEPTH as u16 {
            s.push(0x200 + 2 * i).unwrap();
        }
        assert!(matches!(
            s.push(0x400),
            Err(Chip8Error::StackOverflow { pc: 0x400, depth: 16 })
        ));
        assert_eq!(s.sp(), STACK_DEPTH);
    }

    #[test]
    fn test_underflow_on_empty_pop() {
        let mut s = Stack::new();
        assert!(matches!(
            s.pop(0x2f0),
            Err(Chip8Error::StackUnderflow { pc: 0x2f0 })
        ));
    }
}
