use std::fmt;

use log::{trace, warn};
use rand::Rng;

use super::memory::FONT_GLYPH_SIZE;
use super::Chip8;
use crate::error::{Chip8Error, Result};

/// A raw 16-bit instruction word with accessors for its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// top nibble, selects the handler group
    pub fn group(self) -> u8 {
        ((self.0 & 0xF000) >> 12) as u8
    }

    pub fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    pub fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// How an executed instruction moves the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramCounter {
    /// advance to the following instruction
    Next,
    /// step over the following instruction
    Skip,
    /// re-run this instruction next cycle
    Wait,
    Jump(u16),
}

impl ProgramCounter {
    fn skip_if(cond: bool) -> Self {
        if cond {
            ProgramCounter::Skip
        } else {
            ProgramCounter::Next
        }
    }
}

impl Chip8 {
    pub(super) fn execute(&mut self, op: Opcode) -> Result<ProgramCounter> {
        match op.group() {
            0x0 => self.cls_ret(op),  // 00**
            0x1 => Ok(self.jmp(op)),  // 1NNN
            0x2 => self.call(op),     // 2NNN
            0x3 => Ok(self.eb(op)),   // 3XNN
            0x4 => Ok(self.neb(op)),  // 4XNN
            0x5 => Ok(self.er(op)),   // 5XY0
            0x6 => Ok(self.ld(op)),   // 6XNN
            0x7 => Ok(self.addb(op)), // 7XNN
            0x8 => Ok(self.alu(op)),  // 8XY*
            0x9 => Ok(self.ner(op)),  // 9XY0
            0xA => Ok(self.si(op)),   // ANNN
            0xB => Ok(self.jmpo(op)), // BNNN
            0xC => Ok(self.rng(op)),  // CXNN
            0xD => self.draw(op),     // DXYN
            0xE => self.key(op),      // EX**
            _ => self.ex(op),         // FX**
        }
    }

    /// Unknown sub-opcodes are skipped over rather than re-fetched forever.
    fn unhandled(&self, op: Opcode) -> ProgramCounter {
        warn!("Unhandled opcode {} at {:03X}, skipping", op, self.pc);
        ProgramCounter::Next
    }

    fn cls_ret(&mut self, op: Opcode) -> Result<ProgramCounter> {
        match op.0 {
            0x00E0 => {
                // clear screen
                self.gfx.clear();
                Ok(ProgramCounter::Next)
            }
            0x00EE => {
                // return from subroutine; the stack holds the CALL's own address
                let addr = self.stack.pop(self.pc)?;
                trace!("Returning to {:03X}", addr + 2);
                Ok(ProgramCounter::Jump(addr + 2))
            }
            // 0NNN machine code routines aren't emulated
            _ => Ok(self.unhandled(op)),
        }
    }

    fn jmp(&mut self, op: Opcode) -> ProgramCounter {
        // 1NNN
        ProgramCounter::Jump(op.nnn())
    }

    fn call(&mut self, op: Opcode) -> Result<ProgramCounter> {
        // 2NNN
        self.stack.push(self.pc)?;
        trace!("Calling {:03X}", op.nnn());
        Ok(ProgramCounter::Jump(op.nnn()))
    }

    fn eb(&mut self, op: Opcode) -> ProgramCounter {
        // 3XNN
        ProgramCounter::skip_if(self.v[op.x()] == op.nn())
    }

    fn neb(&mut self, op: Opcode) -> ProgramCounter {
        // 4XNN
        ProgramCounter::skip_if(self.v[op.x()] != op.nn())
    }

    fn er(&mut self, op: Opcode) -> ProgramCounter {
        // 5XY0
        if op.n() != 0 {
            return self.unhandled(op);
        }
        ProgramCounter::skip_if(self.v[op.x()] == self.v[op.y()])
    }

    fn ld(&mut self, op: Opcode) -> ProgramCounter {
        // 6XNN
        self.v[op.x()] = op.nn();
        ProgramCounter::Next
    }

    fn addb(&mut self, op: Opcode) -> ProgramCounter {
        // 7XNN, no carry flag
        let x = op.x();
        self.v[x] = self.v[x].wrapping_add(op.nn());
        ProgramCounter::Next
    }

    /// 8XY* arithmetic. VF is written after VX so the flag survives when X is F.
    /// Shifts work on VX in place and ignore VY.
    fn alu(&mut self, op: Opcode) -> ProgramCounter {
        let (x, y) = (op.x(), op.y());
        let (vx, vy) = (self.v[x], self.v[y]);
        let (result, flag) = match op.n() {
            0x0 => (vy, None),
            0x1 => (vx | vy, None),
            0x2 => (vx & vy, None),
            0x3 => (vx ^ vy, None),
            0x4 => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry as u8))
            }
            0x5 => (vx.wrapping_sub(vy), Some((vx > vy) as u8)),
            0x6 => (vx >> 1, Some(vx & 0x1)),
            0x7 => (vy.wrapping_sub(vx), Some((vy > vx) as u8)),
            0xE => (vx << 1, Some(vx >> 7)),
            _ => return self.unhandled(op),
        };
        self.v[x] = result;
        if let Some(flag) = flag {
            self.v[0xF] = flag;
        }
        ProgramCounter::Next
    }

    fn ner(&mut self, op: Opcode) -> ProgramCounter {
        // 9XY0
        if op.n() != 0 {
            return self.unhandled(op);
        }
        ProgramCounter::skip_if(self.v[op.x()] != self.v[op.y()])
    }

    fn si(&mut self, op: Opcode) -> ProgramCounter {
        // ANNN
        self.i = op.nnn();
        ProgramCounter::Next
    }

    fn jmpo(&mut self, op: Opcode) -> ProgramCounter {
        // BNNN, may land past 0xFFF which the caller rejects
        ProgramCounter::Jump(op.nnn() + self.v[0] as u16)
    }

    fn rng(&mut self, op: Opcode) -> ProgramCounter {
        // CXNN
        self.v[op.x()] = self.rng.gen::<u8>() & op.nn();
        ProgramCounter::Next
    }

    /// DXYN: XOR an N-row sprite from I onto the screen at (VX, VY).
    /// VF ends up 1 if any lit pixel was switched off.
    fn draw(&mut self, op: Opcode) -> Result<ProgramCounter> {
        let vx = self.v[op.x()] as usize;
        let vy = self.v[op.y()] as usize;
        let sprite = self.memory.slice(self.i as usize, op.n() as usize)?;

        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            collision |= self.gfx.draw_row(vx, vy + row, bits);
        }
        self.v[0xF] = collision as u8;
        Ok(ProgramCounter::Next)
    }

    fn key(&mut self, op: Opcode) -> Result<ProgramCounter> {
        let key = self.v[op.x()];
        let pressed = || {
            self.keypad
                .is_pressed(key)
                .ok_or(Chip8Error::InvalidKey { pc: self.pc, key })
        };
        match op.nn() {
            // EX9E
            0x9E => Ok(ProgramCounter::skip_if(pressed()?)),
            // EXA1
            0xA1 => Ok(ProgramCounter::skip_if(!pressed()?)),
            _ => Ok(self.unhandled(op)),
        }
    }

    fn ex(&mut self, op: Opcode) -> Result<ProgramCounter> {
        let x = op.x();
        match op.nn() {
            0x07 => {
                // FX07
                self.v[x] = self.delay_timer;
            }
            0x0A => {
                // FX0A, blocks by re-running until a key is down
                match self.keypad.last_pressed() {
                    Some(k) => self.v[x] = k,
                    None => {
                        trace!("Waiting for input");
                        return Ok(ProgramCounter::Wait);
                    }
                }
            }
            0x15 => {
                // FX15
                self.delay_timer = self.v[x];
            }
            0x18 => {
                // FX18
                self.sound_timer = self.v[x];
            }
            0x1E => {
                // FX1E
                self.i = self.i.wrapping_add(self.v[x] as u16);
            }
            0x29 => {
                // FX29, fontset lives in the first 80 bytes
                self.i = FONT_GLYPH_SIZE * self.v[x] as u16;
            }
            0x33 => {
                // FX33, so 193 becomes [1, 9, 3] in memory at I
                let vx = self.v[x];
                self.memory
                    .write(self.i as usize, &[vx / 100, vx / 10 % 10, vx % 10])?;
            }
            0x55 => {
                // FX55, V0 to VX inclusive
                self.memory.write(self.i as usize, &self.v[..=x])?;
            }
            0x65 => {
                // FX65, V0 to VX inclusive
                let bytes = self.memory.slice(self.i as usize, x + 1)?;
                self.v[..=x].copy_from_slice(bytes);
            }
            _ => return Ok(self.unhandled(op)),
        }
        Ok(ProgramCounter::Next)
    }
}
