use std::fmt;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome pixel state, row-major with the origin top-left
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; WIDTH * HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: [false; WIDTH * HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [false; WIDTH * HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// XOR one 8-pixel sprite row onto the screen at (x, y), wrapping at the
    /// edges. Returns true if any lit pixel was switched off.
    pub fn draw_row(&mut self, x: usize, y: usize, row: u8) -> bool {
        let mut collision = false;
        for p in 0..8 {
            // iter bit shift across sprite pixel from memory
            if row & (0x80 >> p) == 0 {
                continue;
            }
            let offset = Self::offset(x + p, y);
            if self.pixels[offset] {
                collision = true;
            }
            self.pixels[offset] ^= true;
        }
        collision
    }

    fn offset(x: usize, y: usize) -> usize {
        WIDTH * (y % HEIGHT) + x % WIDTH
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// one line per row, `#` for lit and `.` for dark
impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.pixels.chunks(WIDTH) {
            for &p in row {
                f.write_str(if p { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lit = self.pixels.iter().filter(|p| **p).count();
        write!(f, "Framebuffer {{ lit: {} }}", lit)
    }
}
