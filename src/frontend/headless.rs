use super::{Buzzer, Control, Frontend, KeySource, Screen};
use crate::chip8::{Framebuffer, KEY_COUNT};
use crate::error::Result;

/// Frontend without a window: fixed key states, no sound, and a frame limit
/// after which it asks to quit.
pub struct HeadlessFrontend {
    keys: [bool; KEY_COUNT],
    frame_limit: u64,
    frames: u64,
    last_frame: Framebuffer,
    buzzing: bool,
    beeps: u32,
}

impl HeadlessFrontend {
    pub fn new(frame_limit: u64) -> Self {
        Self {
            keys: [false; KEY_COUNT],
            frame_limit,
            frames: 0,
            last_frame: Framebuffer::new(),
            buzzing: false,
            beeps: 0,
        }
    }

    /// hold down a fixed set of keys for the whole run
    pub fn with_keys(mut self, keys: [bool; KEY_COUNT]) -> Self {
        self.keys = keys;
        self
    }

    pub fn press(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = true;
        }
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &Framebuffer {
        &self.last_frame
    }

    pub fn buzzing(&self) -> bool {
        self.buzzing
    }

    /// number of times the buzzer was started
    pub fn beeps(&self) -> u32 {
        self.beeps
    }
}

impl KeySource for HeadlessFrontend {
    fn key_states(&mut self) -> [bool; KEY_COUNT] {
        self.keys
    }
}

impl Screen for HeadlessFrontend {
    fn present(&mut self, framebuffer: &Framebuffer) -> Result<()> {
        self.last_frame = framebuffer.clone();
        self.frames += 1;
        Ok(())
    }
}

impl Buzzer for HeadlessFrontend {
    fn start(&mut self) {
        self.buzzing = true;
        self.beeps += 1;
    }

    fn stop(&mut self) {
        self.buzzing = false;
    }
}

impl Frontend for HeadlessFrontend {
    fn pump(&mut self) -> Result<Control> {
        Ok(Control {
            quit: self.frames >= self.frame_limit,
            ..Control::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quits_after_limit() {
        let mut f = HeadlessFrontend::new(2);
        assert!(!f.pump().unwrap().quit);
        f.present(&Framebuffer::new()).unwrap();
        f.present(&Framebuffer::new()).unwrap();
        assert!(f.pump().unwrap().quit);
    }

    #[test]
    fn test_keys() {
        let mut f = HeadlessFrontend::new(1);
        f.press(0x3);
        f.press(0x42);
        let keys = f.key_states();
        assert!(keys[3]);
        assert_eq!(keys.iter().filter(|k| **k).count(), 1);
        f.release_all();
        assert!(f.key_states().iter().all(|k| !k));
    }
}
