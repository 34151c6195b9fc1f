pub const KEY_COUNT: usize = 16;

/// Anything that can report the state of the 16-key hex keypad.
pub trait KeySource {
    /// pressed state for keys 0x0..=0xF
    fn key_states(&mut self) -> [bool; KEY_COUNT];
}

/// fixed key states, mostly handy in tests and headless runs
impl KeySource for [bool; KEY_COUNT] {
    fn key_states(&mut self) -> [bool; KEY_COUNT] {
        *self
    }
}

/// Key state as last observed by the poller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
    last_pressed: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// sample every key; the lowest pressed one becomes `last_pressed`
    pub fn poll(&mut self, source: &mut dyn KeySource) {
        self.keys = source.key_states();
        self.last_pressed = self.keys.iter().position(|k| *k).map(|k| k as u8);
    }

    /// `None` when `key` isn't on the keypad
    pub fn is_pressed(&self, key: u8) -> Option<bool> {
        self.keys.get(key as usize).copied()
    }

    pub fn last_pressed(&self) -> Option<u8> {
        self.last_pressed
    }

    pub fn states(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_picks_lowest_pressed() {
        let mut source = [false; KEY_COUNT];
        source[0xc] = true;
        source[0x3] = true;
        let mut pad = Keypad::new();
        pad.poll(&mut source);
        assert_eq!(pad.last_pressed(), Some(0x3));
        assert_eq!(pad.is_pressed(0xc), Some(true));
        assert_eq!(pad.is_pressed(0x4), Some(false));
    }

    #[test]
    fn test_poll_nothing_pressed_resets_last() {
        let mut pad = Keypad::new();
        let mut down = [true; KEY_COUNT];
        pad.poll(&mut down);
        assert_eq!(pad.last_pressed(), Some(0));

        let mut up = [false; KEY_COUNT];
        pad.poll(&mut up);
        assert_eq!(pad.last_pressed(), None);
    }

    #[test]
    fn test_key_out_of_range() {
        let pad = Keypad::new();
        assert_eq!(pad.is_pressed(0x10), None);
    }
}
