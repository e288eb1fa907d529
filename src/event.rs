use std::fmt;

/// A key transition from the grid's event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key index 0-11.
    pub key: usize,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn pressed(key: usize) -> Self {
        Self { key, pressed: true }
    }

    pub const fn released(key: usize) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = if self.pressed { "down" } else { "up" };
        write!(f, "key {} {dir}", self.key)
    }
}
