//! HID usage codes used by the built-in bindings and the tests.
//!
//! Macro files carry raw integers, so this is not an exhaustive table.

/// Keyboard page (0x07) usages.
pub mod key {
    pub const A: u16 = 0x04;
    pub const C: u16 = 0x06;
    pub const S: u16 = 0x16;
    pub const V: u16 = 0x19;
    pub const ENTER: u16 = 0x28;
    pub const ESCAPE: u16 = 0x29;
    pub const BACKSPACE: u16 = 0x2A;
    pub const TAB: u16 = 0x2B;
    pub const CAPS_LOCK: u16 = 0x39;
    pub const F1: u16 = 0x3A;
    pub const F12: u16 = 0x45;
    pub const LEFT_CONTROL: u16 = 0xE0;
    pub const LEFT_SHIFT: u16 = 0xE1;
    pub const LEFT_ALT: u16 = 0xE2;
    pub const GUI: u16 = 0xE3;
}

/// Consumer page (0x0C) usages.
pub mod consumer {
    pub const SCAN_NEXT_TRACK: u16 = 0xB5;
    pub const SCAN_PREVIOUS_TRACK: u16 = 0xB6;
    pub const PLAY_PAUSE: u16 = 0xCD;
    pub const MUTE: u16 = 0xE2;
    pub const VOLUME_INCREMENT: u16 = 0xE9;
    pub const VOLUME_DECREMENT: u16 = 0xEA;
}

/// Pointer button bits.
pub mod pointer {
    pub const LEFT: i32 = 0x01;
    pub const RIGHT: i32 = 0x02;
    pub const MIDDLE: i32 = 0x04;
}
