//! Sun <-> USB HID translation tables.
//!
//! Pure data: scancodes of the Sun Type 5 keyboard to HID usage codes
//! (Keyboard/Keypad page 0x07), HID LED bits to Sun LED bits, and Sun
//! mouse button bits to HID button bits.

/// Sun Type 5 scancode (7 bits) to HID keyboard usage. `0` = unmapped.
#[rustfmt::skip]
const SUN2HID: [u8; 128] = [
    // 0x00: -, Stop, VolDown, Again, VolUp, F1, F2, F10
    0x00, 0x78, 0x81, 0x79, 0x80, 0x3A, 0x3B, 0x43,
    // 0x08: F3, F11, F4, F12, F5, AltGraph, F6, (blank)
    0x3C, 0x44, 0x3D, 0x45, 0x3E, 0xE6, 0x3F, 0x00,
    // 0x10: F7, F8, F9, Alt, Up, Pause, PrScr, ScrollLock
    0x40, 0x41, 0x42, 0xE2, 0x52, 0x48, 0x46, 0x47,
    // 0x18: Left, Props, Undo, Down, Right, Esc, 1, 2
    0x50, 0x76, 0x7A, 0x51, 0x4F, 0x29, 0x1E, 0x1F,
    // 0x20: 3, 4, 5, 6, 7, 8, 9, 0
    0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27,
    // 0x28: -, =, `, Backspace, Insert, Mute, KP/, KP*
    0x2D, 0x2E, 0x35, 0x2A, 0x49, 0x7F, 0x54, 0x55,
    // 0x30: Power, Front, KP., Copy, Home, Tab, Q, W
    0x66, 0x77, 0x63, 0x7C, 0x4A, 0x2B, 0x14, 0x1A,
    // 0x38: E, R, T, Y, U, I, O, P
    0x08, 0x15, 0x17, 0x1C, 0x18, 0x0C, 0x12, 0x13,
    // 0x40: [, ], Delete, Compose, KP7, KP8, KP9, KP-
    0x2F, 0x30, 0x4C, 0x65, 0x5F, 0x60, 0x61, 0x56,
    // 0x48: Open, Paste, End, -, Control, A, S, D
    0x74, 0x7D, 0x4D, 0x00, 0xE0, 0x04, 0x16, 0x07,
    // 0x50: F, G, H, J, K, L, ;, '
    0x09, 0x0A, 0x0B, 0x0D, 0x0E, 0x0F, 0x33, 0x34,
    // 0x58: \, Return, KPEnter, KP4, KP5, KP6, KP0, Find
    0x31, 0x28, 0x58, 0x5C, 0x5D, 0x5E, 0x62, 0x7E,
    // 0x60: PgUp, Cut, NumLock, LShift, Z, X, C, V
    0x4B, 0x7B, 0x53, 0xE1, 0x1D, 0x1B, 0x06, 0x19,
    // 0x68: B, N, M, ,, ., /, RShift, LineFeed
    0x05, 0x11, 0x10, 0x36, 0x37, 0x38, 0xE5, 0x00,
    // 0x70: KP1, KP2, KP3, -, -, -, Help, CapsLock
    0x59, 0x5A, 0x5B, 0x00, 0x00, 0x00, 0x75, 0x39,
    // 0x78: LMeta, Space, RMeta, PgDn, <>, KP+, (self-test), (idle)
    0xE3, 0x2C, 0xE7, 0x4E, 0x64, 0x57, 0x00, 0x00,
];

/// Translate a Sun scancode to a HID usage code.
///
/// The release flag (bit 7) is ignored. Returns `0` for scancodes with
/// no HID equivalent.
pub fn sun2hid_keycode(scancode: u8) -> u8 {
    SUN2HID[(scancode & 0x7F) as usize]
}

/// Translate a HID LED output report to the Sun set-LED mask.
///
/// ```text
/// HID: bit0 NumLock, bit1 CapsLock, bit2 ScrollLock, bit3 Compose, bit4 Kana
/// Sun: bit0 NumLock, bit1 Compose,  bit2 ScrollLock, bit3 CapsLock
/// ```
/// Kana has no Sun LED and is dropped.
pub fn hid2sun_leds(hid_leds: u8) -> u8 {
    (hid_leds & 0x05) | ((hid_leds & 0x02) << 2) | ((hid_leds & 0x08) >> 2)
}

/// Translate the button bits of a Sun mouse sync byte to HID buttons.
///
/// Sun buttons are active low: bit2 left, bit1 middle, bit0 right.
/// HID buttons are active high: bit0 left, bit1 right, bit2 middle.
pub fn sun2hid_mousebuttons(sync: u8) -> u8 {
    let pressed = !sync & 0x07;
    let left = (pressed >> 2) & 0x01;
    let middle = (pressed >> 1) & 0x01;
    let right = pressed & 0x01;
    left | (right << 1) | (middle << 2)
}
