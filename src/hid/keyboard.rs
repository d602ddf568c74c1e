//! USB HID keyboard report (boot protocol compatible).
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

use crate::error::Error;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// Number of non-modifier key slots.
pub const KEY_SLOTS: usize = 6;

/// First modifier usage (Left Control).
const MODIFIER_FIRST: u8 = 0xE0;
/// Last modifier usage (Right GUI).
const MODIFIER_LAST: u8 = 0xE7;

/// Whether `usage` is one of the eight modifier usages.
pub const fn is_modifier(usage: u8) -> bool {
    usage >= MODIFIER_FIRST && usage <= MODIFIER_LAST
}

/// Standard USB HID boot-protocol keyboard report.
///
/// Non-zero slots are always distinct. A released key leaves a hole
/// rather than shifting the keys after it.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; KEY_SLOTS],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; KEY_SLOTS],
        }
    }

    /// Returns `true` if no keys are pressed.
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }

    /// Whether the modifier bit for `usage` is set. Non-modifier usages
    /// always return `false`.
    pub fn is_modifier_set(&self, usage: u8) -> bool {
        is_modifier(usage) && self.modifier & modifier_bit(usage) != 0
    }

    /// Slot index holding `usage`, if any.
    pub fn slot_of(&self, usage: u8) -> Option<usize> {
        if usage == 0 {
            return None;
        }
        self.keycodes.iter().position(|&k| k == usage)
    }

    /// Write `usage` into slot `index`.
    pub fn set_slot(&mut self, index: usize, usage: u8) {
        self.keycodes[index] = usage;
    }

    /// Empty slot `index`. Other slots keep their position.
    pub fn clear_slot(&mut self, index: usize) {
        self.keycodes[index] = 0;
    }

    /// Record `usage` as pressed.
    ///
    /// Returns `Ok(true)` if the report changed, `Ok(false)` if the key
    /// was already down, and [`Error::KeyRollover`] if every slot is taken
    /// (the report is left untouched).
    pub fn press(&mut self, usage: u8) -> Result<bool, Error> {
        if usage == 0 {
            return Ok(false);
        }
        if is_modifier(usage) {
            if self.is_modifier_set(usage) {
                return Ok(false);
            }
            self.modifier |= modifier_bit(usage);
            return Ok(true);
        }
        if self.slot_of(usage).is_some() {
            return Ok(false);
        }
        match self.keycodes.iter().position(|&k| k == 0) {
            Some(free) => {
                self.set_slot(free, usage);
                Ok(true)
            }
            None => Err(Error::KeyRollover),
        }
    }

    /// Record `usage` as released. Returns whether the report changed.
    pub fn release(&mut self, usage: u8) -> bool {
        if is_modifier(usage) {
            if !self.is_modifier_set(usage) {
                return false;
            }
            self.modifier &= !modifier_bit(usage);
            return true;
        }
        match self.slot_of(usage) {
            Some(slot) => {
                self.clear_slot(slot);
                true
            }
            None => false,
        }
    }

    /// Release every modifier and key at once. Returns whether anything
    /// was pressed.
    pub fn clear(&mut self) -> bool {
        let was_pressed = !self.is_empty();
        *self = Self::empty();
        was_pressed
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// The report as it goes on the wire.
    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }
}

fn modifier_bit(usage: u8) -> u8 {
    1 << (usage - MODIFIER_FIRST)
}

// USB HID report descriptor for a boot-protocol keyboard

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input), usages 0x00..=0xE7
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xE7, 0x00, // Logical Maximum (231)
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    //
    0xC0, // End Collection
];
