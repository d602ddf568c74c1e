//! USB HID pointer report (boot protocol compatible prefix).
//!
//! Layout:
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! Byte 3: Scroll wheel   (signed, feature `wheel`)
//! Byte n: Horizontal pan (signed, feature `pan`)
//! ```
//! The first three bytes are the boot mouse report.

/// Pointer report size in bytes for this build.
pub const POINTER_REPORT_SIZE: usize =
    3 + cfg!(feature = "wheel") as usize + cfg!(feature = "pan") as usize;

/// Size of the boot-protocol mouse report.
pub const BOOT_POINTER_REPORT_SIZE: usize = 3;

/// Mask of the three button bits.
pub const BUTTON_MASK: u8 = 0x07;

/// One relative movement. Wheel and pan are dropped by builds that do
/// not declare them.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Motion {
    pub dx: i8,
    pub dy: i8,
    pub wheel: i8,
    pub pan: i8,
}

impl Motion {
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx,
            dy,
            wheel: 0,
            pan: 0,
        }
    }

    pub const fn with_wheel(mut self, wheel: i8) -> Self {
        self.wheel = wheel;
        self
    }

    pub const fn with_pan(mut self, pan: i8) -> Self {
        self.pan = pan;
        self
    }
}

/// Pointer report: button state plus the pending relative deltas.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerReport {
    /// Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed, down is positive).
    pub y: i8,
    /// Scroll wheel delta (signed).
    pub wheel: i8,
    /// Horizontal pan delta (signed).
    pub pan: i8,
}

impl PointerReport {
    /// Create an idle (no movement, no buttons) report.
    pub const fn empty() -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            wheel: 0,
            pan: 0,
        }
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && !self.has_motion()
    }

    /// Whether any delta is still waiting to be sent.
    pub fn has_motion(&self) -> bool {
        self.x != 0 || self.y != 0 || self.wheel != 0 || self.pan != 0
    }

    /// Overwrite the pending deltas.
    pub fn set_motion(&mut self, motion: Motion) {
        self.x = motion.dx;
        self.y = motion.dy;
        self.wheel = motion.wheel;
        self.pan = motion.pan;
    }

    /// Zero the deltas once they have been sent.
    pub fn clear_motion(&mut self) {
        self.set_motion(Motion::default());
    }

    /// Replace the button bits. Returns whether they changed.
    pub fn set_buttons(&mut self, mask: u8) -> bool {
        let mask = mask & BUTTON_MASK;
        let changed = self.buttons != mask;
        self.buttons = mask;
        changed
    }

    /// Set or clear button `n` (0 = left, 1 = right, 2 = middle).
    /// Returns whether the bit changed; unknown buttons are ignored.
    pub fn set_button(&mut self, n: u8, pressed: bool) -> bool {
        if n > 2 {
            return false;
        }
        let bit = 1 << n;
        if pressed {
            self.set_buttons(self.buttons | bit)
        } else {
            self.set_buttons(self.buttons & !bit)
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written ([`POINTER_REPORT_SIZE`]).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < POINTER_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        let mut n = 3;
        if cfg!(feature = "wheel") {
            buf[n] = self.wheel as u8;
            n += 1;
        }
        if cfg!(feature = "pan") {
            buf[n] = self.pan as u8;
            n += 1;
        }
        n
    }

    /// The report as it goes on the wire.
    pub fn to_bytes(&self) -> [u8; POINTER_REPORT_SIZE] {
        let mut buf = [0u8; POINTER_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }
}

// USB HID report descriptor for a boot-protocol mouse

#[rustfmt::skip]
const BUTTONS: [u8; 32] = [
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant) - padding
];

const AXES: u8 = 2 + cfg!(feature = "wheel") as u8;

#[rustfmt::skip]
const AXES_HEAD: [u8; 10] = [
    0x75, 0x08, //     Report Size (8)
    0x95, AXES, //     Report Count (2 or 3)
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
];

const WHEEL: [u8; 2] = [
    0x09, 0x38, //     Usage (Wheel)
];

#[rustfmt::skip]
const AXES_TAIL: [u8; 6] = [
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x81, 0x06, //     Input (Data, Variable, Relative)
];

#[rustfmt::skip]
const PAN: [u8; 15] = [
    0x05, 0x0C,       //     Usage Page (Consumer)
    0x0A, 0x38, 0x02, //     Usage (AC Pan)
    0x15, 0x81,       //     Logical Minimum (-127)
    0x25, 0x7F,       //     Logical Maximum (127)
    0x75, 0x08,       //     Report Size (8)
    0x95, 0x01,       //     Report Count (1)
    0x81, 0x06,       //     Input (Data, Variable, Relative)
];

const END: [u8; 2] = [
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];

const MOUSE_DESC_LEN: usize = BUTTONS.len()
    + AXES_HEAD.len()
    + if cfg!(feature = "wheel") { WHEEL.len() } else { 0 }
    + AXES_TAIL.len()
    + if cfg!(feature = "pan") { PAN.len() } else { 0 }
    + END.len();

macro_rules! put {
    ($out:ident, $at:ident, $part:expr) => {{
        let part = $part;
        let mut i = 0;
        while i < part.len() {
            $out[$at] = part[i];
            $at += 1;
            i += 1;
        }
    }};
}

const fn build_mouse_descriptor() -> [u8; MOUSE_DESC_LEN] {
    let mut out = [0u8; MOUSE_DESC_LEN];
    let mut at = 0;
    put!(out, at, BUTTONS);
    put!(out, at, AXES_HEAD);
    if cfg!(feature = "wheel") {
        put!(out, at, WHEEL);
    }
    put!(out, at, AXES_TAIL);
    if cfg!(feature = "pan") {
        put!(out, at, PAN);
    }
    put!(out, at, END);
    out
}

const MOUSE_DESC: [u8; MOUSE_DESC_LEN] = build_mouse_descriptor();

/// USB HID Report Descriptor for a 3-button mouse, with the wheel and
/// pan axes this build declares.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &MOUSE_DESC;
