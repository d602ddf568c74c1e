//! Keyboard LED output report (host -> device).
//!
//! Layout (1 byte):
//! ```text
//! Bit 0 = Num Lock, Bit 1 = Caps Lock, Bit 2 = Scroll Lock,
//! Bit 3 = Compose,  Bit 4 = Kana,      Bits 5-7 reserved
//! ```

use crate::xlate;

/// LED output report size in bytes.
pub const LED_REPORT_SIZE: usize = 1;

/// State of the five HID keyboard LEDs.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedReport(pub u8);

impl LedReport {
    pub const NUM_LOCK: u8 = 0x01;
    pub const CAPS_LOCK: u8 = 0x02;
    pub const SCROLL_LOCK: u8 = 0x04;
    pub const COMPOSE: u8 = 0x08;
    pub const KANA: u8 = 0x10;

    /// Parse an output report. Exactly one byte is accepted; reserved
    /// bits are masked off.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        match data {
            [leds] => Some(Self(leds & 0x1F)),
            _ => None,
        }
    }

    pub fn num_lock(&self) -> bool {
        self.0 & Self::NUM_LOCK != 0
    }

    pub fn caps_lock(&self) -> bool {
        self.0 & Self::CAPS_LOCK != 0
    }

    pub fn scroll_lock(&self) -> bool {
        self.0 & Self::SCROLL_LOCK != 0
    }

    pub fn compose(&self) -> bool {
        self.0 & Self::COMPOSE != 0
    }

    pub fn kana(&self) -> bool {
        self.0 & Self::KANA != 0
    }

    /// LED mask in the Sun keyboard's bit order.
    pub fn to_sun(&self) -> u8 {
        xlate::hid2sun_leds(self.0)
    }
}
