//! Application-wide constants and compile-time configuration.
//!
//! USB identity, serial line parameters and Sun keyboard command bytes
//! live here so they can be tuned in one place.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x5D11;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "sun2usb";
pub const USB_PRODUCT: &str = "Sun Keyboard/Mouse to USB HID";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms) for both interrupt IN endpoints.
pub const USB_HID_POLL_MS: u8 = 10;

/// Max packet size of the HID interrupt IN endpoints.
pub const USB_HID_MAX_PACKET: u16 = 8;

// Serial lines

/// Time the keyboard gets to finish its power-on self test before we
/// send a reset of our own (ms).
pub const SETTLE_DELAY_MS: u32 = 250;

// Sun keyboard commands (host -> keyboard)

pub const CMD_RESET: u8 = 0x01;
pub const CMD_BELL_ON: u8 = 0x02;
pub const CMD_BELL_OFF: u8 = 0x03;
pub const CMD_CLICK_ON: u8 = 0x0A;
pub const CMD_CLICK_OFF: u8 = 0x0B;
pub const CMD_SET_LEDS: u8 = 0x0E;
pub const CMD_LAYOUT: u8 = 0x0F;

// Sun keyboard responses (keyboard -> host)

/// Reset acknowledgement, followed by one status byte.
pub const RESP_RESET: u8 = 0xFF;
/// Layout response, followed by the DIP-switch layout byte.
pub const RESP_LAYOUT: u8 = 0xFE;
/// Self-test failure, followed by one error code.
pub const RESP_SELF_TEST_FAILED: u8 = 0x7E;
/// All keys released.
pub const RESP_IDLE: u8 = 0x7F;

/// Status byte a healthy keyboard sends after [`RESP_RESET`].
pub const RESET_OK: u8 = 0x04;
