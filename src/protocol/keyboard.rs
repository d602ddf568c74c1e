//! Sun keyboard line: byte classifier and driver loop.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;

use super::{check, send_command, Command};
use crate::config;
use crate::error::Error;
use crate::hid::led::LedReport;
use crate::model::ReportModel;
use crate::transport::{ReportSink, SerialRx, SerialTx};
use crate::xlate::sun2hid_keycode;

/// Release flag of a key transition byte.
const KEY_UP: u8 = 0x80;

/// What a keyboard byte (or byte pair) meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardEvent {
    /// Reset acknowledged, with the status byte that followed.
    ResetAck(u8),
    /// Layout response, with the layout byte.
    Layout(u8),
    /// The keyboard's self test failed with this error code.
    SelfTestFailed(u8),
    /// Every key is up.
    AllKeysUp,
    /// Key with this 7-bit scancode went down.
    KeyDown(u8),
    /// Key with this 7-bit scancode went up.
    KeyUp(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    None,
    ResetStatus,
    LayoutByte,
    ErrorCode,
}

/// Sans-IO state machine for the keyboard byte stream.
#[derive(Clone, Debug)]
pub struct KeyboardDecoder {
    pending: Pending,
    layout: Option<u8>,
}

impl Default for KeyboardDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardDecoder {
    pub const fn new() -> Self {
        Self {
            pending: Pending::None,
            layout: None,
        }
    }

    /// Last layout the keyboard reported, if any.
    pub fn layout(&self) -> Option<u8> {
        self.layout
    }

    /// Classify one byte. Response prefixes return `None`; the event
    /// comes with the byte that follows them.
    pub fn feed(&mut self, byte: u8) -> Option<KeyboardEvent> {
        let pending = core::mem::replace(&mut self.pending, Pending::None);
        match pending {
            Pending::ResetStatus => return Some(KeyboardEvent::ResetAck(byte)),
            Pending::LayoutByte => {
                self.layout = Some(byte);
                return Some(KeyboardEvent::Layout(byte));
            }
            Pending::ErrorCode => return Some(KeyboardEvent::SelfTestFailed(byte)),
            Pending::None => {}
        }

        match byte {
            config::RESP_RESET => {
                self.pending = Pending::ResetStatus;
                None
            }
            config::RESP_LAYOUT => {
                self.pending = Pending::LayoutByte;
                None
            }
            config::RESP_SELF_TEST_FAILED => {
                self.pending = Pending::ErrorCode;
                None
            }
            config::RESP_IDLE => Some(KeyboardEvent::AllKeysUp),
            b if b & KEY_UP != 0 => Some(KeyboardEvent::KeyUp(b & !KEY_UP)),
            b => Some(KeyboardEvent::KeyDown(b)),
        }
    }
}

/// Forward the host's LED state to the keyboard.
///
/// Takes the TX lock for the duration of the write so the two command
/// bytes are never interleaved with other commands.
pub async fn set_leds<M: RawMutex, T: SerialTx>(
    tx: &Mutex<M, T>,
    leds: LedReport,
) -> Result<(), Error> {
    let mut tx = tx.lock().await;
    send_command(&mut *tx, Command::SetLeds(leds.to_sun())).await
}

/// Keyboard driver loop.
///
/// Waits for the keyboard to settle, resets it, then translates every
/// key transition into a report. Returns only when the serial line
/// fails or the report sink fails fatally.
pub async fn run<M, S, R, T, D>(
    model: &ReportModel<M, S>,
    rx: &mut R,
    tx: &Mutex<M, T>,
    delay: &mut D,
) -> Result<Infallible, Error>
where
    M: RawMutex,
    S: ReportSink,
    R: SerialRx,
    T: SerialTx,
    D: DelayNs,
{
    delay.delay_ms(config::SETTLE_DELAY_MS).await;
    send_command(&mut *tx.lock().await, Command::Reset).await?;

    let mut decoder = KeyboardDecoder::new();
    let mut layout_requested = false;

    loop {
        let byte = rx.read_byte().await?;
        let Some(event) = decoder.feed(byte) else {
            continue;
        };

        match event {
            KeyboardEvent::ResetAck(_status) => {
                #[cfg(feature = "defmt")]
                if _status == config::RESET_OK {
                    defmt::info!("keyboard reset ok");
                } else {
                    defmt::warn!("keyboard reset status {=u8:#x}", _status);
                }
                if !layout_requested {
                    layout_requested = true;
                    send_command(&mut *tx.lock().await, Command::Layout).await?;
                }
            }
            KeyboardEvent::Layout(_layout) => {
                #[cfg(feature = "defmt")]
                defmt::info!("keyboard layout {=u8:#x}", _layout);
            }
            KeyboardEvent::SelfTestFailed(_code) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("keyboard self test failed: {=u8:#x}", _code);
            }
            KeyboardEvent::AllKeysUp => check(model.release_all().await)?,
            KeyboardEvent::KeyDown(scancode) => match sun2hid_keycode(scancode) {
                0 => {}
                usage => check(model.press(usage).await)?,
            },
            KeyboardEvent::KeyUp(scancode) => match sun2hid_keycode(scancode) {
                0 => {}
                usage => check(model.release(usage).await)?,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(decoder: &mut KeyboardDecoder, bytes: &[u8]) -> heapless::Vec<KeyboardEvent, 16> {
        bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    #[test]
    fn key_transitions() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.feed(0x4D), Some(KeyboardEvent::KeyDown(0x4D)));
        assert_eq!(decoder.feed(0xCD), Some(KeyboardEvent::KeyUp(0x4D)));
    }

    #[test]
    fn idle_marker_means_all_keys_up() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.feed(0x7F), Some(KeyboardEvent::AllKeysUp));
    }

    #[test]
    fn responses_consume_exactly_one_byte() {
        let mut decoder = KeyboardDecoder::new();
        let events = feed_all(&mut decoder, &[0xFF, 0x04, 0x4D, 0x7E, 0x01, 0xCD]);
        assert_eq!(
            events[..],
            [
                KeyboardEvent::ResetAck(0x04),
                KeyboardEvent::KeyDown(0x4D),
                KeyboardEvent::SelfTestFailed(0x01),
                KeyboardEvent::KeyUp(0x4D),
            ]
        );
    }

    #[test]
    fn byte_after_prefix_is_never_a_key() {
        // 0x7F after 0xFF is a status byte, not the idle marker.
        let mut decoder = KeyboardDecoder::new();
        let events = feed_all(&mut decoder, &[0xFF, 0x7F, 0xFE, 0xFF]);
        assert_eq!(
            events[..],
            [KeyboardEvent::ResetAck(0x7F), KeyboardEvent::Layout(0xFF)]
        );
    }

    #[test]
    fn layout_is_remembered() {
        let mut decoder = KeyboardDecoder::new();
        assert_eq!(decoder.layout(), None);
        feed_all(&mut decoder, &[0xFE, 0x21]);
        assert_eq!(decoder.layout(), Some(0x21));
        feed_all(&mut decoder, &[0xFE, 0x00]);
        assert_eq!(decoder.layout(), Some(0x00));
    }
}
