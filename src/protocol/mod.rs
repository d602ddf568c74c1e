//! Sun serial device protocol.
//!
//! ```text
//!  keyboard line (1200 8N1)          mouse line (1200 8N1)
//!  ─────────────────────────         ──────────────────────
//!  0xFF st   reset ack               0b10000LMR dx1 dy1 dx2 dy2
//!  0xFE lay  layout response         (Mouse Systems frame,
//!  0x7E err  self-test failed         buttons active low)
//!  0x7F      all keys up
//!  kk        key down (bit 7 clear)
//!  0x80|kk   key up
//! ```
//!
//! Each line has a sans-IO decoder (`feed` one byte, get at most one
//! event) and an async `run` loop that drives the report model.

pub mod keyboard;
pub mod mouse;

use crate::config;
use crate::error::Error;
use crate::transport::SerialTx;

/// Host-to-keyboard commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Reset and self test; answered with `0xFF 0x04`.
    Reset,
    /// Bell on (`true`) or off.
    Bell(bool),
    /// Key click on (`true`) or off.
    Click(bool),
    /// Set the LEDs to a mask in the keyboard's bit order.
    SetLeds(u8),
    /// Ask for the layout DIP switches; answered with `0xFE lay`.
    Layout,
}

impl Command {
    /// Encode into `buf`, returning the bytes to send.
    pub fn encode(self, buf: &mut [u8; 2]) -> &[u8] {
        let len = match self {
            Command::Reset => {
                buf[0] = config::CMD_RESET;
                1
            }
            Command::Bell(on) => {
                buf[0] = if on {
                    config::CMD_BELL_ON
                } else {
                    config::CMD_BELL_OFF
                };
                1
            }
            Command::Click(on) => {
                buf[0] = if on {
                    config::CMD_CLICK_ON
                } else {
                    config::CMD_CLICK_OFF
                };
                1
            }
            Command::SetLeds(mask) => {
                buf[0] = config::CMD_SET_LEDS;
                buf[1] = mask;
                2
            }
            Command::Layout => {
                buf[0] = config::CMD_LAYOUT;
                1
            }
        };
        &buf[..len]
    }
}

/// Send one command in a single write.
pub async fn send_command<T: SerialTx>(tx: &mut T, command: Command) -> Result<(), Error> {
    let mut buf = [0u8; 2];
    tx.write_all(command.encode(&mut buf)).await
}

/// Pass fatal errors through; log and swallow the rest.
pub(crate) fn check(result: Result<(), Error>) -> Result<(), Error> {
    match result {
        Err(err) if err.is_fatal() => Err(err),
        Err(_err) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("report dropped: {}", _err);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}
