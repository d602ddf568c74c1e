//! Sun mouse line: Mouse Systems frame decoder and driver loop.
//!
//! A frame is five bytes: a sync byte `0b1000_0LMR` (buttons active
//! low), then two (dx, dy) pairs. Y grows upwards on the wire and
//! downwards in HID, so it is negated. Both axes are clamped to the
//! -127..=127 range the report descriptor declares.

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::check;
use crate::error::Error;
use crate::hid::mouse::Motion;
use crate::model::ReportModel;
use crate::transport::{ReportSink, SerialRx};
use crate::xlate::sun2hid_mousebuttons;

const SYNC_MASK: u8 = 0xF8;
const SYNC: u8 = 0x80;

/// Whether `byte` can start a frame.
pub fn is_sync(byte: u8) -> bool {
    byte & SYNC_MASK == SYNC
}

/// One half-frame: the buttons and one movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseEvent {
    /// HID button bits.
    pub buttons: u8,
    pub motion: Motion,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    Sync,
    Dx,
    Dy,
}

/// Sans-IO state machine for the mouse byte stream.
#[derive(Clone, Debug)]
pub struct MouseDecoder {
    expect: Expect,
    /// Second pair of the frame still to come.
    second: bool,
    buttons: u8,
    dx: i8,
}

impl Default for MouseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseDecoder {
    pub const fn new() -> Self {
        Self {
            expect: Expect::Sync,
            second: false,
            buttons: 0,
            dx: 0,
        }
    }

    /// Feed one byte. Returns an event after each (dx, dy) pair.
    pub fn feed(&mut self, byte: u8) -> Option<MouseEvent> {
        match self.expect {
            Expect::Sync => {
                if is_sync(byte) {
                    self.buttons = sun2hid_mousebuttons(byte);
                    self.second = false;
                    self.expect = Expect::Dx;
                }
                None
            }
            Expect::Dx => {
                self.dx = (byte as i8).max(-127);
                self.expect = Expect::Dy;
                None
            }
            Expect::Dy => {
                let dy = (byte as i8).saturating_neg();
                if self.second {
                    self.expect = Expect::Sync;
                } else {
                    self.second = true;
                    self.expect = Expect::Dx;
                }
                Some(MouseEvent {
                    buttons: self.buttons,
                    motion: Motion::new(self.dx, dy),
                })
            }
        }
    }
}

/// Mouse driver loop: one pointer report per half-frame. Returns only
/// when the serial line fails or the report sink fails fatally.
pub async fn run<M, S, R>(model: &ReportModel<M, S>, rx: &mut R) -> Result<Infallible, Error>
where
    M: RawMutex,
    S: ReportSink,
    R: SerialRx,
{
    let mut decoder = MouseDecoder::new();
    loop {
        let byte = rx.read_byte().await?;
        if let Some(event) = decoder.feed(byte) {
            model.set_buttons(event.buttons);
            check(model.move_by(event.motion).await)?;
        }
    }
}
