//! HID class control requests (device class definition for HID 1.11,
//! section 7.2) and the HID-specific standard GET_DESCRIPTOR requests.
//!
//! Called from the USB stack's control callbacks, which run
//! synchronously; everything here only touches the report model's
//! blocking state guards.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::hid::descriptor::{hid_class_descriptor, DESC_TYPE_HID, DESC_TYPE_REPORT, HID_DESC_LEN};
use crate::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use crate::hid::led::LedReport;
use crate::hid::mouse::MOUSE_REPORT_DESCRIPTOR;
use crate::hid::{HidProtocol, Interface, ReportType};
use crate::model::ReportModel;
use crate::transport::ReportSink;

// Class request codes (bRequest)

pub const GET_REPORT: u8 = 0x01;
pub const GET_IDLE: u8 = 0x02;
pub const GET_PROTOCOL: u8 = 0x03;
pub const SET_REPORT: u8 = 0x09;
pub const SET_IDLE: u8 = 0x0A;
pub const SET_PROTOCOL: u8 = 0x0B;

/// HID class descriptor of the keyboard interface.
pub static KEYBOARD_HID_DESCRIPTOR: [u8; HID_DESC_LEN] =
    hid_class_descriptor(KEYBOARD_REPORT_DESCRIPTOR.len());

/// HID class descriptor of the pointer interface.
pub static MOUSE_HID_DESCRIPTOR: [u8; HID_DESC_LEN] =
    hid_class_descriptor(MOUSE_REPORT_DESCRIPTOR.len());

/// The request is not supported; the USB stack answers with a STALL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rejected;

/// Answer a device-to-host class request on `iface`.
///
/// Writes the response into `buf` and returns its length.
pub fn handle_in<M: RawMutex, S: ReportSink>(
    model: &ReportModel<M, S>,
    iface: Interface,
    request: u8,
    value: u16,
    buf: &mut [u8],
) -> Result<usize, Rejected> {
    match request {
        GET_REPORT => {
            let report_type = ReportType::from((value >> 8) as u8);
            if report_type != ReportType::Input {
                return Err(Rejected);
            }
            match model.read_report(iface, buf) {
                0 => Err(Rejected),
                n => Ok(n),
            }
        }
        GET_IDLE => write_byte(buf, model.idle_rate(iface)),
        GET_PROTOCOL => write_byte(buf, model.protocol(iface) as u8),
        _ => Err(Rejected),
    }
}

/// Apply a host-to-device class request on `iface`.
///
/// Returns the new LED state when the request was a keyboard
/// SET_REPORT(Output); the caller forwards it to the keyboard.
pub fn handle_out<M: RawMutex, S: ReportSink>(
    model: &ReportModel<M, S>,
    iface: Interface,
    request: u8,
    value: u16,
    data: &[u8],
) -> Result<Option<LedReport>, Rejected> {
    match request {
        SET_REPORT => {
            let report_type = ReportType::from((value >> 8) as u8);
            if iface != Interface::Keyboard || report_type != ReportType::Output {
                return Err(Rejected);
            }
            let leds = LedReport::from_bytes(data).ok_or(Rejected)?;
            model.set_output_report(leds);
            Ok(Some(leds))
        }
        SET_IDLE => {
            model.set_idle_rate(iface, (value >> 8) as u8);
            Ok(None)
        }
        SET_PROTOCOL => {
            let protocol = HidProtocol::try_from(value as u8).map_err(|_| Rejected)?;
            model.set_protocol(iface, protocol);
            Ok(None)
        }
        _ => Err(Rejected),
    }
}

/// Answer a standard GET_DESCRIPTOR addressed to `iface` for one of
/// the HID descriptor types. `value` is the request's wValue.
pub fn get_descriptor(iface: Interface, value: u16) -> Option<&'static [u8]> {
    match ((value >> 8) as u8, iface) {
        (DESC_TYPE_HID, Interface::Keyboard) => Some(&KEYBOARD_HID_DESCRIPTOR),
        (DESC_TYPE_HID, Interface::Pointer) => Some(&MOUSE_HID_DESCRIPTOR),
        (DESC_TYPE_REPORT, Interface::Keyboard) => Some(KEYBOARD_REPORT_DESCRIPTOR),
        (DESC_TYPE_REPORT, Interface::Pointer) => Some(MOUSE_REPORT_DESCRIPTOR),
        _ => None,
    }
}

fn write_byte(buf: &mut [u8], byte: u8) -> Result<usize, Rejected> {
    let slot = buf.first_mut().ok_or(Rejected)?;
    *slot = byte;
    Ok(1)
}
