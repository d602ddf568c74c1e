//! HID report types and the per-interface vocabulary shared by the
//! report model and the control dispatcher.

pub mod descriptor;
pub mod keyboard;
pub mod led;
pub mod mouse;

#[cfg(test)]
mod tests;

use core::ops::{Index, IndexMut};

use keyboard::{KeyboardReport, KEYBOARD_REPORT_SIZE};
use mouse::{PointerReport, BOOT_POINTER_REPORT_SIZE, POINTER_REPORT_SIZE};

/// The two HID interfaces of the composite device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    Keyboard,
    Pointer,
}

impl Interface {
    pub const ALL: [Interface; 2] = [Interface::Keyboard, Interface::Pointer];
}

/// A value per HID interface, indexed by [`Interface`].
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct ByInterface<T> {
    pub keyboard: T,
    pub pointer: T,
}

impl<T> ByInterface<T> {
    pub const fn new(keyboard: T, pointer: T) -> Self {
        Self { keyboard, pointer }
    }

    /// Interface whose value satisfies `pred`, keyboard first.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<Interface> {
        Interface::ALL.into_iter().find(|&iface| pred(&self[iface]))
    }
}

impl<T> Index<Interface> for ByInterface<T> {
    type Output = T;

    fn index(&self, iface: Interface) -> &T {
        match iface {
            Interface::Keyboard => &self.keyboard,
            Interface::Pointer => &self.pointer,
        }
    }
}

impl<T> IndexMut<Interface> for ByInterface<T> {
    fn index_mut(&mut self, iface: Interface) -> &mut T {
        match iface {
            Interface::Keyboard => &mut self.keyboard,
            Interface::Pointer => &mut self.pointer,
        }
    }
}

/// Active HID protocol of an interface.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum HidProtocol {
    Boot = 0x00,
    #[default]
    Report = 0x01,
}

impl TryFrom<u8> for HidProtocol {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0x00 => Ok(HidProtocol::Boot),
            0x01 => Ok(HidProtocol::Report),
            other => Err(other),
        }
    }
}

/// Report type carried in the high byte of wValue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportType {
    Input,
    Output,
    Feature,
    Reserved(u8),
}

impl From<u8> for ReportType {
    fn from(code: u8) -> Self {
        match code {
            0x01 => ReportType::Input,
            0x02 => ReportType::Output,
            0x03 => ReportType::Feature,
            other => ReportType::Reserved(other),
        }
    }
}

/// A device-to-host report held by the model.
pub trait InputReport: Copy + Default {
    /// Largest serialised size.
    const SIZE: usize;

    /// Serialise for `protocol` into `buf`. Returns the bytes written,
    /// or 0 if `buf` is too small.
    fn write_for(&self, protocol: HidProtocol, buf: &mut [u8]) -> usize;

    /// Drop the transient parts of the report once it has been sent.
    fn mark_sent(&mut self) {}
}

impl InputReport for KeyboardReport {
    const SIZE: usize = KEYBOARD_REPORT_SIZE;

    fn write_for(&self, _protocol: HidProtocol, buf: &mut [u8]) -> usize {
        self.serialize(buf)
    }
}

impl InputReport for PointerReport {
    const SIZE: usize = POINTER_REPORT_SIZE;

    fn write_for(&self, protocol: HidProtocol, buf: &mut [u8]) -> usize {
        let n = self.serialize(buf);
        match protocol {
            HidProtocol::Boot if n > 0 => BOOT_POINTER_REPORT_SIZE,
            _ => n,
        }
    }

    fn mark_sent(&mut self) {
        self.clear_motion();
    }
}

/// Largest report any interface sends.
pub const MAX_INPUT_REPORT_SIZE: usize = KEYBOARD_REPORT_SIZE;

const _: () = assert!(POINTER_REPORT_SIZE <= MAX_INPUT_REPORT_SIZE);
