//! Transport seams between the translator core and the hardware.
//!
//! The firmware implements these over the nRF52840 UARTEs and the USB
//! interrupt IN endpoints; tests implement them over in-memory buffers.

use crate::error::Error;

/// Receive half of a Sun serial line.
#[allow(async_fn_in_trait)]
pub trait SerialRx {
    /// Wait for the next byte from the device.
    async fn read_byte(&mut self) -> Result<u8, Error>;
}

/// Transmit half of a Sun serial line.
#[allow(async_fn_in_trait)]
pub trait SerialTx {
    /// Write every byte of `data`, in order.
    async fn write_all(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// An interrupt IN endpoint.
#[allow(async_fn_in_trait)]
pub trait ReportSink {
    /// Queue `report` and wait until the host has taken it.
    ///
    /// Returns [`Error::EndpointDisabled`] if the endpoint is not
    /// configured, [`Error::Usb`] for any other transfer failure.
    async fn send_report(&mut self, report: &[u8]) -> Result<(), Error>;
}
