//! Unified error type for sun2usb.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the translator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Serial
    /// The serial line stopped delivering bytes (framing/overrun/closed).
    SerialRead,

    /// A write to the serial line failed.
    SerialWrite,

    // USB
    /// The interrupt IN endpoint is not enabled (host not configured).
    EndpointDisabled,

    /// The USB stack rejected the transfer.
    Usb,

    // Report model
    /// All six key slots are taken; the new key was dropped.
    KeyRollover,
}

impl Error {
    /// Whether the error ends the loop that hit it.
    ///
    /// Transport failures are fatal; a disabled endpoint or a full key
    /// table only costs one report.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::SerialRead | Error::SerialWrite | Error::Usb)
    }
}
