//! Sun keyboard/mouse to USB HID translator.
//!
//! This library holds everything that does not touch the hardware: the
//! Sun protocol decoders, the scancode tables, the HID report model and
//! the HID class request dispatcher. It builds for the host so the
//! logic can be tested there.
//!
//! Usage: `cargo test --lib` or `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and implements the transport traits over the nRF52840 peripherals.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod error;
pub mod hid;
pub mod model;
pub mod protocol;
pub mod transport;
pub mod xlate;

pub use error::Error;
pub use hid::{ByInterface, HidProtocol, Interface};
pub use model::ReportModel;
