//! USB Device subsystem - presents a composite HID device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  We create a **composite device** with two HID
//! interfaces:
//!
//! - Interface 0: Keyboard (boot protocol)
//! - Interface 1: Mouse    (boot protocol)
//!
//! Reports are written to the endpoints by the report model; class
//! requests are answered from the same model.

pub mod hid_device;
