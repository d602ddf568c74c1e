//! HID class descriptor and standard descriptor request codes.

/// bDescriptorType of the HID class descriptor.
pub const DESC_TYPE_HID: u8 = 0x21;
/// bDescriptorType of a HID report descriptor.
pub const DESC_TYPE_REPORT: u8 = 0x22;

/// USB class code for HID interfaces.
pub const USB_CLASS_HID: u8 = 0x03;
/// Boot interface subclass.
pub const USB_SUBCLASS_BOOT: u8 = 0x01;
/// Boot interface protocol: keyboard.
pub const USB_PROTOCOL_KEYBOARD: u8 = 0x01;
/// Boot interface protocol: mouse.
pub const USB_PROTOCOL_MOUSE: u8 = 0x02;

/// HID class descriptor length.
pub const HID_DESC_LEN: usize = 9;

/// Build the 9-byte HID class descriptor announcing one report
/// descriptor of `report_len` bytes (HID 1.10, no country code).
pub const fn hid_class_descriptor(report_len: usize) -> [u8; HID_DESC_LEN] {
    [
        HID_DESC_LEN as u8,        // bLength
        DESC_TYPE_HID,             // bDescriptorType
        0x10,                      // bcdHID 1.10
        0x01,                      //
        0x00,                      // bCountryCode
        0x01,                      // bNumDescriptors
        DESC_TYPE_REPORT,          // bDescriptorType
        (report_len & 0xFF) as u8, // wDescriptorLength
        ((report_len >> 8) & 0xFF) as u8,
    ]
}
