//! Unit tests for HID report state and serialization.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of key slot bookkeeping, pointer deltas and descriptors.

use super::descriptor::hid_class_descriptor;
use super::keyboard::{KeyboardReport, KEYBOARD_REPORT_DESCRIPTOR};
use super::led::LedReport;
use super::mouse::{
    Motion, PointerReport, BOOT_POINTER_REPORT_SIZE, MOUSE_REPORT_DESCRIPTOR, POINTER_REPORT_SIZE,
};
use super::{ByInterface, HidProtocol, InputReport, Interface, ReportType};
use crate::error::Error;

const A: u8 = 0x04;
const B: u8 = 0x05;
const LEFT_SHIFT: u8 = 0xE1;
const RIGHT_GUI: u8 = 0xE7;

// ═══════════════════════════════════════════════════════════════════════════
// Keyboard Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_report_empty() {
    let report = KeyboardReport::empty();
    assert!(report.is_empty());
    assert_eq!(report.to_bytes(), [0; 8]);
}

#[test]
fn keyboard_press_claims_first_free_slot() {
    let mut report = KeyboardReport::empty();
    assert_eq!(report.press(A), Ok(true));
    assert_eq!(report.press(B), Ok(true));
    assert_eq!(report.keycodes, [A, B, 0, 0, 0, 0]);
}

#[test]
fn keyboard_press_twice_is_noop() {
    let mut report = KeyboardReport::empty();
    report.press(A).unwrap();
    assert_eq!(report.press(A), Ok(false));
    assert_eq!(report.keycodes, [A, 0, 0, 0, 0, 0]);
}

#[test]
fn keyboard_modifiers_use_bits_not_slots() {
    let mut report = KeyboardReport::empty();
    assert_eq!(report.press(LEFT_SHIFT), Ok(true));
    assert_eq!(report.press(RIGHT_GUI), Ok(true));
    assert_eq!(report.modifier, 0x82);
    assert_eq!(report.keycodes, [0; 6]);
    assert!(report.is_modifier_set(LEFT_SHIFT));
    assert!(!report.is_modifier_set(0xE0));
    assert!(!report.is_modifier_set(A));

    assert_eq!(report.press(LEFT_SHIFT), Ok(false));
    assert!(report.release(LEFT_SHIFT));
    assert_eq!(report.modifier, 0x80);
}

#[test]
fn keyboard_release_leaves_other_slots_in_place() {
    let mut report = KeyboardReport::empty();
    for usage in [A, B, 0x06, 0x07] {
        report.press(usage).unwrap();
    }
    assert!(report.release(B));
    assert_eq!(report.keycodes, [A, 0, 0x06, 0x07, 0, 0]);

    // The hole is reused by the next press.
    report.press(0x08).unwrap();
    assert_eq!(report.keycodes, [A, 0x08, 0x06, 0x07, 0, 0]);
}

#[test]
fn keyboard_release_unpressed_is_noop() {
    let mut report = KeyboardReport::empty();
    report.press(A).unwrap();
    let before = report;
    assert!(!report.release(B));
    assert!(!report.release(LEFT_SHIFT));
    assert_eq!(report, before);
}

#[test]
fn keyboard_seventh_key_is_dropped() {
    let mut report = KeyboardReport::empty();
    for usage in 0x04..0x0A {
        report.press(usage).unwrap();
    }
    let full = report;
    assert_eq!(report.press(0x0A), Err(Error::KeyRollover));
    assert_eq!(report, full);

    // Already-pressed keys and modifiers still work when full.
    assert_eq!(report.press(0x04), Ok(false));
    assert_eq!(report.press(LEFT_SHIFT), Ok(true));
}

#[test]
fn keyboard_usage_zero_is_ignored() {
    let mut report = KeyboardReport::empty();
    assert_eq!(report.press(0), Ok(false));
    assert!(!report.release(0));
    assert!(report.is_empty());
}

#[test]
fn keyboard_slots_match_pressed_set_in_any_order() {
    let keys = [0x04, 0x1D, 0x2C, 0x28, 0x10, 0x39];
    let orders: [[usize; 6]; 3] = [[0, 1, 2, 3, 4, 5], [5, 4, 3, 2, 1, 0], [2, 0, 5, 1, 3, 4]];
    for order in orders {
        let mut report = KeyboardReport::empty();
        for &i in &order {
            report.press(keys[i]).unwrap();
        }
        // Release every other key in this order.
        for &i in order.iter().step_by(2) {
            assert!(report.release(keys[i]));
        }
        for &i in &order {
            let expect_down = !order.iter().step_by(2).any(|&r| r == i);
            assert_eq!(report.slot_of(keys[i]).is_some(), expect_down);
        }
        assert_eq!(report.keycodes.iter().filter(|&&k| k != 0).count(), 3);
    }
}

#[test]
fn keyboard_clear_reports_prior_state() {
    let mut report = KeyboardReport::empty();
    assert!(!report.clear());
    report.press(A).unwrap();
    report.press(LEFT_SHIFT).unwrap();
    assert!(report.clear());
    assert!(report.is_empty());
}

#[test]
fn keyboard_report_serialize() {
    let mut report = KeyboardReport::empty();
    report.press(LEFT_SHIFT).unwrap();
    report.press(A).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(report.serialize(&mut buf), 8);
    assert_eq!(buf, [0x02, 0x00, A, 0, 0, 0, 0, 0]);
}

#[test]
fn keyboard_report_serialize_buffer_too_small() {
    let report = KeyboardReport::empty();
    let mut small_buf = [0u8; 4];
    assert_eq!(report.serialize(&mut small_buf), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Pointer Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn pointer_report_empty() {
    let report = PointerReport::empty();
    assert!(report.is_idle());
    assert_eq!(report.to_bytes(), [0; POINTER_REPORT_SIZE]);
}

#[test]
fn pointer_motion_is_transient() {
    let mut report = PointerReport::empty();
    report.set_motion(Motion::new(10, -5).with_wheel(1));
    assert!(report.has_motion());
    let bytes = report.to_bytes();
    assert_eq!(bytes[1] as i8, 10);
    assert_eq!(bytes[2] as i8, -5);

    report.clear_motion();
    assert!(!report.has_motion());
}

#[test]
fn pointer_buttons_masked_to_three_bits() {
    let mut report = PointerReport::empty();
    assert!(report.set_buttons(0xFF));
    assert_eq!(report.buttons, 0x07);
    assert!(!report.set_buttons(0x07));
}

#[test]
fn pointer_single_button_updates() {
    let mut report = PointerReport::empty();
    assert!(report.set_button(0, true));
    assert!(report.set_button(2, true));
    assert_eq!(report.buttons, 0x05);
    assert!(!report.set_button(2, true));
    assert!(report.set_button(0, false));
    assert_eq!(report.buttons, 0x04);
    assert!(!report.set_button(3, true));
}

#[test]
fn pointer_boot_protocol_truncates() {
    let mut report = PointerReport::empty();
    report.set_motion(Motion::new(1, 2).with_wheel(3).with_pan(4));
    let mut buf = [0u8; 8];
    assert_eq!(
        report.write_for(HidProtocol::Boot, &mut buf),
        BOOT_POINTER_REPORT_SIZE
    );
    assert_eq!(
        report.write_for(HidProtocol::Report, &mut buf),
        POINTER_REPORT_SIZE
    );
}

#[cfg(all(feature = "wheel", not(feature = "pan")))]
#[test]
fn pointer_report_wheel_layout() {
    let mut report = PointerReport::empty();
    report.set_buttons(0x01);
    report.set_motion(Motion::new(-1, 1).with_wheel(-3).with_pan(9));
    assert_eq!(report.to_bytes(), [0x01, 0xFF, 0x01, 0xFD]);
}

#[cfg(all(feature = "wheel", feature = "pan"))]
#[test]
fn pointer_report_wheel_then_pan_layout() {
    let mut report = PointerReport::empty();
    report.set_buttons(0x01);
    report.set_motion(Motion::new(-1, 1).with_wheel(-3).with_pan(2));
    assert_eq!(report.to_bytes(), [0x01, 0xFF, 0x01, 0xFD, 0x02]);
}

#[cfg(all(not(feature = "wheel"), feature = "pan"))]
#[test]
fn pointer_report_pan_without_wheel_layout() {
    let mut report = PointerReport::empty();
    report.set_buttons(0x01);
    report.set_motion(Motion::new(-1, 1).with_wheel(-3).with_pan(2));
    assert_eq!(report.to_bytes(), [0x01, 0xFF, 0x01, 0x02]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Descriptor Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_descriptor_is_well_formed() {
    assert_eq!(KEYBOARD_REPORT_DESCRIPTOR[..4], [0x05, 0x01, 0x09, 0x06]);
    assert_eq!(KEYBOARD_REPORT_DESCRIPTOR.last(), Some(&0xC0));
}

#[test]
fn mouse_descriptor_declares_axes_of_this_build() {
    let desc = MOUSE_REPORT_DESCRIPTOR;
    assert_eq!(desc[..4], [0x05, 0x01, 0x09, 0x02]);
    assert_eq!(desc[desc.len() - 2..], [0xC0, 0xC0]);

    let has = |pattern: &[u8]| desc.windows(pattern.len()).any(|w| w == pattern);
    assert_eq!(has(&[0x09, 0x38]), cfg!(feature = "wheel"));
    assert_eq!(has(&[0x0A, 0x38, 0x02]), cfg!(feature = "pan"));
}

#[cfg(all(feature = "wheel", not(feature = "pan")))]
#[test]
fn mouse_descriptor_matches_classic_layout() {
    #[rustfmt::skip]
    let expected: [u8; 50] = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, 0x09, 0x01, 0xA1, 0x00,
        0x95, 0x03, 0x75, 0x01, 0x05, 0x09, 0x19, 0x01, 0x29, 0x03,
        0x15, 0x00, 0x25, 0x01, 0x81, 0x02, 0x95, 0x01, 0x75, 0x05,
        0x81, 0x01, 0x75, 0x08, 0x95, 0x03, 0x05, 0x01, 0x09, 0x30,
        0x09, 0x31, 0x09, 0x38, 0x15, 0x81, 0x25, 0x7F, 0x81, 0x06,
    ];
    assert_eq!(MOUSE_REPORT_DESCRIPTOR[..50], expected);
    assert_eq!(MOUSE_REPORT_DESCRIPTOR.len(), 52);
}

/// Total bits declared by the Input main items of a report descriptor.
fn input_bits(desc: &[u8]) -> usize {
    let (mut size, mut count, mut bits) = (0usize, 0usize, 0usize);
    let mut i = 0;
    while i < desc.len() {
        let prefix = desc[i];
        let len = match prefix & 0x03 {
            3 => 4,
            n => n as usize,
        };
        let data = desc.get(i + 1).copied().unwrap_or(0) as usize;
        match prefix & 0xFC {
            0x74 => size = data,
            0x94 => count = data,
            0x80 => bits += size * count,
            _ => {}
        }
        i += 1 + len;
    }
    bits
}

#[test]
fn mouse_descriptor_input_bits_match_report_size() {
    assert_eq!(input_bits(MOUSE_REPORT_DESCRIPTOR), POINTER_REPORT_SIZE * 8);
}

#[cfg(all(feature = "wheel", feature = "pan"))]
#[test]
fn mouse_descriptor_with_wheel_and_pan() {
    let desc = MOUSE_REPORT_DESCRIPTOR;
    assert_eq!(desc.len(), 67);
    // X, Y, wheel share one 3-count field; AC Pan follows on the consumer page.
    assert_eq!(desc[32..36], [0x75, 0x08, 0x95, 0x03]);
    #[rustfmt::skip]
    let pan: [u8; 15] = [
        0x05, 0x0C, 0x0A, 0x38, 0x02, 0x15, 0x81, 0x25, 0x7F, 0x75,
        0x08, 0x95, 0x01, 0x81, 0x06,
    ];
    assert_eq!(desc[50..65], pan);
}

#[cfg(all(not(feature = "wheel"), feature = "pan"))]
#[test]
fn mouse_descriptor_with_pan_only() {
    let desc = MOUSE_REPORT_DESCRIPTOR;
    assert_eq!(desc.len(), 65);
    assert_eq!(desc[32..36], [0x75, 0x08, 0x95, 0x02]);
    assert_eq!(desc[48..53], [0x05, 0x0C, 0x0A, 0x38, 0x02]);
}

#[test]
fn hid_class_descriptor_encodes_length() {
    let desc = hid_class_descriptor(0x0141);
    assert_eq!(desc, [9, 0x21, 0x10, 0x01, 0x00, 0x01, 0x22, 0x41, 0x01]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Vocabulary Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn led_report_accepts_exactly_one_byte() {
    assert_eq!(LedReport::from_bytes(&[0x03]), Some(LedReport(0x03)));
    assert_eq!(LedReport::from_bytes(&[0xFF]), Some(LedReport(0x1F)));
    assert_eq!(LedReport::from_bytes(&[]), None);
    assert_eq!(LedReport::from_bytes(&[0x01, 0x00]), None);
}

#[test]
fn led_report_accessors_and_sun_mask() {
    let leds = LedReport(LedReport::CAPS_LOCK | LedReport::COMPOSE);
    assert!(leds.caps_lock());
    assert!(leds.compose());
    assert!(!leds.num_lock());
    assert!(!leds.scroll_lock());
    assert!(!leds.kana());
    assert_eq!(leds.to_sun(), 0x0A);
}

#[test]
fn protocol_and_report_type_codes() {
    assert_eq!(HidProtocol::try_from(0), Ok(HidProtocol::Boot));
    assert_eq!(HidProtocol::try_from(1), Ok(HidProtocol::Report));
    assert_eq!(HidProtocol::try_from(2), Err(2));
    assert_eq!(HidProtocol::default(), HidProtocol::Report);

    assert_eq!(ReportType::from(1), ReportType::Input);
    assert_eq!(ReportType::from(2), ReportType::Output);
    assert_eq!(ReportType::from(3), ReportType::Feature);
    assert_eq!(ReportType::from(9), ReportType::Reserved(9));
}

#[test]
fn by_interface_indexes_and_finds() {
    let mut numbers = ByInterface::new(0u8, 1u8);
    assert_eq!(numbers[Interface::Keyboard], 0);
    assert_eq!(numbers[Interface::Pointer], 1);
    assert_eq!(numbers.find(|&n| n == 1), Some(Interface::Pointer));
    assert_eq!(numbers.find(|&n| n == 7), None);

    numbers[Interface::Pointer] = 5;
    assert_eq!(numbers.pointer, 5);
}
