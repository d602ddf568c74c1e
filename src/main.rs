//! sun2usb firmware entry point.
//!
//! Tasks:
//! - `usb_task`: runs the USB device stack (enumeration, class requests)
//! - `keyboard_task`: Sun keyboard line -> keyboard reports
//! - `mouse_task`: Sun mouse line -> pointer reports
//! - `led_task`: host LED state -> keyboard LED command

#![no_std]
#![no_main]

mod serial;
mod usb;

use core::convert::Infallible;

use defmt::{error, info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::config::HfclkSource;
use embassy_nrf::peripherals::{UARTE0, UARTE1};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embassy_usb::UsbDevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use serial::{SunRx, SunTx};
use sun2usb::protocol::{keyboard, mouse};
use sun2usb::Error;
use usb::hid_device::{self, Model, UsbDriver};

/// Keyboard TX half, shared by the reset/layout commands and LED updates.
type KeyboardTx = Mutex<CriticalSectionRawMutex, SunTx<UARTE0>>;

static KEYBOARD_TX: StaticCell<KeyboardTx> = StaticCell::new();

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn keyboard_task(model: &'static Model, mut rx: SunRx<UARTE0>, tx: &'static KeyboardTx) {
    info!("keyboard task started");
    let result = keyboard::run(model, &mut rx, tx, &mut Delay).await;
    report_exit("keyboard", result);
}

#[embassy_executor::task]
async fn mouse_task(model: &'static Model, mut rx: SunRx<UARTE1>) {
    info!("mouse task started");
    let result = mouse::run(model, &mut rx).await;
    report_exit("mouse", result);
}

#[embassy_executor::task]
async fn led_task(tx: &'static KeyboardTx) {
    loop {
        let leds = hid_device::led_signal().wait().await;
        info!("host LEDs {=u8:#x}", leds.0);
        if let Err(e) = keyboard::set_leds(tx, leds).await {
            error!("LED update failed: {}", e);
            return;
        }
    }
}

fn report_exit(line: &str, result: Result<Infallible, Error>) {
    match result {
        Ok(never) => match never {},
        Err(e) => error!("{=str} line stopped: {}", line, e),
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut config = embassy_nrf::config::Config::default();
    // USBD needs the crystal oscillator.
    config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(config);

    info!("sun2usb starting");

    let usb = hid_device::init(p.USBD);
    let (kb_tx, kb_rx) = serial::keyboard_line(p.UARTE0, p.P0_08, p.P0_06);
    let mouse_rx = serial::mouse_line(p.UARTE1, p.P0_15);
    let kb_tx: &'static KeyboardTx = KEYBOARD_TX.init(Mutex::new(kb_tx));

    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(keyboard_task(usb.model, kb_rx, kb_tx)));
    unwrap!(spawner.spawn(mouse_task(usb.model, mouse_rx)));
    unwrap!(spawner.spawn(led_task(kb_tx)));
}
