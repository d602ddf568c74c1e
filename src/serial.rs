//! Sun serial lines on the nRF52840 UARTEs.
//!
//! - UARTE0: keyboard, RX P0.08 / TX P0.06
//! - UARTE1: mouse, RX P0.15 (receive only)
//!
//! Both run 1200 baud 8N1. The Sun lines use inverted RS-232 levels;
//! an external level shifter is assumed.

use defmt::warn;
use embassy_nrf::uarte::{self, Baudrate, Parity, Uarte, UarteRx, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals};

use sun2usb::transport::{SerialRx, SerialTx};
use sun2usb::Error;

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => uarte::InterruptHandler<peripherals::UARTE0>;
    UARTE1 => uarte::InterruptHandler<peripherals::UARTE1>;
});

/// Receive half of a Sun line.
pub struct SunRx<T: uarte::Instance>(UarteRx<'static, T>);

/// Transmit half of a Sun line.
pub struct SunTx<T: uarte::Instance>(UarteTx<'static, T>);

impl<T: uarte::Instance> SerialRx for SunRx<T> {
    async fn read_byte(&mut self) -> Result<u8, Error> {
        let mut byte = [0u8; 1];
        self.0.read(&mut byte).await.map_err(|e| {
            warn!("UARTE read failed: {}", e);
            Error::SerialRead
        })?;
        Ok(byte[0])
    }
}

impl<T: uarte::Instance> SerialTx for SunTx<T> {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), Error> {
        self.0.write(data).await.map_err(|e| {
            warn!("UARTE write failed: {}", e);
            Error::SerialWrite
        })
    }
}

fn line_config() -> uarte::Config {
    let mut config = uarte::Config::default();
    config.parity = Parity::EXCLUDED;
    config.baudrate = Baudrate::BAUD1200;
    config
}

/// Open the keyboard line.
pub fn keyboard_line(
    uarte: peripherals::UARTE0,
    rxd: peripherals::P0_08,
    txd: peripherals::P0_06,
) -> (SunTx<peripherals::UARTE0>, SunRx<peripherals::UARTE0>) {
    let uarte = Uarte::new(uarte, Irqs, rxd, txd, line_config());
    let (tx, rx) = uarte.split();
    (SunTx(tx), SunRx(rx))
}

/// Open the mouse line. The mouse never listens, so there is no TX.
pub fn mouse_line(uarte: peripherals::UARTE1, rxd: peripherals::P0_15) -> SunRx<peripherals::UARTE1> {
    SunRx(UarteRx::new(uarte, Irqs, rxd, line_config()))
}
