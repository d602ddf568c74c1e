//! USB HID composite device - keyboard + mouse.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral, declares the two boot-protocol HID interfaces and
//! answers their class requests from the shared report model.

use defmt::{debug, info};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_usb::control::{InResponse, OutResponse, Recipient, Request, RequestType};
use embassy_usb::driver::{EndpointError, EndpointIn};
use embassy_usb::types::InterfaceNumber;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use sun2usb::config;
use sun2usb::control::{self, KEYBOARD_HID_DESCRIPTOR, MOUSE_HID_DESCRIPTOR};
use sun2usb::hid::descriptor::{
    DESC_TYPE_HID, USB_CLASS_HID, USB_PROTOCOL_KEYBOARD, USB_PROTOCOL_MOUSE, USB_SUBCLASS_BOOT,
};
use sun2usb::hid::led::LedReport;
use sun2usb::transport::ReportSink;
use sun2usb::{ByInterface, Error, Interface, ReportModel};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
type HidEndpointIn = <UsbDriver as embassy_usb::driver::Driver<'static>>::EndpointIn;

/// The report model as the firmware uses it.
pub type Model = ReportModel<CriticalSectionRawMutex, UsbReportSink>;

static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static MODEL: StaticCell<Model> = StaticCell::new();
static HID_HANDLER: StaticCell<HidHandler> = StaticCell::new();
static LED_SIGNAL: Signal<CriticalSectionRawMutex, LedReport> = Signal::new();

/// LED state written by the host, latest value wins.
pub fn led_signal() -> &'static Signal<CriticalSectionRawMutex, LedReport> {
    &LED_SIGNAL
}

/// Interrupt IN endpoint of one HID interface.
pub struct UsbReportSink {
    ep: HidEndpointIn,
}

impl ReportSink for UsbReportSink {
    async fn send_report(&mut self, report: &[u8]) -> Result<(), Error> {
        self.ep.write(report).await.map_err(|e| match e {
            EndpointError::Disabled => Error::EndpointDisabled,
            EndpointError::BufferOverflow => Error::Usb,
        })
    }
}

/// Control requests and bus state for both HID interfaces.
struct HidHandler {
    model: &'static Model,
    interfaces: ByInterface<InterfaceNumber>,
}

impl HidHandler {
    fn interface_for(&self, req: &Request) -> Option<Interface> {
        if req.recipient != Recipient::Interface {
            return None;
        }
        self.interfaces
            .find(|&number| u16::from(number.0) == req.index)
    }
}

impl Handler for HidHandler {
    fn reset(&mut self) {
        for iface in Interface::ALL {
            self.model.deactivate(iface);
        }
    }

    fn configured(&mut self, configured: bool) {
        for iface in Interface::ALL {
            if configured {
                self.model.activate(iface);
            } else {
                self.model.deactivate(iface);
            }
        }
        info!("USB configured: {}", configured);
    }

    fn control_out(&mut self, req: Request, data: &[u8]) -> Option<OutResponse> {
        if req.request_type != RequestType::Class {
            return None;
        }
        let iface = self.interface_for(&req)?;
        Some(
            match control::handle_out(self.model, iface, req.request, req.value, data) {
                Ok(Some(leds)) => {
                    LED_SIGNAL.signal(leds);
                    OutResponse::Accepted
                }
                Ok(None) => OutResponse::Accepted,
                Err(_) => {
                    debug!("{} class request {=u8:#x} rejected", iface, req.request);
                    OutResponse::Rejected
                }
            },
        )
    }

    fn control_in<'a>(&'a mut self, req: Request, buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        let iface = self.interface_for(&req)?;
        match req.request_type {
            RequestType::Standard if req.request == Request::GET_DESCRIPTOR => {
                control::get_descriptor(iface, req.value).map(InResponse::Accepted)
            }
            RequestType::Class => Some(
                match control::handle_in(self.model, iface, req.request, req.value, buf) {
                    Ok(n) => InResponse::Accepted(&buf[..n]),
                    Err(_) => {
                        debug!("{} class request {=u8:#x} rejected", iface, req.request);
                        InResponse::Rejected
                    }
                },
            ),
            _ => None,
        }
    }
}

/// Build result containing the USB device runner and the report model
/// that feeds its endpoints.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub model: &'static Model,
}

/// Declare one boot-protocol HID interface with its interrupt IN
/// endpoint.
fn add_hid_function(
    builder: &mut Builder<'static, UsbDriver>,
    protocol: u8,
    hid_descriptor: &[u8],
) -> (InterfaceNumber, HidEndpointIn) {
    let mut func = builder.function(USB_CLASS_HID, USB_SUBCLASS_BOOT, protocol);
    let mut iface = func.interface();
    let number = iface.interface_number();
    let mut alt = iface.alt_setting(USB_CLASS_HID, USB_SUBCLASS_BOOT, protocol, None);
    // The builder writes bLength and bDescriptorType itself.
    alt.descriptor(DESC_TYPE_HID, &hid_descriptor[2..]);
    let ep = alt.endpoint_interrupt_in(config::USB_HID_MAX_PACKET, config::USB_HID_POLL_MS);
    (number, ep)
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;
    // Class is declared per interface; BIOS hosts expect no IADs.
    usb_config.device_class = 0x00;
    usb_config.device_sub_class = 0x00;
    usb_config.device_protocol = 0x00;
    usb_config.composite_with_iads = false;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    // Build the USB device.
    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let (kb_number, kb_ep) =
        add_hid_function(&mut builder, USB_PROTOCOL_KEYBOARD, &KEYBOARD_HID_DESCRIPTOR);
    let (ptr_number, ptr_ep) =
        add_hid_function(&mut builder, USB_PROTOCOL_MOUSE, &MOUSE_HID_DESCRIPTOR);

    let model = MODEL.init(ReportModel::new(
        UsbReportSink { ep: kb_ep },
        UsbReportSink { ep: ptr_ep },
    ));

    let handler = HID_HANDLER.init(HidHandler {
        model,
        interfaces: ByInterface::new(kb_number, ptr_number),
    });
    builder.handler(handler);

    let device = builder.build();

    info!(
        "USB HID composite device initialised (keyboard if {}, mouse if {})",
        kb_number.0,
        ptr_number.0
    );

    UsbHidDevice { device, model }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// This handles USB enumeration, suspend/resume, and control requests.
/// It runs forever (or until the USB cable is disconnected).
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}
