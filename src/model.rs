//! HID report model - the keyboard and pointer reports the host sees.
//!
//! Each interface has two locks:
//!
//! - a **transmit gate** (async mutex owning the [`ReportSink`]): held
//!   from the mutation until the host has taken the report, so at most
//!   one transfer per endpoint is in flight;
//! - a **state guard** (blocking mutex around [`HidEndpointState`]):
//!   held only while the report is mutated and copied out, so the USB
//!   control path can read it from a synchronous callback.
//!
//! The gate is always taken before the guard.

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;

use crate::error::Error;
use crate::hid::keyboard::KeyboardReport;
use crate::hid::led::LedReport;
use crate::hid::mouse::{Motion, PointerReport};
use crate::hid::{HidProtocol, InputReport, Interface, MAX_INPUT_REPORT_SIZE};
use crate::transport::ReportSink;

/// Per-interface state visible to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidEndpointState<R> {
    /// Idle rate in units of 4 ms; 0 = report only on change.
    pub idle_rate: u8,
    pub protocol: HidProtocol,
    /// Set once the host has configured the endpoint.
    pub active: bool,
    pub report: R,
}

impl<R: Default> Default for HidEndpointState<R> {
    fn default() -> Self {
        Self {
            idle_rate: 0,
            protocol: HidProtocol::Report,
            active: false,
            report: R::default(),
        }
    }
}

struct HidEndpoint<M: RawMutex, S, R> {
    gate: Mutex<M, S>,
    state: BlockingMutex<M, RefCell<HidEndpointState<R>>>,
}

impl<M: RawMutex, S: ReportSink, R: InputReport> HidEndpoint<M, S, R> {
    fn new(sink: S) -> Self {
        Self {
            gate: Mutex::new(sink),
            state: BlockingMutex::new(RefCell::new(HidEndpointState::default())),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut HidEndpointState<R>) -> T) -> T {
        self.state.lock(|state| f(&mut *state.borrow_mut()))
    }

    /// Apply `update` to the report and send the result if `update`
    /// returns `Ok(true)` and the endpoint is active.
    ///
    /// Returns whether a report went to the host.
    async fn transmit_with(
        &self,
        update: impl FnOnce(&mut R) -> Result<bool, Error>,
    ) -> Result<bool, Error> {
        let mut sink = self.gate.lock().await;

        let mut buf = [0u8; MAX_INPUT_REPORT_SIZE];
        let len = self.with_state(|state| -> Result<Option<usize>, Error> {
            if !update(&mut state.report)? {
                return Ok(None);
            }
            let len = state
                .active
                .then(|| state.report.write_for(state.protocol, &mut buf));
            state.report.mark_sent();
            Ok(len)
        })?;

        match len {
            Some(len) => {
                sink.send_report(&buf[..len]).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn into_sink(self) -> S {
        self.gate.into_inner()
    }
}

/// The keyboard and pointer reports plus their host-selected settings.
///
/// One instance lives for the whole program. All methods take `&self`;
/// share it between the serial decoders and the USB control handler.
pub struct ReportModel<M: RawMutex, S: ReportSink> {
    keyboard: HidEndpoint<M, S, KeyboardReport>,
    pointer: HidEndpoint<M, S, PointerReport>,
    leds: BlockingMutex<M, Cell<LedReport>>,
}

/// Run `$body` against the state of `$iface` with `$state` bound to it.
macro_rules! with_endpoint {
    ($model:expr, $iface:expr, |$state:ident| $body:expr) => {
        match $iface {
            Interface::Keyboard => $model.keyboard.with_state(|$state| $body),
            Interface::Pointer => $model.pointer.with_state(|$state| $body),
        }
    };
}

impl<M: RawMutex, S: ReportSink> ReportModel<M, S> {
    /// Create the model with one sink per interrupt IN endpoint. Both
    /// interfaces start inactive.
    pub fn new(keyboard: S, pointer: S) -> Self {
        Self {
            keyboard: HidEndpoint::new(keyboard),
            pointer: HidEndpoint::new(pointer),
            leds: BlockingMutex::new(Cell::new(LedReport::default())),
        }
    }

    // ─── keyboard ───────────────────────────────────────────────────────

    /// Press `usage`. Sends a report if the key was not already down.
    ///
    /// With all six slots taken the key is dropped and
    /// [`Error::KeyRollover`] is returned; nothing is sent.
    pub async fn press(&self, usage: u8) -> Result<(), Error> {
        self.keyboard
            .transmit_with(|report| report.press(usage))
            .await
            .map(drop)
    }

    /// Release `usage`. Sends a report if the key was down.
    pub async fn release(&self, usage: u8) -> Result<(), Error> {
        self.keyboard
            .transmit_with(|report| Ok(report.release(usage)))
            .await
            .map(drop)
    }

    /// Release every key and modifier with a single report. Nothing is
    /// sent if nothing was pressed.
    pub async fn release_all(&self) -> Result<(), Error> {
        self.keyboard
            .transmit_with(|report| Ok(report.clear()))
            .await
            .map(drop)
    }

    // ─── pointer ────────────────────────────────────────────────────────

    /// Send one relative movement with the current buttons.
    pub async fn move_by(&self, motion: Motion) -> Result<(), Error> {
        self.pointer
            .transmit_with(|report| {
                report.set_motion(motion);
                Ok(true)
            })
            .await
            .map(drop)
    }

    /// Replace the button bits without sending; the next movement or
    /// button report carries them.
    pub fn set_buttons(&self, mask: u8) {
        self.pointer.with_state(|state| {
            state.report.set_buttons(mask);
        });
    }

    /// Press button `n` (0 = left, 1 = right, 2 = middle) and send.
    pub async fn button_press(&self, n: u8) -> Result<(), Error> {
        self.button(n, true).await
    }

    /// Release button `n` and send.
    pub async fn button_release(&self, n: u8) -> Result<(), Error> {
        self.button(n, false).await
    }

    async fn button(&self, n: u8, pressed: bool) -> Result<(), Error> {
        if n > 2 {
            return Ok(());
        }
        self.pointer
            .transmit_with(|report| {
                report.set_button(n, pressed);
                Ok(true)
            })
            .await
            .map(drop)
    }

    // ─── host-visible settings ──────────────────────────────────────────

    /// Endpoint setup hook: the host configured `iface`.
    pub fn activate(&self, iface: Interface) {
        with_endpoint!(self, iface, |state| {
            state.idle_rate = 0;
            state.protocol = HidProtocol::Report;
            state.active = true;
        })
    }

    /// Endpoint stop hook: reports for `iface` are no longer sent.
    pub fn deactivate(&self, iface: Interface) {
        with_endpoint!(self, iface, |state| state.active = false)
    }

    pub fn is_active(&self, iface: Interface) -> bool {
        with_endpoint!(self, iface, |state| state.active)
    }

    pub fn idle_rate(&self, iface: Interface) -> u8 {
        with_endpoint!(self, iface, |state| state.idle_rate)
    }

    pub fn set_idle_rate(&self, iface: Interface, rate: u8) {
        with_endpoint!(self, iface, |state| state.idle_rate = rate)
    }

    pub fn protocol(&self, iface: Interface) -> HidProtocol {
        with_endpoint!(self, iface, |state| state.protocol)
    }

    pub fn set_protocol(&self, iface: Interface, protocol: HidProtocol) {
        with_endpoint!(self, iface, |state| state.protocol = protocol)
    }

    /// Copy the current report of `iface`, formatted for its active
    /// protocol, into `buf`. Returns the length, or 0 if `buf` is too
    /// small.
    pub fn read_report(&self, iface: Interface, buf: &mut [u8]) -> usize {
        with_endpoint!(self, iface, |state| state
            .report
            .write_for(state.protocol, buf))
    }

    /// Snapshot of the keyboard report.
    pub fn keyboard_report(&self) -> KeyboardReport {
        self.keyboard.with_state(|state| state.report)
    }

    /// Snapshot of the pointer report.
    pub fn pointer_report(&self) -> PointerReport {
        self.pointer.with_state(|state| state.report)
    }

    /// Store the LED state written by the host.
    pub fn set_output_report(&self, leds: LedReport) {
        self.leds.lock(|cell| cell.set(leds));
    }

    /// Last LED state written by the host.
    pub fn output_report(&self) -> LedReport {
        self.leds.lock(|cell| cell.get())
    }

    /// Tear the model down and hand back the endpoint sinks.
    pub fn into_sinks(self) -> (S, S) {
        (self.keyboard.into_sink(), self.pointer.into_sink())
    }
}
