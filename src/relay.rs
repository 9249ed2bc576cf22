//! Relay state, pin drive and the coupling to the two daily alarms.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use embedded_hal::digital::OutputPin;

use crate::alarm::{DAY, RecurringAlarm};
use crate::clock::SyncedClock;
use crate::schedule::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    Start,
    Stop,
}

/// The relay controller shared between the bootstrap sequence and the two
/// alarm dispatch tasks. Locking serializes pin, state and alarm access.
pub type ControllerMutex<P> = Mutex<CriticalSectionRawMutex, RelayController<P>>;

/// Ground truth of the physical relay, plus the start/stop alarms.
///
/// `on()`/`off()` always re-drive the pin and always re-arm their alarm, even
/// when the state does not change.
pub struct RelayController<P: OutputPin> {
    pin: P,
    state: RelayState,
    window: Window,
    start_alarm: RecurringAlarm,
    stop_alarm: RecurringAlarm,
}

impl<P: OutputPin> RelayController<P> {
    /// Takes ownership of an already-configured output pin and drives it low.
    pub fn new(mut pin: P, window: Window) -> Self {
        // Relay drive is assumed infallible by the pin collaborator contract.
        let _ = pin.set_low();
        Self {
            pin,
            state: RelayState::Off,
            window,
            start_alarm: RecurringAlarm::new(),
            stop_alarm: RecurringAlarm::new(),
        }
    }

    /// Switches the relay on and re-arms the start alarm 24h from now.
    pub fn on(&mut self) {
        log::info!("relay ON");
        self.state = RelayState::On;
        let _ = self.pin.set_high();
        self.start_alarm.reset(DAY);
    }

    /// Switches the relay off and re-arms the stop alarm 24h from now.
    pub fn off(&mut self) {
        log::info!("relay OFF");
        self.state = RelayState::Off;
        let _ = self.pin.set_low();
        self.stop_alarm.reset(DAY);
    }

    /// Arms both alarms to the next occurrence of their window bound.
    pub fn arm_alarms(&mut self, clock: &SyncedClock) {
        self.start_alarm.arm_next(self.window.start, clock);
        self.stop_alarm.arm_next(self.window.stop, clock);
    }

    pub fn fire(&mut self, kind: AlarmKind) {
        match kind {
            AlarmKind::Start => self.on(),
            AlarmKind::Stop => self.off(),
        }
    }

    pub fn fire_at(&self, kind: AlarmKind) -> Option<Instant> {
        match kind {
            AlarmKind::Start => self.start_alarm.fire_at(),
            AlarmKind::Stop => self.stop_alarm.fire_at(),
        }
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn window(&self) -> Window {
        self.window
    }
}
