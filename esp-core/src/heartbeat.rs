//! Heartbeat-Treiber
//!
//! Verbindet Zeitplan, Pin und Delay. Die Firmware übergibt
//! `embassy_time::Delay`, die Host-Tests eine virtuelle Uhr.

use embedded_hal_async::delay::DelayNs;

use crate::logic::HeartbeatSchedule;
use crate::traits::{HeartbeatPin, PinError};

/// Treibt einen `HeartbeatPin` nach einem `HeartbeatSchedule`
///
/// Jeder `tick()` setzt zuerst den Pegel und hält ihn dann für `hold_ms`.
/// Schlägt das Setzen fehl, wird trotzdem gewartet: der Takt bleibt stabil.
pub struct HeartbeatDriver<P, D> {
    pin: P,
    delay: D,
    schedule: HeartbeatSchedule,
}

impl<P: HeartbeatPin, D: DelayNs> HeartbeatDriver<P, D> {
    pub fn new(pin: P, delay: D, schedule: HeartbeatSchedule) -> Self {
        Self {
            pin,
            delay,
            schedule,
        }
    }

    /// Treibt den Pin auf den Startpegel
    pub fn start(&mut self) -> Result<(), PinError> {
        self.pin.set_level(self.schedule.initial_level())
    }

    /// Ein Schritt: Pegel setzen, dann halten
    pub async fn tick(&mut self) -> Result<(), PinError> {
        let step = self.schedule.step();
        let result = self.pin.set_level(step.level);
        self.delay.delay_ms(step.hold_ms).await;
        result
    }
}
