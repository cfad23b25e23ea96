// Heartbeat-Ausgang auf einem normalen GPIO
//
// Implementiert `HeartbeatPin` aus esp-core mit einem esp-hal Output.

use esp_core::{HeartbeatPin, PinError, PinLevel};
use esp_hal::gpio::{Level, Output, OutputConfig, OutputPin};

/// Real Hardware Heartbeat Pin
///
/// Belegt den Pin beim Erstellen und treibt ihn sofort auf Low.
pub struct GpioHeartbeatPin<'a> {
    pin: Output<'a>,
}

impl<'a> GpioHeartbeatPin<'a> {
    pub fn new(gpio: impl OutputPin + 'a) -> Self {
        let pin = Output::new(gpio, Level::Low, OutputConfig::default());
        Self { pin }
    }
}

impl HeartbeatPin for GpioHeartbeatPin<'_> {
    fn set_level(&mut self, level: PinLevel) -> Result<(), PinError> {
        // GPIO-Schreibzugriffe auf dem ESP32 können nicht fehlschlagen
        self.pin.set_level(match level {
            PinLevel::High => Level::High,
            PinLevel::Low => Level::Low,
        });
        Ok(())
    }
}
