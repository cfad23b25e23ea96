// Heartbeat Task - Blinkt eine LED als Lebenszeichen
use defmt::{error, info};
use embassy_time::Delay;

use esp_core::{HeartbeatDriver, HeartbeatPin, HeartbeatSchedule};

use crate::config::HEARTBEAT_GPIO_PIN;
use crate::hal::GpioHeartbeatPin;

/// Heartbeat Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Pin auf Low, dann endlos: High 500 ms, Low 500 ms.
/// Läuft unabhängig von WiFi und HTTP, es gibt keinen geteilten Zustand.
///
/// # Trait-basierte Abstraktion
/// Der generische Parameter `P: HeartbeatPin` ermöglicht:
/// - Real Hardware (GpioHeartbeatPin) im Production-Code
/// - Mock Implementation (MockPin) in den Host-Tests, dort mit virtueller
///   Uhr statt `embassy_time::Delay`
pub async fn heartbeat_logic<P: HeartbeatPin>(pin: P) -> ! {
    let mut driver = HeartbeatDriver::new(pin, Delay, HeartbeatSchedule::default());

    if let Err(e) = driver.start() {
        error!("Heartbeat: Failed to drive pin low: {}", e);
    }

    loop {
        if let Err(e) = driver.tick().await {
            error!("Heartbeat: Failed to set pin: {}", e);
        }
    }
}

/// Heartbeat Task - Embassy Task für parallele Ausführung
///
/// Belegt den GPIO und ruft dann `heartbeat_logic()` auf.
#[embassy_executor::task]
pub async fn heartbeat_task(gpio: esp_hal::peripherals::GPIO2<'static>) {
    info!("Heartbeat: Blinking on GPIO{}", HEARTBEAT_GPIO_PIN);
    let pin = GpioHeartbeatPin::new(gpio);
    heartbeat_logic(pin).await
}
