// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die Traits aus esp-core für den ESP32-C6,
// damit die Logik in esp-core ohne Hardware testbar bleibt.

pub mod device_probe;
pub mod heartbeat_pin;

pub use device_probe::EspDeviceProbe;
pub use heartbeat_pin::GpioHeartbeatPin;
