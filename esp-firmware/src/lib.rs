// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von esp-core
pub use esp_core::{ClientCount, DeviceInfo, DeviceProbe, HeartbeatPin, StationRegistry};

use crate::config::MAX_STA_CONN;

/// Assoziierte Stationen am Access Point
///
/// Wird einmal beim Boot angelegt und nie abgebaut.
/// Schreiber: WiFi-Event-Handler aus `access_point_task`, Leser: `http_server_task` (GET /clients).
pub static STATIONS: StationRegistry = StationRegistry::new(MAX_STA_CONN);
