// Live-Telemetrie des ESP32-C6 für GET /info

use esp_core::DeviceProbe;
use esp_hal::efuse::Efuse;

use crate::config::CPU_CORES;

/// Liest Chip-Revision, Kerne, freien Heap und Uptime direkt von der Plattform
///
/// Zustandslos: jeder Aufruf fragt die Hardware neu ab.
#[derive(Debug, Clone, Copy, Default)]
pub struct EspDeviceProbe;

impl DeviceProbe for EspDeviceProbe {
    fn chip_revision(&self) -> u16 {
        // Gleiche Kodierung wie ESP-IDF: major * 100 + minor (v0.1 → 1)
        let major = u16::from(Efuse::major_chip_version());
        let minor = u16::from(Efuse::minor_chip_version());
        major * 100 + minor
    }

    fn cores(&self) -> u8 {
        CPU_CORES
    }

    fn free_heap_bytes(&self) -> u32 {
        u32::try_from(esp_alloc::HEAP.free()).unwrap_or(u32::MAX)
    }

    fn uptime_micros(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}
