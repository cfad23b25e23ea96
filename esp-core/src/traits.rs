//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::PinLevel;

/// Fehler-Typ für GPIO-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    WriteFailed,
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PinError::WriteFailed => defmt::write!(fmt, "Pin write failed"),
        }
    }
}

/// Trait für den Heartbeat-Ausgang
///
/// # Implementierungen
/// - **Production:** GpioHeartbeatPin (ESP32 GPIO Output)
/// - **Testing:** MockPin (zeichnet Pegelwechsel auf)
pub trait HeartbeatPin {
    /// Setzt den Ausgang auf den gewünschten Pegel
    fn set_level(&mut self, level: PinLevel) -> Result<(), PinError>;
}

impl<T: HeartbeatPin + ?Sized> HeartbeatPin for &mut T {
    fn set_level(&mut self, level: PinLevel) -> Result<(), PinError> {
        T::set_level(self, level)
    }
}

/// Trait für Live-Abfragen der Plattform-Telemetrie
///
/// Jeder Aufruf liest den aktuellen Wert; es wird nichts zwischengespeichert.
/// Fehler der Plattform werden nicht gemeldet, der Probe liefert dann
/// was die Plattform eben zurückgibt (im Zweifel 0).
pub trait DeviceProbe {
    /// Chip-Revision als `major * 100 + minor`
    fn chip_revision(&self) -> u16;

    /// Anzahl der CPU-Kerne
    fn cores(&self) -> u8;

    /// Aktuell freier Heap in Bytes
    fn free_heap_bytes(&self) -> u32;

    /// Monotone Zeit seit Boot in Mikrosekunden
    fn uptime_micros(&self) -> u64;
}
