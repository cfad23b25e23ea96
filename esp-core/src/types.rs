//! Core Types für die Status-Abfrage
//!
//! Datenstrukturen ohne Hardware-Dependencies

use serde::Serialize;

use crate::traits::DeviceProbe;

/// Geräte-Telemetrie für `GET /info`
///
/// Wird bei jedem Request frisch aus den Plattform-APIs gelesen
/// und nach dem Senden verworfen (kein Caching).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Chip-Revision im Format `major * 100 + minor`
    pub chip_revision: u16,
    pub cores: u8,
    /// Freier Heap in Bytes
    pub heap_free: u32,
    pub uptime_ms: u64,
}

impl DeviceInfo {
    /// Liest einen Snapshot aller vier Werte vom Probe
    ///
    /// Die Uptime wird vom Mikrosekunden-Timer abgeleitet
    /// (abgeschnitten, nicht gerundet).
    pub fn capture<P: DeviceProbe + ?Sized>(probe: &P) -> Self {
        Self {
            chip_revision: probe.chip_revision(),
            cores: probe.cores(),
            heap_free: probe.free_heap_bytes(),
            uptime_ms: crate::logic::uptime_ms_from_micros(probe.uptime_micros()),
        }
    }
}

/// Anzahl verbundener Stationen für `GET /clients`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientCount {
    pub connected_clients: u8,
}

impl ClientCount {
    pub const fn new(connected_clients: u8) -> Self {
        Self { connected_clients }
    }
}

/// Pegel eines digitalen Ausgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinLevel {
    High,
    Low,
}

impl PinLevel {
    pub fn toggled(self) -> Self {
        match self {
            PinLevel::High => PinLevel::Low,
            PinLevel::Low => PinLevel::High,
        }
    }
}

/// Fehler beim Rendern eines Status-Dokuments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusError {
    /// Der Formatierungs-Buffer ist zu klein für das Dokument
    BufferTooSmall,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceInfo {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "DeviceInfo {{ rev: {}, cores: {}, heap_free: {}, uptime_ms: {} }}",
            self.chip_revision,
            self.cores,
            self.heap_free,
            self.uptime_ms
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClientCount {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ClientCount {{ {} }}", self.connected_clients)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PinLevel::High => defmt::write!(fmt, "High"),
            PinLevel::Low => defmt::write!(fmt, "Low"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StatusError::BufferTooSmall => defmt::write!(fmt, "Buffer too small"),
        }
    }
}
