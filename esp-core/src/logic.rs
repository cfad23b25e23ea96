//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use serde::Serialize;

use crate::types::{PinLevel, StatusError};

/// Formatierungs-Buffer für `GET /info` in Bytes
///
/// Das längste mögliche Dokument (alle Felder auf Typ-Maximum) hat 91 Bytes.
pub const INFO_BUFFER_SIZE: usize = 256;

/// Formatierungs-Buffer für `GET /clients` in Bytes
///
/// Das längste mögliche Dokument (`u8::MAX` Stationen) hat 25 Bytes.
pub const CLIENTS_BUFFER_SIZE: usize = 64;

/// Halbe Heartbeat-Periode: 500 ms High, 500 ms Low
pub const HEARTBEAT_HALF_PERIOD_MS: u32 = 500;

/// Rechnet den Mikrosekunden-Timer in Millisekunden um
///
/// Ganzzahl-Division: 1999 µs ergeben 1 ms.
///
/// ```
/// # use esp_core::uptime_ms_from_micros;
/// assert_eq!(uptime_ms_from_micros(1_999), 1);
/// ```
pub fn uptime_ms_from_micros(micros: u64) -> u64 {
    micros / 1_000
}

/// Rendert ein Status-Dokument als flaches JSON in `buf`
///
/// Gibt den belegten Teil des Buffers als `&str` zurück.
pub fn render_json<'a, T: Serialize>(value: &T, buf: &'a mut [u8]) -> Result<&'a str, StatusError> {
    let len = serde_json_core::to_slice(value, buf).map_err(|_| StatusError::BufferTooSmall)?;
    // serde-json-core schreibt ausschließlich gültiges UTF-8
    core::str::from_utf8(&buf[..len]).map_err(|_| StatusError::BufferTooSmall)
}

/// Ein Schritt im Heartbeat-Zeitplan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatStep {
    /// Pegel, der gesetzt wird
    pub level: PinLevel,
    /// Wie lange der Pegel gehalten wird
    pub hold_ms: u32,
}

/// Endloser Zeitplan für das Heartbeat-Blinken
///
/// Der Pin startet auf Low (`initial_level`), danach wechseln sich
/// High und Low mit jeweils `half_period_ms` ab.
#[derive(Debug, Clone)]
pub struct HeartbeatSchedule {
    next_level: PinLevel,
    half_period_ms: u32,
}

impl HeartbeatSchedule {
    pub fn new(half_period_ms: u32) -> Self {
        Self {
            next_level: PinLevel::High,
            half_period_ms,
        }
    }

    /// Pegel direkt nach dem Belegen des Pins
    pub fn initial_level(&self) -> PinLevel {
        PinLevel::Low
    }

    /// Liefert den nächsten Schritt (endet nie)
    pub fn step(&mut self) -> HeartbeatStep {
        let step = HeartbeatStep {
            level: self.next_level,
            hold_ms: self.half_period_ms,
        };
        self.next_level = self.next_level.toggled();
        step
    }
}

impl Default for HeartbeatSchedule {
    fn default() -> Self {
        Self::new(HEARTBEAT_HALF_PERIOD_MS)
    }
}

impl Iterator for HeartbeatSchedule {
    type Item = HeartbeatStep;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientCount, DeviceInfo};

    #[test]
    fn test_uptime_truncates() {
        assert_eq!(uptime_ms_from_micros(0), 0);
        assert_eq!(uptime_ms_from_micros(999), 0);
        assert_eq!(uptime_ms_from_micros(1_000), 1);
        assert_eq!(uptime_ms_from_micros(1_999), 1);
    }

    #[test]
    fn test_render_clients() {
        let mut buf = [0u8; CLIENTS_BUFFER_SIZE];
        let json = render_json(&ClientCount::new(0), &mut buf).unwrap();
        assert_eq!(json, r#"{"connected_clients":0}"#);
    }

    #[test]
    fn test_render_info_field_order() {
        let info = DeviceInfo {
            chip_revision: 1,
            cores: 1,
            heap_free: 123_456,
            uptime_ms: 42,
        };
        let mut buf = [0u8; INFO_BUFFER_SIZE];
        let json = render_json(&info, &mut buf).unwrap();
        assert_eq!(
            json,
            r#"{"chip_revision":1,"cores":1,"heap_free":123456,"uptime_ms":42}"#
        );
    }

    #[test]
    fn test_render_max_values_fit() {
        let info = DeviceInfo {
            chip_revision: u16::MAX,
            cores: u8::MAX,
            heap_free: u32::MAX,
            uptime_ms: u64::MAX,
        };
        let mut buf = [0u8; INFO_BUFFER_SIZE];
        let json = render_json(&info, &mut buf).unwrap();
        assert_eq!(json.len(), 91);

        let mut buf = [0u8; CLIENTS_BUFFER_SIZE];
        let json = render_json(&ClientCount::new(u8::MAX), &mut buf).unwrap();
        assert_eq!(json.len(), 25);
    }

    #[test]
    fn test_render_buffer_too_small() {
        let mut buf = [0u8; 8];
        let result = render_json(&ClientCount::new(1), &mut buf);
        assert_eq!(result, Err(StatusError::BufferTooSmall));
    }

    #[test]
    fn test_schedule_starts_low_then_high() {
        let mut schedule = HeartbeatSchedule::default();
        assert_eq!(schedule.initial_level(), PinLevel::Low);
        assert_eq!(
            schedule.step(),
            HeartbeatStep {
                level: PinLevel::High,
                hold_ms: 500
            }
        );
        assert_eq!(schedule.step().level, PinLevel::Low);
        assert_eq!(schedule.step().level, PinLevel::High);
    }
}
