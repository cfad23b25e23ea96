//! Stations-Register für den Access Point
//!
//! Lock-free Menge der assoziierten Stationen, indiziert über die Association
//! ID (AID). Die WiFi-Event-Handler tragen jede Station einzeln ein und aus,
//! der HTTP-Handler für `GET /clients` liest die Anzahl.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::types::ClientCount;

/// Höchste AID, die das Register abbilden kann (ein Bit pro AID)
pub const MAX_TRACKED_AID: u8 = 31;

/// Menge der aktuell assoziierten Stationen
///
/// - Doppelte Joins derselben AID zählen einmal
/// - Leaves für unbekannte AIDs ändern nichts
/// - Die Anzahl bleibt immer in `0..=max_stations`
pub struct StationRegistry {
    associated: AtomicU32,
    max_stations: u8,
}

impl StationRegistry {
    pub const fn new(max_stations: u8) -> Self {
        Self {
            associated: AtomicU32::new(0),
            max_stations,
        }
    }

    /// Station `aid` hat sich verbunden, gibt die neue Anzahl zurück
    ///
    /// Ist das Register voll oder die AID außerhalb von `0..=MAX_TRACKED_AID`,
    /// bleibt es unverändert.
    pub fn station_joined(&self, aid: u8) -> u8 {
        let Some(bit) = aid_bit(aid) else {
            return self.connected();
        };
        let max = u32::from(self.max_stations);
        let result = self
            .associated
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |set| {
                (set & bit == 0 && set.count_ones() < max).then_some(set | bit)
            });
        match result {
            Ok(previous) => count(previous | bit),
            Err(current) => count(current),
        }
    }

    /// Station `aid` hat sich getrennt, gibt die neue Anzahl zurück
    pub fn station_left(&self, aid: u8) -> u8 {
        let Some(bit) = aid_bit(aid) else {
            return self.connected();
        };
        count(self.associated.fetch_and(!bit, Ordering::AcqRel) & !bit)
    }

    /// Access Point gestoppt: alle Stationen sind weg
    pub fn clear(&self) {
        self.associated.store(0, Ordering::Release);
    }

    pub fn is_associated(&self, aid: u8) -> bool {
        aid_bit(aid).is_some_and(|bit| self.associated.load(Ordering::Acquire) & bit != 0)
    }

    pub fn connected(&self) -> u8 {
        count(self.associated.load(Ordering::Acquire))
    }

    pub fn max_stations(&self) -> u8 {
        self.max_stations
    }

    /// Snapshot für `GET /clients`
    pub fn client_count(&self) -> ClientCount {
        ClientCount::new(self.connected())
    }
}

fn aid_bit(aid: u8) -> Option<u32> {
    (aid <= MAX_TRACKED_AID).then(|| 1u32 << aid)
}

fn count(set: u32) -> u8 {
    // count_ones() <= 32
    set.count_ones() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let registry = StationRegistry::new(4);
        assert_eq!(registry.connected(), 0);
        assert_eq!(registry.client_count(), ClientCount::new(0));
    }

    #[test]
    fn test_join_and_leave() {
        let registry = StationRegistry::new(4);
        assert_eq!(registry.station_joined(1), 1);
        assert_eq!(registry.station_joined(2), 2);
        assert_eq!(registry.station_left(1), 1);
        assert!(!registry.is_associated(1));
        assert!(registry.is_associated(2));
    }

    #[test]
    fn test_duplicate_join_counts_once() {
        let registry = StationRegistry::new(4);
        registry.station_joined(3);
        assert_eq!(registry.station_joined(3), 1);
    }

    #[test]
    fn test_leave_unknown_aid_is_ignored() {
        let registry = StationRegistry::new(4);
        registry.station_joined(1);
        assert_eq!(registry.station_left(2), 1);
        assert_eq!(registry.station_left(1), 0);
        assert_eq!(registry.station_left(1), 0);
    }

    #[test]
    fn test_full_registry_rejects_new_aid() {
        let registry = StationRegistry::new(2);
        registry.station_joined(1);
        registry.station_joined(2);
        assert_eq!(registry.station_joined(3), 2);
        assert!(!registry.is_associated(3));
    }

    #[test]
    fn test_aid_out_of_range_is_ignored() {
        let registry = StationRegistry::new(4);
        assert_eq!(registry.station_joined(MAX_TRACKED_AID + 1), 0);
        assert_eq!(registry.station_joined(MAX_TRACKED_AID), 1);
    }

    #[test]
    fn test_clear() {
        let registry = StationRegistry::new(4);
        registry.station_joined(1);
        registry.station_joined(2);
        registry.clear();
        assert_eq!(registry.connected(), 0);
    }
}
