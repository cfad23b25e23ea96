//! Integration Tests für die Status-Endpunkte
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockProbe
//! statt der echten Plattform-APIs.

use std::cell::Cell;

use esp_core::{
    CLIENTS_BUFFER_SIZE, ClientCount, DeviceInfo, DeviceProbe, INFO_BUFFER_SIZE, StationRegistry,
    render_json,
};
use serde_json::{Map, Value};

const MAX_STA_CONN: u8 = 4;

// ============================================================================
// Mock Device Probe
// ============================================================================

/// Probe mit manuell vorstellbarer Uhr
pub struct MockProbe {
    pub chip_revision: u16,
    pub cores: u8,
    pub heap_free: u32,
    pub now_us: Cell<u64>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self {
            chip_revision: 1,
            cores: 1,
            heap_free: 180_000,
            now_us: Cell::new(0),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1_000);
    }
}

impl DeviceProbe for MockProbe {
    fn chip_revision(&self) -> u16 {
        self.chip_revision
    }

    fn cores(&self) -> u8 {
        self.cores
    }

    fn free_heap_bytes(&self) -> u32 {
        self.heap_free
    }

    fn uptime_micros(&self) -> u64 {
        self.now_us.get()
    }
}

fn info_document(probe: &MockProbe) -> Map<String, Value> {
    let mut buf = [0u8; INFO_BUFFER_SIZE];
    let json = render_json(&DeviceInfo::capture(probe), &mut buf).unwrap();
    match serde_json::from_str(json).unwrap() {
        Value::Object(map) => map,
        other => panic!("Expected JSON object, got {other}"),
    }
}

fn clients_document(registry: &StationRegistry) -> Map<String, Value> {
    let mut buf = [0u8; CLIENTS_BUFFER_SIZE];
    let json = render_json(&registry.client_count(), &mut buf).unwrap();
    match serde_json::from_str(json).unwrap() {
        Value::Object(map) => map,
        other => panic!("Expected JSON object, got {other}"),
    }
}

// ============================================================================
// Tests: GET /info
// ============================================================================

#[test]
fn test_info_has_exactly_four_integer_fields() {
    let probe = MockProbe::new();
    probe.advance_ms(1234);

    let doc = info_document(&probe);

    assert_eq!(doc.len(), 4);
    for key in ["chip_revision", "cores", "heap_free", "uptime_ms"] {
        let value = doc.get(key).unwrap_or_else(|| panic!("missing {key}"));
        assert!(value.is_u64(), "{key} is not a non-negative integer");
    }
    assert_eq!(doc["cores"], 1);
    assert_eq!(doc["heap_free"], 180_000);
    assert_eq!(doc["uptime_ms"], 1234);
}

#[test]
fn test_info_uptime_is_truncated() {
    let probe = MockProbe::new();
    probe.now_us.set(2_999_999);

    let info = DeviceInfo::capture(&probe);
    assert_eq!(info.uptime_ms, 2_999);
}

#[test]
fn test_info_uptime_non_decreasing() {
    let probe = MockProbe::new();
    let mut last = 0;

    for step_ms in [0, 1, 7, 0, 250, 3] {
        probe.advance_ms(step_ms);
        let uptime = DeviceInfo::capture(&probe).uptime_ms;
        assert!(uptime >= last);
        last = uptime;
    }
}

#[test]
fn test_info_uptime_grows_by_wall_time() {
    let probe = MockProbe::new();
    probe.advance_ms(500);
    let first = info_document(&probe)["uptime_ms"].as_u64().unwrap();

    probe.advance_ms(1000);
    let second = info_document(&probe)["uptime_ms"].as_u64().unwrap();

    assert!(second - first >= 1000);
}

#[test]
fn test_info_reads_live_values() {
    let mut probe = MockProbe::new();
    let before = DeviceInfo::capture(&probe);

    probe.heap_free = 90_000;
    let after = DeviceInfo::capture(&probe);

    assert_eq!(before.heap_free, 180_000);
    assert_eq!(after.heap_free, 90_000);
}

// ============================================================================
// Tests: GET /clients
// ============================================================================

#[test]
fn test_clients_zero_after_startup() {
    let registry = StationRegistry::new(MAX_STA_CONN);
    let mut buf = [0u8; CLIENTS_BUFFER_SIZE];
    let json = render_json(&registry.client_count(), &mut buf).unwrap();
    assert_eq!(json, r#"{"connected_clients":0}"#);
}

#[test]
fn test_clients_one_after_association() {
    let registry = StationRegistry::new(MAX_STA_CONN);
    registry.station_joined(1);

    let doc = clients_document(&registry);
    assert_eq!(doc.len(), 1);
    assert_eq!(doc["connected_clients"], 1);
}

#[test]
fn test_clients_bounded_by_max_stations() {
    let registry = StationRegistry::new(MAX_STA_CONN);

    // Mehr Joins als erlaubt, dann mehr Leaves als Joins
    for aid in 1..=10 {
        registry.station_joined(aid);
        let n = clients_document(&registry)["connected_clients"]
            .as_u64()
            .unwrap();
        assert!(n <= u64::from(MAX_STA_CONN));
    }
    for aid in 1..=10 {
        registry.station_left(aid);
    }

    assert_eq!(registry.client_count(), ClientCount::new(0));
}

#[test]
fn test_clients_counts_each_station_once() {
    let registry = StationRegistry::new(MAX_STA_CONN);

    // Zwei Stationen assoziieren direkt hintereinander, eine meldet sich doppelt
    registry.station_joined(1);
    registry.station_joined(2);
    registry.station_joined(2);

    assert_eq!(clients_document(&registry)["connected_clients"], 2);
}

#[test]
fn test_clients_swap_at_capacity() {
    let registry = StationRegistry::new(MAX_STA_CONN);
    for aid in 1..=MAX_STA_CONN {
        registry.station_joined(aid);
    }

    // Station 1 geht, Station 5 kommt: Reihenfolge der Events egal
    registry.station_left(1);
    registry.station_joined(5);
    assert_eq!(registry.connected(), MAX_STA_CONN);

    registry.station_left(5);
    assert_eq!(registry.connected(), MAX_STA_CONN - 1);
}

#[test]
fn test_clients_reset_when_access_point_stops() {
    let registry = StationRegistry::new(MAX_STA_CONN);
    registry.station_joined(1);
    registry.station_joined(2);

    registry.clear();

    assert_eq!(clients_document(&registry)["connected_clients"], 0);
}
