//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Status-Dokumente, Traits für Hardware-Zugriff und Pure Functions
//! (JSON-Rendering, Heartbeat-Zeitplan, Stations-Register, DHCP-Pakete).

#![no_std]

pub mod dhcp;
pub mod heartbeat;
#[cfg(feature = "http")]
pub mod http;
pub mod logic;
pub mod stations;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use heartbeat::HeartbeatDriver;
#[cfg(feature = "http")]
pub use http::JsonBody;
pub use logic::{
    CLIENTS_BUFFER_SIZE, HEARTBEAT_HALF_PERIOD_MS, HeartbeatSchedule, HeartbeatStep,
    INFO_BUFFER_SIZE, render_json, uptime_ms_from_micros,
};
pub use stations::StationRegistry;
pub use traits::{DeviceProbe, HeartbeatPin, PinError};
pub use types::{ClientCount, DeviceInfo, PinLevel, StatusError};
