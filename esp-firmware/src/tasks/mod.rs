// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Einziger geteilter Zustand: der Stations-Zähler (WiFi → HTTP).

pub mod dhcp;
pub mod heartbeat;
pub mod http;
pub mod mdns;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use dhcp::dhcp_server_task;
pub use heartbeat::heartbeat_task;
pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use wifi::{access_point_task, net_task};
