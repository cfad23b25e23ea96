// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use core::net::Ipv4Addr;

// ============================================================================
// Heartbeat Konfiguration
// ============================================================================

/// GPIO-Pin für die Heartbeat-LED
/// Muss zum Peripheral passen, das `main.rs` an den Heartbeat-Task übergibt
pub const HEARTBEAT_GPIO_PIN: u8 = 2;

// ============================================================================
// Access Point Konfiguration
// ============================================================================

/// SSID des Access Points
/// Kann zur Build-Zeit über AP_SSID (Environment oder .env) überschrieben werden
pub const AP_SSID: &str = match option_env!("AP_SSID") {
    Some(ssid) => ssid,
    None => "CA360_Device",
};

/// Passwort des Access Points (leer = offenes Netzwerk)
/// Kann zur Build-Zeit über AP_PASSWORD überschrieben werden
pub const AP_PASSWORD: &str = match option_env!("AP_PASSWORD") {
    Some(password) => password,
    None => "ca360123",
};

/// WLAN-Kanal des Access Points
pub const AP_CHANNEL: u8 = 1;

/// Maximale Anzahl gleichzeitig verbundener Stationen
pub const MAX_STA_CONN: u8 = 4;

/// Statische IPv4-Adresse des Access Points (Plattform-Standard)
pub const AP_IP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// Präfix-Länge des AP-Netzes (/24)
pub const AP_PREFIX_LEN: u8 = 24;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Anzahl CPU-Kerne des Zielchips
/// ESP32-C6: ein RISC-V High-Power-Core (der LP-Core zählt nicht)
pub const CPU_CORES: u8 = 1;

/// Anzahl Sockets für embassy-net
/// HTTP-Pool (4) + DHCP (1) + mDNS (1) + Reserve
pub const NET_SOCKET_COUNT: usize = 8;

// ============================================================================
// DHCP-Server Konfiguration
// ============================================================================

/// Anzahl Paket-Metadaten je Richtung im UDP-Socket
pub const DHCP_PACKET_SLOTS: usize = 4;

/// UDP RX/TX Buffer-Größe in Bytes
pub const DHCP_UDP_BUFFER_SIZE: usize = 1024;

/// Einträge in der Lease-Tabelle
/// Doppelt so viele wie Stationen, damit Geräte nach kurzem Trennen
/// ihre alte Adresse wiederbekommen
pub const DHCP_LEASE_SLOTS: usize = 2 * MAX_STA_CONN as usize;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
/// Der ESP32 wird erreichbar sein unter: <MDNS_HOSTNAME>.local
pub const MDNS_HOSTNAME: &str = "ca360-esp32";

/// Lesbarer Instanz-Name des HTTP-Service
pub const MDNS_INSTANCE: &str = "CA360 IoT Device";

/// mDNS TTL (Time To Live) in Sekunden
/// Gibt an, wie lange andere Geräte die mDNS-Antwort cachen dürfen
pub const MDNS_TTL_SECS: u32 = 120;

/// mDNS Reconnect Delay in Sekunden
/// Wartezeit nach Fehler vor erneutem Versuch
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (Standard: 5353)
/// Multicast DNS nutzt Port 5353 laut RFC 6762
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Adresse (224.0.0.251)
/// Standard mDNS Multicast-Gruppe laut RFC 6762
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX in Bytes)
/// edge-nal-embassy benötigt Buffer für UDP-Pakete
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Receive/Send Buffer-Größen in Bytes
/// 1500 Bytes = Standard MTU für Ethernet/WiFi
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port der Status-Endpunkte
pub const HTTP_PORT: u16 = 80;

/// Anzahl HTTP-Server-Tasks (je eine Connection gleichzeitig)
/// Muss mit `pool_size` von `http_server_task` übereinstimmen
pub const HTTP_TASK_POOL_SIZE: usize = 4;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;
