//! Integration Tests für die Status-Endpunkte über HTTP
//!
//! Gleicher Router wie in der Firmware, aber mit picoserve auf tokio und
//! einem echten TCP-Socket auf localhost. Geprüft wird die Antwort so,
//! wie ein Client sie auf der Leitung sieht.

use esp_core::{
    CLIENTS_BUFFER_SIZE, DeviceInfo, DeviceProbe, INFO_BUFFER_SIZE, JsonBody, StationRegistry,
};
use picoserve::routing::get;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const MAX_STA_CONN: u8 = 4;

struct FixedProbe;

impl DeviceProbe for FixedProbe {
    fn chip_revision(&self) -> u16 {
        1
    }

    fn cores(&self) -> u8 {
        1
    }

    fn free_heap_bytes(&self) -> u32 {
        180_000
    }

    fn uptime_micros(&self) -> u64 {
        42_000_000
    }
}

fn json_response<T: Serialize, const N: usize>(document: T) -> JsonBody<N> {
    JsonBody::render(&document).unwrap_or_else(|_| JsonBody::empty())
}

/// Antwort auf der Leitung: Statuszeile, Header, Body
struct RawResponse {
    status_line: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl RawResponse {
    fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8(raw.to_vec()).unwrap();
        let (head, body) = text.split_once("\r\n\r\n").unwrap();
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(':').unwrap();
                (name.trim().to_string(), value.trim().to_string())
            })
            .collect();
        Self {
            status_line,
            headers,
            body: body.to_string(),
        }
    }

    fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// Serviert genau eine Verbindung und liefert die rohe Antwort auf `GET path`
async fn fetch(stations: &'static StationRegistry, path: &str) -> RawResponse {
    let app = picoserve::Router::new()
        .route(
            "/info",
            get(|| async { json_response::<_, INFO_BUFFER_SIZE>(DeviceInfo::capture(&FixedProbe)) }),
        )
        .route(
            "/clients",
            get(move || async move {
                json_response::<_, CLIENTS_BUFFER_SIZE>(stations.client_count())
            }),
        );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(std::time::Duration::from_secs(5)),
        read_request: Some(std::time::Duration::from_secs(1)),
        write: Some(std::time::Duration::from_secs(1)),
        persistent_start_read_request: Some(std::time::Duration::from_secs(5)),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let server = async {
        let (stream, _) = listener.accept().await.unwrap();
        let mut http_buffer = [0u8; 2048];
        let _ = picoserve::Server::new(&app, &config, &mut http_buffer)
            .serve(stream)
            .await;
    };

    let client = async {
        let mut stream = TcpStream::connect(address).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: esp\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        raw
    };

    let ((), raw) = tokio::join!(server, client);
    RawResponse::parse(&raw)
}

fn registry() -> &'static StationRegistry {
    Box::leak(Box::new(StationRegistry::new(MAX_STA_CONN)))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_clients_has_single_json_content_type() {
    let response = fetch(registry(), "/clients").await;

    assert!(response.status_line.starts_with("HTTP/1.1 200"));
    assert_eq!(response.header_values("Content-Type"), vec!["application/json"]);
    assert_eq!(response.body, r#"{"connected_clients":0}"#);
}

#[tokio::test]
async fn test_clients_reflects_registry() {
    let stations = registry();
    stations.station_joined(1);
    stations.station_joined(2);

    let response = fetch(stations, "/clients").await;
    assert_eq!(response.body, r#"{"connected_clients":2}"#);
}

#[tokio::test]
async fn test_info_has_single_json_content_type() {
    let response = fetch(registry(), "/info").await;

    assert!(response.status_line.starts_with("HTTP/1.1 200"));
    assert_eq!(response.header_values("Content-Type"), vec!["application/json"]);
    assert_eq!(
        response.header_values("Content-Length"),
        vec![response.body.len().to_string().as_str()]
    );

    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["uptime_ms"], 42_000);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let response = fetch(registry(), "/status").await;
    assert!(response.status_line.starts_with("HTTP/1.1 404"));
}
