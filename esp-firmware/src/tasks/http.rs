// HTTP Server Task - Serviert die Status-Endpunkte /info und /clients
use defmt::{error, info};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use picoserve::routing::get;
use serde::Serialize;

use esp_core::{CLIENTS_BUFFER_SIZE, DeviceInfo, INFO_BUFFER_SIZE, JsonBody, StationRegistry};

use crate::config::{HTTP_BUFFER_SIZE, HTTP_PORT, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE};
use crate::hal::EspDeviceProbe;

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// Dieser Task stellt die Status-Abfrage bereit:
/// - `GET /info`: Chip-Revision, Kerne, freier Heap, Uptime
/// - `GET /clients`: Anzahl verbundener Stationen
///
/// Beide Antworten sind immer 200 mit `Content-Type: application/json`
/// und werden bei jedem Request frisch berechnet.
///
/// **Task Pool:** Diese Task wird 4x gespawnt für concurrent connections.
/// Accept-Fehler loggt picoserve selbst (defmt-Feature), der Task läuft
/// danach weiter und kehrt nie zurück.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz (0..3)
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `stations`: Stations-Zähler des Access Points (nur lesend)
#[embassy_executor::task(pool_size = 4)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    stations: &'static StationRegistry,
) -> ! {
    // Erst lauschen, wenn der Access Point läuft
    wait_for_link(stack).await;
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/info", get(get_info))
        .route(
            "/clients",
            get(move || async move {
                json_response::<_, CLIENTS_BUFFER_SIZE>(stations.client_count())
            }),
        );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await
        .into_never()
}

/// GET /info - Live-Snapshot der Geräte-Telemetrie
async fn get_info() -> JsonBody<INFO_BUFFER_SIZE> {
    json_response::<_, INFO_BUFFER_SIZE>(DeviceInfo::capture(&EspDeviceProbe))
}

/// Rendert ein Status-Dokument in einen Buffer der Größe `N`
///
/// `JsonBody` setzt `Content-Type: application/json` selbst. Ein Render-Fehler
/// wird nur geloggt; der Client bekommt `{}` und trotzdem 200.
fn json_response<T: Serialize, const N: usize>(document: T) -> JsonBody<N> {
    JsonBody::render(&document).unwrap_or_else(|e| {
        error!("HTTP: Failed to render status document: {}", e);
        JsonBody::empty()
    })
}

/// Wartet bis der Link des AP-Interfaces oben ist
async fn wait_for_link(stack: &'static Stack<'static>) {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(500)).await;
    }
}
