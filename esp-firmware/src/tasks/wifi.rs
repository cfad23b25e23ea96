// WiFi Task - Startet den Access Point und zählt verbundene Stationen
use defmt::{Debug2Format, error, info, warn};
use embassy_net::Runner;
use esp_radio::wifi::event::{self as wifi_event, EventExt};
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ModeConfig, WifiController, WifiDevice, WifiError, WifiEvent,
};

use esp_core::StationRegistry;

use crate::config::{AP_CHANNEL, AP_PASSWORD, AP_SSID, MAX_STA_CONN};

/// Access Point Task
///
/// - Registriert die Event-Handler, die `stations` pflegen
/// - Konfiguriert und startet den AP (einmalig, kein Retry)
/// - Loggt danach Connect/Disconnect-Events
///
/// Schlägt die Konfiguration fehl, wird das nur geloggt. Die Firmware läuft
/// dann ohne Netzwerk weiter (Heartbeat blinkt trotzdem).
#[embassy_executor::task]
pub async fn access_point_task(
    mut controller: WifiController<'static>,
    stations: &'static StationRegistry,
) {
    info!("WiFi: Configuring access point...");

    // Vor dem Start registrieren, sonst gehen frühe Assoziationen verloren
    track_stations(stations);

    if let Err(e) = start_access_point(&mut controller).await {
        error!("WiFi: Failed to start access point: {}", Debug2Format(&e));
        return;
    }

    info!(
        "WiFi AP started. SSID:{} password:{} channel:{}",
        AP_SSID, AP_PASSWORD, AP_CHANNEL
    );

    loop {
        let events = controller
            .wait_for_events(
                WifiEvent::ApStaConnected | WifiEvent::ApStaDisconnected | WifiEvent::ApStop,
                false,
            )
            .await;

        // Mehrere gleiche Events zwischen zwei Polls fallen hier zusammen,
        // gezählt wird deshalb in den Handlern von `track_stations`
        if events.contains(WifiEvent::ApStaConnected) {
            info!("WiFi: Station joined ({} connected)", stations.connected());
        }
        if events.contains(WifiEvent::ApStaDisconnected) {
            info!("WiFi: Station left ({} connected)", stations.connected());
        }
        if events.contains(WifiEvent::ApStop) {
            warn!("WiFi: Access point stopped");
        }
    }
}

/// Pflegt `stations` pro Event, über die Association ID der Station
///
/// Die Handler laufen im Event-Kontext des WiFi-Treibers bei jedem einzelnen
/// Event; doppelte Events für dieselbe AID zählen nur einmal.
fn track_stations(stations: &'static StationRegistry) {
    wifi_event::ApStaConnected::update_handler(move |event| {
        stations.station_joined(event.aid());
    });
    wifi_event::ApStaDisconnected::update_handler(move |event| {
        stations.station_left(event.aid());
    });
    wifi_event::ApStop::update_handler(move |_| stations.clear());
}

/// Setzt AP-Modus mit SSID, Passwort, Kanal und Stations-Limit und startet das Radio
///
/// Leeres Passwort → offenes Netzwerk, sonst WPA/WPA2-PSK.
async fn start_access_point(controller: &mut WifiController<'static>) -> Result<(), WifiError> {
    let auth_method = if AP_PASSWORD.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WpaWpa2Personal
    };

    let ap_config = AccessPointConfig::default()
        .with_ssid(AP_SSID.into())
        .with_password(AP_PASSWORD.into())
        .with_channel(AP_CHANNEL)
        .with_max_connections(MAX_STA_CONN.into())
        .with_auth_method(auth_method);

    controller.set_config(&ModeConfig::AccessPoint(ap_config))?;
    controller.start_async().await?;
    Ok(())
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
