// mDNS Responder Task - Advertised Hostname und HTTP-Service via Multicast DNS
//
// Stationen im AP-Netz erreichen die Status-Endpunkte damit unter
// http://ca360-esp32.local/ statt über die IP-Adresse.
//
// Technische Details:
// - Protokoll: mDNS (RFC 6762) + DNS-SD (RFC 6763)
// - Transport: UDP Multicast auf 224.0.0.251:5353
// - Records: A (Hostname → AP-IP), PTR/SRV/TXT für `_http._tcp`
// - Library: edge-mdns (no_std) mit edge-nal-embassy als Adapter

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use core::net::{Ipv4Addr, SocketAddr};
use core::sync::atomic::{AtomicU32, Ordering};

use edge_mdns::{
    HostAnswersMdnsHandler,
    buf::VecBufAccess,
    domain::base::Ttl,
    host::{Host, Service, ServiceAnswers},
    io,
};
use edge_nal::{MulticastV4, UdpBind, UdpSplit};
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;

use crate::config::{
    HTTP_PORT, MDNS_HOSTNAME, MDNS_INSTANCE, MDNS_MULTICAST_ADDR, MDNS_PACKET_BUFFER_SIZE,
    MDNS_PORT, MDNS_RECONNECT_DELAY_SECS, MDNS_TTL_SECS, MDNS_UDP_BUFFER_SIZE,
};

/// UDP-Buffers für edge-nal-embassy (1 Socket)
type MdnsUdpBuffers = UdpBuffers<1, MDNS_UDP_BUFFER_SIZE, MDNS_UDP_BUFFER_SIZE>;

/// Counter-basierter "Zufall" für mDNS Transaction IDs
///
/// mDNS braucht nur Eindeutigkeit, keine kryptographische Qualität.
static RNG_COUNTER: AtomicU32 = AtomicU32::new(0);

fn mdns_rng(buf: &mut [u8]) {
    let mut counter = RNG_COUNTER.fetch_add(1, Ordering::Relaxed);
    for chunk in buf.chunks_mut(4) {
        let bytes = counter.to_le_bytes();
        let len = chunk.len();
        chunk.copy_from_slice(&bytes[..len]);
        counter = counter.wrapping_add(1);
    }
}

/// mDNS Responder Task
///
/// Wartet auf den AP-Link, dann beantwortet er Queries für
/// `<MDNS_HOSTNAME>.local` und den Service `MDNS_INSTANCE._http._tcp.local`.
///
/// Bei jedem Fehler: Neustart nach `MDNS_RECONNECT_DELAY_SECS`.
///
/// # Beispiel-Nutzung
///
/// ```bash
/// # Aus dem AP-Netz heraus
/// curl http://ca360-esp32.local/info
/// avahi-browse -r _http._tcp
/// ```
#[embassy_executor::task]
pub async fn mdns_responder_task(stack: &'static Stack<'static>) {
    info!("mDNS: Task started, waiting for access point...");
    wait_for_network(stack).await;
    info!("mDNS: Network ready");

    // Einmalig pro Boot: der Task läuft nur einmal, Neustarts nutzen dieselben Buffers
    static UDP_BUFFERS: static_cell::StaticCell<MdnsUdpBuffers> = static_cell::StaticCell::new();
    let udp_buffers: &'static MdnsUdpBuffers = UDP_BUFFERS.init_with(UdpBuffers::new);

    loop {
        match run_mdns_responder(stack, udp_buffers).await {
            Ok(_) => warn!("mDNS: Responder stopped normally"),
            Err(e) => error!("mDNS: Error: {}", e),
        }
        info!("mDNS: Restarting in {}s...", MDNS_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MDNS_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis AP-Link oben und statische IPv4-Konfiguration aktiv ist
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Führt einen mDNS Responder-Durchlauf aus (blockiert bis zum Fehler)
async fn run_mdns_responder(
    stack: &'static Stack<'static>,
    udp_buffers: &'static MdnsUdpBuffers,
) -> Result<(), MdnsError> {
    let our_ip = stack
        .config_v4()
        .ok_or(MdnsError::NoAddress)?
        .address
        .address();
    info!("mDNS: Using IP {}", Debug2Format(&our_ip));

    let udp_stack = Udp::new(*stack, udp_buffers);

    let mut socket = udp_stack
        .bind(SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), MDNS_PORT))
        .await
        .map_err(|_| MdnsError::SocketBindFailed)?;

    socket
        .join_v4(Ipv4Addr::from(MDNS_MULTICAST_ADDR), Ipv4Addr::UNSPECIFIED)
        .await
        .map_err(|_| MdnsError::MulticastJoinFailed)?;

    let (recv, send) = socket.split();

    let host = Host {
        hostname: MDNS_HOSTNAME,
        ipv4: our_ip.into(),
        ipv6: [0u8; 16].into(), // kein proto-ipv6 in smoltcp
        ttl: Ttl::from_secs(MDNS_TTL_SECS),
    };

    let service = Service {
        name: MDNS_INSTANCE,
        priority: 1,
        weight: 5,
        service: "_http",
        protocol: "_tcp",
        port: HTTP_PORT,
        service_subtypes: &[],
        txt_kvs: &[("path", "/info")],
    };

    let recv_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();
    let send_buf = VecBufAccess::<NoopRawMutex, MDNS_PACKET_BUFFER_SIZE>::new();

    // Signal für Broadcast-Notifications (von der API verlangt, hier ungenutzt)
    let signal = Signal::<NoopRawMutex, ()>::new();

    let mdns = io::Mdns::new(
        Some(our_ip),
        None,
        recv,
        send,
        recv_buf,
        send_buf,
        mdns_rng,
        &signal,
    );

    info!(
        "mDNS: Advertising '{}.local' and '{}' (_http._tcp)",
        MDNS_HOSTNAME, MDNS_INSTANCE
    );

    mdns.run(HostAnswersMdnsHandler::new(ServiceAnswers::new(
        &host, &service,
    )))
    .await
    .map_err(|_| MdnsError::ResponderFailed)?;

    Ok(())
}

/// mDNS Fehler-Typen
///
/// Jeder Fehler führt zu einem Neustart im Haupt-Loop.
#[derive(Debug)]
enum MdnsError {
    /// Stack hat (noch) keine IPv4-Konfiguration
    NoAddress,
    SocketBindFailed,
    MulticastJoinFailed,
    ResponderFailed,
}

impl defmt::Format for MdnsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MdnsError::NoAddress => defmt::write!(fmt, "No IPv4 address"),
            MdnsError::SocketBindFailed => defmt::write!(fmt, "Socket bind failed"),
            MdnsError::MulticastJoinFailed => defmt::write!(fmt, "Multicast join failed"),
            MdnsError::ResponderFailed => defmt::write!(fmt, "Responder failed"),
        }
    }
}
