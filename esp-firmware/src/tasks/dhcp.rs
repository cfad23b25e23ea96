// DHCP Server Task - Vergibt Adressen an Stationen im AP-Netz
use defmt::{Debug2Format, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};

use esp_core::dhcp::{
    DHCP_CLIENT_PORT, DHCP_PACKET_SIZE, DHCP_SERVER_PORT, DhcpMessageType, LeasePool, build_reply,
    parse_request,
};

use crate::config::{AP_IP_ADDRESS, DHCP_LEASE_SLOTS, DHCP_PACKET_SLOTS, DHCP_UDP_BUFFER_SIZE};

/// DHCP Server Task
///
/// Beantwortet DISCOVER mit OFFER und REQUEST mit ACK. Jede Client-MAC bekommt
/// eine eigene Adresse aus dem `LeasePool`, RELEASE gibt sie wieder frei.
/// Ungültige Pakete werden ignoriert.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: &'static Stack<'static>) {
    let mut rx_meta = [PacketMetadata::EMPTY; DHCP_PACKET_SLOTS];
    let mut rx_buffer = [0u8; DHCP_UDP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; DHCP_PACKET_SLOTS];
    let mut tx_buffer = [0u8; DHCP_UDP_BUFFER_SIZE];

    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        warn!(
            "DHCP: Failed to bind port {}: {}",
            DHCP_SERVER_PORT,
            Debug2Format(&e)
        );
        return;
    }
    info!("DHCP: Listening on port {}", DHCP_SERVER_PORT);

    let mut packet = [0u8; DHCP_PACKET_SIZE];
    let mut leases = LeasePool::<DHCP_LEASE_SLOTS>::new(AP_IP_ADDRESS);

    loop {
        let len = match socket.recv_from(&mut packet).await {
            Ok((len, _remote)) => len,
            Err(e) => {
                warn!("DHCP: Receive error: {}", Debug2Format(&e));
                continue;
            }
        };

        let request = match parse_request(&packet[..len]) {
            Ok(request) => request,
            Err(e) => {
                info!("DHCP: Ignoring packet: {}", e);
                continue;
            }
        };

        if request.message_type == DhcpMessageType::Release {
            leases.release(&request.client_mac);
            info!("DHCP: Released lease of {:02x}", request.client_mac);
            continue;
        }

        // DECLINE, INFORM: keine Antwort nötig
        let Some(reply_type) = request.message_type.reply() else {
            continue;
        };

        let offered = leases.lease(&request.client_mac);
        let reply_len = match build_reply(&mut packet, AP_IP_ADDRESS, &request, offered, reply_type)
        {
            Ok(n) => n,
            Err(e) => {
                warn!("DHCP: Failed to build reply: {}", e);
                continue;
            }
        };

        info!(
            "DHCP: {} -> {} for {:02x}",
            Debug2Format(&request.message_type),
            Debug2Format(&offered),
            request.client_mac
        );

        // Client hat noch keine Adresse: Antwort per Broadcast
        let dest = (embassy_net::Ipv4Address::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(e) = socket.send_to(&packet[..reply_len], dest).await {
            warn!("DHCP: Send error: {}", Debug2Format(&e));
        }
    }
}
