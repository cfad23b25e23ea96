//! Minimaler DHCP-Server (Paket-Logik)
//!
//! Der Access Point hat keinen DHCP-Dienst der Plattform, daher beantwortet
//! die Firmware DISCOVER/REQUEST selbst. Adressen kommen aus einer kleinen
//! Lease-Tabelle (`LeasePool`), jede Station bekommt eine eigene.

use core::net::Ipv4Addr;

/// Server-Port (wir lauschen hier)
pub const DHCP_SERVER_PORT: u16 = 67;

/// Client-Port (Antworten gehen per Broadcast hierhin)
pub const DHCP_CLIENT_PORT: u16 = 68;

/// Maximale Paketgröße, die jeder DHCP-Client akzeptieren muss
pub const DHCP_PACKET_SIZE: usize = 576;

/// Mindestlänge einer BOOTP-Antwort laut RFC 1542
const MIN_REPLY_SIZE: usize = 300;

/// BOOTP-Header (236 Bytes) + Magic Cookie
const OPTIONS_OFFSET: usize = 240;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

const BOOTREQUEST: u8 = 1;
const BOOTREPLY: u8 = 2;
const HTYPE_ETHERNET: u8 = 1;

const OPTION_PAD: u8 = 0;
const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_DNS: u8 = 6;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_END: u8 = 255;

/// Lease-Dauer in Sekunden (2 Stunden)
pub const LEASE_TIME_SECS: u32 = 7200;

/// Erster vergebener Host-Anteil (.1 ist der Access Point selbst)
const POOL_FIRST_HOST: u8 = 2;
/// Anzahl vergebbarer Adressen: .2 bis .254
const POOL_SIZE: u8 = 253;

/// DHCP Nachrichten-Typen (Option 53)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpMessageType {
    Discover = 1,
    Offer = 2,
    Request = 3,
    Decline = 4,
    Ack = 5,
    Nak = 6,
    Release = 7,
    Inform = 8,
}

impl TryFrom<u8> for DhcpMessageType {
    type Error = DhcpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nak),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(DhcpError::UnknownMessageType(other)),
        }
    }
}

impl DhcpMessageType {
    /// Antwort-Typ des Servers, `None` wenn keine Antwort nötig ist
    pub fn reply(self) -> Option<DhcpMessageType> {
        match self {
            DhcpMessageType::Discover => Some(DhcpMessageType::Offer),
            DhcpMessageType::Request => Some(DhcpMessageType::Ack),
            _ => None,
        }
    }
}

/// Fehler beim Verarbeiten eines DHCP-Pakets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DhcpError {
    TooShort,
    NotBootRequest,
    BadMagicCookie,
    MissingMessageType,
    UnknownMessageType(u8),
    BufferTooSmall,
}

#[cfg(feature = "defmt")]
impl defmt::Format for DhcpError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DhcpError::TooShort => defmt::write!(fmt, "Packet too short"),
            DhcpError::NotBootRequest => defmt::write!(fmt, "Not a BOOTREQUEST"),
            DhcpError::BadMagicCookie => defmt::write!(fmt, "Bad magic cookie"),
            DhcpError::MissingMessageType => defmt::write!(fmt, "Missing message type"),
            DhcpError::UnknownMessageType(t) => defmt::write!(fmt, "Unknown message type {}", t),
            DhcpError::BufferTooSmall => defmt::write!(fmt, "Buffer too small"),
        }
    }
}

/// Die Felder eines Client-Pakets, die für die Antwort gebraucht werden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRequest {
    pub xid: [u8; 4],
    pub flags: [u8; 2],
    pub client_mac: [u8; 6],
    pub message_type: DhcpMessageType,
}

/// Parst ein DHCP-Paket vom Client
pub fn parse_request(packet: &[u8]) -> Result<DhcpRequest, DhcpError> {
    if packet.len() < OPTIONS_OFFSET {
        return Err(DhcpError::TooShort);
    }
    if packet[0] != BOOTREQUEST {
        return Err(DhcpError::NotBootRequest);
    }
    if packet[236..OPTIONS_OFFSET] != MAGIC_COOKIE {
        return Err(DhcpError::BadMagicCookie);
    }

    let message_type = find_option(&packet[OPTIONS_OFFSET..], OPTION_MESSAGE_TYPE)
        .and_then(|data| data.first().copied())
        .ok_or(DhcpError::MissingMessageType)?;

    let mut xid = [0u8; 4];
    xid.copy_from_slice(&packet[4..8]);
    let mut flags = [0u8; 2];
    flags.copy_from_slice(&packet[10..12]);
    let mut client_mac = [0u8; 6];
    client_mac.copy_from_slice(&packet[28..34]);

    Ok(DhcpRequest {
        xid,
        flags,
        client_mac,
        message_type: DhcpMessageType::try_from(message_type)?,
    })
}

/// Eine vergebene Adresse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lease {
    mac: [u8; 6],
    host: u8,
    /// Zeitpunkt der letzten Vergabe (logische Uhr des Pools)
    stamp: u32,
}

/// Lease-Tabelle für `N` Clients im /24 des Servers
///
/// Eine MAC behält ihre Adresse, solange ihr Eintrag existiert. Neue Clients
/// starten bei einer aus der MAC abgeleiteten Adresse und suchen von dort
/// aufwärts die nächste freie. Ist die Tabelle voll, wird der am längsten
/// nicht mehr angefragte Eintrag ersetzt.
#[derive(Debug, Clone)]
pub struct LeasePool<const N: usize> {
    server: Ipv4Addr,
    leases: [Option<Lease>; N],
    clock: u32,
}

impl<const N: usize> LeasePool<N> {
    pub const fn new(server: Ipv4Addr) -> Self {
        const { assert!(N > 0 && N < POOL_SIZE as usize) };
        Self {
            server,
            leases: [None; N],
            clock: 0,
        }
    }

    /// Adresse für `client_mac`: die bestehende Lease oder eine neue
    pub fn lease(&mut self, client_mac: &[u8; 6]) -> Ipv4Addr {
        self.clock = self.clock.wrapping_add(1);
        let stamp = self.clock;

        if let Some(lease) = self
            .leases
            .iter_mut()
            .flatten()
            .find(|lease| lease.mac == *client_mac)
        {
            lease.stamp = stamp;
            let host = lease.host;
            return self.address(host);
        }

        let slot = self.slot_for_new_lease();
        self.leases[slot] = None;
        let host = self.free_host(preferred_host(client_mac));
        self.leases[slot] = Some(Lease {
            mac: *client_mac,
            host,
            stamp,
        });
        self.address(host)
    }

    /// Adresse, die `client_mac` aktuell hält
    pub fn lookup(&self, client_mac: &[u8; 6]) -> Option<Ipv4Addr> {
        self.leases
            .iter()
            .flatten()
            .find(|lease| lease.mac == *client_mac)
            .map(|lease| self.address(lease.host))
    }

    /// Client hat seine Adresse zurückgegeben (DHCPRELEASE)
    pub fn release(&mut self, client_mac: &[u8; 6]) {
        for slot in &mut self.leases {
            if slot.is_some_and(|lease| lease.mac == *client_mac) {
                *slot = None;
            }
        }
    }

    /// Freier Slot, sonst der am längsten ungenutzte
    fn slot_for_new_lease(&self) -> usize {
        self.leases
            .iter()
            .enumerate()
            .min_by_key(|(_, lease)| lease.map_or(0, |lease| lease.stamp))
            .map_or(0, |(slot, _)| slot)
    }

    /// Erste freie Adresse ab `preferred`, zyklisch über den Pool
    fn free_host(&self, preferred: u8) -> u8 {
        let server_host = self.server.octets()[3];
        let offset = u16::from(preferred - POOL_FIRST_HOST);
        (0..u16::from(POOL_SIZE))
            .map(|step| POOL_FIRST_HOST + ((offset + step) % u16::from(POOL_SIZE)) as u8)
            .find(|&host| host != server_host && !self.is_taken(host))
            .unwrap_or(preferred)
    }

    fn is_taken(&self, host: u8) -> bool {
        self.leases.iter().flatten().any(|lease| lease.host == host)
    }

    fn address(&self, host: u8) -> Ipv4Addr {
        let [a, b, c, _] = self.server.octets();
        Ipv4Addr::new(a, b, c, host)
    }
}

/// Bevorzugter Host-Anteil für eine MAC im Bereich `.2..=.254`
fn preferred_host(client_mac: &[u8; 6]) -> u8 {
    // FNV-1a über die MAC, damit aufeinanderfolgende MACs streuen
    let hash = client_mac
        .iter()
        .fold(0x811c_9dc5u32, |h, &b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
    POOL_FIRST_HOST + (hash % u32::from(POOL_SIZE)) as u8
}

/// Baut eine OFFER/ACK-Antwort in `buf`
///
/// Server-Adresse dient auch als Router und DNS. Gibt die Länge zurück.
pub fn build_reply(
    buf: &mut [u8],
    server: Ipv4Addr,
    request: &DhcpRequest,
    offered: Ipv4Addr,
    reply_type: DhcpMessageType,
) -> Result<usize, DhcpError> {
    if buf.len() < MIN_REPLY_SIZE {
        return Err(DhcpError::BufferTooSmall);
    }
    buf.fill(0);

    buf[0] = BOOTREPLY;
    buf[1] = HTYPE_ETHERNET;
    buf[2] = 6;
    buf[4..8].copy_from_slice(&request.xid);
    buf[10..12].copy_from_slice(&request.flags);
    buf[16..20].copy_from_slice(&offered.octets());
    buf[20..24].copy_from_slice(&server.octets());
    buf[28..34].copy_from_slice(&request.client_mac);
    buf[236..OPTIONS_OFFSET].copy_from_slice(&MAGIC_COOKIE);

    let server_octets = server.octets();
    let mut options = OptionWriter {
        buf,
        pos: OPTIONS_OFFSET,
    };
    options.put(OPTION_MESSAGE_TYPE, &[reply_type as u8]);
    options.put(OPTION_SERVER_ID, &server_octets);
    options.put(OPTION_LEASE_TIME, &LEASE_TIME_SECS.to_be_bytes());
    options.put(OPTION_SUBNET_MASK, &[255, 255, 255, 0]);
    options.put(OPTION_ROUTER, &server_octets);
    options.put(OPTION_DNS, &server_octets);
    options.end();

    Ok(options.pos.max(MIN_REPLY_SIZE))
}

/// Schreibt TLV-Optionen; die Größe ist durch `MIN_REPLY_SIZE` abgesichert
struct OptionWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl OptionWriter<'_> {
    fn put(&mut self, code: u8, data: &[u8]) {
        self.buf[self.pos] = code;
        self.buf[self.pos + 1] = data.len() as u8;
        self.buf[self.pos + 2..self.pos + 2 + data.len()].copy_from_slice(data);
        self.pos += 2 + data.len();
    }

    fn end(&mut self) {
        self.buf[self.pos] = OPTION_END;
        self.pos += 1;
    }
}

/// Sucht eine Option im Options-Bereich (nach dem Magic Cookie)
fn find_option(options: &[u8], code: u8) -> Option<&[u8]> {
    let mut i = 0;
    while i < options.len() {
        match options[i] {
            OPTION_END => break,
            OPTION_PAD => i += 1,
            current => {
                let len = *options.get(i + 1)? as usize;
                let data = options.get(i + 2..i + 2 + len)?;
                if current == code {
                    return Some(data);
                }
                i += 2 + len;
            }
        }
    }
    None
}
