use std::net::IpAddr;

use etherparse::{LinkSlice, NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;

use crate::packet::{Packet, Record, layer};
use crate::source::Frame;

use super::error::DecodeError;

/// BSD loopback captures prefix each packet with a 4-byte address family.
const NULL_HEADER_LEN: usize = 4;

/// Transport payload handed to the RPC decoder.
pub(super) struct Transport<'a> {
    pub kind: TransportKind,
    pub payload: &'a [u8],
    pub src_port: u16,
    pub dst_port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TransportKind {
    Tcp,
    Udp,
}

impl Transport<'_> {
    pub fn uses_port(&self, port: u16) -> bool {
        self.src_port == port || self.dst_port == port
    }
}

/// Decode link, network and transport layers into `packet`.
///
/// Returns `Ok(None)` for frames without a TCP or UDP payload; the layers
/// that did decode stay on the packet.
pub(super) fn decode_link<'a>(
    frame: &'a Frame,
    packet: &mut Packet,
) -> Result<Option<Transport<'a>>, DecodeError> {
    let data = frame.data.as_slice();
    let sliced = match frame.linktype {
        Linktype::ETHERNET => SlicedPacket::from_ethernet(data),
        Linktype::LINUX_SLL => SlicedPacket::from_linux_sll(data),
        Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => SlicedPacket::from_ip(data),
        Linktype::NULL => SlicedPacket::from_ip(data.get(NULL_HEADER_LEN..).unwrap_or_default()),
        other => return Err(DecodeError::UnsupportedLinktype(other.0)),
    }
    .map_err(|e| DecodeError::Slice(e.to_string()))?;

    if let Some(LinkSlice::Ethernet2(eth)) = &sliced.link {
        let mut rec = Record::new();
        rec.insert("src", mac(&eth.source()));
        rec.insert("dst", mac(&eth.destination()));
        rec.insert("type", u32::from(eth.ether_type().0));
        packet.push_layer(layer::ETH, rec);
    }

    let Some(net) = &sliced.net else {
        return Ok(None);
    };
    let mut ip = Record::new();
    match net {
        NetSlice::Ipv4(ipv4) => {
            let header = ipv4.header();
            ip.insert("version", 4u32);
            ip.insert("src", IpAddr::V4(header.source_addr()).to_string());
            ip.insert("dst", IpAddr::V4(header.destination_addr()).to_string());
            ip.insert("ttl", u32::from(header.ttl()));
            ip.insert("protocol", u32::from(header.protocol().0));
            ip.insert("length", u32::from(header.total_len()));
        }
        NetSlice::Ipv6(ipv6) => {
            let header = ipv6.header();
            ip.insert("version", 6u32);
            ip.insert("src", IpAddr::V6(header.source_addr()).to_string());
            ip.insert("dst", IpAddr::V6(header.destination_addr()).to_string());
            ip.insert("hop_limit", u32::from(header.hop_limit()));
            ip.insert("protocol", u32::from(header.next_header().0));
            ip.insert("length", u32::from(header.payload_length()));
        }
        #[allow(unreachable_patterns)]
        _ => return Ok(None),
    }
    packet.push_layer(layer::IP, ip);

    match sliced.transport {
        Some(TransportSlice::Tcp(tcp)) => {
            let mut rec = Record::new();
            rec.insert("src_port", u32::from(tcp.source_port()));
            rec.insert("dst_port", u32::from(tcp.destination_port()));
            rec.insert("seq", tcp.sequence_number());
            rec.insert("ack", tcp.acknowledgment_number());
            rec.insert("flags", tcp_flags(&tcp));
            rec.insert("window", u32::from(tcp.window_size()));
            let payload = tcp.payload();
            rec.insert("length", payload.len() as u64);
            packet.push_layer(layer::TCP, rec);
            Ok(Some(Transport {
                kind: TransportKind::Tcp,
                payload,
                src_port: tcp.source_port(),
                dst_port: tcp.destination_port(),
            }))
        }
        Some(TransportSlice::Udp(udp)) => {
            let mut rec = Record::new();
            rec.insert("src_port", u32::from(udp.source_port()));
            rec.insert("dst_port", u32::from(udp.destination_port()));
            rec.insert("length", u32::from(udp.length()));
            packet.push_layer(layer::UDP, rec);
            Ok(Some(Transport {
                kind: TransportKind::Udp,
                payload: udp.payload(),
                src_port: udp.source_port(),
                dst_port: udp.destination_port(),
            }))
        }
        _ => Ok(None),
    }
}

fn mac(addr: &[u8; 6]) -> String {
    addr.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// TCP flags packed as in the header (FIN = 0x01 .. URG = 0x20).
fn tcp_flags(tcp: &etherparse::TcpSlice<'_>) -> u32 {
    [tcp.fin(), tcp.syn(), tcp.rst(), tcp.psh(), tcp.ack(), tcp.urg()]
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0, |flags, (bit, _)| flags | (1 << bit))
}
