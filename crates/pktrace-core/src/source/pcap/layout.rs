//! Capture file magic numbers and reader sizing.

pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];

pub const PCAP_MAGIC_USEC_LE: [u8; 4] = [0xd4, 0xc3, 0xb2, 0xa1];
pub const PCAP_MAGIC_USEC_BE: [u8; 4] = [0xa1, 0xb2, 0xc3, 0xd4];
pub const PCAP_MAGIC_NSEC_LE: [u8; 4] = [0x4d, 0x3c, 0xb2, 0xa1];
pub const PCAP_MAGIC_NSEC_BE: [u8; 4] = [0xa1, 0xb2, 0x3c, 0x4d];

/// Size of the legacy global header; shorter files are rejected up front.
pub const PCAP_HEADER_LEN: usize = 24;

/// Initial reader buffer; grown on demand for larger records.
pub const PCAP_READER_BUFFER_SIZE: usize = 65_536;

/// Records larger than this are rejected rather than buffered.
pub const PCAP_READER_MAX_BUFFER_SIZE: usize = 1 << 24;

/// pcapng `if_tsresol` default: microseconds.
pub const DEFAULT_TSRESOL: u8 = 6;
