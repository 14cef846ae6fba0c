//! PCAP/PCAPNG source implementation.
//!
//! This module provides a `PacketSource` backed by legacy pcap (micro- or
//! nanosecond timestamps, either byte order) or pcapng files. It handles
//! file I/O and low-level parsing, emitting raw frames for the decoder.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::PcapSourceError;
pub use parser::PcapFileSource;
