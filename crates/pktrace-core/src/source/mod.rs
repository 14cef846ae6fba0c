//! Capture sources.
//!
//! A `PacketSource` yields raw link-layer frames one at a time. Several
//! sources are combined by `MergedSource` into a single stream ordered by
//! timestamp.

mod merge;
pub mod pcap;

pub use merge::{MergedSource, frame_order};
pub use pcap::PcapFileSource;

use std::path::Path;

use pcap_parser::Linktype;
use thiserror::Error;

/// One captured frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Capture timestamp in nanoseconds since the epoch.
    pub timestamp_ns: u64,
    pub linktype: Linktype,
    pub data: Vec<u8>,
    /// Index of the capture file in the merged input list.
    pub source: usize,
    /// 1-based position of the frame within its own file.
    pub sequence: u64,
}

impl Frame {
    /// Capture timestamp in seconds, for display. Ordering uses
    /// `timestamp_ns`.
    pub fn seconds(&self) -> f64 {
        (self.timestamp_ns / NANOS_PER_SEC) as f64
            + (self.timestamp_ns % NANOS_PER_SEC) as f64 / NANOS_PER_SEC as f64
    }
}

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

pub trait PacketSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Bytes consumed and total bytes, for progress reporting.
    fn progress(&self) -> (u64, u64) {
        (0, 0)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(String),
}

impl SourceError {
    pub(crate) fn from_pcap(path: &Path, value: pcap::PcapSourceError) -> Self {
        match value {
            pcap::PcapSourceError::Io(err) => SourceError::Io(err),
            other => SourceError::Format(format!("{}: {other}", path.display())),
        }
    }
}
