use thiserror::Error;

/// Errors raised while opening or walking a capture file.
///
/// # Examples
/// ```text
/// PCAP parse error (pcap reader next): Nom(Verify)
/// ```
#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture header too short: {actual} bytes")]
    TooShort { actual: usize },
    #[error("unrecognized capture magic {magic:02x?}")]
    UnrecognizedMagic { magic: [u8; 4] },
    #[error("capture record larger than {limit} bytes")]
    RecordTooLarge { limit: usize },
    #[error("PCAP parse error ({context}): {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}
