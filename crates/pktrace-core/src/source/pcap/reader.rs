use std::io::{Read, Seek, SeekFrom};

use super::error::PcapSourceError;
use super::layout;
use crate::source::NANOS_PER_SEC;

/// Capture container detected from the leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureFormat {
    Legacy { nanosecond: bool },
    PcapNg,
}

/// Read the file header, classify it and rewind the reader to the start.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use pktrace_core::source::pcap::reader::{read_format_and_rewind, CaptureFormat};
/// use std::io::Cursor;
///
/// let mut bytes = vec![0xd4, 0xc3, 0xb2, 0xa1];
/// bytes.resize(24, 0);
/// let format = read_format_and_rewind(&mut Cursor::new(bytes)).unwrap();
/// assert_eq!(format, CaptureFormat::Legacy { nanosecond: false });
/// ```
///
/// # Errors
/// Returns `PcapSourceError::TooShort` when the header is truncated,
/// `UnrecognizedMagic` for unknown formats and `Io` on read failures.
pub fn read_format_and_rewind<R: Read + Seek>(
    reader: &mut R,
) -> Result<CaptureFormat, PcapSourceError> {
    let mut header = [0u8; layout::PCAP_HEADER_LEN];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read(&mut header[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    reader.seek(SeekFrom::Start(0))?;

    if filled < 4 {
        return Err(PcapSourceError::TooShort { actual: filled });
    }
    let magic = [header[0], header[1], header[2], header[3]];
    let format = classify_magic(&magic).ok_or(PcapSourceError::UnrecognizedMagic { magic })?;
    if matches!(format, CaptureFormat::Legacy { .. }) && filled < layout::PCAP_HEADER_LEN {
        return Err(PcapSourceError::TooShort { actual: filled });
    }
    Ok(format)
}

/// Map magic bytes onto a capture format.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use pktrace_core::source::pcap::reader::{classify_magic, CaptureFormat};
///
/// assert_eq!(classify_magic(&[0x0a, 0x0d, 0x0d, 0x0a]), Some(CaptureFormat::PcapNg));
/// ```
pub fn classify_magic(magic: &[u8; 4]) -> Option<CaptureFormat> {
    match *magic {
        layout::PCAPNG_MAGIC => Some(CaptureFormat::PcapNg),
        layout::PCAP_MAGIC_USEC_LE | layout::PCAP_MAGIC_USEC_BE => {
            Some(CaptureFormat::Legacy { nanosecond: false })
        }
        layout::PCAP_MAGIC_NSEC_LE | layout::PCAP_MAGIC_NSEC_BE => {
            Some(CaptureFormat::Legacy { nanosecond: true })
        }
        _ => None,
    }
}

/// Timestamp units per second for a pcapng `if_tsresol` value.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use pktrace_core::source::pcap::reader::ticks_per_second;
///
/// assert_eq!(ticks_per_second(6), 1_000_000);
/// assert_eq!(ticks_per_second(0x80 | 10), 1024);
/// ```
pub fn ticks_per_second(tsresol: u8) -> u64 {
    let exponent = u32::from(tsresol & 0x7f);
    let base: u64 = if tsresol & 0x80 != 0 { 2 } else { 10 };
    base.checked_pow(exponent).unwrap_or(u64::MAX)
}

/// Convert a pcapng high/low timestamp to nanoseconds, applying the
/// interface's `if_tsoffset` (whole seconds). Saturates instead of wrapping.
///
/// # Examples
/// This helper is part of an internal module, so the example is marked as
/// text example.
/// ```text
/// use pktrace_core::source::pcap::reader::pcapng_ts_to_nanos;
///
/// assert_eq!(pcapng_ts_to_nanos(0, 1_500_000, 1_000_000, 0), 1_500_000_000);
/// ```
pub fn pcapng_ts_to_nanos(ts_high: u32, ts_low: u32, ticks_per_second: u64, offset: i64) -> u64 {
    let ts = u128::from((u64::from(ts_high) << 32) | u64::from(ts_low));
    let ticks = u128::from(ticks_per_second.max(1));
    let nanos = ts / ticks * u128::from(NANOS_PER_SEC) + ts % ticks * u128::from(NANOS_PER_SEC) / ticks;
    let nanos = u64::try_from(nanos).unwrap_or(u64::MAX);
    nanos.saturating_add_signed(offset.saturating_mul(NANOS_PER_SEC as i64))
}

/// Convert a legacy pcap record timestamp to nanoseconds.
pub fn legacy_ts_to_nanos(ts_sec: u32, ts_frac: u32, nanosecond: bool) -> u64 {
    let frac = if nanosecond {
        u64::from(ts_frac)
    } else {
        u64::from(ts_frac) * 1_000
    };
    u64::from(ts_sec) * NANOS_PER_SEC + frac
}
