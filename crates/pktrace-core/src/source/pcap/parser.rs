use std::fs::File;
use std::path::{Path, PathBuf};

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader,
    traits::PcapReaderIterator,
};
use tracing::{debug, warn};

use crate::source::{Frame, PacketSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    CaptureFormat, legacy_ts_to_nanos, pcapng_ts_to_nanos, read_format_and_rewind,
    ticks_per_second,
};

/// Frame source backed by one legacy pcap or pcapng file.
pub struct PcapFileSource {
    path: PathBuf,
    inner: PcapReader,
    capacity: usize,
    frames: u64,
    offset: u64,
    size: u64,
}

#[derive(Debug, Clone, Copy)]
struct Interface {
    linktype: Linktype,
    ticks_per_second: u64,
    /// `if_tsoffset`, whole seconds.
    offset: i64,
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
        nanosecond: bool,
    },
    Ng {
        reader: PcapNGReader<File>,
        interfaces: Vec<Interface>,
    },
}

struct Record {
    timestamp_ns: u64,
    linktype: Linktype,
    data: Vec<u8>,
}

impl PcapFileSource {
    /// Open a capture file and validate its header.
    ///
    /// # Errors
    /// `SourceError::Io` when the file cannot be opened or read and
    /// `SourceError::Format` when the header is not a recognized capture
    /// format.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(SourceError::from)?;
        let size = file.metadata().map_err(SourceError::from)?.len();
        let inner = create_reader(file).map_err(|err| SourceError::from_pcap(path, err))?;
        debug!(path = %path.display(), size, "opened capture");
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            capacity: layout::PCAP_READER_BUFFER_SIZE,
            frames: 0,
            offset: 0,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames returned so far.
    pub fn frames_read(&self) -> u64 {
        self.frames
    }

    /// Bytes of the file consumed so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Total file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl PacketSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let record = next_record(&mut self.inner, &mut self.capacity, &mut self.offset)
            .map_err(|err| SourceError::from_pcap(&self.path, err))?;
        Ok(record.map(|record| {
            self.frames += 1;
            Frame {
                timestamp_ns: record.timestamp_ns,
                linktype: record.linktype,
                data: record.data,
                source: 0,
                sequence: self.frames,
            }
        }))
    }

    fn progress(&self) -> (u64, u64) {
        (self.offset, self.size)
    }
}

fn create_reader(file: File) -> Result<PcapReader, PcapSourceError> {
    let mut file = file;
    let format = read_format_and_rewind(&mut file)?;

    match format {
        CaptureFormat::PcapNg => {
            let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
                PcapSourceError::Pcap {
                    context: "pcapng reader init",
                    message: e.to_string(),
                }
            })?;
            Ok(PcapReader::Ng {
                reader,
                interfaces: Vec::new(),
            })
        }
        CaptureFormat::Legacy { nanosecond } => {
            let reader =
                LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file).map_err(|e| {
                    PcapSourceError::Pcap {
                        context: "pcap reader init",
                        message: e.to_string(),
                    }
                })?;
            Ok(PcapReader::Legacy {
                reader,
                linktype: None,
                nanosecond,
            })
        }
    }
}

fn next_record(
    reader: &mut PcapReader,
    capacity: &mut usize,
    consumed: &mut u64,
) -> Result<Option<Record>, PcapSourceError> {
    // A second Incomplete right after a refill means the file ends inside a
    // record.
    let mut refilled = false;
    loop {
        match reader {
            PcapReader::Legacy {
                reader,
                linktype,
                nanosecond,
            } => match reader.next() {
                Ok((offset, block)) => {
                    let record = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = Some(header.network);
                            None
                        }
                        PcapBlockOwned::Legacy(packet) => Some(Record {
                            timestamp_ns: legacy_ts_to_nanos(
                                packet.ts_sec,
                                packet.ts_usec,
                                *nanosecond,
                            ),
                            linktype: linktype.unwrap_or(Linktype::ETHERNET),
                            data: packet.data.to_vec(),
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    *consumed += offset as u64;
                    refilled = false;
                    if record.is_some() {
                        return Ok(record);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::BufferTooSmall) => {
                    grow(reader, capacity)?;
                    refilled = false;
                }
                Err(PcapError::Incomplete(_)) if refilled => return truncated(consumed),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcap reader refill",
                        message: e.to_string(),
                    })?;
                    refilled = true;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcap reader next",
                        message: e.to_string(),
                    });
                }
            },
            PcapReader::Ng { reader, interfaces } => match reader.next() {
                Ok((offset, block)) => {
                    let record = match block {
                        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                            interfaces.clear();
                            None
                        }
                        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                            interfaces.push(Interface {
                                linktype: intf.linktype,
                                ticks_per_second: ticks_per_second(intf.if_tsresol),
                                offset: intf.if_tsoffset,
                            });
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => {
                            let intf = interface(interfaces, packet.if_id);
                            Some(Record {
                                timestamp_ns: pcapng_ts_to_nanos(
                                    packet.ts_high,
                                    packet.ts_low,
                                    intf.ticks_per_second,
                                    intf.offset,
                                ),
                                linktype: intf.linktype,
                                data: packet.data.to_vec(),
                            })
                        }
                        PcapBlockOwned::NG(Block::SimplePacket(packet)) => {
                            let intf = interface(interfaces, 0);
                            Some(Record {
                                timestamp_ns: 0,
                                linktype: intf.linktype,
                                data: packet.data.to_vec(),
                            })
                        }
                        _ => None,
                    };
                    reader.consume(offset);
                    *consumed += offset as u64;
                    refilled = false;
                    if record.is_some() {
                        return Ok(record);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::BufferTooSmall) => {
                    grow(reader, capacity)?;
                    refilled = false;
                }
                Err(PcapError::Incomplete(_)) if refilled => return truncated(consumed),
                Err(PcapError::Incomplete(_)) => {
                    reader.refill().map_err(|e| PcapSourceError::Pcap {
                        context: "pcapng reader refill",
                        message: e.to_string(),
                    })?;
                    refilled = true;
                }
                Err(e) => {
                    return Err(PcapSourceError::Pcap {
                        context: "pcapng reader next",
                        message: e.to_string(),
                    });
                }
            },
        }
    }
}

/// Double the reader buffer so the pending record fits.
fn grow<R: PcapReaderIterator>(
    reader: &mut R,
    capacity: &mut usize,
) -> Result<(), PcapSourceError> {
    let next = capacity.saturating_mul(2);
    if next > layout::PCAP_READER_MAX_BUFFER_SIZE || !reader.grow(next) {
        return Err(PcapSourceError::RecordTooLarge {
            limit: layout::PCAP_READER_MAX_BUFFER_SIZE,
        });
    }
    debug!(capacity = next, "grew capture reader buffer");
    *capacity = next;
    Ok(())
}

fn truncated(consumed: &u64) -> Result<Option<Record>, PcapSourceError> {
    warn!(offset = *consumed, "capture ends inside a record; ignoring the partial record");
    Ok(None)
}

/// Interface lookup defaulting to Ethernet with microsecond timestamps.
fn interface(interfaces: &[Interface], if_id: u32) -> Interface {
    interfaces
        .get(if_id as usize)
        .copied()
        .unwrap_or(Interface {
            linktype: Linktype::ETHERNET,
            ticks_per_second: ticks_per_second(layout::DEFAULT_TSRESOL),
            offset: 0,
        })
}
