//! Trace cursor over one or more capture files.
//!
//! `Trace` reads frames from a timestamp-ordered merge of its input files,
//! decodes them into packets and runs match scans. Positions are 1-based
//! frame indexes in the merged stream; `position()` is the index of the last
//! frame consumed, so a scan that returns packet `k` leaves the cursor at
//! `k` and the next read yields `k + 1`.
//!
//! # Examples
//! ```no_run
//! use pktrace_core::{MatchOptions, Trace, TraceOptions};
//!
//! let mut trace = Trace::open(&["client.pcap", "server.pcap"], TraceOptions::default())?;
//! let options = MatchOptions { reply: true, ..MatchOptions::default() };
//! while let Some(found) = trace.match_expr("nfs.name == 'foo'", options)? {
//!     println!("{} reply_matched={}", found.packet.index, found.reply_matched);
//! }
//! # Ok::<(), pktrace_core::TraceError>(())
//! ```

mod error;
mod progress;

pub use error::TraceError;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::TraceOptions;
use crate::correlate::Correlator;
use crate::decode::{DecodeError, Decoder};
use crate::matcher::Filter;
use crate::packet::Packet;
use crate::source::{MergedSource, PacketSource, PcapFileSource, SourceError};

use progress::Progress;

/// Compiled expressions kept per trace; the cache starts over once full.
const FILTER_CACHE_LIMIT: usize = 64;

/// Options for one `Trace::match_expr` scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Restart from the first frame instead of the current position.
    pub rewind: bool,
    /// Pair replies with previously matched calls.
    pub reply: bool,
    /// Stop before reading any frame whose index exceeds this bound.
    pub maxindex: Option<u64>,
}

/// Result of a successful match.
#[derive(Debug, Clone)]
pub struct Matched {
    pub packet: Packet,
    /// Call paired with a matched reply.
    pub call: Option<Packet>,
    /// True when `packet` is a reply whose call was matched earlier in this
    /// scan window.
    pub reply_matched: bool,
}

impl Matched {
    fn single(packet: Packet) -> Self {
        Self {
            packet,
            call: None,
            reply_matched: false,
        }
    }
}

/// File handle and state id checksums accumulated by callers while tracking
/// a file through a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracked {
    pub fh: BTreeSet<u32>,
    pub stateid: BTreeSet<u32>,
}

impl Tracked {
    /// Track a file handle; returns true when it was not tracked before.
    pub fn add_fh(&mut self, fh: &[u8]) -> bool {
        self.fh.insert(crc32fast::hash(fh))
    }

    /// Track a state id by the checksum of its `other` field.
    pub fn add_stateid(&mut self, other: &[u8]) -> bool {
        self.stateid.insert(crc32fast::hash(other))
    }

    pub fn has_fh(&self, fh: &[u8]) -> bool {
        self.fh.contains(&crc32fast::hash(fh))
    }

    pub fn has_stateid(&self, other: &[u8]) -> bool {
        self.stateid.contains(&crc32fast::hash(other))
    }

    pub fn clear(&mut self) {
        self.fh.clear();
        self.stateid.clear();
    }
}

pub struct Trace {
    paths: Vec<PathBuf>,
    options: TraceOptions,
    frames: MergedSource<PcapFileSource>,
    decoder: Decoder,
    correlator: Correlator,
    filters: HashMap<String, Filter>,
    position: u64,
    skipped: u64,
    progress: Progress,
    tracked: Tracked,
}

impl Trace {
    /// Open every capture file and position the cursor before the first
    /// frame.
    ///
    /// # Errors
    /// `TraceError::Source` when a file cannot be read or is not a
    /// recognized capture format, or when `paths` is empty.
    pub fn open<P: AsRef<Path>>(paths: &[P], options: TraceOptions) -> Result<Self, TraceError> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let frames = open_sources(&paths)?;
        Ok(Self {
            paths,
            options,
            frames,
            decoder: Decoder::new(options.decoder),
            correlator: Correlator::new(),
            filters: HashMap::new(),
            position: 0,
            skipped: 0,
            progress: Progress::new(options.showprog),
            tracked: Tracked::default(),
        })
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn options(&self) -> TraceOptions {
        self.options
    }

    /// Index of the last frame consumed; 0 before the first read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Frames skipped because they failed to decode since the last rewind.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn set_showprog(&mut self, showprog: bool) {
        self.options.showprog = showprog;
        self.progress.set_enabled(showprog);
    }

    /// Drop every outstanding call so that replies seen from now on are not
    /// paired with calls matched earlier.
    pub fn clear_xid_list(&mut self) {
        self.correlator.clear();
    }

    /// Number of matched calls still waiting for their reply.
    pub fn outstanding_calls(&self) -> usize {
        self.correlator.len()
    }

    pub fn tracked(&self) -> &Tracked {
        &self.tracked
    }

    pub fn tracked_mut(&mut self) -> &mut Tracked {
        &mut self.tracked
    }

    /// Release the capture files.
    pub fn close(self) {
        debug!(
            position = self.position,
            skipped = self.skipped,
            "closing trace"
        );
    }

    /// Read the next frame, decoding it.
    fn read_frame(&mut self) -> Result<Option<Result<Packet, DecodeError>>, TraceError> {
        let Some(frame) = self.frames.next_frame()? else {
            return Ok(None);
        };
        self.position += 1;
        let (done, total) = self.frames.progress();
        self.progress.update(done, total);
        Ok(Some(self.decoder.decode(self.position, &frame)))
    }

    /// Next decodable packet. Frames that fail to decode are counted in
    /// `skipped()` and passed over.
    ///
    /// # Errors
    /// `TraceError::Source` when reading the capture fails.
    pub fn next_packet(&mut self) -> Result<Option<Packet>, TraceError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some(Ok(packet)) => return Ok(Some(packet)),
                Some(Err(err)) => {
                    self.skipped += 1;
                    debug!(index = self.position, error = %err, "skipping frame");
                }
            }
        }
    }

    /// Move the cursor so that the next read yields frame `index`.
    ///
    /// Seeking backwards rewinds. Frames in between are decoded so that
    /// replies after the target still find their calls. Returns false when
    /// the stream ends before the target.
    ///
    /// # Errors
    /// `TraceError::Source` when reopening or reading the capture fails.
    pub fn seek(&mut self, index: u64) -> Result<bool, TraceError> {
        let target = index.saturating_sub(1);
        if target < self.position {
            self.rewind()?;
        }
        while self.position < target {
            match self.read_frame()? {
                None => return Ok(false),
                Some(Ok(_)) => {}
                Some(Err(_)) => self.skipped += 1,
            }
        }
        Ok(true)
    }

    /// Packet at 1-based `index`, or `None` past the end of the stream.
    ///
    /// # Errors
    /// `TraceError::Decode` when that frame does not decode, and
    /// `TraceError::Source` when reading fails.
    pub fn get(&mut self, index: u64) -> Result<Option<Packet>, TraceError> {
        if index == 0 || !self.seek(index)? {
            return Ok(None);
        }
        match self.read_frame()? {
            None => Ok(None),
            Some(Ok(packet)) => Ok(Some(packet)),
            Some(Err(source)) => Err(TraceError::Decode {
                index: self.position,
                source,
            }),
        }
    }

    /// Reopen the inputs and move back before the first frame.
    ///
    /// Registered calls and outstanding matched calls are dropped; tracked
    /// file handles and state ids are kept.
    ///
    /// # Errors
    /// `TraceError::Source` when a file cannot be reopened.
    pub fn rewind(&mut self) -> Result<(), TraceError> {
        self.frames = open_sources(&self.paths)?;
        self.decoder.reset();
        self.correlator.clear();
        self.position = 0;
        self.skipped = 0;
        self.progress.reset();
        debug!("trace rewound");
        Ok(())
    }

    pub(crate) fn filter(&mut self, expr: &str) -> Result<Filter, TraceError> {
        if let Some(filter) = self.filters.get(expr) {
            return Ok(filter.clone());
        }
        let filter = Filter::compile(expr)?;
        if self.filters.len() >= FILTER_CACHE_LIMIT {
            debug!(entries = self.filters.len(), "filter cache full, clearing");
            self.filters.clear();
        }
        self.filters.insert(expr.to_string(), filter.clone());
        Ok(filter)
    }

    /// Number of compiled expressions currently cached.
    pub fn cached_filters(&self) -> usize {
        self.filters.len()
    }

    /// Scan forward for the next packet satisfying `expr`.
    ///
    /// With `reply` set, matched calls are remembered by xid and a later
    /// reply with the same xid is returned paired with its call even when
    /// the reply itself does not satisfy `expr`. A reply that satisfies
    /// `expr` without an outstanding call comes back with
    /// `reply_matched == false`.
    ///
    /// Returns `None` at the end of the stream or once the next frame index
    /// would exceed `maxindex`.
    ///
    /// # Errors
    /// `TraceError::Match` for an invalid expression (before any frame is
    /// read) and `TraceError::Source` when reading fails.
    pub fn match_expr(
        &mut self,
        expr: &str,
        options: MatchOptions,
    ) -> Result<Option<Matched>, TraceError> {
        let filter = self.filter(expr)?;
        if options.rewind {
            self.rewind()?;
        }
        loop {
            if options.maxindex.is_some_and(|max| self.position >= max) {
                return Ok(None);
            }
            let Some(packet) = self.next_packet()? else {
                return Ok(None);
            };

            if !options.reply {
                if filter.matches(&packet) {
                    return Ok(Some(Matched::single(packet)));
                }
                continue;
            }

            let xid = packet.xid();
            if packet.is_reply() {
                if let Some(call) = xid.and_then(|xid| self.correlator.take(xid)) {
                    return Ok(Some(Matched {
                        packet,
                        call: Some(call),
                        reply_matched: true,
                    }));
                }
            }
            if !filter.matches(&packet) {
                continue;
            }
            if let (true, Some(xid)) = (packet.is_call(), xid) {
                self.correlator.record(xid, packet.clone());
            }
            return Ok(Some(Matched::single(packet)));
        }
    }
}

impl Iterator for Trace {
    type Item = Result<Packet, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

fn open_sources(paths: &[PathBuf]) -> Result<MergedSource<PcapFileSource>, SourceError> {
    if paths.is_empty() {
        return Err(SourceError::Format("no capture files given".to_string()));
    }
    let sources = paths
        .iter()
        .map(|path| PcapFileSource::open(path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MergedSource::new(sources))
}
