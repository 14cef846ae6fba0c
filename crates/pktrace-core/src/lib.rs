//! pktrace core library: packet-trace decoding and matching for NFS
//! captures.
//!
//! Capture files are read by `source` and merged into one timestamp-ordered
//! frame stream. `decode` turns each frame into a `Packet`: link, network
//! and transport layers, then ONC-RPC, then the NFSv3, NFSv4 or NLM body
//! selected by program and version (`protocols`, one layout/parser pair per
//! protocol). `Trace` drives the pipeline and runs `matcher` expressions
//! over the packets, pairing replies with their calls through `correlate`.
//! `finder` builds on the cursor to follow one file through a trace by
//! path.
//!
//! Invariants:
//! - Frame indexes are 1-based and stable for a given set of inputs.
//! - Forward scans never return a frame twice.
//! - Decoding the same frame with the same call registry yields the same
//!   packet.
//!
//! # Examples
//! ```no_run
//! use pktrace_core::{MatchOptions, Trace, TraceOptions};
//!
//! let mut trace = Trace::open(&["capture.pcap"], TraceOptions::default())?;
//! let found = trace.match_expr("nfs.op == NFSPROC3_CREATE", MatchOptions::default())?;
//! if let Some(found) = found {
//!     println!("frame {}: {:?}", found.packet.index, found.packet.get("nfs.name"));
//! }
//! # Ok::<(), pktrace_core::TraceError>(())
//! ```

pub mod config;
pub mod correlate;
pub mod decode;
pub mod finder;
pub mod matcher;
pub mod packet;
pub mod protocols;
pub mod source;
pub mod trace;

pub use config::{DecoderConfig, TraceOptions};
pub use correlate::Correlator;
pub use decode::{DecodeError, Decoder};
pub use finder::{FindError, FindReport, PathSpec, Phase, find_file};
pub use matcher::{Filter, MatchError};
pub use packet::{Layer, Packet, Record, RpcType, Value};
pub use source::{Frame, MergedSource, PacketSource, PcapFileSource, SourceError};
pub use trace::{MatchOptions, Matched, Trace, TraceError, Tracked};
