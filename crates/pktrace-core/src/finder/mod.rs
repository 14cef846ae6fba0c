//! File finder: follow one file through a trace by path.
//!
//! The search runs in three phases. Directory lookup resolves each
//! directory component to a handle, file lookup resolves the final name to
//! a file handle (and, for NFSv4 OPEN, a state id), and tracking returns
//! every later packet that refers to the tracked handles or state ids. A
//! phase only advances on a reply with status zero; outstanding calls are
//! cleared at each transition.

mod path;

pub use path::PathSpec;

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::packet::{ARRAY_FIELD, Packet, Record, Value, layer};
use crate::protocols::{nfs3, nfs4};
use crate::trace::{MatchOptions, Matched, Trace, TraceError};

/// Errors returned by the file finder.
///
/// # Examples
/// ```
/// use pktrace_core::finder::{FindError, PathSpec};
///
/// let err = "DH:0xabc/foo".parse::<PathSpec>().unwrap_err();
/// assert!(matches!(err, FindError::InvalidPath(_)));
/// ```
#[derive(Debug, Error)]
pub enum FindError {
    #[error(transparent)]
    Trace(#[from] TraceError),
    #[error("invalid path {0}")]
    InvalidPath(String),
}

/// Search phase, in the order the finder goes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    DirectoryLookup,
    FileLookup,
    Tracking,
}

#[derive(Debug, Clone)]
pub struct FindReport {
    /// The lookup reply that resolved the file followed by every tracked
    /// packet, in trace order.
    pub matches: Vec<Matched>,
    /// TEST_STATEID packets consumed without being reported because none of
    /// their state ids were tracked.
    pub suppressed: u64,
    /// Last phase reached; anything short of `Tracking` means the path was
    /// not resolved.
    pub phase: Phase,
    /// File handle the final component resolved to, when one was returned.
    pub handle: Option<Vec<u8>>,
}

/// Directory entry the tracked file is known under: parent handle checksum
/// (unknown for a bare name) and name.
type Entry = (Option<u32>, String);

/// Find `spec` in `trace` from the cursor's current position.
///
/// # Errors
/// `FindError::Trace` when reading the trace fails.
pub fn find_file(trace: &mut Trace, spec: &PathSpec) -> Result<FindReport, FindError> {
    let mut report = FindReport {
        matches: Vec::new(),
        suppressed: 0,
        phase: Phase::DirectoryLookup,
        handle: None,
    };
    let mut dir = spec.dir_handle.as_deref().map(crc32fast::hash);

    for name in spec.directories() {
        trace.clear_xid_list();
        loop {
            let Some(found) = lookup(trace, name, dir)? else {
                return Ok(report);
            };
            if let Some(handle) = reply_handle(&found.packet) {
                debug!(name = %name, index = found.packet.index, "directory resolved");
                dir = Some(crc32fast::hash(&handle));
                break;
            }
        }
    }

    report.phase = Phase::FileLookup;
    trace.clear_xid_list();
    let file_name = spec.file_name();
    let Some(found) = lookup(trace, file_name, dir)? else {
        return Ok(report);
    };
    report.handle = reply_handle(&found.packet);
    info!(path = %spec, index = found.packet.index, "file resolved");

    let mut entries = BTreeSet::new();
    entries.insert((dir, file_name.to_string()));
    if let Some(handle) = &report.handle {
        trace.tracked_mut().add_fh(handle);
    }
    learn(trace, &found, &mut entries);
    report.matches.push(found);

    report.phase = Phase::Tracking;
    trace.clear_xid_list();
    track(trace, &mut entries, &mut report)?;
    Ok(report)
}

/// Scan for the next zero-status reply to a call naming `name` under `dir`.
fn lookup(trace: &mut Trace, name: &str, dir: Option<u32>) -> Result<Option<Matched>, TraceError> {
    let expr = entry_term(dir, name);
    let options = MatchOptions {
        reply: true,
        ..MatchOptions::default()
    };
    while let Some(found) = trace.match_expr(&expr, options)? {
        if found.reply_matched && status_ok(&found.packet) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn track(
    trace: &mut Trace,
    entries: &mut BTreeSet<Entry>,
    report: &mut FindReport,
) -> Result<(), TraceError> {
    let options = MatchOptions {
        reply: true,
        ..MatchOptions::default()
    };
    let mut suppressed_xids = HashSet::new();
    loop {
        let core = tracking_expr(trace, entries);
        let expr = if trace.tracked().stateid.is_empty() {
            core.clone()
        } else {
            format!("{core} or nfs.op == OP_TEST_STATEID")
        };
        let Some(found) = trace.match_expr(&expr, options)? else {
            return Ok(());
        };
        let xid = found.packet.xid();

        if found.reply_matched {
            if xid.is_some_and(|xid| suppressed_xids.remove(&xid)) {
                report.suppressed += 1;
                continue;
            }
        } else if found.packet.is_call()
            && has_op(&found.packet, "op", nfs4::layout::OP_TEST_STATEID)
            && !overlaps_tracked(trace, &found.packet)
            && !trace.filter(&core)?.matches(&found.packet)
        {
            report.suppressed += 1;
            suppressed_xids.extend(xid);
            continue;
        }

        if found.reply_matched && status_ok(&found.packet) {
            learn(trace, &found, entries);
        }
        report.matches.push(found);
    }
}

/// Expression matching anything that refers to the tracked file.
fn tracking_expr(trace: &Trace, entries: &BTreeSet<Entry>) -> String {
    let tracked = trace.tracked();
    let mut terms = Vec::new();
    for fh in &tracked.fh {
        terms.push(format!("crc32(nfs.fh) == {fh}"));
        terms.push(format!("crc32(nlm.fh) == {fh}"));
    }
    for stateid in &tracked.stateid {
        terms.push(format!("crc32(nfs.stateid.other) == {stateid}"));
        terms.push(format!("crc32(nfs.delegation.stateid.other) == {stateid}"));
    }
    for (dir, name) in entries {
        terms.push(format!("({})", entry_term(*dir, name)));
    }
    terms.join(" or ")
}

fn entry_term(dir: Option<u32>, name: &str) -> String {
    let name = quote(name);
    match dir {
        Some(dir) => format!("nfs.name == {name} and crc32(nfs.fh) == {dir}"),
        None => format!("nfs.name == {name}"),
    }
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Grow the tracked sets from a zero-status reply and its call.
fn learn(trace: &mut Trace, found: &Matched, entries: &mut BTreeSet<Entry>) {
    let reply = &found.packet;
    let tracked = trace.tracked_mut();

    let items = nfs_items(reply);
    if items.is_empty() {
        // NFSv3: only LOOKUP and the create procedures return a handle.
        if let Some(fh) = reply.get("nfs.fh").and_then(Value::as_bytes) {
            tracked.add_fh(fh);
        }
    } else {
        let names_object = items.iter().any(|item| {
            status_is_ok(item)
                && op_is(item, "resop", &[nfs4::layout::OP_OPEN, nfs4::layout::OP_LOOKUP, nfs4::layout::OP_CREATE])
        });
        for item in items.iter().filter(|item| status_is_ok(item)) {
            if op_is(
                item,
                "resop",
                &[
                    nfs4::layout::OP_OPEN,
                    nfs4::layout::OP_OPEN_CONFIRM,
                    nfs4::layout::OP_OPEN_DOWNGRADE,
                    nfs4::layout::OP_LOCK,
                    nfs4::layout::OP_LAYOUTGET,
                ],
            ) {
                if let Some(other) = stateid_other(item.get("stateid")) {
                    tracked.add_stateid(other);
                }
                let delegation = item.get("delegation").and_then(Value::as_record);
                if let Some(other) = stateid_other(delegation.and_then(|d| d.get("stateid"))) {
                    tracked.add_stateid(other);
                }
            }
            if names_object && op_is(item, "resop", &[nfs4::layout::OP_GETFH]) {
                if let Some(fh) = item.get("fh").and_then(Value::as_bytes) {
                    tracked.add_fh(fh);
                }
            }
        }
    }

    if let Some(call) = &found.call {
        if let Some(entry) = rename_target(call) {
            debug!(name = %entry.1, "tracking renamed entry");
            entries.insert(entry);
        }
    }
}

/// New directory entry created by a RENAME call.
fn rename_target(call: &Packet) -> Option<Entry> {
    let nfs = call.layer(layer::NFS)?;
    let items = nfs_items(call);
    if items.is_empty() {
        if !has_op(call, "op", nfs3::layout::NFSPROC3_RENAME) {
            return None;
        }
        let newfh = nfs.get("newfh")?.as_bytes()?;
        let newname = nfs.get("newname")?.as_str()?;
        return Some((Some(crc32fast::hash(newfh)), newname.to_string()));
    }
    // The target directory is the current file handle when RENAME runs.
    let mut current = None;
    for item in items {
        if op_is(item, "op", &[nfs4::layout::OP_PUTFH]) {
            current = item.get("fh").and_then(Value::as_bytes);
        }
        if op_is(item, "op", &[nfs4::layout::OP_RENAME]) {
            let newname = item.get("newname")?.as_str()?;
            return Some((current.map(crc32fast::hash), newname.to_string()));
        }
    }
    None
}

/// Handle returned by a lookup-style reply: the last successful GETFH of a
/// COMPOUND, or the NFSv3 object handle.
fn reply_handle(packet: &Packet) -> Option<Vec<u8>> {
    let items = nfs_items(packet);
    if items.is_empty() {
        return packet
            .get("nfs.fh")
            .and_then(Value::as_bytes)
            .map(<[u8]>::to_vec);
    }
    items
        .iter()
        .rev()
        .filter(|item| status_is_ok(item) && op_is(item, "resop", &[nfs4::layout::OP_GETFH]))
        .find_map(|item| item.get("fh").and_then(Value::as_bytes))
        .map(<[u8]>::to_vec)
}

fn overlaps_tracked(trace: &Trace, packet: &Packet) -> bool {
    packet
        .lookup("nfs.stateids.other")
        .into_iter()
        .filter_map(Value::as_bytes)
        .any(|other| trace.tracked().has_stateid(other))
}

fn nfs_items(packet: &Packet) -> Vec<&Record> {
    packet
        .layer(layer::NFS)
        .and_then(|nfs| nfs.get(ARRAY_FIELD))
        .and_then(Value::as_list)
        .map(|items| items.iter().filter_map(Value::as_record).collect())
        .unwrap_or_default()
}

fn has_op(packet: &Packet, key: &str, code: u32) -> bool {
    let path = format!("nfs.{key}");
    packet
        .lookup(&path)
        .into_iter()
        .any(|value| value.as_u64() == Some(u64::from(code)))
}

fn op_is(item: &Record, key: &str, codes: &[u32]) -> bool {
    item.get(key)
        .and_then(Value::as_u64)
        .is_some_and(|op| codes.iter().any(|code| u64::from(*code) == op))
}

fn status_is_ok(item: &Record) -> bool {
    item.get("status").and_then(Value::as_u64) == Some(0)
}

fn status_ok(packet: &Packet) -> bool {
    packet.layer(layer::NFS).is_some_and(status_is_ok)
}

fn stateid_other(stateid: Option<&Value>) -> Option<&[u8]> {
    stateid?.as_record()?.get("other")?.as_bytes()
}
