mod support;

use pktrace_core::{Phase, Trace, TraceOptions, find_file};
use support::{
    Capture, Xdr, nfs3_create_call, nfs3_create_reply, nfs3_getattr_call, nfs3_lookup_call,
    nfs3_lookup_reply, nfs3_rename_call, nfs3_rename_reply, nfs3_status_reply, nfs3_write_call,
    nfs3_write_reply, nfs4_open_call, nfs4_open_delegated_reply, nfs4_open_reply,
    nfs4_putfh_call, nfs4_putfh_reply, nfs4_read_call, nfs4_rename_call, nfs4_rename_reply,
    nfs4_test_stateid_call, nfs4_test_stateid_reply,
};

const DIR: &[u8] = &[0xaa, 0xaa];
const OTHER_DIR: &[u8] = &[0xdd, 0xdd];
const FILE: &[u8] = &[0xbb, 0xbb];

fn indices(report: &pktrace_core::FindReport) -> Vec<u64> {
    report.matches.iter().map(|m| m.packet.index).collect()
}

#[test]
fn create_then_write_is_found_through_all_phases() {
    let dir = tempfile::tempdir().unwrap();
    let path = Capture::new()
        .udp(1.0, &nfs3_getattr_call(1, b"other"))
        .udp(2.0, &nfs3_create_call(2, DIR, "foo"))
        .udp(3.0, &nfs3_create_reply(2, 0, FILE))
        .udp(4.0, &nfs3_write_call(3, FILE, b"hello"))
        .udp(5.0, &nfs3_write_reply(3, 5))
        .udp(6.0, &nfs3_getattr_call(4, b"other"))
        .write(dir.path(), "create.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(report.handle.as_deref(), Some(FILE));
    let indices: Vec<_> = report.matches.iter().map(|m| m.packet.index).collect();
    assert_eq!(indices, vec![3, 4, 5]);
    assert_eq!(report.matches[0].call.as_ref().map(|c| c.index), Some(2));
    assert!(report.matches[2].reply_matched);
    assert!(trace.tracked().has_fh(FILE));
}

#[test]
fn failed_lookups_do_not_advance() {
    let dir = tempfile::tempdir().unwrap();
    let path = Capture::new()
        .udp(1.0, &nfs3_create_call(2, DIR, "foo"))
        .udp(2.0, &nfs3_create_reply(2, 17, FILE))
        .write(dir.path(), "exists.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::FileLookup);
    assert!(report.matches.is_empty());
    assert!(report.handle.is_none());
}

#[test]
fn directories_resolve_component_by_component() {
    let dir = tempfile::tempdir().unwrap();
    let sub: &[u8] = &[0xcc, 0xcc];
    let path = Capture::new()
        .udp(1.0, &nfs3_lookup_call(1, DIR, "sub"))
        .udp(2.0, &nfs3_status_reply(1, 2))
        .udp(3.0, &nfs3_lookup_call(2, DIR, "sub"))
        .udp(4.0, &nfs3_lookup_reply(2, sub))
        .udp(5.0, &nfs3_create_call(3, DIR, "foo"))
        .udp(6.0, &nfs3_create_reply(3, 0, &[0xdd]))
        .udp(7.0, &nfs3_create_call(4, sub, "foo"))
        .udp(8.0, &nfs3_create_reply(4, 0, FILE))
        .write(dir.path(), "lookup.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/sub/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(report.handle.as_deref(), Some(FILE));
    assert_eq!(report.matches[0].packet.index, 8);
}

#[test]
fn nfs4_open_tracks_stateids_and_suppresses_unrelated_test_stateid() {
    let dir = tempfile::tempdir().unwrap();
    let ours = [1; 12];
    let theirs = [2; 12];
    let path = Capture::new()
        .tcp(1.0, &nfs4_open_call(10, DIR, "foo"))
        .tcp(2.0, &nfs4_open_reply(10, ours, FILE))
        .tcp(3.0, &nfs4_test_stateid_call(11, &[theirs]))
        .tcp(4.0, &nfs4_test_stateid_reply(11, 1))
        .tcp(5.0, &nfs4_read_call(12, b"elsewhere", ours))
        .tcp(6.0, &nfs4_test_stateid_call(13, &[theirs, ours]))
        .tcp(7.0, &nfs4_test_stateid_reply(13, 2))
        .write(dir.path(), "open.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(report.handle.as_deref(), Some(FILE));
    assert!(trace.tracked().has_stateid(&ours));
    let indices: Vec<_> = report.matches.iter().map(|m| m.packet.index).collect();
    assert_eq!(indices, vec![2, 5, 6, 7]);
    assert_eq!(report.suppressed, 2);
}

#[test]
fn nfs3_rename_follows_the_new_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = Capture::new()
        .udp(1.0, &nfs3_create_call(1, DIR, "foo"))
        .udp(2.0, &nfs3_create_reply(1, 0, FILE))
        .udp(3.0, &nfs3_rename_call(2, DIR, "foo", OTHER_DIR, "bar"))
        .udp(4.0, &nfs3_rename_reply(2))
        .udp(5.0, &nfs3_lookup_call(3, OTHER_DIR, "bar"))
        .udp(6.0, &nfs3_lookup_reply(3, FILE))
        .udp(7.0, &nfs3_lookup_call(4, DIR, "bar"))
        .udp(8.0, &nfs3_lookup_reply(4, &[0xee]))
        .write(dir.path(), "rename3.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(indices(&report), vec![2, 3, 4, 5, 6]);
    assert!(report.matches[2].reply_matched);
    assert_eq!(report.matches[2].call.as_ref().map(|c| c.index), Some(3));
}

#[test]
fn nfs4_rename_targets_the_current_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = Capture::new()
        .tcp(1.0, &nfs4_open_call(10, DIR, "foo"))
        .tcp(2.0, &nfs4_open_reply(10, [1; 12], FILE))
        .tcp(3.0, &nfs4_rename_call(11, DIR, "foo", OTHER_DIR, "bar"))
        .tcp(4.0, &nfs4_rename_reply(11))
        .tcp(5.0, &nfs4_open_call(12, OTHER_DIR, "bar"))
        .tcp(6.0, &nfs4_open_reply(12, [3; 12], FILE))
        .tcp(7.0, &nfs4_open_call(13, DIR, "bar"))
        .tcp(8.0, &nfs4_open_reply(13, [4; 12], &[0xee]))
        .write(dir.path(), "rename4.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(indices(&report), vec![2, 3, 4, 5, 6]);
    assert!(trace.tracked().has_stateid(&[3; 12]));
    assert!(!trace.tracked().has_stateid(&[4; 12]));
}

#[test]
fn stateids_from_confirm_lock_downgrade_and_layoutget_are_tracked() {
    let dir = tempfile::tempdir().unwrap();
    let open = [1; 12];
    let confirmed = [2; 12];
    let lock = [3; 12];
    let downgraded = [4; 12];
    let layout = [5; 12];
    let unrelated = [9; 12];

    let open_confirm = Xdr::new().u32(20).stateid(1, open).u32(1);
    let lock_call = Xdr::new()
        .u32(12)
        .u32(2)
        .u32(0)
        .u64(0)
        .u64(100)
        .u32(1)
        .u32(2)
        .stateid(2, confirmed)
        .u32(0)
        .u64(0x1234)
        .opaque(b"lockowner");
    let open_downgrade = Xdr::new()
        .u32(21)
        .stateid(2, confirmed)
        .u32(3)
        .u32(1)
        .u32(0);
    let layoutget = Xdr::new()
        .u32(50)
        .u32(0)
        .u32(1)
        .u32(1)
        .u64(0)
        .u64(4096)
        .u64(0)
        .stateid(1, downgraded)
        .u32(4096);

    let path = Capture::new()
        .tcp(1.0, &nfs4_open_call(10, DIR, "foo"))
        .tcp(2.0, &nfs4_open_reply(10, open, FILE))
        .tcp(3.0, &nfs4_putfh_call(11, FILE, open_confirm))
        .tcp(4.0, &nfs4_putfh_reply(11, Xdr::new().u32(20).u32(0).stateid(2, confirmed)))
        .tcp(5.0, &nfs4_putfh_call(12, FILE, lock_call))
        .tcp(6.0, &nfs4_putfh_reply(12, Xdr::new().u32(12).u32(0).stateid(1, lock)))
        .tcp(7.0, &nfs4_putfh_call(13, FILE, open_downgrade))
        .tcp(8.0, &nfs4_putfh_reply(13, Xdr::new().u32(21).u32(0).stateid(3, downgraded)))
        .tcp(9.0, &nfs4_putfh_call(14, FILE, layoutget))
        .tcp(
            10.0,
            &nfs4_putfh_reply(14, Xdr::new().u32(50).u32(0).u32(0).stateid(1, layout).u32(0)),
        )
        .tcp(11.0, &nfs4_read_call(15, b"elsewhere", confirmed))
        .tcp(12.0, &nfs4_read_call(16, b"elsewhere", lock))
        .tcp(13.0, &nfs4_read_call(17, b"elsewhere", downgraded))
        .tcp(14.0, &nfs4_read_call(18, b"elsewhere", layout))
        .tcp(15.0, &nfs4_read_call(19, b"elsewhere", unrelated))
        .write(dir.path(), "stateids.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.phase, Phase::Tracking);
    assert_eq!(indices(&report), (2..=14).collect::<Vec<_>>());
    for other in [open, confirmed, lock, downgraded, layout] {
        assert!(trace.tracked().has_stateid(&other));
    }
    assert!(!trace.tracked().has_stateid(&unrelated));
}

#[test]
fn delegation_stateids_are_tracked() {
    let dir = tempfile::tempdir().unwrap();
    let delegation = [7; 12];
    let path = Capture::new()
        .tcp(1.0, &nfs4_open_call(10, DIR, "foo"))
        .tcp(2.0, &nfs4_open_delegated_reply(10, [1; 12], delegation, FILE))
        .tcp(3.0, &nfs4_read_call(11, b"elsewhere", delegation))
        .tcp(4.0, &nfs4_read_call(12, b"elsewhere", [8; 12]))
        .write(dir.path(), "delegation.pcap");
    let mut trace = Trace::open(&[&path], TraceOptions::default()).unwrap();

    let report = find_file(&mut trace, &"DH:0xaaaa/foo".parse().unwrap()).unwrap();
    assert_eq!(report.handle.as_deref(), Some(FILE));
    assert!(trace.tracked().has_stateid(&delegation));
    assert_eq!(indices(&report), vec![2, 3]);
}
