mod support;

use pktrace_core::{PacketSource, PcapFileSource};
use support::{Capture, nfs3_getattr_call};

#[test]
fn records_larger_than_the_initial_buffer_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let big = vec![0x5a; 70_000];
    let path = Capture::new()
        .raw(1.0, &big)
        .raw(2.0, &[0x11; 60])
        .write(dir.path(), "big.pcap");

    let mut source = PcapFileSource::open(&path).unwrap();
    let first = source.next_frame().unwrap().unwrap();
    assert_eq!(first.data.len(), 70_000);
    assert_eq!(first.sequence, 1);
    let second = source.next_frame().unwrap().unwrap();
    assert_eq!(second.data, vec![0x11; 60]);
    assert_eq!(second.timestamp_ns, 2_000_000_000);
    assert!(source.next_frame().unwrap().is_none());
    assert_eq!(source.frames_read(), 2);
}

#[test]
fn several_oversized_records_in_a_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut capture = Capture::new();
    for (i, len) in [200_000usize, 90_000, 262_144].into_iter().enumerate() {
        capture = capture.raw(i as f64 + 1.0, &vec![i as u8; len]);
    }
    let path = capture
        .udp(9.0, &nfs3_getattr_call(1, b"fh"))
        .write(dir.path(), "jumbo.pcap");

    let mut source = PcapFileSource::open(&path).unwrap();
    let mut lengths = Vec::new();
    while let Some(frame) = source.next_frame().unwrap() {
        lengths.push(frame.data.len());
    }
    assert_eq!(lengths.len(), 4);
    assert_eq!(&lengths[..3], &[200_000, 90_000, 262_144]);
}

#[test]
fn microsecond_timestamps_convert_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = Capture::new()
        .raw(1_700_000_000.000_123, &[0; 60])
        .write(dir.path(), "usec.pcap");
    let mut source = PcapFileSource::open(&path).unwrap();
    let frame = source.next_frame().unwrap().unwrap();
    assert_eq!(frame.timestamp_ns, 1_700_000_000_000_123_000);
}
