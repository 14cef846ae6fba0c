use std::path::{Path, PathBuf};

use assert_cmd::Command;
use etherparse::PacketBuilder;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("pktrace"))
}

fn xdr(words: &[u32], tail: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    out.extend_from_slice(tail);
    out
}

/// NFSv3 GETATTR call for a 4-byte file handle.
fn getattr_call(xid: u32) -> Vec<u8> {
    xdr(&[xid, 0, 2, 100003, 3, 1, 0, 0, 0, 0, 4], b"\x01\x02\x03\x04")
}

/// GETATTR error reply with an absent attribute block.
fn getattr_reply(xid: u32, status: u32) -> Vec<u8> {
    xdr(&[xid, 1, 0, 0, 0, 0, status, 0], &[])
}

fn write_capture(dir: &Path, name: &str, payloads: &[Vec<u8>]) -> PathBuf {
    write_capture_on(dir, name, payloads, 2049)
}

fn write_capture_on(dir: &Path, name: &str, payloads: &[Vec<u8>], port: u16) -> PathBuf {
    let mut out = 0xa1b2_c3d4u32.to_le_bytes().to_vec();
    out.extend(2u16.to_le_bytes());
    out.extend(4u16.to_le_bytes());
    out.extend([0u8; 8]);
    out.extend(65535u32.to_le_bytes());
    out.extend(1u32.to_le_bytes());
    for (i, payload) in payloads.iter().enumerate() {
        let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .udp(700, port);
        let mut frame = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut frame, payload).expect("frame");
        out.extend((i as u32 + 1).to_le_bytes());
        out.extend(0u32.to_le_bytes());
        out.extend((frame.len() as u32).to_le_bytes());
        out.extend((frame.len() as u32).to_le_bytes());
        out.extend(frame);
    }
    let path = dir.join(name);
    std::fs::write(&path, out).expect("write capture");
    path
}

fn sample(temp: &TempDir) -> PathBuf {
    write_capture(
        temp.path(),
        "sample.pcap",
        &[getattr_call(0x10), getattr_reply(0x10, 70), getattr_call(0x11)],
    )
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("match").and(contains("find")).and(contains("show")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("show")
        .arg(temp.path().join("missing.pcap"))
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn show_prints_one_summary_line_per_frame() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    let assert = cmd().arg("show").arg(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("1 1970-01-01T00:00:01Z 10.0.0.1 -> 10.0.0.2"));
    assert!(lines[0].contains("RPC call xid=0x00000010 NFSv3 NFSPROC3_GETATTR"));
    assert!(lines[1].contains("NFS3ERR_STALE"));
}

#[test]
fn show_index_as_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    let assert = cmd()
        .arg("show")
        .arg(input)
        .arg("--index")
        .arg("2")
        .arg("-v")
        .arg("4")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let json: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(json["index"], 2);
    assert_eq!(json["rpc"]["xid"], 0x10);
    assert_eq!(json["nfs"]["status"], "NFS3ERR_STALE");
}

#[test]
fn numeric_enums_drop_names() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("show")
        .arg(input)
        .arg("--index")
        .arg("2")
        .arg("--numeric-enums")
        .assert()
        .success()
        .stdout(contains("NFS3ERR_STALE").not().and(contains(" 70")));
}

#[test]
fn show_index_out_of_range_fails() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("show")
        .arg(input)
        .arg("--index")
        .arg("9")
        .assert()
        .code(2)
        .stderr(contains("frame 9 is not in the trace"));
}

#[test]
fn match_with_reply_pairs_frames() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    let assert = cmd()
        .arg("match")
        .arg(input)
        .arg("-e")
        .arg("rpc.xid == 0x10")
        .arg("--reply")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1 "));
    assert!(lines[1].starts_with("2 ") && lines[1].ends_with("(reply to 1)"));
}

#[test]
fn match_count_and_maxindex_limit_output() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("match")
        .arg(&input)
        .arg("-e")
        .arg("rpc")
        .arg("--count")
        .arg("1")
        .assert()
        .success()
        .stdout(contains("xid=0x00000010").and(contains("xid=0x00000011").not()));
    cmd()
        .arg("match")
        .arg(&input)
        .arg("-e")
        .arg("rpc.xid == 0x11")
        .arg("--maxindex")
        .arg("2")
        .assert()
        .success()
        .stdout(contains("xid").not())
        .stderr(contains("no packets matched"));
}

#[test]
fn bad_expression_points_at_offset() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("match")
        .arg(input)
        .arg("-e")
        .arg("rpc.xid ==")
        .assert()
        .code(2)
        .stderr(contains("invalid expression").and(contains("^")));
}

#[test]
fn glob_inputs_are_merged() {
    let temp = TempDir::new().expect("tempdir");
    write_capture(temp.path(), "a.pcap", &[getattr_call(1)]);
    write_capture(temp.path(), "b.pcap", &[getattr_call(2)]);
    let pattern = temp.path().join("*.pcap");
    let assert = cmd().arg("show").arg(pattern).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    assert_eq!(stdout.lines().count(), 2);
}

#[test]
fn glob_without_matches_fails() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("show")
        .arg(temp.path().join("*.pcap"))
        .assert()
        .code(2)
        .stderr(contains("no files match pattern"));
}

#[test]
fn find_reports_unresolved_path() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("find")
        .arg(input)
        .arg("--path")
        .arg("DH:0xaaaa/foo")
        .assert()
        .code(2)
        .stderr(contains("not found in trace").and(contains("hint:")));
}

#[test]
fn find_rejects_malformed_handle() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("find")
        .arg(input)
        .arg("--path")
        .arg("DH:0xabc/foo")
        .assert()
        .code(2)
        .stderr(contains("invalid path"));
}

#[test]
fn conflicting_enum_modes_fail() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample(&temp);
    cmd()
        .arg("show")
        .arg(input)
        .arg("--strict-enums")
        .arg("--numeric-enums")
        .assert()
        .code(2)
        .stderr(contains("error:"));
}

#[test]
fn show_summarises_rdma_headers() {
    let temp = TempDir::new().expect("tempdir");
    // RDMA_MSG carrying a GETATTR call, then an RDMA_NOMSG with no chunks.
    let mut msg = xdr(&[0x20, 1, 32, 0, 0, 0, 0], &[]);
    msg.extend(getattr_call(0x20));
    let nomsg = xdr(&[0x21, 1, 32, 1, 0, 0, 0], &[]);
    let input = write_capture_on(temp.path(), "rdma.pcap", &[msg, nomsg], 20049);
    let assert = cmd().arg("show").arg(input).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("RPCoRDMA RDMA_MSG xid=0x00000020 RPC call xid=0x00000020"));
    assert!(lines[1].ends_with("RPCoRDMA RDMA_NOMSG xid=0x00000021"));
}
