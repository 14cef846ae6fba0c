#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use etherparse::PacketBuilder;

pub const NFS_PROGRAM: u32 = 100003;
pub const NLM_PROGRAM: u32 = 100021;

/// Big-endian XDR writer.
#[derive(Default)]
pub struct Xdr(pub Vec<u8>);

impl Xdr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u32(mut self, value: u32) -> Self {
        self.0.extend(value.to_be_bytes());
        self
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.0.extend(value.to_be_bytes());
        self
    }

    pub fn fixed(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        while self.0.len() % 4 != 0 {
            self.0.push(0);
        }
        self
    }

    pub fn opaque(self, bytes: &[u8]) -> Self {
        self.u32(bytes.len() as u32).fixed(bytes)
    }

    pub fn string(self, text: &str) -> Self {
        self.opaque(text.as_bytes())
    }

    pub fn stateid(self, seqid: u32, other: [u8; 12]) -> Self {
        self.u32(seqid).fixed(&other)
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

/// RPC call header with AUTH_NONE credentials, followed by `body`.
pub fn rpc_call(xid: u32, program: u32, version: u32, procedure: u32, body: &[u8]) -> Vec<u8> {
    Xdr::new()
        .u32(xid)
        .u32(0)
        .u32(2)
        .u32(program)
        .u32(version)
        .u32(procedure)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .bytes(body)
        .build()
}

/// Accepted, successful RPC reply header followed by `body`.
pub fn rpc_reply(xid: u32, body: &[u8]) -> Vec<u8> {
    Xdr::new()
        .u32(xid)
        .u32(1)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .bytes(body)
        .build()
}

pub fn nfs3_getattr_call(xid: u32, fh: &[u8]) -> Vec<u8> {
    rpc_call(xid, NFS_PROGRAM, 3, 1, &Xdr::new().opaque(fh).build())
}

/// Error reply for GETATTR or LOOKUP; the trailing word is an absent
/// post_op_attr.
pub fn nfs3_status_reply(xid: u32, status: u32) -> Vec<u8> {
    rpc_reply(xid, &Xdr::new().u32(status).u32(0).build())
}

pub fn nfs3_lookup_call(xid: u32, dir: &[u8], name: &str) -> Vec<u8> {
    rpc_call(xid, NFS_PROGRAM, 3, 3, &Xdr::new().opaque(dir).string(name).build())
}

pub fn nfs3_lookup_reply(xid: u32, fh: &[u8]) -> Vec<u8> {
    let body = Xdr::new().u32(0).opaque(fh).u32(0).u32(0).build();
    rpc_reply(xid, &body)
}

/// UNCHECKED create with no attributes set.
pub fn nfs3_create_call(xid: u32, dir: &[u8], name: &str) -> Vec<u8> {
    let body = Xdr::new()
        .opaque(dir)
        .string(name)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0)
        .build();
    rpc_call(xid, NFS_PROGRAM, 3, 8, &body)
}

pub fn nfs3_create_reply(xid: u32, status: u32, fh: &[u8]) -> Vec<u8> {
    let mut body = Xdr::new().u32(status);
    if status == 0 {
        body = body.u32(1).opaque(fh).u32(0);
    }
    rpc_reply(xid, &body.u32(0).u32(0).build())
}

pub fn nfs3_write_call(xid: u32, fh: &[u8], data: &[u8]) -> Vec<u8> {
    let body = Xdr::new()
        .opaque(fh)
        .u64(0)
        .u32(data.len() as u32)
        .u32(2)
        .opaque(data)
        .build();
    rpc_call(xid, NFS_PROGRAM, 3, 7, &body)
}

pub fn nfs3_write_reply(xid: u32, count: u32) -> Vec<u8> {
    let body = Xdr::new()
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(count)
        .u32(2)
        .fixed(&[7; 8])
        .build();
    rpc_reply(xid, &body)
}

/// COMPOUND call header; `ops` is the already encoded operation list.
pub fn nfs4_compound_call(xid: u32, nops: u32, ops: Xdr) -> Vec<u8> {
    let body = Xdr::new().string("").u32(1).u32(nops).bytes(&ops.build()).build();
    rpc_call(xid, NFS_PROGRAM, 4, 1, &body)
}

pub fn nfs4_compound_reply(xid: u32, status: u32, nops: u32, results: Xdr) -> Vec<u8> {
    let body = Xdr::new()
        .u32(status)
        .string("")
        .u32(nops)
        .bytes(&results.build())
        .build();
    rpc_reply(xid, &body)
}

/// PUTFH, OPEN (no create, CLAIM_NULL) and GETFH.
pub fn nfs4_open_call(xid: u32, dir: &[u8], name: &str) -> Vec<u8> {
    let ops = Xdr::new()
        .u32(22)
        .opaque(dir)
        .u32(18)
        .u32(0)
        .u32(1)
        .u32(0)
        .u64(0x1234)
        .opaque(b"owner")
        .u32(0)
        .u32(0)
        .string(name)
        .u32(10);
    nfs4_compound_call(xid, 3, ops)
}

pub fn nfs4_open_reply(xid: u32, stateid: [u8; 12], fh: &[u8]) -> Vec<u8> {
    let results = Xdr::new()
        .u32(22)
        .u32(0)
        .u32(18)
        .u32(0)
        .stateid(1, stateid)
        .u32(1)
        .u64(1)
        .u64(2)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(10)
        .u32(0)
        .opaque(fh);
    nfs4_compound_reply(xid, 0, 3, results)
}

/// PUTFH and READ with `stateid`.
pub fn nfs4_read_call(xid: u32, fh: &[u8], stateid: [u8; 12]) -> Vec<u8> {
    let ops = Xdr::new()
        .u32(22)
        .opaque(fh)
        .u32(25)
        .stateid(1, stateid)
        .u64(0)
        .u32(4096);
    nfs4_compound_call(xid, 2, ops)
}

pub fn nfs4_test_stateid_call(xid: u32, stateids: &[[u8; 12]]) -> Vec<u8> {
    let mut ops = Xdr::new().u32(55).u32(stateids.len() as u32);
    for other in stateids {
        ops = ops.stateid(1, *other);
    }
    nfs4_compound_call(xid, 1, ops)
}

pub fn nfs4_test_stateid_reply(xid: u32, count: u32) -> Vec<u8> {
    let mut results = Xdr::new().u32(55).u32(0).u32(count);
    for _ in 0..count {
        results = results.u32(0);
    }
    nfs4_compound_reply(xid, 0, 1, results)
}

/// One captured frame to be written.
pub struct Capture {
    frames: Vec<(f64, Vec<u8>)>,
}

impl Capture {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn udp(mut self, ts: f64, payload: &[u8]) -> Self {
        let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
            .udp(800, 2049);
        let mut data = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut data, payload).unwrap();
        self.frames.push((ts, data));
        self
    }

    /// TCP segment carrying one record-marked RPC message.
    pub fn tcp(mut self, ts: f64, message: &[u8]) -> Self {
        let mut payload = (0x8000_0000u32 | message.len() as u32).to_be_bytes().to_vec();
        payload.extend_from_slice(message);
        let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
            .ipv4([192, 168, 0, 1], [192, 168, 0, 2], 64)
            .tcp(800, 2049, 1, 65535);
        let mut data = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut data, &payload).unwrap();
        self.frames.push((ts, data));
        self
    }

    /// Raw frame bytes (for frames that are not RPC at all).
    pub fn raw(mut self, ts: f64, data: &[u8]) -> Self {
        self.frames.push((ts, data.to_vec()));
        self
    }

    /// Write a little-endian microsecond pcap file with Ethernet link type.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let mut out = Vec::new();
        out.extend(0xa1b2_c3d4u32.to_le_bytes());
        out.extend(2u16.to_le_bytes());
        out.extend(4u16.to_le_bytes());
        out.extend(0i32.to_le_bytes());
        out.extend(0u32.to_le_bytes());
        out.extend(65535u32.to_le_bytes());
        out.extend(1u32.to_le_bytes());
        for (ts, data) in &self.frames {
            let secs = ts.trunc() as u32;
            let usecs = ((ts - ts.trunc()) * 1_000_000.0).round() as u32;
            out.extend(secs.to_le_bytes());
            out.extend(usecs.to_le_bytes());
            out.extend((data.len() as u32).to_le_bytes());
            out.extend((data.len() as u32).to_le_bytes());
            out.extend_from_slice(data);
        }
        let path = dir.join(name);
        fs::write(&path, out).unwrap();
        path
    }
}

pub fn nfs3_rename_call(xid: u32, from: &[u8], name: &str, to: &[u8], newname: &str) -> Vec<u8> {
    let body = Xdr::new()
        .opaque(from)
        .string(name)
        .opaque(to)
        .string(newname)
        .build();
    rpc_call(xid, NFS_PROGRAM, 3, 14, &body)
}

/// Successful RENAME with empty wcc_data for both directories.
pub fn nfs3_rename_reply(xid: u32) -> Vec<u8> {
    rpc_reply(xid, &Xdr::new().u32(0).u32(0).u32(0).u32(0).u32(0).build())
}

/// PUTFH, SAVEFH, PUTFH and RENAME.
pub fn nfs4_rename_call(xid: u32, from: &[u8], name: &str, to: &[u8], newname: &str) -> Vec<u8> {
    let ops = Xdr::new()
        .u32(22)
        .opaque(from)
        .u32(32)
        .u32(22)
        .opaque(to)
        .u32(29)
        .string(name)
        .string(newname);
    nfs4_compound_call(xid, 4, ops)
}

pub fn nfs4_rename_reply(xid: u32) -> Vec<u8> {
    let results = Xdr::new()
        .u32(22)
        .u32(0)
        .u32(32)
        .u32(0)
        .u32(22)
        .u32(0)
        .u32(29)
        .u32(0)
        .u32(1)
        .u64(1)
        .u64(2)
        .u32(1)
        .u64(3)
        .u64(4);
    nfs4_compound_reply(xid, 0, 4, results)
}

/// PUTFH followed by one already encoded operation.
pub fn nfs4_putfh_call(xid: u32, fh: &[u8], op: Xdr) -> Vec<u8> {
    nfs4_compound_call(xid, 2, Xdr::new().u32(22).opaque(fh).bytes(&op.build()))
}

/// Successful PUTFH followed by one already encoded result.
pub fn nfs4_putfh_reply(xid: u32, result: Xdr) -> Vec<u8> {
    nfs4_compound_reply(xid, 0, 2, Xdr::new().u32(22).u32(0).bytes(&result.build()))
}

/// OPEN reply granting a read delegation with `delegation` as its stateid.
pub fn nfs4_open_delegated_reply(
    xid: u32,
    stateid: [u8; 12],
    delegation: [u8; 12],
    fh: &[u8],
) -> Vec<u8> {
    let results = Xdr::new()
        .u32(22)
        .u32(0)
        .u32(18)
        .u32(0)
        .stateid(1, stateid)
        .u32(1)
        .u64(1)
        .u64(2)
        .u32(0)
        .u32(0)
        .u32(1)
        .stateid(1, delegation)
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0x1)
        .string("EVERYONE@")
        .u32(10)
        .u32(0)
        .opaque(fh);
    nfs4_compound_reply(xid, 0, 3, results)
}
