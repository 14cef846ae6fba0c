//! RPC-over-RDMA version 1 constants (RFC 8166).

use crate::protocols::xdr::EnumTable;

/// Registered port for NFS over RDMA.
pub const NFS_RDMA_PORT: u16 = 20049;

pub const VERSION: u32 = 1;

/// xid, vers, credit and proc.
pub const MIN_HEADER_LEN: usize = 16;

pub const RDMA_MSG: u32 = 0;
pub const RDMA_NOMSG: u32 = 1;
pub const RDMA_MSGP: u32 = 2;
pub const RDMA_DONE: u32 = 3;
pub const RDMA_ERROR: u32 = 4;

pub const PROCEDURES: EnumTable = &[
    (RDMA_MSG, "RDMA_MSG"),
    (RDMA_NOMSG, "RDMA_NOMSG"),
    (RDMA_MSGP, "RDMA_MSGP"),
    (RDMA_DONE, "RDMA_DONE"),
    (RDMA_ERROR, "RDMA_ERROR"),
];

pub const ERR_VERS: u32 = 1;
pub const ERR_CHUNK: u32 = 2;

pub const ERRCODES: EnumTable = &[(ERR_VERS, "ERR_VERS"), (ERR_CHUNK, "ERR_CHUNK")];

/// Upper bound on entries in one read or write list, and on segments in one
/// write chunk.
pub const MAX_CHUNKS: usize = 256;
