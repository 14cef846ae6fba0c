//! RPC-over-RDMA transport header decoding (RFC 8166).
//!
//! The header mirrors the RPC xid and carries flow-control credits plus the
//! chunk lists that describe where bulk data was placed by RDMA reads and
//! writes. For `RDMA_MSG` the RPC message follows the header inline.

pub mod layout;
pub mod parser;

pub use parser::{RdmaHeader, parse_header};
