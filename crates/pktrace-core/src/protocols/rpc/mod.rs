//! ONC-RPC message decoding.
//!
//! TCP segments carry a record-marking header that `strip_record_mark`
//! removes; UDP datagrams are bare messages. `parse_message` decodes the
//! call or reply header and hands back the procedure body for the program
//! decoders. Only the first record of a segment is looked at.

pub mod layout;
pub mod parser;

pub use parser::{
    GssCred, RpcBody, RpcCall, RpcMessage, RpcReply, parse_message, strip_record_mark,
    unwrap_integrity,
};
