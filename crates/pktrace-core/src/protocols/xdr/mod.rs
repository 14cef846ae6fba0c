//! XDR (RFC 4506) decoding helpers shared by the RPC, NFS and NLM decoders.
//!
//! Every quantity is big endian and padded to a four byte boundary. The
//! reader owns the conventions (padding, bool range, enum validation) so the
//! protocol parsers only describe field order.

pub mod error;
pub mod reader;

pub use error::XdrError;
pub use reader::{EnumTable, XdrReader};

/// Round a length up to the XDR four byte unit.
pub fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}
