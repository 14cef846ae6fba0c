//! NFSv3 procedure decoding (program 100003, version 3).
//!
//! Calls and replies decode into flat records. Handles and names use the
//! same field names across procedures (`fh`, `name`, `newfh`, `newname`) so
//! one predicate can follow a file through LOOKUP, CREATE, WRITE and RENAME.

pub mod layout;
pub mod parser;

pub use parser::{parse_call, parse_reply};
