//! NFSv4 COMPOUND decoding (program 100003, version 4, minor versions 0-2).
//!
//! The `nfs` layer of a COMPOUND holds the request `tag` and an `array` of
//! per-operation records tagged with `op` (calls) or `resop` and `status`
//! (replies). Operations the decoder does not know end the walk with an
//! `unparsed` record holding the remaining bytes, so the operations before
//! it stay addressable.

mod args;
pub mod layout;
pub mod parser;
mod results;
mod types;

pub use parser::{parse_call, parse_reply};
