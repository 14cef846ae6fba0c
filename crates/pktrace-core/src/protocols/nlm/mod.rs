//! Network Lock Manager decoding (program 100021, versions 1-4).

pub mod layout;
pub mod parser;

pub use parser::{parse_call, parse_reply};
