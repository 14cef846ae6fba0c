//! Match expressions over decoded packets.
//!
//! An expression is compiled once into a small AST and evaluated against
//! each packet. Paths resolve existentially through `Packet::lookup`, so
//! `nfs.fh == X` holds when any file handle in the packet (including the
//! operations of an NFSv4 COMPOUND) equals `X`. Missing paths and type
//! mismatches evaluate to false.
//!
//! # Examples
//! ```
//! use pktrace_core::matcher::Filter;
//!
//! let filter = Filter::compile("rpc.type == REPLY and crc32(nfs.fh) == 0x1234")?;
//! assert_eq!(filter.as_str(), "rpc.type == REPLY and crc32(nfs.fh) == 0x1234");
//! # Ok::<(), pktrace_core::matcher::MatchError>(())
//! ```

mod error;
mod eval;
mod lexer;
mod parser;

pub use error::MatchError;
pub use lexer::CmpOp;
pub use parser::{Expr, Operand};

use std::fmt;
use std::str::FromStr;

use crate::packet::Packet;

/// Compiled match expression together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    source: String,
    expr: Expr,
}

impl Filter {
    /// Compile `source`.
    ///
    /// # Errors
    /// `MatchError` on syntax errors, unknown symbolic constants and unknown
    /// functions.
    pub fn compile(source: &str) -> Result<Self, MatchError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn matches(&self, packet: &Packet) -> bool {
        eval::eval(&self.expr, packet)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl FromStr for Filter {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::compile(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
