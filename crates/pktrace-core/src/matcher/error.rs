use thiserror::Error;

/// Errors returned when compiling a match expression.
///
/// Offsets are byte positions into the expression text.
///
/// # Examples
/// ```
/// use pktrace_core::matcher::{Filter, MatchError};
///
/// let err = Filter::compile("rpc.xid ==").unwrap_err();
/// assert!(matches!(err, MatchError::Parse { offset: 10, .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("unknown constant `{name}` at offset {offset}")]
    UnknownConstant { name: String, offset: usize },
    #[error("unknown function `{name}` at offset {offset}")]
    UnknownFunction { name: String, offset: usize },
}

impl MatchError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        MatchError::Parse {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset of the offending token.
    pub fn offset(&self) -> usize {
        match self {
            MatchError::Parse { offset, .. }
            | MatchError::UnknownConstant { offset, .. }
            | MatchError::UnknownFunction { offset, .. } => *offset,
        }
    }
}
