use thiserror::Error;

/// Errors returned by XDR reading.
///
/// Note: this error type lives in an internal module; the example is
/// illustrative and not compiled as a public doctest.
///
/// # Examples
/// ```text
/// use pktrace_core::protocols::xdr::error::XdrError;
///
/// let err = XdrError::InvalidBool { value: 7 };
/// assert!(err.to_string().contains("invalid XDR bool"));
/// ```
#[derive(Debug, Error)]
pub enum XdrError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("declared length {length} exceeds limit {max}")]
    LengthTooLarge { length: usize, max: usize },
    #[error("invalid XDR bool: {value}")]
    InvalidBool { value: u32 },
    #[error("invalid {kind} value: {value}")]
    InvalidEnum { kind: &'static str, value: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
