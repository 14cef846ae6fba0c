use thiserror::Error;

use crate::decode::DecodeError;
use crate::matcher::MatchError;
use crate::source::SourceError;

/// Errors returned by the trace cursor.
///
/// Source and match errors are fatal for the operation that raised them.
/// Decode errors are only surfaced by indexed access; scans count the frame
/// as skipped instead.
///
/// # Examples
/// ```text
/// frame 17: nfs layer: payload too short: need 64 bytes, got 4
/// ```
#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("frame {index}: {source}")]
    Decode {
        index: u64,
        #[source]
        source: DecodeError,
    },
    #[error("invalid match expression: {0}")]
    Match(#[from] MatchError),
}
