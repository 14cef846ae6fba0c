use thiserror::Error;

use crate::protocols::xdr::XdrError;

/// Errors returned while decoding one frame. They are not fatal: the trace
/// cursor counts the frame as skipped and moves on.
///
/// # Examples
/// ```text
/// nfs layer: payload too short: need 16 bytes, got 12
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("packet slice error: {0}")]
    Slice(String),
    #[error("unsupported link type {0}")]
    UnsupportedLinktype(i32),
    #[error("{layer} layer: {source}")]
    Layer {
        layer: &'static str,
        #[source]
        source: XdrError,
    },
}

impl DecodeError {
    pub(crate) fn layer(layer: &'static str) -> impl FnOnce(XdrError) -> DecodeError {
        move |source| DecodeError::Layer { layer, source }
    }
}
