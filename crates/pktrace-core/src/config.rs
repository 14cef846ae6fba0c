//! Decoder and cursor configuration.
//!
//! These are plain values handed to the decoder and the trace cursor at
//! construction time; nothing here is process-global.

use crate::packet::{EnumValue, Value};
use crate::protocols::xdr::{EnumTable, XdrError};

/// How enumeration fields are validated and rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reject values missing from the enumeration table instead of passing
    /// them through as bare numbers.
    pub strict_enums: bool,
    /// Never attach symbolic names to enumeration values.
    pub numeric_enums: bool,
}

impl DecoderConfig {
    /// Build an enumeration value for `value` using `table`.
    ///
    /// # Errors
    /// Returns `XdrError::InvalidEnum` when strict validation is on and the
    /// value has no entry in `table`.
    pub fn enum_value(
        &self,
        kind: &'static str,
        table: EnumTable,
        value: u32,
    ) -> Result<Value, XdrError> {
        let name = table
            .iter()
            .find(|(known, _)| *known == value)
            .map(|(_, name)| *name);
        if name.is_none() && self.strict_enums {
            return Err(XdrError::InvalidEnum {
                kind,
                value: u64::from(value),
            });
        }
        Ok(Value::Enum(EnumValue {
            value: u64::from(value),
            name: if self.numeric_enums { None } else { name },
        }))
    }
}

/// Options for a trace cursor.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceOptions {
    pub decoder: DecoderConfig,
    /// Report scan progress through `tracing` at info level.
    pub showprog: bool,
}
