use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt};

use super::error::XdrError;
use super::padded_len;
use crate::config::DecoderConfig;
use crate::packet::Value;

/// Symbolic names for an XDR `enum`, as `(value, name)` pairs.
pub type EnumTable = &'static [(u32, &'static str)];

/// Sequential XDR reader over a borrowed payload.
///
/// Carries the decoder configuration so enumeration fields are validated
/// and named the same way everywhere.
pub struct XdrReader<'a> {
    cursor: Cursor<&'a [u8]>,
    config: DecoderConfig,
    truncated: bool,
}

impl<'a> XdrReader<'a> {
    pub fn new(payload: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            cursor: Cursor::new(payload),
            config,
            truncated: false,
        }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    fn buf(&self) -> &'a [u8] {
        self.cursor.get_ref()
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.buf().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// True once bulk data ran past the end of the captured bytes; nothing
    /// after that point can be decoded.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn require(&self, needed: usize) -> Result<(), XdrError> {
        if self.remaining() < needed {
            return Err(XdrError::TooShort {
                needed: self.position() + needed,
                actual: self.buf().len(),
            });
        }
        Ok(())
    }

    fn advance(&mut self, len: usize) {
        let next = self.position().saturating_add(len).min(self.buf().len());
        self.cursor.set_position(next as u64);
    }

    pub fn read_u32(&mut self) -> Result<u32, XdrError> {
        self.require(4)?;
        Ok(self.cursor.read_u32::<BigEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32, XdrError> {
        self.require(4)?;
        Ok(self.cursor.read_i32::<BigEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64, XdrError> {
        self.require(8)?;
        Ok(self.cursor.read_u64::<BigEndian>()?)
    }

    pub fn read_bool(&mut self) -> Result<bool, XdrError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(XdrError::InvalidBool { value }),
        }
    }

    /// Fixed-length opaque data; consumes the padding as well.
    pub fn read_fixed(&mut self, len: usize) -> Result<&'a [u8], XdrError> {
        self.require(padded_len(len))?;
        let start = self.position();
        let buf = self.buf();
        self.advance(padded_len(len));
        Ok(&buf[start..start + len])
    }

    /// Variable-length opaque data bounded by `max`.
    pub fn read_opaque(&mut self, max: usize) -> Result<&'a [u8], XdrError> {
        let len = self.read_u32()? as usize;
        if len > max {
            return Err(XdrError::LengthTooLarge { length: len, max });
        }
        self.read_fixed(len)
    }

    pub fn read_string(&mut self, max: usize) -> Result<String, XdrError> {
        let bytes = self.read_opaque(max)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Skip bulk opaque data (READ/WRITE payloads), returning the declared
    /// length. Data cut short by the capture snap length or the end of a
    /// TCP segment is tolerated and marks the reader as truncated.
    pub fn skip_opaque(&mut self) -> Result<usize, XdrError> {
        let len = self.read_u32()? as usize;
        if padded_len(len) > self.remaining() {
            self.truncated = true;
        }
        self.advance(padded_len(len));
        Ok(len)
    }

    /// Counted array; `max` bounds the declared element count.
    pub fn read_array<T>(
        &mut self,
        max: usize,
        mut item: impl FnMut(&mut Self) -> Result<T, XdrError>,
    ) -> Result<Vec<T>, XdrError> {
        let count = self.read_u32()? as usize;
        if count > max {
            return Err(XdrError::LengthTooLarge { length: count, max });
        }
        let mut items = Vec::with_capacity(count.min(self.remaining() / 4));
        for _ in 0..count {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// XDR optional-data (`*T`) as used by linked lists.
    pub fn read_optional<T>(
        &mut self,
        item: impl FnOnce(&mut Self) -> Result<T, XdrError>,
    ) -> Result<Option<T>, XdrError> {
        if self.read_bool()? {
            Ok(Some(item(self)?))
        } else {
            Ok(None)
        }
    }

    pub fn read_enum(&mut self, kind: &'static str, table: EnumTable) -> Result<Value, XdrError> {
        let value = self.read_u32()?;
        self.config.enum_value(kind, table, value)
    }

    /// Consume and return everything left.
    pub fn rest(&mut self) -> &'a [u8] {
        let start = self.position();
        let buf = self.buf();
        self.advance(buf.len() - start);
        &buf[start..]
    }
}
