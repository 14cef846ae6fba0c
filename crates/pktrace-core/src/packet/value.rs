use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Enumeration value decoded from the wire.
///
/// `name` is `None` when the value is not in the decoder's table or when
/// the decoder was configured to render enumerations numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumValue {
    pub value: u64,
    pub name: Option<&'static str>,
}

/// Leaf or nested value stored in a packet layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(u64),
    Enum(EnumValue),
    Text(String),
    Bytes(Vec<u8>),
    Record(Record),
    List(Vec<Value>),
}

impl Value {
    /// Integer view of numeric and enumeration values.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(value) => Some(*value),
            Value::Enum(e) => Some(e.value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(u64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Int(u64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Enum(EnumValue {
                name: Some(name), ..
            }) => f.write_str(name),
            Value::Enum(EnumValue { value, .. }) => write!(f, "{value}"),
            Value::Text(text) => write!(f, "{text:?}"),
            Value::Bytes(bytes) => f.write_str(&hex(bytes)),
            Value::Record(record) => write!(f, "{record}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(value) => serializer.serialize_u64(*value),
            Value::Enum(EnumValue {
                name: Some(name), ..
            }) => serializer.serialize_str(name),
            Value::Enum(EnumValue { value, .. }) => serializer.serialize_u64(*value),
            Value::Text(text) => serializer.serialize_str(text),
            Value::Bytes(bytes) => serializer.serialize_str(&hex(bytes)),
            Value::Record(record) => record.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Ordered field name to value mapping.
///
/// Field order follows wire order so per-layer summaries read naturally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, name: &'static str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{EnumValue, Record, Value, hex};

    #[test]
    fn insert_replaces_in_place() {
        let mut record = Record::new();
        record.insert("a", 1u32);
        record.insert("b", 2u32);
        record.insert("a", 3u32);
        let names: Vec<_> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn enum_renders_symbolically_when_named() {
        let named = Value::Enum(EnumValue {
            value: 18,
            name: Some("OP_OPEN"),
        });
        let bare = Value::Enum(EnumValue {
            value: 18,
            name: None,
        });
        assert_eq!(named.to_string(), "OP_OPEN");
        assert_eq!(bare.to_string(), "18");
        assert_eq!(named.as_u64(), Some(18));
    }

    #[test]
    fn bytes_serialize_as_hex() {
        let mut record = Record::new();
        record.insert("fh", Value::Bytes(vec![0xaa, 0x01]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fh"], "0xaa01");
        assert_eq!(hex(&[]), "0x");
    }
}
