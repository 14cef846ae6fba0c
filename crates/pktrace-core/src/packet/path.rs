use std::fmt;

use super::value::Value;

/// Name of the field holding an NFSv4 COMPOUND operation list.
pub const ARRAY_FIELD: &str = "array";

/// One step of an attribute path such as `nfs.array[2].stateid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Parse a dotted path with optional `[n]` indexes.
///
/// Returns `None` for empty segments, unterminated brackets or non-numeric
/// indexes.
pub fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        let (name, mut rest) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };
        if name.is_empty() {
            return None;
        }
        segments.push(Segment::Field(name.to_string()));
        while !rest.is_empty() {
            let close = rest.find(']')?;
            let index = rest.get(1..close)?.parse().ok()?;
            segments.push(Segment::Index(index));
            rest = &rest[close + 1..];
            if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
    }
    Some(segments)
}

/// Exact lookup: every segment must resolve.
pub(crate) fn resolve<'a>(value: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let Some((head, rest)) = segments.split_first() else {
        return Some(value);
    };
    let next = match (value, head) {
        (Value::Record(record), Segment::Field(name)) => record.get(name)?,
        (Value::List(items), Segment::Index(index)) => items.get(*index)?,
        _ => return None,
    };
    resolve(next, rest)
}

/// Existential lookup.
///
/// A field missing from a record that owns an operation `array` is searched
/// in each array item, and a field applied to a list is applied to every
/// item. This is what lets `nfs.fh` match the PUTFH inside a COMPOUND.
pub(crate) fn collect<'a>(value: &'a Value, segments: &[Segment], out: &mut Vec<&'a Value>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push(value);
        return;
    };
    match (value, head) {
        (Value::Record(record), Segment::Field(name)) => {
            if let Some(child) = record.get(name) {
                collect(child, rest, out);
            } else if let Some(Value::List(items)) = record.get(ARRAY_FIELD) {
                for item in items {
                    collect(item, segments, out);
                }
            }
        }
        (Value::List(items), Segment::Index(index)) => {
            if let Some(item) = items.get(*index) {
                collect(item, rest, out);
            }
        }
        (Value::List(items), Segment::Field(_)) => {
            for item in items {
                collect(item, segments, out);
            }
        }
        _ => {}
    }
}
