use std::cmp::Ordering;

use crate::packet::{Packet, Value};

use super::lexer::CmpOp;
use super::parser::{Expr, Operand};

/// A value an operand resolved to: a packet field or a literal.
#[derive(Debug, Clone, Copy)]
enum Resolved<'a> {
    Field(&'a Value),
    Int(u64),
    Str(&'a str),
}

impl<'a> Resolved<'a> {
    fn as_int(self) -> Option<u64> {
        match self {
            Resolved::Field(value) => value.as_u64(),
            Resolved::Int(value) => Some(value),
            Resolved::Str(_) => None,
        }
    }

    /// Text view; enumerations expose their symbolic name.
    fn as_text(self) -> Option<&'a str> {
        match self {
            Resolved::Field(Value::Text(text)) => Some(text.as_str()),
            Resolved::Field(Value::Enum(e)) => e.name,
            Resolved::Str(text) => Some(text),
            _ => None,
        }
    }

    fn as_bytes(self) -> Option<&'a [u8]> {
        match self {
            Resolved::Field(Value::Bytes(bytes)) => Some(bytes.as_slice()),
            Resolved::Field(Value::Text(text)) => Some(text.as_bytes()),
            Resolved::Str(text) => Some(text.as_bytes()),
            _ => None,
        }
    }

    fn is_truthy(self) -> bool {
        match self {
            Resolved::Int(value) => value != 0,
            Resolved::Str(text) => !text.is_empty(),
            Resolved::Field(value) => match value {
                Value::Int(v) => *v != 0,
                Value::Enum(e) => e.value != 0,
                Value::Text(text) => !text.is_empty(),
                Value::Bytes(bytes) => !bytes.is_empty(),
                Value::Record(_) => true,
                Value::List(items) => !items.is_empty(),
            },
        }
    }
}

pub fn eval(expr: &Expr, packet: &Packet) -> bool {
    match expr {
        Expr::Or(a, b) => eval(a, packet) || eval(b, packet),
        Expr::And(a, b) => eval(a, packet) && eval(b, packet),
        Expr::Not(inner) => !eval(inner, packet),
        Expr::Compare { lhs, op, rhs } => {
            let lhs = resolve(lhs, packet);
            if lhs.is_empty() {
                return false;
            }
            let rhs = resolve(rhs, packet);
            lhs.iter().any(|a| {
                rhs.iter()
                    .any(|b| compare(*a, *b).is_some_and(|ord| holds(*op, ord)))
            })
        }
        Expr::Truthy(operand) => resolve(operand, packet).into_iter().any(Resolved::is_truthy),
    }
}

fn resolve<'a>(operand: &'a Operand, packet: &'a Packet) -> Vec<Resolved<'a>> {
    match operand {
        Operand::Int(value) => vec![Resolved::Int(*value)],
        Operand::Str(text) => vec![Resolved::Str(text)],
        Operand::Path(segments) => packet
            .lookup_segments(segments)
            .into_iter()
            .map(Resolved::Field)
            .collect(),
        Operand::Crc32(inner) => resolve(inner, packet)
            .into_iter()
            .filter_map(Resolved::as_bytes)
            .map(|bytes| Resolved::Int(u64::from(crc32fast::hash(bytes))))
            .collect(),
    }
}

/// Ordering between two resolved values, `None` when their types do not
/// compare.
fn compare(a: Resolved<'_>, b: Resolved<'_>) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_int(), b.as_int()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_text(), b.as_text()) {
        return Some(x.cmp(y));
    }
    match (a, b) {
        (Resolved::Field(Value::Bytes(x)), Resolved::Field(Value::Bytes(y))) => Some(x.cmp(y)),
        _ => None,
    }
}

fn holds(op: CmpOp, ord: Ordering) -> bool {
    match op {
        CmpOp::Eq => ord.is_eq(),
        CmpOp::Ne => ord.is_ne(),
        CmpOp::Lt => ord.is_lt(),
        CmpOp::Le => ord.is_le(),
        CmpOp::Gt => ord.is_gt(),
        CmpOp::Ge => ord.is_ge(),
    }
}
