use crate::config::DecoderConfig;
use crate::packet::{ARRAY_FIELD, Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::args::parse_args;
use super::layout;
use super::results::parse_result;

/// Decode a COMPOUND call: `tag`, `minorversion` and the operation array.
pub fn parse_call(payload: &[u8], config: DecoderConfig) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("tag", r.read_string(layout::MAX_TAG)?);
    rec.insert("minorversion", r.read_u32()?);

    let count = op_count(&mut r)?;
    let mut ops = Vec::with_capacity(count.min(r.remaining() / 4));
    for _ in 0..count {
        let op = r.read_u32()?;
        let mut item = Record::new();
        item.insert("op", op_value(config, op)?);
        let decoded = parse_args(op, &mut r, &mut item)?;
        if !decoded {
            item.insert("unparsed", r.rest());
            ops.push(Value::Record(item));
            break;
        }
        if r.is_truncated() {
            item.insert("truncated", true);
            ops.push(Value::Record(item));
            break;
        }
        ops.push(Value::Record(item));
    }
    rec.insert(ARRAY_FIELD, Value::List(ops));
    Ok(rec)
}

/// Decode a COMPOUND reply: `status`, `tag` and the result array.
pub fn parse_reply(payload: &[u8], config: DecoderConfig) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("status", r.read_enum("nfsstat4", layout::STATUS)?);
    rec.insert("tag", r.read_string(layout::MAX_TAG)?);

    let count = op_count(&mut r)?;
    let mut results = Vec::with_capacity(count.min(r.remaining() / 8));
    for _ in 0..count {
        let op = r.read_u32()?;
        let mut item = Record::new();
        item.insert("resop", op_value(config, op)?);
        if !layout::OPERATIONS.iter().any(|(known, _)| *known == op) {
            item.insert("unparsed", r.rest());
            results.push(Value::Record(item));
            break;
        }
        let status = r.read_u32()?;
        item.insert("status", config.enum_value("nfsstat4", layout::STATUS, status)?);
        let decoded = parse_result(op, status, &mut r, &mut item)?;
        if !decoded {
            item.insert("unparsed", r.rest());
            results.push(Value::Record(item));
            break;
        }
        if r.is_truncated() {
            item.insert("truncated", true);
            results.push(Value::Record(item));
            break;
        }
        results.push(Value::Record(item));
    }
    rec.insert(ARRAY_FIELD, Value::List(results));
    Ok(rec)
}

fn op_count(r: &mut XdrReader<'_>) -> Result<usize, XdrError> {
    let count = r.read_u32()? as usize;
    if count > layout::MAX_OPS {
        return Err(XdrError::LengthTooLarge {
            length: count,
            max: layout::MAX_OPS,
        });
    }
    Ok(count)
}

/// Operation codes never fail strict validation; unknown ones become
/// `unparsed` placeholders instead.
fn op_value(config: DecoderConfig, op: u32) -> Result<Value, XdrError> {
    let lenient = DecoderConfig {
        strict_enums: false,
        ..config
    };
    lenient.enum_value("nfs_opnum4", layout::OPERATIONS, op)
}

#[cfg(test)]
mod tests {
    use super::{parse_call, parse_reply};
    use crate::config::DecoderConfig;
    use crate::packet::{Packet, Value, layer};
    use crate::protocols::nfs4::layout;

    struct Xdr(Vec<u8>);

    impl Xdr {
        fn new() -> Self {
            Self(Vec::new())
        }
        fn u32(mut self, value: u32) -> Self {
            self.0.extend(value.to_be_bytes());
            self
        }
        fn u64(mut self, value: u64) -> Self {
            self.0.extend(value.to_be_bytes());
            self
        }
        fn opaque(mut self, bytes: &[u8]) -> Self {
            self = self.u32(bytes.len() as u32);
            self.0.extend_from_slice(bytes);
            while self.0.len() % 4 != 0 {
                self.0.push(0);
            }
            self
        }
        fn stateid(self, seqid: u32, other: [u8; 12]) -> Self {
            let mut s = self.u32(seqid);
            s.0.extend_from_slice(&other);
            s
        }
    }

    fn open_getfh_reply() -> Vec<u8> {
        Xdr::new()
            .u32(layout::NFS4_OK)
            .opaque(b"")
            .u32(4)
            // SEQUENCE failed first; failed results carry no body
            .u32(layout::OP_SEQUENCE)
            .u32(10008)
            .u32(layout::OP_PUTFH)
            .u32(layout::NFS4_OK)
            .u32(layout::OP_OPEN)
            .u32(layout::NFS4_OK)
            .stateid(1, [7; 12])
            .u32(1)
            .u64(1)
            .u64(2)
            .u32(0)
            .u32(0)
            .u32(layout::OPEN_DELEGATE_NONE)
            .u32(layout::OP_GETFH)
            .u32(layout::NFS4_OK)
            .opaque(&[0xfe, 0xed])
            .0
    }

    #[test]
    fn open_and_getfh_are_addressable() {
        let rec = parse_reply(&open_getfh_reply(), DecoderConfig::default()).unwrap();
        let mut packet = Packet::new(1, 0.0, 0, 0);
        packet.push_layer(layer::NFS, rec);

        assert_eq!(
            packet.get("nfs.array[2].stateid.other"),
            Some(&Value::Bytes(vec![7; 12]))
        );
        assert_eq!(packet.lookup("nfs.fh"), vec![&Value::Bytes(vec![0xfe, 0xed])]);
        assert_eq!(
            packet.get("nfs.array[2].delegation.type").unwrap().to_string(),
            "OPEN_DELEGATE_NONE"
        );
    }

    #[test]
    fn unknown_operation_swallows_rest() {
        let args = Xdr::new()
            .opaque(b"t")
            .u32(1)
            .u32(3)
            .u32(layout::OP_PUTROOTFH)
            .u32(9999)
            .u32(0xdead_beef)
            .u32(layout::OP_GETFH)
            .0;
        let rec = parse_call(&args, DecoderConfig::default()).unwrap();
        let ops = rec.get("array").and_then(Value::as_list).unwrap();
        assert_eq!(ops.len(), 2);
        let last = ops[1].as_record().unwrap();
        assert_eq!(last.get("op").and_then(Value::as_u64), Some(9999));
        assert_eq!(last.get("unparsed").and_then(Value::as_bytes).map(<[u8]>::len), Some(8));
    }

    #[test]
    fn write_cut_off_by_segment_end_keeps_earlier_ops() {
        let mut args = Xdr::new()
            .opaque(b"")
            .u32(1)
            .u32(4)
            .u32(layout::OP_SEQUENCE)
            .u32(1)
            .u32(2)
            .u32(3)
            .u32(4)
            .u32(5)
            .u32(0)
            .u32(0)
            .u32(0)
            .u32(layout::OP_PUTFH)
            .opaque(&[0xab; 8])
            .u32(layout::OP_WRITE)
            .stateid(1, [3; 12])
            .u64(0)
            .u32(2)
            .u32(4096)
            .0;
        // Only the first 64 bytes of data fit in the segment; GETATTR follows
        // on the wire but was not captured.
        args.extend([0x55; 64]);

        let rec = parse_call(&args, DecoderConfig::default()).unwrap();
        let mut packet = Packet::new(1, 0.0, 0, 0);
        packet.push_layer(layer::NFS, rec);
        assert_eq!(packet.lookup("nfs.op").len(), 3);
        assert_eq!(packet.get("nfs.array[1].fh"), Some(&Value::Bytes(vec![0xab; 8])));
        assert_eq!(packet.get("nfs.array[2].stateid.other"), Some(&Value::Bytes(vec![3; 12])));
        assert_eq!(packet.get("nfs.array[2].count"), Some(&Value::Int(4096)));
        assert_eq!(packet.get("nfs.array[2].truncated"), Some(&Value::from(true)));
    }

    #[test]
    fn unknown_operation_is_tolerated_in_strict_mode() {
        let config = DecoderConfig {
            strict_enums: true,
            ..DecoderConfig::default()
        };
        let args = Xdr::new().opaque(b"").u32(0).u32(1).u32(4242).0;
        assert!(parse_call(&args, config).is_ok());
    }

    #[test]
    fn call_names_are_exposed() {
        let args = Xdr::new()
            .opaque(b"")
            .u32(0)
            .u32(3)
            .u32(layout::OP_PUTFH)
            .opaque(&[1, 2, 3, 4])
            .u32(layout::OP_RENAME)
            .opaque(b"a")
            .opaque(b"b")
            .u32(layout::OP_GETFH)
            .0;
        let rec = parse_call(&args, DecoderConfig::default()).unwrap();
        let mut packet = Packet::new(1, 0.0, 0, 0);
        packet.push_layer(layer::NFS, rec);
        assert_eq!(packet.lookup("nfs.newname"), vec![&Value::Text("b".into())]);
        assert_eq!(packet.lookup("nfs.op").len(), 3);
    }
}
