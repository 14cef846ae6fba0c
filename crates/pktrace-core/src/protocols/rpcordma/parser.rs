use crate::config::DecoderConfig;
use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;

/// One decoded RPC-over-RDMA header.
#[derive(Debug, Clone)]
pub struct RdmaHeader<'a> {
    pub xid: u32,
    pub procedure: u32,
    /// Header fields in wire order, ready to become the `rpcordma` layer.
    pub record: Record,
    /// Inline RPC message carried by `RDMA_MSG` and `RDMA_MSGP`.
    pub message: Option<&'a [u8]>,
}

/// Decode an RPC-over-RDMA version 1 header.
///
/// Returns `Ok(None)` when the payload is shorter than the fixed header,
/// the version is not 1, the procedure is unknown, or an inline RPC message
/// does not carry the header's xid. Chunk lists that run past the payload
/// are errors.
pub fn parse_header(
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Option<RdmaHeader<'_>>, XdrError> {
    if payload.len() < layout::MIN_HEADER_LEN {
        return Ok(None);
    }
    let mut r = XdrReader::new(payload, config);
    let xid = r.read_u32()?;
    let vers = r.read_u32()?;
    let credit = r.read_u32()?;
    let procedure = r.read_u32()?;
    if vers != layout::VERSION || procedure > layout::RDMA_ERROR {
        return Ok(None);
    }

    let mut record = Record::new();
    record.insert("xid", xid);
    record.insert("vers", vers);
    record.insert("credit", credit);
    record.insert("proc", config.enum_value("rdma_proc", layout::PROCEDURES, procedure)?);

    match procedure {
        layout::RDMA_MSG | layout::RDMA_NOMSG => chunk_lists(&mut r, &mut record)?,
        layout::RDMA_MSGP => {
            record.insert("align", r.read_u32()?);
            record.insert("thresh", r.read_u32()?);
            chunk_lists(&mut r, &mut record)?;
        }
        layout::RDMA_ERROR => {
            let err = r.read_u32()?;
            record.insert("err", config.enum_value("rpc_rdma_errcode", layout::ERRCODES, err)?);
            if err == layout::ERR_VERS {
                let mut range = Record::new();
                range.insert("low", r.read_u32()?);
                range.insert("high", r.read_u32()?);
                record.insert("range", range);
            }
        }
        _ => {}
    }

    let inline = matches!(procedure, layout::RDMA_MSG | layout::RDMA_MSGP);
    let message = (inline && !r.is_empty()).then(|| r.rest());
    // The inline RPC message repeats the header xid.
    if message.is_some_and(|m| m.get(..4) != Some(xid.to_be_bytes().as_slice())) {
        return Ok(None);
    }
    Ok(Some(RdmaHeader {
        xid,
        procedure,
        record,
        message,
    }))
}

fn chunk_lists(r: &mut XdrReader<'_>, record: &mut Record) -> Result<(), XdrError> {
    let reads = linked_list(r, read_chunk)?;
    record.insert("reads", Value::List(reads));
    let writes = linked_list(r, |r| write_chunk(r).map(Value::Record))?;
    record.insert("writes", Value::List(writes));
    if let Some(reply) = r.read_optional(write_chunk)? {
        record.insert("reply", reply);
    }
    Ok(())
}

/// XDR linked list: each entry is preceded by a present flag.
fn linked_list<'a>(
    r: &mut XdrReader<'a>,
    mut entry: impl FnMut(&mut XdrReader<'a>) -> Result<Value, XdrError>,
) -> Result<Vec<Value>, XdrError> {
    let mut items = Vec::new();
    while r.read_bool()? {
        if items.len() >= layout::MAX_CHUNKS {
            return Err(XdrError::LengthTooLarge {
                length: items.len() + 1,
                max: layout::MAX_CHUNKS,
            });
        }
        items.push(entry(r)?);
    }
    Ok(items)
}

fn segment(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut seg = Record::new();
    seg.insert("handle", r.read_u32()?);
    seg.insert("length", r.read_u32()?);
    seg.insert("offset", r.read_u64()?);
    Ok(seg)
}

fn read_chunk(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    let mut chunk = Record::new();
    chunk.insert("position", r.read_u32()?);
    chunk.insert("target", segment(r)?);
    Ok(Value::Record(chunk))
}

fn write_chunk(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let target = r.read_array(layout::MAX_CHUNKS, |r| segment(r).map(Value::Record))?;
    let mut chunk = Record::new();
    chunk.insert("target", Value::List(target));
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::parse_header;
    use crate::config::DecoderConfig;
    use crate::packet::Value;
    use crate::protocols::rpcordma::layout;
    use crate::protocols::xdr::XdrError;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn segment(handle: u32, length: u32, offset: u64) -> Vec<u32> {
        vec![handle, length, (offset >> 32) as u32, offset as u32]
    }

    #[test]
    fn rdma_msg_with_read_chunk_hands_back_the_inline_call() {
        let mut header = vec![7, 1, 32, layout::RDMA_MSG];
        header.extend([1, 0x80]);
        header.extend(segment(0x1000, 4096, 0x1_0000_0000));
        header.extend([0, 0, 0]);
        let call = words(&[7, 0, 2, 100003, 3, 7]);
        let mut bytes = words(&header);
        bytes.extend(&call);

        let parsed = parse_header(&bytes, DecoderConfig::default()).unwrap().unwrap();
        assert_eq!(parsed.xid, 7);
        assert_eq!(parsed.procedure, layout::RDMA_MSG);
        assert_eq!(parsed.message, Some(call.as_slice()));
        let rec = &parsed.record;
        assert_eq!(rec.get("credit"), Some(&Value::Int(32)));
        assert_eq!(rec.get("proc").unwrap().to_string(), "RDMA_MSG");
        let reads = rec.get("reads").and_then(Value::as_list).unwrap();
        assert_eq!(reads.len(), 1);
        let chunk = reads[0].as_record().unwrap();
        assert_eq!(chunk.get("position"), Some(&Value::Int(0x80)));
        let target = chunk.get("target").and_then(Value::as_record).unwrap();
        assert_eq!(target.get("handle"), Some(&Value::Int(0x1000)));
        assert_eq!(target.get("offset"), Some(&Value::Int(0x1_0000_0000)));
        assert_eq!(rec.get("writes").and_then(Value::as_list).map(<[Value]>::len), Some(0));
        assert!(rec.get("reply").is_none());
    }

    #[test]
    fn nomsg_with_write_list_and_reply_chunk() {
        let mut header = vec![9, 1, 16, layout::RDMA_NOMSG, 0];
        // One write chunk of two segments, then the end of the list.
        header.extend([1, 2]);
        header.extend(segment(1, 512, 0));
        header.extend(segment(2, 512, 512));
        header.push(0);
        // Reply chunk of one segment.
        header.extend([1, 1]);
        header.extend(segment(3, 1024, 4096));
        let bytes = words(&header);

        let parsed = parse_header(&bytes, DecoderConfig::default()).unwrap().unwrap();
        assert!(parsed.message.is_none());
        let writes = parsed.record.get("writes").and_then(Value::as_list).unwrap();
        assert_eq!(writes.len(), 1);
        let target = writes[0]
            .as_record()
            .and_then(|chunk| chunk.get("target"))
            .and_then(Value::as_list)
            .unwrap();
        assert_eq!(target.len(), 2);
        let reply = parsed.record.get("reply").and_then(Value::as_record).unwrap();
        assert_eq!(reply.get("target").and_then(Value::as_list).map(<[Value]>::len), Some(1));
    }

    #[test]
    fn version_error_carries_the_supported_range() {
        let bytes = words(&[3, 1, 0, layout::RDMA_ERROR, layout::ERR_VERS, 1, 1]);
        let parsed = parse_header(&bytes, DecoderConfig::default()).unwrap().unwrap();
        assert_eq!(parsed.record.get("err").unwrap().to_string(), "ERR_VERS");
        let range = parsed.record.get("range").and_then(Value::as_record).unwrap();
        assert_eq!(range.get("high"), Some(&Value::Int(1)));

        let bytes = words(&[3, 1, 0, layout::RDMA_ERROR, layout::ERR_CHUNK]);
        let parsed = parse_header(&bytes, DecoderConfig::default()).unwrap().unwrap();
        assert!(parsed.record.get("range").is_none());
    }

    #[test]
    fn other_payloads_are_not_rdma_headers() {
        let config = DecoderConfig::default();
        assert!(parse_header(&words(&[1, 1, 0]), config).unwrap().is_none());
        assert!(parse_header(&words(&[1, 2, 0, 0, 0, 0, 0]), config).unwrap().is_none());
        assert!(parse_header(&words(&[1, 1, 0, 9, 0, 0, 0]), config).unwrap().is_none());
    }

    #[test]
    fn inline_message_must_mirror_the_xid() {
        // An RPC reply read as a header: vers and proc line up, xid does not.
        let bytes = words(&[7, 1, 0, 0, 0, 0, 0, 0, 0x1234]);
        assert!(parse_header(&bytes, DecoderConfig::default()).unwrap().is_none());
    }

    #[test]
    fn chunk_list_cut_short_is_an_error() {
        let bytes = words(&[5, 1, 8, layout::RDMA_MSG, 1, 0, 0x1000]);
        assert!(matches!(
            parse_header(&bytes, DecoderConfig::default()),
            Err(XdrError::TooShort { .. })
        ));
    }
}
