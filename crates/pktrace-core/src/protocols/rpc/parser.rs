use crate::config::DecoderConfig;
use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;

/// RPCSEC_GSS credential fields needed to locate the procedure body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GssCred {
    pub gss_proc: u32,
    pub seq_num: u32,
    pub service: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcCall {
    pub program: u32,
    pub version: u32,
    pub procedure: u32,
    pub gss: Option<GssCred>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcReply {
    /// `true` for MSG_ACCEPTED with SUCCESS; only then do results follow.
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcBody {
    Call(RpcCall),
    Reply(RpcReply),
}

/// One decoded RPC message header.
#[derive(Debug, Clone)]
pub struct RpcMessage<'a> {
    pub xid: u32,
    pub body: RpcBody,
    /// Header fields in wire order, ready to become the `rpc` layer.
    pub record: Record,
    /// Procedure arguments or results following the header.
    pub payload: &'a [u8],
}

/// Strip the TCP record-marking header and return the first record.
///
/// A record longer than the segment is cut at the segment end so that
/// snapped captures still decode the leading fields.
pub fn strip_record_mark(segment: &[u8]) -> Option<&[u8]> {
    let header: [u8; layout::RECORD_MARK_LEN] =
        segment.get(..layout::RECORD_MARK_LEN)?.try_into().ok()?;
    let len = (u32::from_be_bytes(header) & layout::FRAGMENT_LEN_MASK) as usize;
    if len < layout::MIN_MESSAGE_LEN {
        return None;
    }
    let body = &segment[layout::RECORD_MARK_LEN..];
    Some(&body[..len.min(body.len())])
}

/// Decode an RPC message header.
///
/// Returns `Ok(None)` when the payload does not look like ONC-RPC (wrong
/// message type, RPC version or status ranges). Errors are reserved for
/// payloads that pass those checks but carry inconsistent lengths.
pub fn parse_message(
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Option<RpcMessage<'_>>, XdrError> {
    if payload.len() < layout::MIN_MESSAGE_LEN {
        return Ok(None);
    }
    let mut reader = XdrReader::new(payload, config);
    let xid = reader.read_u32()?;
    let msg_type = reader.read_u32()?;

    let mut record = Record::new();
    record.insert("xid", xid);
    record.insert("type", config.enum_value("msg_type", layout::MSG_TYPE, msg_type)?);

    let body = match msg_type {
        layout::MSG_CALL => match parse_call(&mut reader, &mut record)? {
            Some(call) => RpcBody::Call(call),
            None => return Ok(None),
        },
        layout::MSG_REPLY => match parse_reply(&mut reader, &mut record)? {
            Some(reply) => RpcBody::Reply(reply),
            None => return Ok(None),
        },
        _ => return Ok(None),
    };

    Ok(Some(RpcMessage {
        xid,
        body,
        record,
        payload: reader.rest(),
    }))
}

fn parse_call(
    reader: &mut XdrReader<'_>,
    record: &mut Record,
) -> Result<Option<RpcCall>, XdrError> {
    let rpcvers = reader.read_u32()?;
    if rpcvers != layout::RPC_VERSION {
        return Ok(None);
    }
    let program = reader.read_u32()?;
    let version = reader.read_u32()?;
    let procedure = reader.read_u32()?;
    record.insert("rpcvers", rpcvers);
    record.insert("program", program);
    record.insert("version", version);
    record.insert("procedure", procedure);

    let (credential, gss) = parse_credential(reader)?;
    record.insert("credential", credential);
    record.insert("verifier", parse_verifier(reader)?);

    Ok(Some(RpcCall {
        program,
        version,
        procedure,
        gss,
    }))
}

fn parse_credential(
    reader: &mut XdrReader<'_>,
) -> Result<(Record, Option<GssCred>), XdrError> {
    let config = reader.config();
    let flavor = reader.read_u32()?;
    let body = reader.read_opaque(layout::MAX_AUTH_BYTES)?;

    let mut cred = Record::new();
    cred.insert("flavor", config.enum_value("auth_flavor", layout::AUTH_FLAVOR, flavor)?);

    let mut body = XdrReader::new(body, config);
    let mut gss = None;
    match flavor {
        layout::AUTH_SYS => {
            cred.insert("stamp", body.read_u32()?);
            cred.insert("machine", body.read_string(layout::MAX_MACHINE_NAME)?);
            cred.insert("uid", body.read_u32()?);
            cred.insert("gid", body.read_u32()?);
            let gids = body.read_array(layout::MAX_GIDS, |r| r.read_u32().map(Value::from))?;
            cred.insert("gids", Value::List(gids));
        }
        layout::RPCSEC_GSS => {
            cred.insert("gss_version", body.read_u32()?);
            let gss_proc = body.read_u32()?;
            let seq_num = body.read_u32()?;
            let service = body.read_u32()?;
            cred.insert("gss_proc", config.enum_value("gss_proc", layout::GSS_PROC, gss_proc)?);
            cred.insert("seq_num", seq_num);
            cred.insert(
                "service",
                config.enum_value("gss_service", layout::GSS_SERVICE, service)?,
            );
            cred.insert("handle", body.read_opaque(layout::MAX_GSS_HANDLE)?);
            gss = Some(GssCred {
                gss_proc,
                seq_num,
                service,
            });
        }
        _ => {
            if !body.is_empty() {
                cred.insert("body", body.rest());
            }
        }
    }
    Ok((cred, gss))
}

fn parse_verifier(reader: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let config = reader.config();
    let flavor = reader.read_u32()?;
    let body = reader.read_opaque(layout::MAX_AUTH_BYTES)?;
    let mut verf = Record::new();
    verf.insert("flavor", config.enum_value("auth_flavor", layout::AUTH_FLAVOR, flavor)?);
    if !body.is_empty() {
        verf.insert("body", body);
    }
    Ok(verf)
}

fn parse_reply(
    reader: &mut XdrReader<'_>,
    record: &mut Record,
) -> Result<Option<RpcReply>, XdrError> {
    let config = reader.config();
    let reply_status = reader.read_u32()?;
    match reply_status {
        layout::MSG_ACCEPTED => {
            record.insert(
                "reply_status",
                config.enum_value("reply_stat", layout::REPLY_STAT, reply_status)?,
            );
            record.insert("verifier", parse_verifier(reader)?);
            let accept_status = reader.read_u32()?;
            if accept_status > layout::SYSTEM_ERR {
                return Ok(None);
            }
            record.insert(
                "accept_status",
                config.enum_value("accept_stat", layout::ACCEPT_STAT, accept_status)?,
            );
            if accept_status == layout::PROG_MISMATCH {
                record.insert("low", reader.read_u32()?);
                record.insert("high", reader.read_u32()?);
            }
            Ok(Some(RpcReply {
                success: accept_status == layout::SUCCESS,
            }))
        }
        layout::MSG_DENIED => {
            record.insert(
                "reply_status",
                config.enum_value("reply_stat", layout::REPLY_STAT, reply_status)?,
            );
            let reject_status = reader.read_u32()?;
            match reject_status {
                layout::RPC_MISMATCH => {
                    record.insert(
                        "reject_status",
                        config.enum_value("reject_stat", layout::REJECT_STAT, reject_status)?,
                    );
                    record.insert("low", reader.read_u32()?);
                    record.insert("high", reader.read_u32()?);
                }
                layout::AUTH_ERROR => {
                    record.insert(
                        "reject_status",
                        config.enum_value("reject_stat", layout::REJECT_STAT, reject_status)?,
                    );
                    let auth_stat = reader.read_u32()?;
                    record.insert(
                        "auth_stat",
                        config.enum_value("auth_stat", layout::AUTH_STAT, auth_stat)?,
                    );
                }
                _ => return Ok(None),
            }
            Ok(Some(RpcReply { success: false }))
        }
        _ => Ok(None),
    }
}

/// Unwrap an `rpc_gss_integ_data` body, dropping the sequence number and
/// the trailing checksum.
pub fn unwrap_integrity(payload: &[u8], config: DecoderConfig) -> Result<&[u8], XdrError> {
    let mut reader = XdrReader::new(payload, config);
    let len = reader.read_u32()? as usize;
    reader.read_u32()?;
    let available = reader.remaining().min(len.saturating_sub(4));
    reader.read_fixed(available)
}

#[cfg(test)]
mod tests {
    use super::{RpcBody, parse_message, strip_record_mark, unwrap_integrity};
    use crate::config::DecoderConfig;
    use crate::packet::Value;

    fn words(values: &[u32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn null_call(xid: u32) -> Vec<u8> {
        // xid, CALL, rpcvers, program, version, procedure, AUTH_NONE cred+verf
        words(&[xid, 0, 2, 100003, 3, 0, 0, 0, 0, 0])
    }

    #[test]
    fn parses_call_header() {
        let bytes = null_call(7);
        let msg = parse_message(&bytes, DecoderConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(msg.xid, 7);
        let RpcBody::Call(call) = msg.body else {
            panic!("expected call");
        };
        assert_eq!((call.program, call.version, call.procedure), (100003, 3, 0));
        assert_eq!(msg.record.get("version"), Some(&Value::Int(3)));
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn parses_auth_sys_credential() {
        let mut bytes = words(&[1, 0, 2, 100003, 3, 1, 1, 28, 0, 4]);
        bytes.extend_from_slice(b"host");
        bytes.extend(words(&[1000, 100, 1, 100, 0, 0]));
        let msg = parse_message(&bytes, DecoderConfig::default())
            .unwrap()
            .unwrap();
        let cred = msg.record.get("credential").unwrap().as_record().unwrap();
        assert_eq!(cred.get("machine"), Some(&Value::Text("host".into())));
        assert_eq!(cred.get("uid"), Some(&Value::Int(1000)));
    }

    #[test]
    fn parses_successful_reply() {
        let bytes = words(&[9, 1, 0, 0, 0, 0, 0xdead]);
        let msg = parse_message(&bytes, DecoderConfig::default())
            .unwrap()
            .unwrap();
        assert!(matches!(msg.body, RpcBody::Reply(reply) if reply.success));
        assert_eq!(msg.payload, &0xdeadu32.to_be_bytes());
    }

    #[test]
    fn rejects_non_rpc_payloads() {
        let config = DecoderConfig::default();
        assert!(parse_message(&words(&[1, 5, 2]), config).unwrap().is_none());
        assert!(parse_message(&words(&[1, 0, 3, 0]), config).unwrap().is_none());
        assert!(parse_message(&words(&[1, 1, 0, 0, 0, 9]), config).unwrap().is_none());
        assert!(parse_message(&[0, 1], config).unwrap().is_none());
    }

    #[test]
    fn record_mark_is_stripped() {
        let mut segment = (0x8000_0000u32 | 40).to_be_bytes().to_vec();
        segment.extend(null_call(3));
        assert_eq!(strip_record_mark(&segment).unwrap().len(), 40);
        assert!(strip_record_mark(&[0x80, 0, 0, 4, 0, 0, 0, 0]).is_none());
    }

    #[test]
    fn integrity_body_is_unwrapped() {
        let bytes = words(&[8, 77, 0xabcd, 4, 0xffff_ffff]);
        let body = unwrap_integrity(&bytes, DecoderConfig::default()).unwrap();
        assert_eq!(body, &0xabcdu32.to_be_bytes());
    }
}
