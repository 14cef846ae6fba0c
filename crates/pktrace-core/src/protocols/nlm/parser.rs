use crate::config::DecoderConfig;
use crate::packet::Record;
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;

/// Decode NLM call arguments into the `nlm` layer record.
///
/// The `nlm_lock` structure is flattened: `caller`, `fh`, `oh`, `svid`,
/// `offset` and `length` sit directly on the record.
pub fn parse_call(
    version: u32,
    procedure: u32,
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("op", config.enum_value("nlm_proc", layout::PROCEDURES, procedure)?);
    let wide = version >= layout::VERSION_64BIT;

    match procedure {
        layout::NLM_TEST | layout::NLM_GRANTED | layout::NLM_TEST_MSG | layout::NLM_GRANTED_MSG => {
            cookie(&mut r, &mut rec)?;
            rec.insert("exclusive", r.read_bool()?);
            lock(&mut r, &mut rec, wide)?;
        }
        layout::NLM_LOCK | layout::NLM_LOCK_MSG | layout::NLM_NM_LOCK => {
            cookie(&mut r, &mut rec)?;
            rec.insert("block", r.read_bool()?);
            rec.insert("exclusive", r.read_bool()?);
            lock(&mut r, &mut rec, wide)?;
            rec.insert("reclaim", r.read_bool()?);
            rec.insert("state", r.read_u32()?);
        }
        layout::NLM_CANCEL | layout::NLM_CANCEL_MSG => {
            cookie(&mut r, &mut rec)?;
            rec.insert("block", r.read_bool()?);
            rec.insert("exclusive", r.read_bool()?);
            lock(&mut r, &mut rec, wide)?;
        }
        layout::NLM_UNLOCK | layout::NLM_UNLOCK_MSG => {
            cookie(&mut r, &mut rec)?;
            lock(&mut r, &mut rec, wide)?;
        }
        layout::NLM_TEST_RES => testres(&mut r, &mut rec, wide)?,
        layout::NLM_LOCK_RES
        | layout::NLM_CANCEL_RES
        | layout::NLM_UNLOCK_RES
        | layout::NLM_GRANTED_RES => res(&mut r, &mut rec)?,
        layout::NLM_SHARE | layout::NLM_UNSHARE => {
            cookie(&mut r, &mut rec)?;
            rec.insert("caller", r.read_string(layout::LM_MAXSTRLEN)?);
            rec.insert("fh", r.read_opaque(layout::MAXNETOBJ_SZ)?);
            rec.insert("oh", r.read_opaque(layout::MAXNETOBJ_SZ)?);
            rec.insert("mode", r.read_u32()?);
            rec.insert("access", r.read_u32()?);
            rec.insert("reclaim", r.read_bool()?);
        }
        layout::NLM_FREE_ALL => {
            rec.insert("caller", r.read_string(layout::LM_MAXSTRLEN)?);
            rec.insert("state", r.read_u32()?);
        }
        _ => {
            rec.insert("unparsed", r.rest());
        }
    }
    Ok(rec)
}

/// Decode NLM reply results into the `nlm` layer record.
///
/// Asynchronous `_MSG`/`_RES` procedures and FREE_ALL reply with no body.
pub fn parse_reply(
    version: u32,
    procedure: u32,
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("op", config.enum_value("nlm_proc", layout::PROCEDURES, procedure)?);
    let wide = version >= layout::VERSION_64BIT;

    match procedure {
        layout::NLM_TEST => testres(&mut r, &mut rec, wide)?,
        layout::NLM_LOCK
        | layout::NLM_CANCEL
        | layout::NLM_UNLOCK
        | layout::NLM_GRANTED
        | layout::NLM_NM_LOCK => res(&mut r, &mut rec)?,
        layout::NLM_SHARE | layout::NLM_UNSHARE => {
            res(&mut r, &mut rec)?;
            rec.insert("sequence", r.read_u32()?);
        }
        layout::NLM_TEST_MSG..=layout::NLM_GRANTED_RES | layout::NLM_FREE_ALL => {}
        _ => {
            rec.insert("unparsed", r.rest());
        }
    }
    Ok(rec)
}

fn cookie(r: &mut XdrReader<'_>, rec: &mut Record) -> Result<(), XdrError> {
    rec.insert("cookie", r.read_opaque(layout::MAXNETOBJ_SZ)?);
    Ok(())
}

fn offset_length(r: &mut XdrReader<'_>, rec: &mut Record, wide: bool) -> Result<(), XdrError> {
    if wide {
        rec.insert("offset", r.read_u64()?);
        rec.insert("length", r.read_u64()?);
    } else {
        rec.insert("offset", r.read_u32()?);
        rec.insert("length", r.read_u32()?);
    }
    Ok(())
}

fn lock(r: &mut XdrReader<'_>, rec: &mut Record, wide: bool) -> Result<(), XdrError> {
    rec.insert("caller", r.read_string(layout::LM_MAXSTRLEN)?);
    rec.insert("fh", r.read_opaque(layout::MAXNETOBJ_SZ)?);
    rec.insert("oh", r.read_opaque(layout::MAXNETOBJ_SZ)?);
    rec.insert("svid", r.read_u32()?);
    offset_length(r, rec, wide)
}

fn res(r: &mut XdrReader<'_>, rec: &mut Record) -> Result<(), XdrError> {
    cookie(r, rec)?;
    rec.insert("stat", r.read_enum("nlm_stats", layout::STATS)?);
    Ok(())
}

fn testres(r: &mut XdrReader<'_>, rec: &mut Record, wide: bool) -> Result<(), XdrError> {
    cookie(r, rec)?;
    let config = r.config();
    let stat = r.read_u32()?;
    rec.insert("stat", config.enum_value("nlm_stats", layout::STATS, stat)?);
    if stat == layout::NLM_DENIED {
        let mut holder = Record::new();
        holder.insert("exclusive", r.read_bool()?);
        holder.insert("svid", r.read_u32()?);
        holder.insert("oh", r.read_opaque(layout::MAXNETOBJ_SZ)?);
        offset_length(r, &mut holder, wide)?;
        rec.insert("holder", holder);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_call, parse_reply};
    use crate::config::DecoderConfig;
    use crate::packet::Value;
    use crate::protocols::nlm::layout;

    fn opaque(bytes: &[u8]) -> Vec<u8> {
        let mut out = (bytes.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(bytes);
        out.resize(4 + bytes.len().div_ceil(4) * 4, 0);
        out
    }

    fn lock_args(wide: bool) -> Vec<u8> {
        let mut args = opaque(&[1]);
        args.extend(1u32.to_be_bytes()); // block
        args.extend(1u32.to_be_bytes()); // exclusive
        args.extend(opaque(b"client"));
        args.extend(opaque(&[0xaa, 0xbb]));
        args.extend(opaque(b"owner"));
        args.extend(42u32.to_be_bytes());
        if wide {
            args.extend(10u64.to_be_bytes());
            args.extend(20u64.to_be_bytes());
        } else {
            args.extend(10u32.to_be_bytes());
            args.extend(20u32.to_be_bytes());
        }
        args.extend(0u32.to_be_bytes()); // reclaim
        args.extend(3u32.to_be_bytes()); // state
        args
    }

    #[test]
    fn lock_call_flattens_lock_fields() {
        for (version, wide) in [(4, true), (1, false)] {
            let rec = parse_call(
                version,
                layout::NLM_LOCK,
                &lock_args(wide),
                DecoderConfig::default(),
            )
            .unwrap();
            assert_eq!(rec.get("fh"), Some(&Value::Bytes(vec![0xaa, 0xbb])));
            assert_eq!(rec.get("caller"), Some(&Value::Text("client".into())));
            assert_eq!(rec.get("svid"), Some(&Value::Int(42)));
            assert_eq!(rec.get("length"), Some(&Value::Int(20)));
            assert_eq!(rec.get("state"), Some(&Value::Int(3)));
        }
    }

    #[test]
    fn denied_test_reply_reports_holder() {
        let mut res = opaque(&[1]);
        res.extend(1u32.to_be_bytes());
        res.extend(0u32.to_be_bytes());
        res.extend(7u32.to_be_bytes());
        res.extend(opaque(b"o"));
        res.extend(0u64.to_be_bytes());
        res.extend(5u64.to_be_bytes());
        let rec = parse_reply(4, layout::NLM_TEST, &res, DecoderConfig::default()).unwrap();
        assert_eq!(rec.get("stat").unwrap().to_string(), "NLM4_DENIED");
        let holder = rec.get("holder").and_then(Value::as_record).unwrap();
        assert_eq!(holder.get("svid"), Some(&Value::Int(7)));
    }

    #[test]
    fn async_reply_has_no_body() {
        let rec = parse_reply(4, layout::NLM_LOCK_MSG, &[], DecoderConfig::default()).unwrap();
        assert_eq!(rec.len(), 1);
    }
}
