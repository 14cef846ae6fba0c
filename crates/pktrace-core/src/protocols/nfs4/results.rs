//! COMPOUND operation results.

use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;
use super::types::{
    bitmap4, change_info4, component4, fattr4, lock4denied, nfs_fh4, nfsace4, secinfo4,
    sessionid4, stateid4, verifier4,
};

/// Decode the result body of `op` (after its status) into `item`.
///
/// Returns `false` when the body is not decoded; the caller then stores the
/// remaining bytes as `unparsed` and stops walking the array.
pub(super) fn parse_result(
    op: u32,
    status: u32,
    r: &mut XdrReader<'_>,
    item: &mut Record,
) -> Result<bool, XdrError> {
    let ok = status == layout::NFS4_OK;
    match op {
        layout::OP_ACCESS if ok => {
            item.insert("supported", r.read_u32()?);
            item.insert("access", r.read_u32()?);
        }
        layout::OP_CLOSE
        | layout::OP_LOCKU
        | layout::OP_OPEN_CONFIRM
        | layout::OP_OPEN_DOWNGRADE
            if ok =>
        {
            item.insert("stateid", stateid4(r)?);
        }
        layout::OP_COMMIT if ok => {
            item.insert("verifier", verifier4(r)?);
        }
        layout::OP_CREATE if ok => {
            item.insert("cinfo", change_info4(r)?);
            item.insert("attrset", bitmap4(r)?);
        }
        layout::OP_GETATTR if ok => {
            item.insert("attributes", fattr4(r)?);
        }
        layout::OP_GETFH if ok => {
            item.insert("fh", nfs_fh4(r)?);
        }
        layout::OP_LINK | layout::OP_REMOVE if ok => {
            item.insert("cinfo", change_info4(r)?);
        }
        layout::OP_LOCK if ok => {
            item.insert("stateid", stateid4(r)?);
        }
        layout::OP_LOCK | layout::OP_LOCKT if status == layout::NFS4ERR_DENIED => {
            item.insert("denied", lock4denied(r)?);
        }
        layout::OP_OPEN if ok => open_result(r, item)?,
        layout::OP_READ if ok => {
            item.insert("eof", r.read_bool()?);
            item.insert("count", r.skip_opaque()? as u64);
        }
        layout::OP_READDIR if ok => {
            item.insert("cookieverf", verifier4(r)?);
            let mut entries = Vec::new();
            while r.read_bool()? {
                if entries.len() >= layout::MAX_LIST {
                    return Err(XdrError::LengthTooLarge {
                        length: entries.len() + 1,
                        max: layout::MAX_LIST,
                    });
                }
                let mut entry = Record::new();
                entry.insert("cookie", r.read_u64()?);
                entry.insert("name", component4(r)?);
                entry.insert("attributes", fattr4(r)?);
                entries.push(Value::Record(entry));
            }
            item.insert("entries", Value::List(entries));
            item.insert("eof", r.read_bool()?);
        }
        layout::OP_READLINK if ok => {
            item.insert("linkdata", r.read_string(layout::MAX_OPAQUE)?);
        }
        layout::OP_RENAME if ok => {
            item.insert("source_cinfo", change_info4(r)?);
            item.insert("target_cinfo", change_info4(r)?);
        }
        layout::OP_SECINFO | layout::OP_SECINFO_NO_NAME if ok => {
            item.insert("flavors", secinfo4(r)?);
        }
        layout::OP_SETATTR => {
            item.insert("attrset", bitmap4(r)?);
        }
        layout::OP_SETCLIENTID if ok => {
            item.insert("clientid", r.read_u64()?);
            item.insert("verifier", verifier4(r)?);
        }
        layout::OP_SETCLIENTID if status == layout::NFS4ERR_CLID_INUSE => {
            item.insert("r_netid", r.read_string(layout::MAX_OPAQUE)?);
            item.insert("r_addr", r.read_string(layout::MAX_OPAQUE)?);
        }
        layout::OP_WRITE if ok => {
            item.insert("count", r.read_u32()?);
            item.insert("committed", r.read_enum("stable_how4", layout::STABLE_HOW)?);
            item.insert("verifier", verifier4(r)?);
        }
        layout::OP_LAYOUTCOMMIT if ok => {
            if r.read_bool()? {
                item.insert("newsize", r.read_u64()?);
            }
        }
        layout::OP_LAYOUTGET if ok => {
            item.insert("return_on_close", r.read_bool()?);
            item.insert("stateid", stateid4(r)?);
            let layouts = r.read_array(layout::MAX_LIST, |r| {
                let mut segment = Record::new();
                segment.insert("offset", r.read_u64()?);
                segment.insert("length", r.read_u64()?);
                segment.insert("iomode", r.read_enum("layoutiomode4", layout::IOMODE)?);
                segment.insert("layout_type", r.read_enum("layouttype4", layout::LAYOUT_TYPE)?);
                segment.insert("body", r.read_opaque(layout::MAX_ATTR_BYTES)?);
                Ok(Value::Record(segment))
            })?;
            item.insert("layouts", Value::List(layouts));
        }
        layout::OP_LAYOUTGET if status == layout::NFS4ERR_LAYOUTTRYLATER => {
            item.insert("will_signal", r.read_bool()?);
        }
        layout::OP_LAYOUTRETURN if ok => {
            if r.read_bool()? {
                item.insert("stateid", stateid4(r)?);
            }
        }
        layout::OP_SEQUENCE if ok => {
            item.insert("sessionid", sessionid4(r)?);
            item.insert("sequenceid", r.read_u32()?);
            item.insert("slotid", r.read_u32()?);
            item.insert("highest_slotid", r.read_u32()?);
            item.insert("target_highest_slotid", r.read_u32()?);
            item.insert("status_flags", r.read_u32()?);
        }
        layout::OP_TEST_STATEID if ok => {
            let codes = r.read_array(layout::MAX_LIST, |r| r.read_enum("nfsstat4", layout::STATUS))?;
            item.insert("status_codes", Value::List(codes));
        }
        layout::OP_SEEK if ok => {
            item.insert("eof", r.read_bool()?);
            item.insert("offset", r.read_u64()?);
        }
        // Bodies that are not decoded in detail.
        layout::OP_EXCHANGE_ID
        | layout::OP_CREATE_SESSION
        | layout::OP_BIND_CONN_TO_SESSION
        | layout::OP_GETDEVICEINFO
        | layout::OP_GETDEVICELIST
        | layout::OP_GET_DIR_DELEGATION
        | layout::OP_WANT_DELEGATION
        | layout::OP_SET_SSV
        | layout::OP_READ_PLUS
        | layout::OP_COPY
        | layout::OP_COPY_NOTIFY
        | layout::OP_OFFLOAD_STATUS
        | layout::OP_WRITE_SAME
            if ok =>
        {
            return Ok(false);
        }
        _ if layout::OPERATIONS.iter().any(|(known, _)| *known == op) => {}
        _ => return Ok(false),
    }
    Ok(true)
}

fn open_result(r: &mut XdrReader<'_>, item: &mut Record) -> Result<(), XdrError> {
    item.insert("stateid", stateid4(r)?);
    item.insert("cinfo", change_info4(r)?);
    item.insert("rflags", r.read_u32()?);
    item.insert("attrset", bitmap4(r)?);
    item.insert("delegation", open_delegation4(r)?);
    Ok(())
}

fn open_delegation4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let config = r.config();
    let mut deleg = Record::new();
    let dtype = r.read_u32()?;
    deleg.insert(
        "type",
        config.enum_value("open_delegation_type4", layout::DELEGATION_TYPE, dtype)?,
    );
    match dtype {
        layout::OPEN_DELEGATE_READ => {
            deleg.insert("stateid", stateid4(r)?);
            deleg.insert("recall", r.read_bool()?);
            deleg.insert("permissions", nfsace4(r)?);
        }
        layout::OPEN_DELEGATE_WRITE => {
            deleg.insert("stateid", stateid4(r)?);
            deleg.insert("recall", r.read_bool()?);
            let limitby = r.read_u32()?;
            let mut limit = Record::new();
            limit.insert("limitby", limitby);
            if limitby == layout::NFS_LIMIT_SIZE {
                limit.insert("filesize", r.read_u64()?);
            } else {
                limit.insert("num_blocks", r.read_u32()?);
                limit.insert("bytes_per_block", r.read_u32()?);
            }
            deleg.insert("space_limit", limit);
            deleg.insert("permissions", nfsace4(r)?);
        }
        layout::OPEN_DELEGATE_NONE_EXT => {
            let why = r.read_u32()?;
            deleg.insert(
                "why",
                config.enum_value("why_no_delegation4", layout::WHY_NO_DELEGATION, why)?,
            );
            match why {
                layout::WND4_CONTENTION => {
                    deleg.insert("server_will_push_deleg", r.read_bool()?);
                }
                layout::WND4_RESOURCE => {
                    deleg.insert("server_will_signal_avail", r.read_bool()?);
                }
                _ => {}
            }
        }
        _ => {}
    }
    Ok(deleg)
}
