//! COMPOUND operation arguments.

use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;
use super::types::{
    bitmap4, component4, fattr4, nfs_fh4, nfstime4, sessionid4, state_owner4, stateid4,
    verifier4,
};

/// Decode the arguments of `op` into `item`.
///
/// Returns `false` when the operation is not decoded; the caller then
/// stores the remaining bytes as `unparsed` and stops walking the array.
pub(super) fn parse_args(
    op: u32,
    r: &mut XdrReader<'_>,
    item: &mut Record,
) -> Result<bool, XdrError> {
    match op {
        layout::OP_GETFH
        | layout::OP_LOOKUPP
        | layout::OP_PUTPUBFH
        | layout::OP_PUTROOTFH
        | layout::OP_READLINK
        | layout::OP_RESTOREFH
        | layout::OP_SAVEFH
        | layout::OP_ILLEGAL => {}
        layout::OP_DESTROY_SESSION => {
            item.insert("sessionid", sessionid4(r)?);
        }
        layout::OP_ACCESS => {
            item.insert("access", r.read_u32()?);
        }
        layout::OP_CLOSE => {
            item.insert("seqid", r.read_u32()?);
            item.insert("stateid", stateid4(r)?);
        }
        layout::OP_COMMIT => {
            item.insert("offset", r.read_u64()?);
            item.insert("count", r.read_u32()?);
        }
        layout::OP_CREATE => {
            let config = r.config();
            let objtype = r.read_u32()?;
            item.insert("type", config.enum_value("nfs_ftype4", layout::FTYPE, objtype)?);
            match objtype {
                layout::NF4LNK => {
                    item.insert("linkdata", r.read_string(layout::MAX_OPAQUE)?);
                }
                layout::NF4BLK | layout::NF4CHR => {
                    item.insert("major", r.read_u32()?);
                    item.insert("minor", r.read_u32()?);
                }
                _ => {}
            }
            item.insert("name", component4(r)?);
            item.insert("attributes", fattr4(r)?);
        }
        layout::OP_DELEGPURGE | layout::OP_RENEW | layout::OP_DESTROY_CLIENTID => {
            item.insert("clientid", r.read_u64()?);
        }
        layout::OP_DELEGRETURN | layout::OP_FREE_STATEID => {
            item.insert("stateid", stateid4(r)?);
        }
        layout::OP_GETATTR => {
            item.insert("request", bitmap4(r)?);
        }
        layout::OP_LINK => {
            item.insert("newname", component4(r)?);
        }
        layout::OP_LOCK => {
            item.insert("locktype", r.read_enum("nfs_lock_type4", layout::LOCK_TYPE)?);
            item.insert("reclaim", r.read_bool()?);
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
            let new_lock_owner = r.read_bool()?;
            item.insert("new_lock_owner", new_lock_owner);
            if new_lock_owner {
                item.insert("open_seqid", r.read_u32()?);
                item.insert("stateid", stateid4(r)?);
                item.insert("lock_seqid", r.read_u32()?);
                item.insert("lock_owner", state_owner4(r)?);
            } else {
                item.insert("stateid", stateid4(r)?);
                item.insert("lock_seqid", r.read_u32()?);
            }
        }
        layout::OP_LOCKT => {
            item.insert("locktype", r.read_enum("nfs_lock_type4", layout::LOCK_TYPE)?);
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
            item.insert("owner", state_owner4(r)?);
        }
        layout::OP_LOCKU => {
            item.insert("locktype", r.read_enum("nfs_lock_type4", layout::LOCK_TYPE)?);
            item.insert("seqid", r.read_u32()?);
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
        }
        layout::OP_LOOKUP | layout::OP_REMOVE | layout::OP_SECINFO => {
            item.insert("name", component4(r)?);
        }
        layout::OP_NVERIFY | layout::OP_VERIFY => {
            item.insert("attributes", fattr4(r)?);
        }
        layout::OP_OPEN => open_args(r, item)?,
        layout::OP_OPENATTR => {
            item.insert("createdir", r.read_bool()?);
        }
        layout::OP_OPEN_CONFIRM => {
            item.insert("stateid", stateid4(r)?);
            item.insert("seqid", r.read_u32()?);
        }
        layout::OP_OPEN_DOWNGRADE => {
            item.insert("stateid", stateid4(r)?);
            item.insert("seqid", r.read_u32()?);
            item.insert("share_access", r.read_u32()?);
            item.insert("share_deny", r.read_u32()?);
        }
        layout::OP_PUTFH => {
            item.insert("fh", nfs_fh4(r)?);
        }
        layout::OP_READ => {
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("count", r.read_u32()?);
        }
        layout::OP_READDIR => {
            item.insert("cookie", r.read_u64()?);
            item.insert("cookieverf", verifier4(r)?);
            item.insert("dircount", r.read_u32()?);
            item.insert("maxcount", r.read_u32()?);
            item.insert("request", bitmap4(r)?);
        }
        layout::OP_RENAME => {
            item.insert("name", component4(r)?);
            item.insert("newname", component4(r)?);
        }
        layout::OP_SETATTR => {
            item.insert("stateid", stateid4(r)?);
            item.insert("attributes", fattr4(r)?);
        }
        layout::OP_SETCLIENTID => {
            item.insert("verifier", verifier4(r)?);
            item.insert("id", r.read_opaque(layout::MAX_OPAQUE)?);
            item.insert("cb_program", r.read_u32()?);
            item.insert("r_netid", r.read_string(layout::MAX_OPAQUE)?);
            item.insert("r_addr", r.read_string(layout::MAX_OPAQUE)?);
            item.insert("callback_ident", r.read_u32()?);
        }
        layout::OP_SETCLIENTID_CONFIRM => {
            item.insert("clientid", r.read_u64()?);
            item.insert("verifier", verifier4(r)?);
        }
        layout::OP_WRITE => {
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("stable", r.read_enum("stable_how4", layout::STABLE_HOW)?);
            item.insert("count", r.skip_opaque()? as u64);
        }
        layout::OP_RELEASE_LOCKOWNER => {
            item.insert("lock_owner", state_owner4(r)?);
        }
        layout::OP_LAYOUTCOMMIT => {
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
            item.insert("reclaim", r.read_bool()?);
            item.insert("stateid", stateid4(r)?);
            if r.read_bool()? {
                item.insert("last_write_offset", r.read_u64()?);
            }
            if r.read_bool()? {
                item.insert("time_modify", nfstime4(r)?);
            }
            item.insert("layout_type", r.read_enum("layouttype4", layout::LAYOUT_TYPE)?);
            item.insert("layoutupdate", r.read_opaque(layout::MAX_ATTR_BYTES)?);
        }
        layout::OP_LAYOUTGET => {
            item.insert("signal_layout_avail", r.read_bool()?);
            item.insert("layout_type", r.read_enum("layouttype4", layout::LAYOUT_TYPE)?);
            item.insert("iomode", r.read_enum("layoutiomode4", layout::IOMODE)?);
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
            item.insert("minlength", r.read_u64()?);
            item.insert("stateid", stateid4(r)?);
            item.insert("maxcount", r.read_u32()?);
        }
        layout::OP_LAYOUTRETURN => {
            item.insert("reclaim", r.read_bool()?);
            item.insert("layout_type", r.read_enum("layouttype4", layout::LAYOUT_TYPE)?);
            item.insert("iomode", r.read_enum("layoutiomode4", layout::IOMODE)?);
            let config = r.config();
            let returntype = r.read_u32()?;
            item.insert(
                "returntype",
                config.enum_value("layoutreturn_type4", layout::LAYOUTRETURN_TYPE, returntype)?,
            );
            if returntype == layout::LAYOUTRETURN4_FILE {
                item.insert("offset", r.read_u64()?);
                item.insert("length", r.read_u64()?);
                item.insert("stateid", stateid4(r)?);
                item.insert("body", r.read_opaque(layout::MAX_ATTR_BYTES)?);
            }
        }
        layout::OP_SECINFO_NO_NAME => {
            item.insert("style", r.read_u32()?);
        }
        layout::OP_SEQUENCE => {
            item.insert("sessionid", sessionid4(r)?);
            item.insert("sequenceid", r.read_u32()?);
            item.insert("slotid", r.read_u32()?);
            item.insert("highest_slotid", r.read_u32()?);
            item.insert("cachethis", r.read_bool()?);
        }
        layout::OP_TEST_STATEID => {
            let stateids = r.read_array(layout::MAX_LIST, |r| stateid4(r).map(Value::Record))?;
            item.insert("stateids", Value::List(stateids));
        }
        layout::OP_RECLAIM_COMPLETE => {
            item.insert("one_fs", r.read_bool()?);
        }
        layout::OP_ALLOCATE | layout::OP_DEALLOCATE => {
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("length", r.read_u64()?);
        }
        layout::OP_SEEK => {
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("what", r.read_enum("data_content4", layout::DATA_CONTENT)?);
        }
        layout::OP_READ_PLUS => {
            item.insert("stateid", stateid4(r)?);
            item.insert("offset", r.read_u64()?);
            item.insert("count", r.read_u32()?);
        }
        layout::OP_CLONE => {
            item.insert("src_stateid", stateid4(r)?);
            item.insert("stateid", stateid4(r)?);
            item.insert("src_offset", r.read_u64()?);
            item.insert("dst_offset", r.read_u64()?);
            item.insert("count", r.read_u64()?);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn open_args(r: &mut XdrReader<'_>, item: &mut Record) -> Result<(), XdrError> {
    let config = r.config();
    item.insert("seqid", r.read_u32()?);
    item.insert("share_access", r.read_u32()?);
    item.insert("share_deny", r.read_u32()?);
    item.insert("owner", state_owner4(r)?);

    let opentype = r.read_u32()?;
    item.insert("opentype", config.enum_value("opentype4", layout::OPEN_TYPE, opentype)?);
    if opentype == layout::OPEN4_CREATE {
        let mode = r.read_u32()?;
        item.insert("createmode", config.enum_value("createmode4", layout::CREATE_MODE, mode)?);
        match mode {
            layout::EXCLUSIVE4 => {
                item.insert("verifier", verifier4(r)?);
            }
            layout::EXCLUSIVE4_1 => {
                item.insert("verifier", verifier4(r)?);
                item.insert("attributes", fattr4(r)?);
            }
            _ => {
                item.insert("attributes", fattr4(r)?);
            }
        }
    }

    let claim = r.read_u32()?;
    item.insert("claim", config.enum_value("open_claim_type4", layout::CLAIM_TYPE, claim)?);
    match claim {
        layout::CLAIM_NULL | layout::CLAIM_DELEGATE_PREV => {
            item.insert("name", component4(r)?);
        }
        layout::CLAIM_PREVIOUS => {
            item.insert(
                "delegate_type",
                r.read_enum("open_delegation_type4", layout::DELEGATION_TYPE)?,
            );
        }
        layout::CLAIM_DELEGATE_CUR => {
            item.insert("delegate_stateid", stateid4(r)?);
            item.insert("name", component4(r)?);
        }
        layout::CLAIM_DELEG_CUR_FH => {
            item.insert("delegate_stateid", stateid4(r)?);
        }
        _ => {}
    }
    Ok(())
}
