//! Shared NFSv4 XDR structures.

use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;

pub(super) fn stateid4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut stateid = Record::new();
    stateid.insert("seqid", r.read_u32()?);
    stateid.insert("other", r.read_fixed(layout::NFS4_OTHER_SIZE)?);
    Ok(stateid)
}

pub(super) fn nfs_fh4(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    Ok(Value::from(r.read_opaque(layout::NFS4_FHSIZE)?))
}

pub(super) fn component4(r: &mut XdrReader<'_>) -> Result<String, XdrError> {
    r.read_string(layout::MAX_NAME)
}

pub(super) fn verifier4(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    Ok(Value::from(r.read_fixed(layout::NFS4_VERIFIER_SIZE)?))
}

pub(super) fn sessionid4(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    Ok(Value::from(r.read_fixed(layout::NFS4_SESSIONID_SIZE)?))
}

pub(super) fn bitmap4(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    let words = r.read_array(layout::MAX_BITMAP_WORDS, |r| r.read_u32().map(Value::from))?;
    Ok(Value::List(words))
}

/// Attributes are kept as the request mask plus the raw value blob.
pub(super) fn fattr4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut attrs = Record::new();
    attrs.insert("mask", bitmap4(r)?);
    attrs.insert("values", r.read_opaque(layout::MAX_ATTR_BYTES)?);
    Ok(attrs)
}

pub(super) fn change_info4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut cinfo = Record::new();
    cinfo.insert("atomic", r.read_bool()?);
    cinfo.insert("before", r.read_u64()?);
    cinfo.insert("after", r.read_u64()?);
    Ok(cinfo)
}

pub(super) fn nfstime4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut time = Record::new();
    time.insert("seconds", r.read_u64()?);
    time.insert("nseconds", r.read_u32()?);
    Ok(time)
}

pub(super) fn state_owner4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut owner = Record::new();
    owner.insert("clientid", r.read_u64()?);
    owner.insert("owner", r.read_opaque(layout::MAX_OPAQUE)?);
    Ok(owner)
}

pub(super) fn nfsace4(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut ace = Record::new();
    ace.insert("type", r.read_u32()?);
    ace.insert("flag", r.read_u32()?);
    ace.insert("access_mask", r.read_u32()?);
    ace.insert("who", r.read_string(layout::MAX_OPAQUE)?);
    Ok(ace)
}

pub(super) fn lock4denied(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut denied = Record::new();
    denied.insert("offset", r.read_u64()?);
    denied.insert("length", r.read_u64()?);
    denied.insert("locktype", r.read_enum("nfs_lock_type4", layout::LOCK_TYPE)?);
    denied.insert("owner", state_owner4(r)?);
    Ok(denied)
}

pub(super) fn secinfo4(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    let flavors = r.read_array(layout::MAX_LIST, |r| {
        let mut info = Record::new();
        let flavor = r.read_u32()?;
        info.insert("flavor", flavor);
        if flavor == layout::RPCSEC_GSS {
            info.insert("oid", r.read_opaque(layout::MAX_OPAQUE)?);
            info.insert("qop", r.read_u32()?);
            info.insert("service", r.read_u32()?);
        }
        Ok(Value::Record(info))
    })?;
    Ok(Value::List(flavors))
}
