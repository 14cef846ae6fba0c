use crate::config::DecoderConfig;
use crate::packet::{Record, Value};
use crate::protocols::xdr::{XdrError, XdrReader};

use super::layout;

/// Decode NFSv3 call arguments into the `nfs` layer record.
pub fn parse_call(
    procedure: u32,
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("op", config.enum_value("nfs_proc3", layout::PROCEDURES, procedure)?);

    match procedure {
        layout::NFSPROC3_GETATTR
        | layout::NFSPROC3_READLINK
        | layout::NFSPROC3_FSSTAT
        | layout::NFSPROC3_FSINFO
        | layout::NFSPROC3_PATHCONF => {
            rec.insert("fh", read_fh(&mut r)?);
        }
        layout::NFSPROC3_SETATTR => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("attributes", sattr3(&mut r)?);
            if r.read_bool()? {
                rec.insert("guard", nfstime3(&mut r)?);
            }
        }
        layout::NFSPROC3_LOOKUP | layout::NFSPROC3_REMOVE | layout::NFSPROC3_RMDIR => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
        }
        layout::NFSPROC3_ACCESS => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("access", r.read_u32()?);
        }
        layout::NFSPROC3_READ | layout::NFSPROC3_COMMIT => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("offset", r.read_u64()?);
            rec.insert("count", r.read_u32()?);
        }
        layout::NFSPROC3_WRITE => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("offset", r.read_u64()?);
            rec.insert("count", r.read_u32()?);
            rec.insert("stable", r.read_enum("stable_how", layout::STABLE_HOW)?);
            r.skip_opaque()?;
        }
        layout::NFSPROC3_CREATE => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
            let mode = r.read_u32()?;
            rec.insert("mode", config.enum_value("createmode3", layout::CREATE_MODE, mode)?);
            if mode == layout::EXCLUSIVE {
                rec.insert("verifier", r.read_fixed(layout::NFS3_CREATEVERFSIZE)?);
            } else {
                rec.insert("attributes", sattr3(&mut r)?);
            }
        }
        layout::NFSPROC3_MKDIR => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
            rec.insert("attributes", sattr3(&mut r)?);
        }
        layout::NFSPROC3_SYMLINK => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
            rec.insert("attributes", sattr3(&mut r)?);
            rec.insert("linkdata", r.read_string(layout::MAX_PATH)?);
        }
        layout::NFSPROC3_MKNOD => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
            let ftype = r.read_u32()?;
            rec.insert("type", config.enum_value("ftype3", layout::FTYPE, ftype)?);
            match ftype {
                layout::NF3CHR | layout::NF3BLK => {
                    rec.insert("attributes", sattr3(&mut r)?);
                    rec.insert("rdev", specdata3(&mut r)?);
                }
                layout::NF3SOCK | layout::NF3FIFO => {
                    rec.insert("attributes", sattr3(&mut r)?);
                }
                _ => {}
            }
        }
        layout::NFSPROC3_RENAME => {
            diropargs(&mut r, &mut rec, "fh", "name")?;
            diropargs(&mut r, &mut rec, "newfh", "newname")?;
        }
        layout::NFSPROC3_LINK => {
            rec.insert("fh", read_fh(&mut r)?);
            diropargs(&mut r, &mut rec, "newfh", "newname")?;
        }
        layout::NFSPROC3_READDIR => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("cookie", r.read_u64()?);
            rec.insert("cookieverf", r.read_fixed(layout::NFS3_COOKIEVERFSIZE)?);
            rec.insert("count", r.read_u32()?);
        }
        layout::NFSPROC3_READDIRPLUS => {
            rec.insert("fh", read_fh(&mut r)?);
            rec.insert("cookie", r.read_u64()?);
            rec.insert("cookieverf", r.read_fixed(layout::NFS3_COOKIEVERFSIZE)?);
            rec.insert("dircount", r.read_u32()?);
            rec.insert("maxcount", r.read_u32()?);
        }
        _ => unparsed(&mut r, &mut rec),
    }
    Ok(rec)
}

/// Decode NFSv3 reply results into the `nfs` layer record.
pub fn parse_reply(
    procedure: u32,
    payload: &[u8],
    config: DecoderConfig,
) -> Result<Record, XdrError> {
    let mut r = XdrReader::new(payload, config);
    let mut rec = Record::new();
    rec.insert("op", config.enum_value("nfs_proc3", layout::PROCEDURES, procedure)?);
    if !layout::PROCEDURES.iter().any(|(known, _)| *known == procedure) {
        unparsed(&mut r, &mut rec);
        return Ok(rec);
    }

    let status = r.read_u32()?;
    rec.insert("status", config.enum_value("nfsstat3", layout::STATUS, status)?);
    let ok = status == layout::NFS3_OK;

    match procedure {
        layout::NFSPROC3_GETATTR => {
            if ok {
                rec.insert("attributes", fattr3(&mut r)?);
            }
        }
        layout::NFSPROC3_SETATTR | layout::NFSPROC3_REMOVE | layout::NFSPROC3_RMDIR => {
            insert_opt(&mut rec, "attributes", wcc_data(&mut r)?);
        }
        layout::NFSPROC3_LOOKUP => {
            if ok {
                rec.insert("fh", read_fh(&mut r)?);
                insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            }
            insert_opt(&mut rec, "dir_attributes", post_op_attr(&mut r)?);
        }
        layout::NFSPROC3_ACCESS => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                rec.insert("access", r.read_u32()?);
            }
        }
        layout::NFSPROC3_READLINK => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                rec.insert("linkdata", r.read_string(layout::MAX_PATH)?);
            }
        }
        layout::NFSPROC3_READ => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                rec.insert("count", r.read_u32()?);
                rec.insert("eof", r.read_bool()?);
                r.skip_opaque()?;
            }
        }
        layout::NFSPROC3_WRITE => {
            insert_opt(&mut rec, "attributes", wcc_data(&mut r)?);
            if ok {
                rec.insert("count", r.read_u32()?);
                rec.insert("committed", r.read_enum("stable_how", layout::STABLE_HOW)?);
                rec.insert("verifier", r.read_fixed(layout::NFS3_WRITEVERFSIZE)?);
            }
        }
        layout::NFSPROC3_CREATE
        | layout::NFSPROC3_MKDIR
        | layout::NFSPROC3_SYMLINK
        | layout::NFSPROC3_MKNOD => {
            if ok {
                if r.read_bool()? {
                    rec.insert("fh", read_fh(&mut r)?);
                }
                insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            }
            insert_opt(&mut rec, "dir_attributes", wcc_data(&mut r)?);
        }
        layout::NFSPROC3_RENAME => {
            insert_opt(&mut rec, "dir_attributes", wcc_data(&mut r)?);
            insert_opt(&mut rec, "newdir_attributes", wcc_data(&mut r)?);
        }
        layout::NFSPROC3_LINK => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            insert_opt(&mut rec, "dir_attributes", wcc_data(&mut r)?);
        }
        layout::NFSPROC3_READDIR | layout::NFSPROC3_READDIRPLUS => {
            insert_opt(&mut rec, "dir_attributes", post_op_attr(&mut r)?);
            if ok {
                let plus = procedure == layout::NFSPROC3_READDIRPLUS;
                rec.insert("cookieverf", r.read_fixed(layout::NFS3_COOKIEVERFSIZE)?);
                rec.insert("entries", Value::List(dir_entries(&mut r, plus)?));
                rec.insert("eof", r.read_bool()?);
            }
        }
        layout::NFSPROC3_FSSTAT => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                for name in ["tbytes", "fbytes", "abytes", "tfiles", "ffiles", "afiles"] {
                    rec.insert(name, r.read_u64()?);
                }
                rec.insert("invarsec", r.read_u32()?);
            }
        }
        layout::NFSPROC3_FSINFO => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                for name in ["rtmax", "rtpref", "rtmult", "wtmax", "wtpref", "wtmult", "dtpref"] {
                    rec.insert(name, r.read_u32()?);
                }
                rec.insert("maxfilesize", r.read_u64()?);
                rec.insert("time_delta", nfstime3(&mut r)?);
                rec.insert("properties", r.read_u32()?);
            }
        }
        layout::NFSPROC3_PATHCONF => {
            insert_opt(&mut rec, "attributes", post_op_attr(&mut r)?);
            if ok {
                rec.insert("linkmax", r.read_u32()?);
                rec.insert("name_max", r.read_u32()?);
                for name in [
                    "no_trunc",
                    "chown_restricted",
                    "case_insensitive",
                    "case_preserving",
                ] {
                    rec.insert(name, r.read_bool()?);
                }
            }
        }
        layout::NFSPROC3_COMMIT => {
            insert_opt(&mut rec, "attributes", wcc_data(&mut r)?);
            if ok {
                rec.insert("verifier", r.read_fixed(layout::NFS3_WRITEVERFSIZE)?);
            }
        }
        _ => {}
    }
    Ok(rec)
}

fn unparsed(r: &mut XdrReader<'_>, rec: &mut Record) {
    rec.insert("unparsed", r.rest());
}

fn insert_opt(rec: &mut Record, name: &'static str, value: Option<Record>) {
    if let Some(value) = value {
        rec.insert(name, value);
    }
}

fn read_fh(r: &mut XdrReader<'_>) -> Result<Value, XdrError> {
    Ok(Value::from(r.read_opaque(layout::NFS3_FHSIZE)?))
}

fn diropargs(
    r: &mut XdrReader<'_>,
    rec: &mut Record,
    fh: &'static str,
    name: &'static str,
) -> Result<(), XdrError> {
    rec.insert(fh, read_fh(r)?);
    rec.insert(name, r.read_string(layout::MAX_NAME)?);
    Ok(())
}

fn nfstime3(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut time = Record::new();
    time.insert("seconds", r.read_u32()?);
    time.insert("nseconds", r.read_u32()?);
    Ok(time)
}

fn specdata3(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut spec = Record::new();
    spec.insert("major", r.read_u32()?);
    spec.insert("minor", r.read_u32()?);
    Ok(spec)
}

fn fattr3(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut attr = Record::new();
    attr.insert("type", r.read_enum("ftype3", layout::FTYPE)?);
    attr.insert("mode", r.read_u32()?);
    attr.insert("nlink", r.read_u32()?);
    attr.insert("uid", r.read_u32()?);
    attr.insert("gid", r.read_u32()?);
    attr.insert("size", r.read_u64()?);
    attr.insert("used", r.read_u64()?);
    attr.insert("rdev", specdata3(r)?);
    attr.insert("fsid", r.read_u64()?);
    attr.insert("fileid", r.read_u64()?);
    attr.insert("atime", nfstime3(r)?);
    attr.insert("mtime", nfstime3(r)?);
    attr.insert("ctime", nfstime3(r)?);
    Ok(attr)
}

fn post_op_attr(r: &mut XdrReader<'_>) -> Result<Option<Record>, XdrError> {
    r.read_optional(fattr3)
}

/// `wcc_data`: the pre-operation attributes are consumed, the
/// post-operation attributes are returned.
fn wcc_data(r: &mut XdrReader<'_>) -> Result<Option<Record>, XdrError> {
    if r.read_bool()? {
        r.read_u64()?;
        nfstime3(r)?;
        nfstime3(r)?;
    }
    post_op_attr(r)
}

fn sattr3(r: &mut XdrReader<'_>) -> Result<Record, XdrError> {
    let mut attr = Record::new();
    for name in ["mode", "uid", "gid"] {
        if r.read_bool()? {
            attr.insert(name, r.read_u32()?);
        }
    }
    if r.read_bool()? {
        attr.insert("size", r.read_u64()?);
    }
    for name in ["atime", "mtime"] {
        let how = r.read_u32()?;
        if how == layout::SET_TO_CLIENT_TIME {
            attr.insert(name, nfstime3(r)?);
        } else {
            let config = r.config();
            attr.insert(name, config.enum_value("time_how", layout::TIME_HOW, how)?);
        }
    }
    Ok(attr)
}

fn dir_entries(r: &mut XdrReader<'_>, plus: bool) -> Result<Vec<Value>, XdrError> {
    let mut entries = Vec::new();
    while r.read_bool()? {
        if entries.len() >= layout::MAX_DIR_ENTRIES {
            return Err(XdrError::LengthTooLarge {
                length: entries.len() + 1,
                max: layout::MAX_DIR_ENTRIES,
            });
        }
        let mut entry = Record::new();
        entry.insert("fileid", r.read_u64()?);
        entry.insert("name", r.read_string(layout::MAX_NAME)?);
        entry.insert("cookie", r.read_u64()?);
        if plus {
            insert_opt(&mut entry, "attributes", post_op_attr(r)?);
            if r.read_bool()? {
                entry.insert("fh", read_fh(r)?);
            }
        }
        entries.push(Value::Record(entry));
    }
    Ok(entries)
}
