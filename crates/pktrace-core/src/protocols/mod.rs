//! Protocol decoding modules.
//!
//! Each protocol follows a layered structure:
//! - `layout`: wire constants and enumeration tables (source of truth)
//! - `parser`: domain-level decoding into packet layer records
//!
//! Byte access goes through `xdr::XdrReader`. Parsers are pure and contain
//! no I/O; the decoder selects them from the RPC program and version.
//! `rpcordma` sits below RPC and is selected by transport port.

pub mod nfs3;
pub mod nfs4;
pub mod nlm;
pub mod rpc;
pub mod rpcordma;
pub mod xdr;

use xdr::EnumTable;

const CONSTANT_TABLES: &[EnumTable] = &[
    rpc::layout::MSG_TYPE,
    rpc::layout::REPLY_STAT,
    rpc::layout::ACCEPT_STAT,
    rpc::layout::REJECT_STAT,
    rpc::layout::AUTH_FLAVOR,
    rpc::layout::AUTH_STAT,
    nfs3::layout::PROCEDURES,
    nfs3::layout::STATUS,
    nfs3::layout::FTYPE,
    nfs3::layout::STABLE_HOW,
    nfs3::layout::CREATE_MODE,
    nfs4::layout::OPERATIONS,
    nfs4::layout::STATUS,
    nfs4::layout::FTYPE,
    nfs4::layout::OPEN_TYPE,
    nfs4::layout::CREATE_MODE,
    nfs4::layout::CLAIM_TYPE,
    nfs4::layout::DELEGATION_TYPE,
    nfs4::layout::WHY_NO_DELEGATION,
    nfs4::layout::LOCK_TYPE,
    nfs4::layout::STABLE_HOW,
    nfs4::layout::LAYOUT_TYPE,
    nfs4::layout::IOMODE,
    nfs4::layout::LAYOUTRETURN_TYPE,
    nlm::layout::PROCEDURES,
    nlm::layout::STATS,
    rpcordma::layout::PROCEDURES,
    rpcordma::layout::ERRCODES,
];

/// Resolve a symbolic protocol constant such as `OP_OPEN`, `NFS4_OK` or
/// `NFSPROC3_CREATE` to its numeric value.
pub fn constant(name: &str) -> Option<u64> {
    match name {
        "NFS_PROGRAM" => return Some(u64::from(nfs3::layout::PROGRAM)),
        "NLM_PROGRAM" => return Some(u64::from(nlm::layout::PROGRAM)),
        _ => {}
    }
    CONSTANT_TABLES
        .iter()
        .flat_map(|table| table.iter())
        .find(|(_, known)| *known == name)
        .map(|(value, _)| u64::from(*value))
}

#[cfg(test)]
mod tests {
    use super::constant;

    #[test]
    fn resolves_constants_across_protocols() {
        assert_eq!(constant("OP_OPEN"), Some(18));
        assert_eq!(constant("OP_TEST_STATEID"), Some(55));
        assert_eq!(constant("NFS4ERR_DENIED"), Some(10010));
        assert_eq!(constant("NFSPROC3_CREATE"), Some(8));
        assert_eq!(constant("NLM4_GRANTED"), Some(0));
        assert_eq!(constant("REPLY"), Some(1));
        assert_eq!(constant("RDMA_NOMSG"), Some(1));
        assert_eq!(constant("NOT_A_CONSTANT"), None);
    }
}
