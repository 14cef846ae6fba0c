//! NLM constants (Open Group XNFS, NLM versions 1-4).

use crate::protocols::xdr::EnumTable;

pub const PROGRAM: u32 = 100021;
pub const MIN_VERSION: u32 = 1;
pub const MAX_VERSION: u32 = 4;
/// Version 4 widens offsets and lengths to 64 bits.
pub const VERSION_64BIT: u32 = 4;

pub const LM_MAXSTRLEN: usize = 1024;
pub const MAXNETOBJ_SZ: usize = 1024;

pub const NLM_NULL: u32 = 0;
pub const NLM_TEST: u32 = 1;
pub const NLM_LOCK: u32 = 2;
pub const NLM_CANCEL: u32 = 3;
pub const NLM_UNLOCK: u32 = 4;
pub const NLM_GRANTED: u32 = 5;
pub const NLM_TEST_MSG: u32 = 6;
pub const NLM_LOCK_MSG: u32 = 7;
pub const NLM_CANCEL_MSG: u32 = 8;
pub const NLM_UNLOCK_MSG: u32 = 9;
pub const NLM_GRANTED_MSG: u32 = 10;
pub const NLM_TEST_RES: u32 = 11;
pub const NLM_LOCK_RES: u32 = 12;
pub const NLM_CANCEL_RES: u32 = 13;
pub const NLM_UNLOCK_RES: u32 = 14;
pub const NLM_GRANTED_RES: u32 = 15;
pub const NLM_SHARE: u32 = 20;
pub const NLM_UNSHARE: u32 = 21;
pub const NLM_NM_LOCK: u32 = 22;
pub const NLM_FREE_ALL: u32 = 23;

pub const PROCEDURES: EnumTable = &[
    (NLM_NULL, "NLMPROC4_NULL"),
    (NLM_TEST, "NLMPROC4_TEST"),
    (NLM_LOCK, "NLMPROC4_LOCK"),
    (NLM_CANCEL, "NLMPROC4_CANCEL"),
    (NLM_UNLOCK, "NLMPROC4_UNLOCK"),
    (NLM_GRANTED, "NLMPROC4_GRANTED"),
    (NLM_TEST_MSG, "NLMPROC4_TEST_MSG"),
    (NLM_LOCK_MSG, "NLMPROC4_LOCK_MSG"),
    (NLM_CANCEL_MSG, "NLMPROC4_CANCEL_MSG"),
    (NLM_UNLOCK_MSG, "NLMPROC4_UNLOCK_MSG"),
    (NLM_GRANTED_MSG, "NLMPROC4_GRANTED_MSG"),
    (NLM_TEST_RES, "NLMPROC4_TEST_RES"),
    (NLM_LOCK_RES, "NLMPROC4_LOCK_RES"),
    (NLM_CANCEL_RES, "NLMPROC4_CANCEL_RES"),
    (NLM_UNLOCK_RES, "NLMPROC4_UNLOCK_RES"),
    (NLM_GRANTED_RES, "NLMPROC4_GRANTED_RES"),
    (NLM_SHARE, "NLMPROC4_SHARE"),
    (NLM_UNSHARE, "NLMPROC4_UNSHARE"),
    (NLM_NM_LOCK, "NLMPROC4_NM_LOCK"),
    (NLM_FREE_ALL, "NLMPROC4_FREE_ALL"),
];

pub const NLM_DENIED: u32 = 1;

pub const STATS: EnumTable = &[
    (0, "NLM4_GRANTED"),
    (NLM_DENIED, "NLM4_DENIED"),
    (2, "NLM4_DENIED_NOLOCKS"),
    (3, "NLM4_BLOCKED"),
    (4, "NLM4_DENIED_GRACE_PERIOD"),
    (5, "NLM4_DEADLCK"),
    (6, "NLM4_ROFS"),
    (7, "NLM4_STALE_FH"),
    (8, "NLM4_FBIG"),
    (9, "NLM4_FAILED"),
];
