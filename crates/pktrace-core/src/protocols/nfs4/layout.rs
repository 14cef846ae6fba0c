//! NFSv4.x constants (RFC 7530, RFC 8881, RFC 7862).

use crate::protocols::xdr::EnumTable;

pub const PROGRAM: u32 = 100003;
pub const VERSION: u32 = 4;

pub const NFSPROC4_NULL: u32 = 0;
pub const NFSPROC4_COMPOUND: u32 = 1;

pub const NFS4_FHSIZE: usize = 128;
pub const NFS4_VERIFIER_SIZE: usize = 8;
pub const NFS4_OTHER_SIZE: usize = 12;
pub const NFS4_SESSIONID_SIZE: usize = 16;
pub const MAX_TAG: usize = 1024;
pub const MAX_NAME: usize = 1024;
pub const MAX_OPAQUE: usize = 1024;
pub const MAX_OPS: usize = 1024;
pub const MAX_BITMAP_WORDS: usize = 8;
pub const MAX_ATTR_BYTES: usize = 65_536;
pub const MAX_LIST: usize = 4096;

pub const NFS4_OK: u32 = 0;
pub const NFS4ERR_DENIED: u32 = 10010;
pub const NFS4ERR_CLID_INUSE: u32 = 10017;
pub const NFS4ERR_LAYOUTTRYLATER: u32 = 10058;

pub const OP_ACCESS: u32 = 3;
pub const OP_CLOSE: u32 = 4;
pub const OP_COMMIT: u32 = 5;
pub const OP_CREATE: u32 = 6;
pub const OP_DELEGPURGE: u32 = 7;
pub const OP_DELEGRETURN: u32 = 8;
pub const OP_GETATTR: u32 = 9;
pub const OP_GETFH: u32 = 10;
pub const OP_LINK: u32 = 11;
pub const OP_LOCK: u32 = 12;
pub const OP_LOCKT: u32 = 13;
pub const OP_LOCKU: u32 = 14;
pub const OP_LOOKUP: u32 = 15;
pub const OP_LOOKUPP: u32 = 16;
pub const OP_NVERIFY: u32 = 17;
pub const OP_OPEN: u32 = 18;
pub const OP_OPENATTR: u32 = 19;
pub const OP_OPEN_CONFIRM: u32 = 20;
pub const OP_OPEN_DOWNGRADE: u32 = 21;
pub const OP_PUTFH: u32 = 22;
pub const OP_PUTPUBFH: u32 = 23;
pub const OP_PUTROOTFH: u32 = 24;
pub const OP_READ: u32 = 25;
pub const OP_READDIR: u32 = 26;
pub const OP_READLINK: u32 = 27;
pub const OP_REMOVE: u32 = 28;
pub const OP_RENAME: u32 = 29;
pub const OP_RENEW: u32 = 30;
pub const OP_RESTOREFH: u32 = 31;
pub const OP_SAVEFH: u32 = 32;
pub const OP_SECINFO: u32 = 33;
pub const OP_SETATTR: u32 = 34;
pub const OP_SETCLIENTID: u32 = 35;
pub const OP_SETCLIENTID_CONFIRM: u32 = 36;
pub const OP_VERIFY: u32 = 37;
pub const OP_WRITE: u32 = 38;
pub const OP_RELEASE_LOCKOWNER: u32 = 39;
pub const OP_BACKCHANNEL_CTL: u32 = 40;
pub const OP_BIND_CONN_TO_SESSION: u32 = 41;
pub const OP_EXCHANGE_ID: u32 = 42;
pub const OP_CREATE_SESSION: u32 = 43;
pub const OP_DESTROY_SESSION: u32 = 44;
pub const OP_FREE_STATEID: u32 = 45;
pub const OP_GET_DIR_DELEGATION: u32 = 46;
pub const OP_GETDEVICEINFO: u32 = 47;
pub const OP_GETDEVICELIST: u32 = 48;
pub const OP_LAYOUTCOMMIT: u32 = 49;
pub const OP_LAYOUTGET: u32 = 50;
pub const OP_LAYOUTRETURN: u32 = 51;
pub const OP_SECINFO_NO_NAME: u32 = 52;
pub const OP_SEQUENCE: u32 = 53;
pub const OP_SET_SSV: u32 = 54;
pub const OP_TEST_STATEID: u32 = 55;
pub const OP_WANT_DELEGATION: u32 = 56;
pub const OP_DESTROY_CLIENTID: u32 = 57;
pub const OP_RECLAIM_COMPLETE: u32 = 58;
pub const OP_ALLOCATE: u32 = 59;
pub const OP_COPY: u32 = 60;
pub const OP_COPY_NOTIFY: u32 = 61;
pub const OP_DEALLOCATE: u32 = 62;
pub const OP_IO_ADVISE: u32 = 63;
pub const OP_LAYOUTERROR: u32 = 64;
pub const OP_LAYOUTSTATS: u32 = 65;
pub const OP_OFFLOAD_CANCEL: u32 = 66;
pub const OP_OFFLOAD_STATUS: u32 = 67;
pub const OP_READ_PLUS: u32 = 68;
pub const OP_SEEK: u32 = 69;
pub const OP_WRITE_SAME: u32 = 70;
pub const OP_CLONE: u32 = 71;
pub const OP_ILLEGAL: u32 = 10044;

pub const OPERATIONS: EnumTable = &[
    (OP_ACCESS, "OP_ACCESS"),
    (OP_CLOSE, "OP_CLOSE"),
    (OP_COMMIT, "OP_COMMIT"),
    (OP_CREATE, "OP_CREATE"),
    (OP_DELEGPURGE, "OP_DELEGPURGE"),
    (OP_DELEGRETURN, "OP_DELEGRETURN"),
    (OP_GETATTR, "OP_GETATTR"),
    (OP_GETFH, "OP_GETFH"),
    (OP_LINK, "OP_LINK"),
    (OP_LOCK, "OP_LOCK"),
    (OP_LOCKT, "OP_LOCKT"),
    (OP_LOCKU, "OP_LOCKU"),
    (OP_LOOKUP, "OP_LOOKUP"),
    (OP_LOOKUPP, "OP_LOOKUPP"),
    (OP_NVERIFY, "OP_NVERIFY"),
    (OP_OPEN, "OP_OPEN"),
    (OP_OPENATTR, "OP_OPENATTR"),
    (OP_OPEN_CONFIRM, "OP_OPEN_CONFIRM"),
    (OP_OPEN_DOWNGRADE, "OP_OPEN_DOWNGRADE"),
    (OP_PUTFH, "OP_PUTFH"),
    (OP_PUTPUBFH, "OP_PUTPUBFH"),
    (OP_PUTROOTFH, "OP_PUTROOTFH"),
    (OP_READ, "OP_READ"),
    (OP_READDIR, "OP_READDIR"),
    (OP_READLINK, "OP_READLINK"),
    (OP_REMOVE, "OP_REMOVE"),
    (OP_RENAME, "OP_RENAME"),
    (OP_RENEW, "OP_RENEW"),
    (OP_RESTOREFH, "OP_RESTOREFH"),
    (OP_SAVEFH, "OP_SAVEFH"),
    (OP_SECINFO, "OP_SECINFO"),
    (OP_SETATTR, "OP_SETATTR"),
    (OP_SETCLIENTID, "OP_SETCLIENTID"),
    (OP_SETCLIENTID_CONFIRM, "OP_SETCLIENTID_CONFIRM"),
    (OP_VERIFY, "OP_VERIFY"),
    (OP_WRITE, "OP_WRITE"),
    (OP_RELEASE_LOCKOWNER, "OP_RELEASE_LOCKOWNER"),
    (OP_BACKCHANNEL_CTL, "OP_BACKCHANNEL_CTL"),
    (OP_BIND_CONN_TO_SESSION, "OP_BIND_CONN_TO_SESSION"),
    (OP_EXCHANGE_ID, "OP_EXCHANGE_ID"),
    (OP_CREATE_SESSION, "OP_CREATE_SESSION"),
    (OP_DESTROY_SESSION, "OP_DESTROY_SESSION"),
    (OP_FREE_STATEID, "OP_FREE_STATEID"),
    (OP_GET_DIR_DELEGATION, "OP_GET_DIR_DELEGATION"),
    (OP_GETDEVICEINFO, "OP_GETDEVICEINFO"),
    (OP_GETDEVICELIST, "OP_GETDEVICELIST"),
    (OP_LAYOUTCOMMIT, "OP_LAYOUTCOMMIT"),
    (OP_LAYOUTGET, "OP_LAYOUTGET"),
    (OP_LAYOUTRETURN, "OP_LAYOUTRETURN"),
    (OP_SECINFO_NO_NAME, "OP_SECINFO_NO_NAME"),
    (OP_SEQUENCE, "OP_SEQUENCE"),
    (OP_SET_SSV, "OP_SET_SSV"),
    (OP_TEST_STATEID, "OP_TEST_STATEID"),
    (OP_WANT_DELEGATION, "OP_WANT_DELEGATION"),
    (OP_DESTROY_CLIENTID, "OP_DESTROY_CLIENTID"),
    (OP_RECLAIM_COMPLETE, "OP_RECLAIM_COMPLETE"),
    (OP_ALLOCATE, "OP_ALLOCATE"),
    (OP_COPY, "OP_COPY"),
    (OP_COPY_NOTIFY, "OP_COPY_NOTIFY"),
    (OP_DEALLOCATE, "OP_DEALLOCATE"),
    (OP_IO_ADVISE, "OP_IO_ADVISE"),
    (OP_LAYOUTERROR, "OP_LAYOUTERROR"),
    (OP_LAYOUTSTATS, "OP_LAYOUTSTATS"),
    (OP_OFFLOAD_CANCEL, "OP_OFFLOAD_CANCEL"),
    (OP_OFFLOAD_STATUS, "OP_OFFLOAD_STATUS"),
    (OP_READ_PLUS, "OP_READ_PLUS"),
    (OP_SEEK, "OP_SEEK"),
    (OP_WRITE_SAME, "OP_WRITE_SAME"),
    (OP_CLONE, "OP_CLONE"),
    (OP_ILLEGAL, "OP_ILLEGAL"),
];

pub const STATUS: EnumTable = &[
    (NFS4_OK, "NFS4_OK"),
    (1, "NFS4ERR_PERM"),
    (2, "NFS4ERR_NOENT"),
    (5, "NFS4ERR_IO"),
    (6, "NFS4ERR_NXIO"),
    (13, "NFS4ERR_ACCESS"),
    (17, "NFS4ERR_EXIST"),
    (18, "NFS4ERR_XDEV"),
    (20, "NFS4ERR_NOTDIR"),
    (21, "NFS4ERR_ISDIR"),
    (22, "NFS4ERR_INVAL"),
    (27, "NFS4ERR_FBIG"),
    (28, "NFS4ERR_NOSPC"),
    (30, "NFS4ERR_ROFS"),
    (31, "NFS4ERR_MLINK"),
    (63, "NFS4ERR_NAMETOOLONG"),
    (66, "NFS4ERR_NOTEMPTY"),
    (69, "NFS4ERR_DQUOT"),
    (70, "NFS4ERR_STALE"),
    (10001, "NFS4ERR_BADHANDLE"),
    (10003, "NFS4ERR_BAD_COOKIE"),
    (10004, "NFS4ERR_NOTSUPP"),
    (10005, "NFS4ERR_TOOSMALL"),
    (10006, "NFS4ERR_SERVERFAULT"),
    (10007, "NFS4ERR_BADTYPE"),
    (10008, "NFS4ERR_DELAY"),
    (10009, "NFS4ERR_SAME"),
    (NFS4ERR_DENIED, "NFS4ERR_DENIED"),
    (10011, "NFS4ERR_EXPIRED"),
    (10012, "NFS4ERR_LOCKED"),
    (10013, "NFS4ERR_GRACE"),
    (10014, "NFS4ERR_FHEXPIRED"),
    (10015, "NFS4ERR_SHARE_DENIED"),
    (10016, "NFS4ERR_WRONGSEC"),
    (NFS4ERR_CLID_INUSE, "NFS4ERR_CLID_INUSE"),
    (10018, "NFS4ERR_RESOURCE"),
    (10019, "NFS4ERR_MOVED"),
    (10020, "NFS4ERR_NOFILEHANDLE"),
    (10021, "NFS4ERR_MINOR_VERS_MISMATCH"),
    (10022, "NFS4ERR_STALE_CLIENTID"),
    (10023, "NFS4ERR_STALE_STATEID"),
    (10024, "NFS4ERR_OLD_STATEID"),
    (10025, "NFS4ERR_BAD_STATEID"),
    (10026, "NFS4ERR_BAD_SEQID"),
    (10027, "NFS4ERR_NOT_SAME"),
    (10028, "NFS4ERR_LOCK_RANGE"),
    (10029, "NFS4ERR_SYMLINK"),
    (10030, "NFS4ERR_RESTOREFH"),
    (10031, "NFS4ERR_LEASE_MOVED"),
    (10032, "NFS4ERR_ATTRNOTSUPP"),
    (10033, "NFS4ERR_NO_GRACE"),
    (10034, "NFS4ERR_RECLAIM_BAD"),
    (10035, "NFS4ERR_RECLAIM_CONFLICT"),
    (10036, "NFS4ERR_BADXDR"),
    (10037, "NFS4ERR_LOCKS_HELD"),
    (10038, "NFS4ERR_OPENMODE"),
    (10039, "NFS4ERR_BADOWNER"),
    (10040, "NFS4ERR_BADCHAR"),
    (10041, "NFS4ERR_BADNAME"),
    (10042, "NFS4ERR_BAD_RANGE"),
    (10043, "NFS4ERR_LOCK_NOTSUPP"),
    (10044, "NFS4ERR_OP_ILLEGAL"),
    (10045, "NFS4ERR_DEADLOCK"),
    (10046, "NFS4ERR_FILE_OPEN"),
    (10047, "NFS4ERR_ADMIN_REVOKED"),
    (10048, "NFS4ERR_CB_PATH_DOWN"),
    (10049, "NFS4ERR_BADIOMODE"),
    (10050, "NFS4ERR_BADLAYOUT"),
    (10051, "NFS4ERR_BAD_SESSION_DIGEST"),
    (10052, "NFS4ERR_BADSESSION"),
    (10053, "NFS4ERR_BADSLOT"),
    (10054, "NFS4ERR_COMPLETE_ALREADY"),
    (10055, "NFS4ERR_CONN_NOT_BOUND_TO_SESSION"),
    (10056, "NFS4ERR_DELEG_ALREADY_WANTED"),
    (10057, "NFS4ERR_BACK_CHAN_BUSY"),
    (NFS4ERR_LAYOUTTRYLATER, "NFS4ERR_LAYOUTTRYLATER"),
    (10059, "NFS4ERR_LAYOUTUNAVAILABLE"),
    (10060, "NFS4ERR_NOMATCHING_LAYOUT"),
    (10061, "NFS4ERR_RECALLCONFLICT"),
    (10062, "NFS4ERR_UNKNOWN_LAYOUTTYPE"),
    (10063, "NFS4ERR_SEQ_MISORDERED"),
    (10064, "NFS4ERR_SEQUENCE_POS"),
    (10065, "NFS4ERR_REQ_TOO_BIG"),
    (10066, "NFS4ERR_REP_TOO_BIG"),
    (10067, "NFS4ERR_REP_TOO_BIG_TO_CACHE"),
    (10068, "NFS4ERR_RETRY_UNCACHED_REP"),
    (10069, "NFS4ERR_UNSAFE_COMPOUND"),
    (10070, "NFS4ERR_TOO_MANY_OPS"),
    (10071, "NFS4ERR_OP_NOT_IN_SESSION"),
    (10072, "NFS4ERR_HASH_ALG_UNSUPP"),
    (10074, "NFS4ERR_CLIENTID_BUSY"),
    (10075, "NFS4ERR_PNFS_IO_HOLE"),
    (10076, "NFS4ERR_SEQ_FALSE_RETRY"),
    (10077, "NFS4ERR_BAD_HIGH_SLOT"),
    (10078, "NFS4ERR_DEADSESSION"),
    (10079, "NFS4ERR_ENCR_ALG_UNSUPP"),
    (10080, "NFS4ERR_PNFS_NO_LAYOUT"),
    (10081, "NFS4ERR_NOT_ONLY_OP"),
    (10082, "NFS4ERR_WRONG_CRED"),
    (10083, "NFS4ERR_WRONG_TYPE"),
    (10084, "NFS4ERR_DIRDELEG_UNAVAIL"),
    (10085, "NFS4ERR_REJECT_DELEG"),
    (10086, "NFS4ERR_RETURNCONFLICT"),
    (10087, "NFS4ERR_DELEG_REVOKED"),
    (10088, "NFS4ERR_PARTNER_NOTSUPP"),
    (10089, "NFS4ERR_PARTNER_NO_AUTH"),
    (10090, "NFS4ERR_UNION_NOTSUPP"),
    (10091, "NFS4ERR_OFFLOAD_DENIED"),
    (10092, "NFS4ERR_WRONG_LFS"),
    (10093, "NFS4ERR_BADLABEL"),
    (10094, "NFS4ERR_OFFLOAD_NO_REQS"),
];

pub const NF4BLK: u32 = 3;
pub const NF4CHR: u32 = 4;
pub const NF4LNK: u32 = 5;

pub const FTYPE: EnumTable = &[
    (1, "NF4REG"),
    (2, "NF4DIR"),
    (NF4BLK, "NF4BLK"),
    (NF4CHR, "NF4CHR"),
    (NF4LNK, "NF4LNK"),
    (6, "NF4SOCK"),
    (7, "NF4FIFO"),
    (8, "NF4ATTRDIR"),
    (9, "NF4NAMEDATTR"),
];

pub const OPEN4_CREATE: u32 = 1;
pub const OPEN_TYPE: EnumTable = &[(0, "OPEN4_NOCREATE"), (OPEN4_CREATE, "OPEN4_CREATE")];

pub const EXCLUSIVE4: u32 = 2;
pub const EXCLUSIVE4_1: u32 = 3;
pub const CREATE_MODE: EnumTable = &[
    (0, "UNCHECKED4"),
    (1, "GUARDED4"),
    (EXCLUSIVE4, "EXCLUSIVE4"),
    (EXCLUSIVE4_1, "EXCLUSIVE4_1"),
];

pub const CLAIM_NULL: u32 = 0;
pub const CLAIM_PREVIOUS: u32 = 1;
pub const CLAIM_DELEGATE_CUR: u32 = 2;
pub const CLAIM_DELEGATE_PREV: u32 = 3;
pub const CLAIM_FH: u32 = 4;
pub const CLAIM_DELEG_PREV_FH: u32 = 5;
pub const CLAIM_DELEG_CUR_FH: u32 = 6;

pub const CLAIM_TYPE: EnumTable = &[
    (CLAIM_NULL, "CLAIM_NULL"),
    (CLAIM_PREVIOUS, "CLAIM_PREVIOUS"),
    (CLAIM_DELEGATE_CUR, "CLAIM_DELEGATE_CUR"),
    (CLAIM_DELEGATE_PREV, "CLAIM_DELEGATE_PREV"),
    (CLAIM_FH, "CLAIM_FH"),
    (CLAIM_DELEG_PREV_FH, "CLAIM_DELEG_PREV_FH"),
    (CLAIM_DELEG_CUR_FH, "CLAIM_DELEG_CUR_FH"),
];

pub const OPEN_DELEGATE_NONE: u32 = 0;
pub const OPEN_DELEGATE_READ: u32 = 1;
pub const OPEN_DELEGATE_WRITE: u32 = 2;
pub const OPEN_DELEGATE_NONE_EXT: u32 = 3;

pub const DELEGATION_TYPE: EnumTable = &[
    (OPEN_DELEGATE_NONE, "OPEN_DELEGATE_NONE"),
    (OPEN_DELEGATE_READ, "OPEN_DELEGATE_READ"),
    (OPEN_DELEGATE_WRITE, "OPEN_DELEGATE_WRITE"),
    (OPEN_DELEGATE_NONE_EXT, "OPEN_DELEGATE_NONE_EXT"),
];

pub const WND4_CONTENTION: u32 = 1;
pub const WND4_RESOURCE: u32 = 2;

pub const WHY_NO_DELEGATION: EnumTable = &[
    (0, "WND4_NOT_WANTED"),
    (WND4_CONTENTION, "WND4_CONTENTION"),
    (WND4_RESOURCE, "WND4_RESOURCE"),
    (3, "WND4_NOT_SUPP_FTYPE"),
    (4, "WND4_WRITE_DELEG_NOT_SUPP_FTYPE"),
    (5, "WND4_NOT_SUPP_UPGRADE"),
    (6, "WND4_NOT_SUPP_DOWNGRADE"),
    (7, "WND4_CANCELLED"),
    (8, "WND4_IS_DIR"),
];

pub const NFS_LIMIT_SIZE: u32 = 1;

pub const LOCK_TYPE: EnumTable = &[
    (1, "READ_LT"),
    (2, "WRITE_LT"),
    (3, "READW_LT"),
    (4, "WRITEW_LT"),
];

pub const STABLE_HOW: EnumTable = &[(0, "UNSTABLE4"), (1, "DATA_SYNC4"), (2, "FILE_SYNC4")];

pub const LAYOUT4_NFSV4_1_FILES: u32 = 1;

pub const LAYOUT_TYPE: EnumTable = &[
    (LAYOUT4_NFSV4_1_FILES, "LAYOUT4_NFSV4_1_FILES"),
    (2, "LAYOUT4_OSD2_OBJECTS"),
    (3, "LAYOUT4_BLOCK_VOLUME"),
    (4, "LAYOUT4_FLEX_FILES"),
];

pub const IOMODE: EnumTable = &[(1, "LAYOUTIOMODE4_READ"), (2, "LAYOUTIOMODE4_RW"), (3, "LAYOUTIOMODE4_ANY")];

pub const LAYOUTRETURN4_FILE: u32 = 1;

pub const LAYOUTRETURN_TYPE: EnumTable = &[
    (LAYOUTRETURN4_FILE, "LAYOUTRETURN4_FILE"),
    (2, "LAYOUTRETURN4_FSID"),
    (3, "LAYOUTRETURN4_ALL"),
];

pub const DATA_CONTENT: EnumTable = &[(0, "NFS4_CONTENT_DATA"), (1, "NFS4_CONTENT_HOLE")];

pub const RPCSEC_GSS: u32 = 6;
