//! NFSv3 constants (RFC 1813).

use crate::protocols::xdr::EnumTable;

pub const PROGRAM: u32 = 100003;
pub const VERSION: u32 = 3;

pub const NFS3_FHSIZE: usize = 64;
pub const NFS3_COOKIEVERFSIZE: usize = 8;
pub const NFS3_CREATEVERFSIZE: usize = 8;
pub const NFS3_WRITEVERFSIZE: usize = 8;
pub const MAX_NAME: usize = 1024;
pub const MAX_PATH: usize = 4096;
pub const MAX_DIR_ENTRIES: usize = 65_536;

pub const NFS3_OK: u32 = 0;

pub const NFSPROC3_NULL: u32 = 0;
pub const NFSPROC3_GETATTR: u32 = 1;
pub const NFSPROC3_SETATTR: u32 = 2;
pub const NFSPROC3_LOOKUP: u32 = 3;
pub const NFSPROC3_ACCESS: u32 = 4;
pub const NFSPROC3_READLINK: u32 = 5;
pub const NFSPROC3_READ: u32 = 6;
pub const NFSPROC3_WRITE: u32 = 7;
pub const NFSPROC3_CREATE: u32 = 8;
pub const NFSPROC3_MKDIR: u32 = 9;
pub const NFSPROC3_SYMLINK: u32 = 10;
pub const NFSPROC3_MKNOD: u32 = 11;
pub const NFSPROC3_REMOVE: u32 = 12;
pub const NFSPROC3_RMDIR: u32 = 13;
pub const NFSPROC3_RENAME: u32 = 14;
pub const NFSPROC3_LINK: u32 = 15;
pub const NFSPROC3_READDIR: u32 = 16;
pub const NFSPROC3_READDIRPLUS: u32 = 17;
pub const NFSPROC3_FSSTAT: u32 = 18;
pub const NFSPROC3_FSINFO: u32 = 19;
pub const NFSPROC3_PATHCONF: u32 = 20;
pub const NFSPROC3_COMMIT: u32 = 21;

pub const PROCEDURES: EnumTable = &[
    (NFSPROC3_NULL, "NFSPROC3_NULL"),
    (NFSPROC3_GETATTR, "NFSPROC3_GETATTR"),
    (NFSPROC3_SETATTR, "NFSPROC3_SETATTR"),
    (NFSPROC3_LOOKUP, "NFSPROC3_LOOKUP"),
    (NFSPROC3_ACCESS, "NFSPROC3_ACCESS"),
    (NFSPROC3_READLINK, "NFSPROC3_READLINK"),
    (NFSPROC3_READ, "NFSPROC3_READ"),
    (NFSPROC3_WRITE, "NFSPROC3_WRITE"),
    (NFSPROC3_CREATE, "NFSPROC3_CREATE"),
    (NFSPROC3_MKDIR, "NFSPROC3_MKDIR"),
    (NFSPROC3_SYMLINK, "NFSPROC3_SYMLINK"),
    (NFSPROC3_MKNOD, "NFSPROC3_MKNOD"),
    (NFSPROC3_REMOVE, "NFSPROC3_REMOVE"),
    (NFSPROC3_RMDIR, "NFSPROC3_RMDIR"),
    (NFSPROC3_RENAME, "NFSPROC3_RENAME"),
    (NFSPROC3_LINK, "NFSPROC3_LINK"),
    (NFSPROC3_READDIR, "NFSPROC3_READDIR"),
    (NFSPROC3_READDIRPLUS, "NFSPROC3_READDIRPLUS"),
    (NFSPROC3_FSSTAT, "NFSPROC3_FSSTAT"),
    (NFSPROC3_FSINFO, "NFSPROC3_FSINFO"),
    (NFSPROC3_PATHCONF, "NFSPROC3_PATHCONF"),
    (NFSPROC3_COMMIT, "NFSPROC3_COMMIT"),
];

pub const STATUS: EnumTable = &[
    (NFS3_OK, "NFS3_OK"),
    (1, "NFS3ERR_PERM"),
    (2, "NFS3ERR_NOENT"),
    (5, "NFS3ERR_IO"),
    (6, "NFS3ERR_NXIO"),
    (13, "NFS3ERR_ACCES"),
    (17, "NFS3ERR_EXIST"),
    (18, "NFS3ERR_XDEV"),
    (19, "NFS3ERR_NODEV"),
    (20, "NFS3ERR_NOTDIR"),
    (21, "NFS3ERR_ISDIR"),
    (22, "NFS3ERR_INVAL"),
    (27, "NFS3ERR_FBIG"),
    (28, "NFS3ERR_NOSPC"),
    (30, "NFS3ERR_ROFS"),
    (31, "NFS3ERR_MLINK"),
    (63, "NFS3ERR_NAMETOOLONG"),
    (66, "NFS3ERR_NOTEMPTY"),
    (69, "NFS3ERR_DQUOT"),
    (70, "NFS3ERR_STALE"),
    (71, "NFS3ERR_REMOTE"),
    (10001, "NFS3ERR_BADHANDLE"),
    (10002, "NFS3ERR_NOT_SYNC"),
    (10003, "NFS3ERR_BAD_COOKIE"),
    (10004, "NFS3ERR_NOTSUPP"),
    (10005, "NFS3ERR_TOOSMALL"),
    (10006, "NFS3ERR_SERVERFAULT"),
    (10007, "NFS3ERR_BADTYPE"),
    (10008, "NFS3ERR_JUKEBOX"),
];

pub const NF3CHR: u32 = 3;
pub const NF3BLK: u32 = 4;
pub const NF3SOCK: u32 = 6;
pub const NF3FIFO: u32 = 7;

pub const FTYPE: EnumTable = &[
    (1, "NF3REG"),
    (2, "NF3DIR"),
    (NF3BLK, "NF3BLK"),
    (NF3CHR, "NF3CHR"),
    (5, "NF3LNK"),
    (NF3SOCK, "NF3SOCK"),
    (NF3FIFO, "NF3FIFO"),
];

pub const STABLE_HOW: EnumTable = &[(0, "UNSTABLE"), (1, "DATA_SYNC"), (2, "FILE_SYNC")];

pub const EXCLUSIVE: u32 = 2;

pub const CREATE_MODE: EnumTable = &[(0, "UNCHECKED"), (1, "GUARDED"), (EXCLUSIVE, "EXCLUSIVE")];

pub const SET_TO_CLIENT_TIME: u32 = 2;

pub const TIME_HOW: EnumTable = &[
    (0, "DONT_CHANGE"),
    (1, "SET_TO_SERVER_TIME"),
    (SET_TO_CLIENT_TIME, "SET_TO_CLIENT_TIME"),
];
