//! ONC-RPC wire constants (RFC 5531, RFC 2203).

use crate::protocols::xdr::EnumTable;

/// Record-marking header: high bit flags the last fragment.
pub const LAST_FRAGMENT: u32 = 0x8000_0000;
pub const FRAGMENT_LEN_MASK: u32 = 0x7fff_ffff;
pub const RECORD_MARK_LEN: usize = 4;

/// Smallest message we try to decode: xid, type and one more word.
pub const MIN_MESSAGE_LEN: usize = 12;

pub const MSG_CALL: u32 = 0;
pub const MSG_REPLY: u32 = 1;
pub const RPC_VERSION: u32 = 2;

pub const MSG_ACCEPTED: u32 = 0;
pub const MSG_DENIED: u32 = 1;

pub const SUCCESS: u32 = 0;
pub const PROG_MISMATCH: u32 = 2;
pub const SYSTEM_ERR: u32 = 5;

pub const RPC_MISMATCH: u32 = 0;
pub const AUTH_ERROR: u32 = 1;

pub const AUTH_NONE: u32 = 0;
pub const AUTH_SYS: u32 = 1;
pub const RPCSEC_GSS: u32 = 6;

pub const RPCSEC_GSS_DATA: u32 = 0;

pub const GSS_SVC_NONE: u32 = 1;
pub const GSS_SVC_INTEGRITY: u32 = 2;
pub const GSS_SVC_PRIVACY: u32 = 3;

pub const MAX_AUTH_BYTES: usize = 400;
pub const MAX_MACHINE_NAME: usize = 255;
pub const MAX_GIDS: usize = 16;
pub const MAX_GSS_HANDLE: usize = 1024;

pub const MSG_TYPE: EnumTable = &[(MSG_CALL, "CALL"), (MSG_REPLY, "REPLY")];

pub const REPLY_STAT: EnumTable = &[(MSG_ACCEPTED, "MSG_ACCEPTED"), (MSG_DENIED, "MSG_DENIED")];

pub const ACCEPT_STAT: EnumTable = &[
    (SUCCESS, "SUCCESS"),
    (1, "PROG_UNAVAIL"),
    (PROG_MISMATCH, "PROG_MISMATCH"),
    (3, "PROC_UNAVAIL"),
    (4, "GARBAGE_ARGS"),
    (SYSTEM_ERR, "SYSTEM_ERR"),
];

pub const REJECT_STAT: EnumTable = &[(RPC_MISMATCH, "RPC_MISMATCH"), (AUTH_ERROR, "AUTH_ERROR")];

pub const AUTH_FLAVOR: EnumTable = &[
    (AUTH_NONE, "AUTH_NONE"),
    (AUTH_SYS, "AUTH_SYS"),
    (2, "AUTH_SHORT"),
    (3, "AUTH_DH"),
    (RPCSEC_GSS, "RPCSEC_GSS"),
];

pub const AUTH_STAT: EnumTable = &[
    (0, "AUTH_OK"),
    (1, "AUTH_BADCRED"),
    (2, "AUTH_REJECTEDCRED"),
    (3, "AUTH_BADVERF"),
    (4, "AUTH_REJECTEDVERF"),
    (5, "AUTH_TOOWEAK"),
    (6, "AUTH_INVALIDRESP"),
    (7, "AUTH_FAILED"),
    (13, "RPCSEC_GSS_CREDPROBLEM"),
    (14, "RPCSEC_GSS_CTXPROBLEM"),
];

pub const GSS_PROC: EnumTable = &[
    (RPCSEC_GSS_DATA, "RPCSEC_GSS_DATA"),
    (1, "RPCSEC_GSS_INIT"),
    (2, "RPCSEC_GSS_CONTINUE_INIT"),
    (3, "RPCSEC_GSS_DESTROY"),
];

pub const GSS_SERVICE: EnumTable = &[
    (GSS_SVC_NONE, "rpc_gss_svc_none"),
    (GSS_SVC_INTEGRITY, "rpc_gss_svc_integrity"),
    (GSS_SVC_PRIVACY, "rpc_gss_svc_privacy"),
];
