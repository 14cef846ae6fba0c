//! Frame to packet decoding.
//!
//! Layers are decoded outward-in: link, network, transport, an
//! RPC-over-RDMA header on the NFS/RDMA port, then ONC-RPC when the payload
//! looks like an RPC message, then the NFSv3, NFSv4 or NLM body selected by
//! program and version. Reply bodies can only be decoded when their call
//! was seen, so the decoder keeps a registry of call headers keyed by xid.

mod error;
mod link;

pub use error::DecodeError;

use std::collections::{HashMap, VecDeque};

use tracing::trace;

use crate::config::DecoderConfig;
use crate::packet::{Packet, Record, layer};
use crate::protocols::rpc::{self, GssCred, RpcBody, RpcCall, RpcMessage};
use crate::protocols::{nfs3, nfs4, nlm, rpcordma};
use crate::source::Frame;

use link::{TransportKind, decode_link};

/// Calls remembered for reply decoding before the oldest are evicted.
const MAX_REGISTERED_CALLS: usize = 1 << 18;

#[derive(Debug, Clone, Copy)]
struct CallInfo {
    program: u32,
    version: u32,
    procedure: u32,
    gss: Option<GssCred>,
}

impl From<&RpcCall> for CallInfo {
    fn from(call: &RpcCall) -> Self {
        Self {
            program: call.program,
            version: call.version,
            procedure: call.procedure,
            gss: call.gss,
        }
    }
}

/// Call registry: xid to call header, oldest evicted first.
///
/// Entries survive their reply so that a duplicate reply (the same exchange
/// captured on two hosts) decodes the same way.
#[derive(Debug, Default)]
struct CallRegistry {
    calls: HashMap<u32, CallInfo>,
    order: VecDeque<u32>,
}

impl CallRegistry {
    fn insert(&mut self, xid: u32, info: CallInfo) {
        if self.calls.insert(xid, info).is_none() {
            self.order.push_back(xid);
        }
        while self.order.len() > MAX_REGISTERED_CALLS {
            if let Some(oldest) = self.order.pop_front() {
                self.calls.remove(&oldest);
            }
        }
    }

    fn get(&self, xid: u32) -> Option<CallInfo> {
        self.calls.get(&xid).copied()
    }

    fn clear(&mut self) {
        self.calls.clear();
        self.order.clear();
    }
}

/// Stateful frame decoder.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,
    calls: CallRegistry,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            calls: CallRegistry::default(),
        }
    }

    pub fn config(&self) -> DecoderConfig {
        self.config
    }

    /// Forget every registered call. Used when the cursor rewinds.
    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Number of calls currently registered for reply decoding.
    pub fn registered_calls(&self) -> usize {
        self.calls.calls.len()
    }

    /// Decode one frame into a packet with the given 1-based index.
    ///
    /// # Errors
    /// Returns `DecodeError` when a layer's byte layout is inconsistent with
    /// its declared lengths.
    pub fn decode(&mut self, index: u64, frame: &Frame) -> Result<Packet, DecodeError> {
        let mut packet = Packet::new(index, frame.seconds(), frame.source, frame.data.len());
        let Some(transport) = decode_link(frame, &mut packet)? else {
            return Ok(packet);
        };
        if transport.uses_port(rpcordma::layout::NFS_RDMA_PORT) {
            let header = rpcordma::parse_header(transport.payload, self.config)
                .map_err(DecodeError::layer(layer::RPCORDMA))?;
            if let Some(header) = header {
                trace!(xid = header.xid, procedure = header.procedure, "rpc-over-rdma header");
                packet.push_layer(layer::RPCORDMA, header.record);
                if let Some(message) = header.message {
                    self.decode_message(message, &mut packet)?;
                }
                return Ok(packet);
            }
        }
        let body = match transport.kind {
            TransportKind::Tcp => rpc::strip_record_mark(transport.payload),
            TransportKind::Udp => Some(transport.payload),
        };
        if let Some(body) = body {
            self.decode_message(body, &mut packet)?;
        }
        Ok(packet)
    }

    fn decode_message(&mut self, body: &[u8], packet: &mut Packet) -> Result<(), DecodeError> {
        let message =
            rpc::parse_message(body, self.config).map_err(DecodeError::layer(layer::RPC))?;
        match message {
            Some(message) => self.decode_rpc(message, packet),
            None => Ok(()),
        }
    }

    fn decode_rpc(&mut self, message: RpcMessage<'_>, packet: &mut Packet) -> Result<(), DecodeError> {
        let RpcMessage {
            xid,
            body,
            mut record,
            payload,
        } = message;

        match body {
            RpcBody::Call(call) => {
                let info = CallInfo::from(&call);
                self.calls.insert(xid, info);
                packet.push_layer(layer::RPC, record);
                if let Some(args) = self.procedure_body(info, payload)? {
                    if let Some((name, rec)) = self.decode_body(info, args, true)? {
                        packet.push_layer(name, rec);
                    }
                }
            }
            RpcBody::Reply(reply) => {
                let info = self.calls.get(xid);
                match info {
                    Some(info) => {
                        record.insert("program", info.program);
                        record.insert("version", info.version);
                        record.insert("procedure", info.procedure);
                    }
                    None => {
                        trace!(xid, "reply without a registered call");
                        record.insert("version", 0u32);
                    }
                }
                packet.push_layer(layer::RPC, record);
                let Some(info) = info.filter(|_| reply.success) else {
                    return Ok(());
                };
                if let Some(results) = self.procedure_body(info, payload)? {
                    if let Some((name, rec)) = self.decode_body(info, results, false)? {
                        packet.push_layer(name, rec);
                    }
                }
            }
        }
        Ok(())
    }

    /// Strip RPCSEC_GSS wrapping. Privacy-protected bodies and GSS context
    /// control messages yield `None`.
    fn procedure_body<'a>(
        &self,
        info: CallInfo,
        payload: &'a [u8],
    ) -> Result<Option<&'a [u8]>, DecodeError> {
        let Some(gss) = info.gss else {
            return Ok(Some(payload));
        };
        if gss.gss_proc != rpc::layout::RPCSEC_GSS_DATA {
            return Ok(None);
        }
        match gss.service {
            rpc::layout::GSS_SVC_INTEGRITY => rpc::unwrap_integrity(payload, self.config)
                .map(Some)
                .map_err(DecodeError::layer(layer::RPC)),
            rpc::layout::GSS_SVC_PRIVACY => {
                trace!(seq_num = gss.seq_num, "privacy-protected body not decoded");
                Ok(None)
            }
            _ => Ok(Some(payload)),
        }
    }

    fn decode_body(
        &self,
        info: CallInfo,
        body: &[u8],
        is_call: bool,
    ) -> Result<Option<(&'static str, Record)>, DecodeError> {
        let config = self.config;
        if info.procedure == 0 {
            return Ok(None);
        }
        let decoded = match (info.program, info.version) {
            (nfs3::layout::PROGRAM, nfs3::layout::VERSION) => {
                let rec = if is_call {
                    nfs3::parse_call(info.procedure, body, config)
                } else {
                    nfs3::parse_reply(info.procedure, body, config)
                };
                (layer::NFS, rec)
            }
            (nfs4::layout::PROGRAM, nfs4::layout::VERSION)
                if info.procedure == nfs4::layout::NFSPROC4_COMPOUND =>
            {
                let rec = if is_call {
                    nfs4::parse_call(body, config)
                } else {
                    nfs4::parse_reply(body, config)
                };
                (layer::NFS, rec)
            }
            (nlm::layout::PROGRAM, nlm::layout::MIN_VERSION..=nlm::layout::MAX_VERSION) => {
                let rec = if is_call {
                    nlm::parse_call(info.version, info.procedure, body, config)
                } else {
                    nlm::parse_reply(info.version, info.procedure, body, config)
                };
                (layer::NLM, rec)
            }
            _ => return Ok(None),
        };
        let (name, rec) = decoded;
        rec.map(|rec| Some((name, rec)))
            .map_err(DecodeError::layer(name))
    }
}
