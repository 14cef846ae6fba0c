//! Decoded packet object model.
//!
//! A `Packet` is an ordered list of named layers (`eth`, `ip`, `tcp`/`udp`,
//! `rpc`, `nfs`/`nlm`); each layer is a `Record` of typed values. Lookups on
//! paths that do not exist for a packet return `None` (or an empty list)
//! instead of failing, so predicates treat them as non-matches.

mod path;
mod value;

pub use path::{ARRAY_FIELD, Segment, parse_path};
pub use value::{EnumValue, Record, Value, hex};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Layer names used by the decoder.
pub mod layer {
    pub const ETH: &str = "eth";
    pub const IP: &str = "ip";
    pub const TCP: &str = "tcp";
    pub const UDP: &str = "udp";
    pub const RPCORDMA: &str = "rpcordma";
    pub const RPC: &str = "rpc";
    pub const NFS: &str = "nfs";
    pub const NLM: &str = "nlm";
}

/// RPC message direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcType {
    Call,
    Reply,
}

static EMPTY_RECORD: Record = Record::new();

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: &'static str,
    // Always a `Value::Record`; kept as a value so path lookups can start here.
    root: Value,
}

impl Layer {
    pub fn new(name: &'static str, record: Record) -> Self {
        Self {
            name,
            root: Value::Record(record),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn record(&self) -> &Record {
        self.root.as_record().unwrap_or(&EMPTY_RECORD)
    }
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// 1-based frame index in the merged stream.
    pub index: u64,
    /// Capture timestamp in seconds since the epoch.
    pub timestamp: f64,
    /// Index of the capture file the frame came from.
    pub source: usize,
    /// Captured frame length in bytes.
    pub length: usize,
    layers: Vec<Layer>,
}

impl Packet {
    pub fn new(index: u64, timestamp: f64, source: usize, length: usize) -> Self {
        Self {
            index,
            timestamp,
            source,
            length,
            layers: Vec::new(),
        }
    }

    pub fn push_layer(&mut self, name: &'static str, record: Record) {
        self.layers.push(Layer::new(name, record));
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&Record> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(Layer::record)
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.layer(name).is_some()
    }

    fn root(&self, name: &str) -> Option<&Value> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| &layer.root)
    }

    /// Exact path lookup, e.g. `nfs.array[3].fh`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let segments = parse_path(path)?;
        self.get_segments(&segments)
    }

    pub fn get_segments(&self, segments: &[Segment]) -> Option<&Value> {
        let (Segment::Field(layer), rest) = segments.split_first()? else {
            return None;
        };
        path::resolve(self.root(layer)?, rest)
    }

    /// Existential path lookup returning every value the path can reach.
    pub fn lookup(&self, path: &str) -> Vec<&Value> {
        match parse_path(path) {
            Some(segments) => self.lookup_segments(&segments),
            None => Vec::new(),
        }
    }

    pub fn lookup_segments(&self, segments: &[Segment]) -> Vec<&Value> {
        let mut out = Vec::new();
        if let Some((Segment::Field(layer), rest)) = segments.split_first() {
            if let Some(root) = self.root(layer) {
                path::collect(root, rest, &mut out);
            }
        }
        out
    }

    pub fn xid(&self) -> Option<u32> {
        self.layer(layer::RPC)?
            .get("xid")?
            .as_u64()
            .and_then(|xid| u32::try_from(xid).ok())
    }

    pub fn rpc_type(&self) -> Option<RpcType> {
        match self.layer(layer::RPC)?.get("type")?.as_u64()? {
            0 => Some(RpcType::Call),
            1 => Some(RpcType::Reply),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        self.rpc_type() == Some(RpcType::Call)
    }

    pub fn is_reply(&self) -> bool {
        self.rpc_type() == Some(RpcType::Reply)
    }
}

impl Serialize for Packet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.layers.len()))?;
        map.serialize_entry("index", &self.index)?;
        map.serialize_entry("timestamp", &self.timestamp)?;
        map.serialize_entry("source", &self.source)?;
        map.serialize_entry("length", &self.length)?;
        for layer in &self.layers {
            map.serialize_entry(layer.name, layer.record())?;
        }
        map.end()
    }
}
