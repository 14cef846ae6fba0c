//! Call/reply pairing for match scans.
//!
//! Matched calls are remembered by xid until a reply with the same xid is
//! matched, at which point the pair is handed back. Only calls that satisfied
//! a match expression are remembered, so the map stays small during long
//! scans.

use std::collections::HashMap;

use crate::packet::Packet;

#[derive(Debug, Default)]
pub struct Correlator {
    outstanding: HashMap<u32, Packet>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a matched call. A later call reusing the xid replaces it.
    pub fn record(&mut self, xid: u32, call: Packet) {
        self.outstanding.insert(xid, call);
    }

    /// Remove and return the outstanding call for `xid`.
    pub fn take(&mut self, xid: u32) -> Option<Packet> {
        self.outstanding.remove(&xid)
    }

    pub fn contains(&self, xid: u32) -> bool {
        self.outstanding.contains_key(&xid)
    }

    /// Forget every outstanding call.
    pub fn clear(&mut self) {
        self.outstanding.clear();
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }
}
