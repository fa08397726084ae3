//! The two-way version dispatch this driver cares about (§4, VD).
//!
//! Exact wire version negotiation happens in the out-of-scope initial
//! handshake; by the time this crate's `Context` exists, only "1.3 or not"
//! matters for which receive-loop/send-path variant runs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    /// TLS 1.2 or earlier (RFC 5246 et al.).
    Tls12,
    /// TLS 1.3 (RFC 8446).
    Tls13,
}

impl ProtocolVersion {
    pub fn is_tls13(&self) -> bool {
        matches!(self, ProtocolVersion::Tls13)
    }
}
