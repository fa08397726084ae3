//! The `Established` tag (§3 of SPEC_FULL.md).

/// Tracks where a connection sits in the handshake / 0-RTT lifecycle.
///
/// Only in [Established::Established] may a KeyUpdate be processed or sent;
/// early-data application bytes arrive exclusively in
/// [Established::EarlyDataAllowed].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Established {
    NotEstablished,
    /// Server side, TLS 1.3, 0-RTT accepted. The payload is the remaining
    /// early-data byte budget, which decreases monotonically as early-data
    /// chunks are returned to the application.
    EarlyDataAllowed(u32),
    /// TLS 1.3 server rejected 0-RTT; any received early data is silently
    /// dropped rather than surfaced.
    EarlyDataNotAllowed,
    Established,
}

impl Established {
    pub fn is_established(&self) -> bool {
        matches!(self, Established::Established)
    }
}
