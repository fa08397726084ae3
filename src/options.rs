//! Driver-owned configuration (§12 of SPEC_FULL.md).
//!
//! Mirrors the `ClientOptions`/`ServerOptions` pattern used elsewhere in
//! this codebase: a plain struct with a `recommended()` constructor, rather
//! than a bespoke configuration idiom for this one crate.

/// The handful of knobs the session driver itself owns, as opposed to the
/// much larger set of handshake-negotiation options that belong to the
/// out-of-scope initial-handshake component.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Plaintext fragment limit used by `send_data`'s chunking loop.
    /// RFC 8446 §5.1 caps this at 16384.
    pub max_fragment_size: usize,

    /// Whether an inbound `Handshake[ClientHello]` seen during `recv_data`
    /// on a TLS <= 1.2 connection is honored as server-side renegotiation,
    /// or treated as a fatal protocol violation.
    pub allow_server_renegotiation: bool,
}

impl DriverOptions {
    pub fn recommended() -> Self {
        Self {
            max_fragment_size: 16384,
            allow_server_renegotiation: true,
        }
    }
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self::recommended()
    }
}
