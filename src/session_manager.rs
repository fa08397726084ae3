//! The shared session-ticket/resumption-cache collaborator.
//!
//! Storage format and eviction policy belong to the session manager
//! implementation, not to this crate (SPEC_FULL.md §6 "Persisted state").

use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;

use crate::cipher_suite::Cipher;

/// Recorded alongside a [SessionData] purely for diagnostics / expiry
/// bookkeeping by the session manager; this crate never inspects it again
/// after installing it.
#[derive(Debug, Clone)]
pub struct SessionTicketInfo {
    pub lifetime_seconds: u32,
    pub age_add: u32,
    /// Always `None` here: this is the ticket *nonce* used only to derive
    /// the PSK (see [SessionData::psk]), not an identifier worth retaining.
    pub nonce: Option<Bytes>,
    pub received_at: SystemTime,
}

/// Everything needed to attempt 0-RTT/1-RTT resumption against a
/// previously-established session.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub cipher: Cipher,
    pub psk: Bytes,
    /// Maximum early-data size the ticket authorizes, 0 if the peer didn't
    /// advertise an `EarlyData` extension.
    pub max_early_data_size: u32,
    pub ticket_info: SessionTicketInfo,
}

/// The shared ticket/resumption cache. `establish` and `invalidate` must be
/// safe to call concurrently from multiple sessions.
#[async_trait]
pub trait SessionManager: Send + Sync {
    async fn establish(&self, label: Bytes, data: SessionData);

    /// Idempotent: invalidating an id that was never established, or that
    /// has already been invalidated, is not an error.
    async fn invalidate(&self, id: &[u8]);
}
