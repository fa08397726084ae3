//! The downward (record-layer) collaborator interface (§6 of SPEC_FULL.md).
//!
//! Record framing, encryption, and the initial handshake negotiation that
//! establishes the first set of traffic secrets are all out of scope for
//! this crate -- a concrete transport/codec satisfies this trait and the
//! driver depends only on it.

use async_trait::async_trait;
use bytes::Bytes;

use crate::cipher_suite::Cipher;
use crate::error::TLSError;
use crate::hash::Hash;
use crate::record::{Packet, Packet13};

/// `(Hash, Cipher, trafficSecret)` -- everything needed to describe one
/// direction's current key material without this crate needing to know how
/// the AEAD itself is seeded from it.
#[derive(Debug, Clone)]
pub struct TrafficState {
    pub hash: Hash,
    pub cipher: Cipher,
    pub traffic_secret: Bytes,
}

impl TrafficState {
    pub fn new(hash: Hash, cipher: Cipher, traffic_secret: Bytes) -> Self {
        Self {
            hash,
            cipher,
            traffic_secret,
        }
    }

    /// Returns the state with the traffic secret advanced by one KeyUpdate,
    /// keeping the same hash and cipher (SPEC_FULL.md §4.4).
    pub fn advanced(&self) -> Self {
        let next = crate::key_schedule::next_traffic_secret(self.hash, &self.traffic_secret);
        Self {
            hash: self.hash,
            cipher: self.cipher,
            traffic_secret: next,
        }
    }
}

/// The record layer: framing, encryption, and the raw packet transport.
///
/// `recv_packet`/`recv_packet_13` pull and decrypt exactly one record;
/// `send_packet`/`send_packet_13` encrypt and write exactly one record. The
/// `*_state` accessors read/replace the `(Hash, Cipher, secret)` triple used
/// for one direction -- `set_rx_state`/`set_tx_state` are how a KeyUpdate
/// takes effect starting with the next record read/sent.
#[async_trait]
pub trait RecordLayer: Send + Sync {
    async fn recv_packet(&self) -> Result<Packet, TLSError>;
    async fn recv_packet_13(&self) -> Result<Packet13, TLSError>;

    async fn send_packet(&self, packet: Packet) -> Result<(), TLSError>;
    async fn send_packet_13(&self, packet: Packet13) -> Result<(), TLSError>;

    async fn get_rx_state(&self) -> TrafficState;
    async fn set_rx_state(&self, state: TrafficState);

    async fn get_tx_state(&self) -> TrafficState;
    async fn set_tx_state(&self, state: TrafficState);
}
