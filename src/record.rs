//! Record-level message sum types (§3 of SPEC_FULL.md).
//!
//! These are the decoded, demultiplexed values the record layer collaborator
//! hands up to the driver -- one per `recv_packet`/`recv_packet_13` call.

use bytes::Bytes;

use crate::alert::{AlertDescription, AlertLevel};
use crate::handshake_messages::{Handshake, Handshake13};

/// A decoded TLS <= 1.2 record.
#[derive(Debug, Clone)]
pub enum Packet {
    Handshake(Vec<Handshake>),
    Alert(Vec<(AlertLevel, AlertDescription)>),
    AppData(Bytes),
    ChangeCipherSpec,
}

/// A decoded TLS 1.3 record.
#[derive(Debug, Clone)]
pub enum Packet13 {
    Handshake13(Vec<Handshake13>),
    Alert13(Vec<(AlertLevel, AlertDescription)>),
    AppData13(Bytes),
    /// Legacy middlebox-compatibility record; always ignored.
    ChangeCipherSpec13,
}
