//! Typed, already-parsed handshake message payloads.
//!
//! Wire-level encoding/decoding is explicitly out of scope for this crate
//! (see SPEC_FULL.md "Non-goals") -- the record layer collaborator is
//! responsible for turning bytes into these values before handing a
//! [crate::record::Packet]/[crate::record::Packet13] up to the driver.

use bytes::Bytes;

/// https://tools.ietf.org/html/rfc8446#section-4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeType {
    ClientHello,
    ServerHello,
    NewSessionTicket,
    EndOfEarlyData,
    EncryptedExtensions,
    Certificate,
    CertificateRequest,
    CertificateVerify,
    Finished,
    KeyUpdate,
    MessageHash,
}

/// A TLS <= 1.2 handshake message. Only the two variants the receive loop
/// itself discriminates on (to trigger renegotiation) are named; everything
/// else is carried as an opaque, already-classified payload.
#[derive(Debug, Clone)]
pub enum Handshake {
    ClientHello(Bytes),
    HelloRequest,
    Other(HandshakeType, Bytes),
}

/// A TLS 1.3 handshake message appearing in a post-handshake
/// `Handshake13` record.
#[derive(Debug, Clone)]
pub enum Handshake13 {
    /// Illegal post-handshake: RFC 8446 forbids renegotiation.
    ClientHello13(Bytes),
    NewSessionTicket(NewSessionTicket),
    KeyUpdate(KeyUpdate),
    /// Anything else (CertificateRequest / Certificate / CertificateVerify /
    /// Finished / EncryptedExtensions / EndOfEarlyData / ...) is routed to
    /// the pending-action queue rather than interpreted here.
    Other(HandshakeType, Bytes),
}

/// https://tools.ietf.org/html/rfc8446#section-4.6.1
#[derive(Debug, Clone)]
pub struct NewSessionTicket {
    pub ticket_lifetime: u32,
    pub ticket_age_add: u32,
    pub ticket_nonce: Bytes,
    pub ticket: Bytes,
    pub extensions: Vec<HandshakeExtension>,
}

impl NewSessionTicket {
    /// The non-negative max early-data size advertised by an `EarlyData`
    /// extension, or 0 if absent (SPEC_FULL.md §4.1.3 step 4).
    pub fn early_data_max_size(&self) -> u32 {
        for ext in &self.extensions {
            if let HandshakeExtension::EarlyData { max_size } = ext {
                return *max_size;
            }
        }
        0
    }
}

#[derive(Debug, Clone)]
pub enum HandshakeExtension {
    EarlyData { max_size: u32 },
    Unknown,
}

/// https://tools.ietf.org/html/rfc8446#section-4.6.3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUpdateRequest {
    UpdateNotRequested,
    UpdateRequested,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyUpdate {
    pub request_update: KeyUpdateRequest,
}
