//! Handshake State (HS) -- §3 and §4.5 of SPEC_FULL.md.
//!
//! A mutable record threaded through handshake operations. Certificate
//! validation and the wire forms of keys/certificates are out of scope
//! (SPEC_FULL.md §1); the types below carry them as opaque DER blobs.

use bytes::Bytes;

use crate::hash::HandshakeDigest;
use crate::protocol_version::ProtocolVersion;

/// An opaque DER-encoded certificate, as it would be handed to / received
/// from the out-of-scope certificate-validation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDer(pub Bytes);

/// An opaque long-term asymmetric key (public or private); the concrete
/// signature/KEM algorithm is a concern of the out-of-scope handshake
/// negotiation and credential-selection collaborators.
#[derive(Debug, Clone)]
pub struct LongTermKey(pub Bytes);

/// The `CertificateRequest` payload received from the peer, retained so a
/// later post-handshake client-auth flow (driven through the PAQ) knows
/// what was asked for.
#[derive(Debug, Clone, Default)]
pub struct CertificateRequestInfo {
    pub certificate_types: Vec<u8>,
    pub signature_algorithms: Vec<u16>,
    pub certificate_authorities: Vec<Bytes>,
}

/// Per-handshake mutable state: transcript bookkeeping plus the small set
/// of negotiated values needed by the post-handshake control plane this
/// crate implements. Created when a handshake begins; in TLS 1.3 this is
/// re-created only via key-schedule transitions, never via renegotiation
/// (SPEC_FULL.md §3).
pub struct HandshakeState {
    pub client_version: ProtocolVersion,
    pub client_random: [u8; 32],
    pub server_random: Option<[u8; 32]>,
    pub master_secret: Option<Bytes>,
    pub resumption_master_secret: Option<Bytes>,

    pub local_key: Option<LongTermKey>,
    pub peer_key: Option<LongTermKey>,

    digest: HandshakeDigest,
    /// Reverse-ordered (most recent first); `get_handshake_messages` returns
    /// it reversed back into chronological order.
    messages: Vec<Bytes>,

    pub certificate_request: Option<CertificateRequestInfo>,
    pub client_cert_sent: bool,
    pub cert_req_sent: bool,
    pub client_cert_chain: Option<Vec<CertificateDer>>,
}

impl HandshakeState {
    pub fn new(client_version: ProtocolVersion, client_random: [u8; 32], digest: HandshakeDigest) -> Self {
        Self {
            client_version,
            client_random,
            server_random: None,
            master_secret: None,
            resumption_master_secret: None,
            local_key: None,
            peer_key: None,
            digest,
            messages: Vec::new(),
            certificate_request: None,
            client_cert_sent: false,
            cert_req_sent: false,
            client_cert_chain: None,
        }
    }

    /// Prepends `message` to the transcript list. Must be paired with a
    /// call to [Self::update_handshake_digest] with the same bytes -- the
    /// two are updated together by the caller; divergence is a bug
    /// (SPEC_FULL.md §4.5).
    pub fn add_handshake_message(&mut self, message: Bytes) {
        self.messages.insert(0, message);
    }

    /// Returns the transcript in chronological (send/receive) order.
    pub fn get_handshake_messages(&self) -> Vec<Bytes> {
        let mut out = self.messages.clone();
        out.reverse();
        out
    }

    pub fn update_handshake_digest(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// The current transcript hash, for use by key-schedule derivations.
    pub fn transcript_hash(&self) -> Vec<u8> {
        self.digest.current()
    }

    pub fn digest(&self) -> &HandshakeDigest {
        &self.digest
    }
}
