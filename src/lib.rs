//! Post-handshake record-layer driver and TLS 1.3 handshake-message
//! dispatcher.
//!
//! Drives an already-negotiated TLS session: decrypts and demultiplexes
//! incoming records, enforces the TLS <= 1.2 / TLS 1.3 post-handshake
//! invariants, services `KeyUpdate`/`NewSessionTicket`, and converges every
//! failure path on a single well-defined termination. Record framing and
//! encryption, the initial handshake negotiation, certificate validation,
//! and the raw cryptographic primitives are collaborators this crate only
//! depends on the signature of -- see [RecordLayer], [SessionManager], and
//! [HandshakeDriver].

pub mod alert;
pub mod alert_termination;
pub mod cipher_suite;
pub mod context;
pub mod error;
pub mod established;
pub mod handshake_driver;
pub mod handshake_messages;
pub mod handshake_state;
pub mod hash;
pub mod key_schedule;
pub mod options;
pub mod paq;
pub mod protocol_version;
pub mod record;
pub mod record_layer;
pub mod rx;
pub mod session_manager;
pub mod tx;

pub use alert::{Alert, AlertDescription, AlertLevel};
pub use context::Context;
pub use error::TLSError;
pub use established::Established;
pub use handshake_driver::{HandshakeDriver, HandshakeTrigger};
pub use handshake_messages::KeyUpdateRequest;
pub use options::DriverOptions;
pub use paq::{PendingAction, PendingActionQueue};
pub use protocol_version::ProtocolVersion;
pub use record_layer::{RecordLayer, TrafficState};
pub use session_manager::{SessionData, SessionManager};

pub use rx::recv_data;
#[allow(deprecated)]
pub use tx::recv_data_lazy;
pub use tx::{bye, send_data, update_key};
