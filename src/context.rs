//! Connection-wide state (§5 of SPEC_FULL.md).
//!
//! `Context` is the object every driver operation is a method on: it owns
//! the two collaborator trait objects (record layer, session manager), the
//! read lock / read-write lock pair that give the receive loop and the
//! send/control paths their mutual-exclusion semantics, and the mutable
//! connection state those locks protect.

use std::sync::Arc;

use async_std::sync::Mutex;
use bytes::Bytes;

use crate::established::Established;
use crate::handshake_driver::HandshakeDriver;
use crate::handshake_state::HandshakeState;
use crate::options::DriverOptions;
use crate::paq::PendingActionQueue;
use crate::protocol_version::ProtocolVersion;
use crate::record_layer::{RecordLayer, TrafficState};
use crate::session_manager::SessionManager;

/// Everything guarded by the read-write lock: state that both the receive
/// loop and the send/control paths may need to observe or mutate.
pub struct SharedState {
    pub established: Established,
    pub eof: bool,
    pub rx_state: TrafficState,
    pub tx_state: TrafficState,
    pub handshake: Option<HandshakeState>,
    pub pending_actions: PendingActionQueue,
    pub negotiated_protocol: Option<String>,
    pub client_sni: Option<String>,
    /// The session identifier presented to the Session Manager on
    /// establishment, if any; consulted by `terminate` (SPEC_FULL.md §4.3).
    pub session_id: Option<Bytes>,
}

/// Connection-wide driver state.
///
/// Mirrors the teacher's `Connection`/`Cipher` split between a thin outer
/// handle and an inner mutex-guarded state struct: callers clone the `Arc`
/// freely, and only the fields that actually need cross-task synchronization
/// sit behind a lock.
pub struct Context {
    record_layer: Arc<dyn RecordLayer>,
    session_manager: Arc<dyn SessionManager>,
    handshake_driver: Arc<dyn HandshakeDriver>,
    options: DriverOptions,
    version: ProtocolVersion,

    /// Held for the duration of a single `recv_data` call, serializing
    /// concurrent receivers against each other (SPEC_FULL.md §5).
    read_lock: Mutex<()>,
    /// Held whenever a caller needs a consistent view across `recv_data` and
    /// the control operations (`send_data`, `bye`, `update_key`): taken
    /// shared by `recv_data`, exclusive by everything else that reaches into
    /// `shared`.
    read_write_lock: Mutex<()>,

    shared: Mutex<SharedState>,
}

impl Context {
    pub fn new(
        record_layer: Arc<dyn RecordLayer>,
        session_manager: Arc<dyn SessionManager>,
        handshake_driver: Arc<dyn HandshakeDriver>,
        options: DriverOptions,
        version: ProtocolVersion,
        rx_state: TrafficState,
        tx_state: TrafficState,
    ) -> Self {
        Self {
            record_layer,
            session_manager,
            handshake_driver,
            options,
            version,
            read_lock: Mutex::new(()),
            read_write_lock: Mutex::new(()),
            shared: Mutex::new(SharedState {
                established: Established::NotEstablished,
                eof: false,
                rx_state,
                tx_state,
                handshake: None,
                pending_actions: PendingActionQueue::new(),
                negotiated_protocol: None,
                client_sni: None,
                session_id: None,
            }),
        }
    }

    pub fn record_layer(&self) -> &Arc<dyn RecordLayer> {
        &self.record_layer
    }

    pub fn session_manager(&self) -> &Arc<dyn SessionManager> {
        &self.session_manager
    }

    pub fn handshake_driver(&self) -> &Arc<dyn HandshakeDriver> {
        &self.handshake_driver
    }

    pub fn options(&self) -> &DriverOptions {
        &self.options
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    /// Acquired by `recv_data` for the lifetime of a single receive
    /// operation; see SPEC_FULL.md §5 for why this is a separate lock from
    /// `read_write_lock` rather than folded into it.
    pub async fn acquire_read(&self) -> async_std::sync::MutexGuard<'_, ()> {
        self.read_lock.lock().await
    }

    pub async fn acquire_read_write(&self) -> async_std::sync::MutexGuard<'_, ()> {
        self.read_write_lock.lock().await
    }

    pub async fn shared(&self) -> async_std::sync::MutexGuard<'_, SharedState> {
        self.shared.lock().await
    }

    pub async fn get_negotiated_protocol(&self) -> Option<String> {
        self.shared().await.negotiated_protocol.clone()
    }

    pub async fn get_client_sni(&self) -> Option<String> {
        self.shared().await.client_sni.clone()
    }

    pub async fn is_established(&self) -> bool {
        self.shared().await.established.is_established()
    }

    pub async fn is_eof(&self) -> bool {
        self.shared().await.eof
    }

    pub async fn set_eof(&self) {
        self.shared().await.eof = true;
    }
}
