//! End-to-end scenario tests (S1-S6) against the public driver API.
//!
//! The record layer and session manager are hand-written scripted fakes --
//! the same "no I/O" style this crate treats the real collaborators as
//! satisfying (SPEC_FULL.md §13).

use std::collections::VecDeque;
use std::sync::Arc;

use async_std::sync::Mutex;
use async_trait::async_trait;
use bytes::Bytes;

use tls_session::cipher_suite::Cipher;
use tls_session::context::Context;
use tls_session::established::Established;
use tls_session::handshake_driver::{HandshakeDriver, HandshakeTrigger};
use tls_session::handshake_messages::{Handshake13, HandshakeExtension, HandshakeType, KeyUpdate, KeyUpdateRequest, NewSessionTicket};
use tls_session::handshake_state::HandshakeState;
use tls_session::hash::{Hash, HandshakeDigest};
use tls_session::options::DriverOptions;
use tls_session::paq::PendingAction;
use tls_session::protocol_version::ProtocolVersion;
use tls_session::record::{Packet, Packet13};
use tls_session::record_layer::{RecordLayer, TrafficState};
use tls_session::session_manager::{SessionData, SessionManager};
use tls_session::{bye as send_bye, recv_data, send_data, update_key, TLSError};

struct MockRecordLayer {
    recv_12: Mutex<VecDeque<Result<Packet, TLSError>>>,
    recv_13: Mutex<VecDeque<Result<Packet13, TLSError>>>,
    sent_12: Mutex<Vec<Packet>>,
    sent_13: Mutex<Vec<Packet13>>,
    rx_state: Mutex<TrafficState>,
    tx_state: Mutex<TrafficState>,
}

fn default_traffic_state() -> TrafficState {
    TrafficState::new(Hash::Sha256, Cipher::TlsAes128GcmSha256, Bytes::from_static(&[0x42; 32]))
}

/// Installs a logger so `RUST_LOG`-gated `log` output from the driver (see
/// SPEC_FULL.md §13) is visible when these tests are run with
/// `--nocapture`. Safe to call from every test: `try_init` no-ops after the
/// first successful call.
fn init_logging() {
    let _ = env_logger::try_init();
}

impl MockRecordLayer {
    fn new_12(queue: Vec<Result<Packet, TLSError>>) -> Self {
        Self {
            recv_12: Mutex::new(queue.into()),
            recv_13: Mutex::new(VecDeque::new()),
            sent_12: Mutex::new(Vec::new()),
            sent_13: Mutex::new(Vec::new()),
            rx_state: Mutex::new(default_traffic_state()),
            tx_state: Mutex::new(default_traffic_state()),
        }
    }

    fn new_13(queue: Vec<Result<Packet13, TLSError>>) -> Self {
        Self {
            recv_12: Mutex::new(VecDeque::new()),
            recv_13: Mutex::new(queue.into()),
            sent_12: Mutex::new(Vec::new()),
            sent_13: Mutex::new(Vec::new()),
            rx_state: Mutex::new(default_traffic_state()),
            tx_state: Mutex::new(default_traffic_state()),
        }
    }
}

#[async_trait]
impl RecordLayer for MockRecordLayer {
    async fn recv_packet(&self) -> Result<Packet, TLSError> {
        self.recv_12.lock().await.pop_front().unwrap_or(Err(TLSError::EOF))
    }

    async fn recv_packet_13(&self) -> Result<Packet13, TLSError> {
        self.recv_13.lock().await.pop_front().unwrap_or(Err(TLSError::EOF))
    }

    async fn send_packet(&self, packet: Packet) -> Result<(), TLSError> {
        self.sent_12.lock().await.push(packet);
        Ok(())
    }

    async fn send_packet_13(&self, packet: Packet13) -> Result<(), TLSError> {
        self.sent_13.lock().await.push(packet);
        Ok(())
    }

    async fn get_rx_state(&self) -> TrafficState {
        self.rx_state.lock().await.clone()
    }

    async fn set_rx_state(&self, state: TrafficState) {
        *self.rx_state.lock().await = state;
    }

    async fn get_tx_state(&self) -> TrafficState {
        self.tx_state.lock().await.clone()
    }

    async fn set_tx_state(&self, state: TrafficState) {
        *self.tx_state.lock().await = state;
    }
}

#[derive(Default)]
struct MockSessionManager {
    established: Mutex<Vec<(Bytes, SessionData)>>,
    invalidated: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl SessionManager for MockSessionManager {
    async fn establish(&self, label: Bytes, data: SessionData) {
        self.established.lock().await.push((label, data));
    }

    async fn invalidate(&self, id: &[u8]) {
        self.invalidated.lock().await.push(id.to_vec());
    }
}

struct NoopHandshakeDriver;

#[async_trait]
impl HandshakeDriver for NoopHandshakeDriver {
    async fn handshake_with(&self, _ctx: &Context, _trigger: HandshakeTrigger) -> Result<(), tls_session::TLSError> {
        Ok(())
    }
}

fn make_context(version: ProtocolVersion, record_layer: Arc<MockRecordLayer>) -> Context {
    Context::new(
        record_layer,
        Arc::new(MockSessionManager::default()),
        Arc::new(NoopHandshakeDriver),
        DriverOptions::recommended(),
        version,
        default_traffic_state(),
        default_traffic_state(),
    )
}

#[async_std::test]
async fn s1_tls12_clean_close() {
    init_logging();
    use tls_session::alert::{AlertDescription, AlertLevel};

    let rl = Arc::new(MockRecordLayer::new_12(vec![
        Ok(Packet::AppData(Bytes::from_static(b"hi"))),
        Ok(Packet::Alert(vec![(AlertLevel::Warning, AlertDescription::CloseNotify)])),
    ]));
    let ctx = make_context(ProtocolVersion::Tls12, rl.clone());

    let first = recv_data(&ctx).await.unwrap();
    assert_eq!(&first[..], b"hi");

    let second = recv_data(&ctx).await.unwrap();
    assert!(second.is_empty());

    assert!(ctx.is_eof().await);
    let sent = rl.sent_12.lock().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Packet::Alert(alerts) => {
            assert_eq!(alerts, &vec![(AlertLevel::Warning, AlertDescription::CloseNotify)]);
        }
        other => panic!("expected close_notify alert, got {:?}", other),
    }
}

#[async_std::test]
async fn s2_tls12_fatal_alert() {
    init_logging();
    use tls_session::alert::{AlertDescription, AlertLevel};

    let rl = Arc::new(MockRecordLayer::new_12(vec![Ok(Packet::Alert(vec![(
        AlertLevel::Fatal,
        AlertDescription::HandshakeFailure,
    )]))]));
    let ctx = make_context(ProtocolVersion::Tls12, rl);

    let err = recv_data(&ctx).await.unwrap_err();
    match err {
        TLSError::Terminated { clean, reason, .. } => {
            assert!(clean);
            assert_eq!(reason, "received fatal error: HandshakeFailure");
        }
        other => panic!("expected Terminated, got {:?}", other),
    }
    assert!(ctx.is_eof().await);
}

#[async_std::test]
async fn s3_tls13_empty_app_data_is_skipped() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![
        Ok(Packet13::AppData13(Bytes::new())),
        Ok(Packet13::AppData13(Bytes::from_static(b"x"))),
    ]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    ctx.shared().await.established = Established::Established;

    let chunk = recv_data(&ctx).await.unwrap();
    assert_eq!(&chunk[..], b"x");
}

#[async_std::test]
async fn s4_tls13_early_data_overflow() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![Ok(Packet13::AppData13(Bytes::from_static(
        b"abcde",
    )))]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    ctx.shared().await.established = Established::EarlyDataAllowed(4);

    let err = recv_data(&ctx).await.unwrap_err();
    match err {
        TLSError::Terminated { reason, .. } => assert_eq!(reason, "early data overflow"),
        other => panic!("expected Terminated, got {:?}", other),
    }
}

#[async_std::test]
async fn s5_tls13_key_update_requested_rekeys_in_order() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![
        Ok(Packet13::Handshake13(vec![Handshake13::KeyUpdate(KeyUpdate {
            request_update: KeyUpdateRequest::UpdateRequested,
        })])),
        Err(TLSError::EOF),
    ]));
    let ctx = make_context(ProtocolVersion::Tls13, rl.clone());
    ctx.shared().await.established = Established::Established;

    let rx_before = rl.get_rx_state().await.traffic_secret.clone();
    let tx_before = rl.get_tx_state().await.traffic_secret.clone();

    let result = recv_data(&ctx).await.unwrap();
    assert!(result.is_empty());

    let rx_after = rl.get_rx_state().await.traffic_secret.clone();
    let tx_after = rl.get_tx_state().await.traffic_secret.clone();
    assert_ne!(rx_before, rx_after);
    assert_ne!(tx_before, tx_after);

    let sent = rl.sent_13.lock().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Packet13::Handshake13(messages) => match &messages[..] {
            [Handshake13::KeyUpdate(KeyUpdate { request_update })] => {
                assert_eq!(*request_update, KeyUpdateRequest::UpdateNotRequested);
            }
            other => panic!("expected a single KeyUpdate message, got {:?}", other),
        },
        other => panic!("expected Handshake13, got {:?}", other),
    }
}

#[async_std::test]
async fn s6_application_initiated_two_way_update() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![]));
    let ctx = make_context(ProtocolVersion::Tls13, rl.clone());
    ctx.shared().await.established = Established::Established;

    let rx_before = rl.get_rx_state().await.traffic_secret.clone();
    let tx_before = rl.get_tx_state().await.traffic_secret.clone();

    let updated = update_key(&ctx, KeyUpdateRequest::UpdateRequested).await.unwrap();
    assert!(updated);

    let rx_after = rl.get_rx_state().await.traffic_secret.clone();
    let tx_after = rl.get_tx_state().await.traffic_secret.clone();
    assert_eq!(rx_before, rx_after, "rx secret must not change from a local update_key call");
    assert_ne!(tx_before, tx_after);

    let sent = rl.sent_13.lock().await;
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        Packet13::Handshake13(messages) => match &messages[..] {
            [Handshake13::KeyUpdate(KeyUpdate { request_update })] => {
                assert_eq!(*request_update, KeyUpdateRequest::UpdateRequested);
            }
            other => panic!("expected a single KeyUpdate message, got {:?}", other),
        },
        other => panic!("expected Handshake13, got {:?}", other),
    }
}

#[async_std::test]
async fn update_key_on_tls12_is_a_noop() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_12(vec![]));
    let ctx = make_context(ProtocolVersion::Tls12, rl.clone());

    let updated = update_key(&ctx, KeyUpdateRequest::OneWay).await.unwrap();
    assert!(!updated);
    assert!(rl.sent_12.lock().await.is_empty());
    assert!(rl.sent_13.lock().await.is_empty());
}

#[async_std::test]
async fn send_data_chunks_at_the_configured_fragment_size() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![]));
    let mut options = DriverOptions::recommended();
    options.max_fragment_size = 4;
    let ctx = Context::new(
        rl.clone(),
        Arc::new(MockSessionManager::default()),
        Arc::new(NoopHandshakeDriver),
        options,
        ProtocolVersion::Tls13,
        default_traffic_state(),
        default_traffic_state(),
    );

    send_data(&ctx, b"0123456789").await.unwrap();

    let sent = rl.sent_13.lock().await;
    assert_eq!(sent.len(), 3);
    match (&sent[0], &sent[1], &sent[2]) {
        (Packet13::AppData13(a), Packet13::AppData13(b), Packet13::AppData13(c)) => {
            assert_eq!(&a[..], b"0123");
            assert_eq!(&b[..], b"4567");
            assert_eq!(&c[..], b"89");
        }
        other => panic!("expected three AppData13 chunks, got {:?}", other),
    }
}

#[async_std::test]
async fn bye_sends_close_notify_once() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_12(vec![]));
    let ctx = make_context(ProtocolVersion::Tls12, rl.clone());

    send_bye(&ctx).await.unwrap();
    assert_eq!(rl.sent_12.lock().await.len(), 1);

    ctx.set_eof().await;
    send_bye(&ctx).await.unwrap();
    assert_eq!(rl.sent_12.lock().await.len(), 1, "bye after eof must not send again");
}

#[async_std::test]
async fn new_session_ticket_installs_resumption_psk() {
    init_logging();
    let ticket = NewSessionTicket {
        ticket_lifetime: 7200,
        ticket_age_add: 0xaabbccdd,
        ticket_nonce: Bytes::from_static(b"\x00"),
        ticket: Bytes::from_static(b"opaque-ticket-label"),
        extensions: vec![HandshakeExtension::EarlyData { max_size: 1024 }],
    };
    let rl = Arc::new(MockRecordLayer::new_13(vec![
        Ok(Packet13::Handshake13(vec![Handshake13::NewSessionTicket(ticket)])),
        Err(TLSError::EOF),
    ]));
    let session_manager = Arc::new(MockSessionManager::default());
    let ctx = Context::new(
        rl.clone(),
        session_manager.clone(),
        Arc::new(NoopHandshakeDriver),
        DriverOptions::recommended(),
        ProtocolVersion::Tls13,
        default_traffic_state(),
        default_traffic_state(),
    );
    ctx.shared().await.established = Established::Established;
    let mut handshake = HandshakeState::new(ProtocolVersion::Tls13, [0u8; 32], HandshakeDigest::new(Hash::Sha256));
    handshake.resumption_master_secret = Some(Bytes::from_static(&[0x77; 32]));
    ctx.shared().await.handshake = Some(handshake);

    let result = recv_data(&ctx).await.unwrap();
    assert!(result.is_empty());

    let established = session_manager.established.lock().await;
    assert_eq!(established.len(), 1);
    let (label, data) = &established[0];
    assert_eq!(&label[..], b"opaque-ticket-label");
    assert_eq!(data.max_early_data_size, 1024);
    assert_eq!(data.psk.len(), Hash::Sha256.size());
    assert_eq!(data.ticket_info.lifetime_seconds, 7200);
    assert_eq!(data.ticket_info.age_add, 0xaabbccdd);
}

/// A pending action that records whether it ran via a shared flag, so the
/// test can observe it after the queue has taken ownership of the box.
struct RecordingAction {
    ran: Arc<Mutex<bool>>,
}

#[async_trait]
impl PendingAction for RecordingAction {
    async fn run(&self, _ctx: &Context, message: Handshake13) -> Result<(), TLSError> {
        match message {
            Handshake13::Other(HandshakeType::CertificateVerify, _) => {
                *self.ran.lock().await = true;
                Ok(())
            }
            other => panic!("unexpected message handed to pending action: {:?}", other),
        }
    }
}

#[async_std::test]
async fn pending_action_present_is_invoked_under_read_write_lock() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![
        Ok(Packet13::Handshake13(vec![Handshake13::Other(
            HandshakeType::CertificateVerify,
            Bytes::from_static(b"sig"),
        )])),
        Err(TLSError::EOF),
    ]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    ctx.shared().await.established = Established::Established;

    let ran = Arc::new(Mutex::new(false));
    ctx.shared().await.pending_actions.push(Box::new(RecordingAction { ran: ran.clone() }));

    let result = recv_data(&ctx).await.unwrap();
    assert!(result.is_empty());
    assert!(*ran.lock().await, "pending action should have run");
}

#[async_std::test]
async fn pending_action_absent_is_fatal() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![Ok(Packet13::Handshake13(vec![Handshake13::Other(
        HandshakeType::CertificateVerify,
        Bytes::from_static(b"sig"),
    )]))]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    ctx.shared().await.established = Established::Established;

    let err = recv_data(&ctx).await.unwrap_err();
    match err {
        TLSError::Terminated { reason, .. } => {
            assert!(reason.contains("unexpected message"), "unexpected reason: {}", reason);
        }
        other => panic!("expected Terminated, got {:?}", other),
    }
}

#[async_std::test]
async fn client_hello_13_is_illegal_post_handshake() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![Ok(Packet13::Handshake13(vec![
        Handshake13::ClientHello13(Bytes::from_static(b"hello")),
    ]))]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    ctx.shared().await.established = Established::Established;

    let err = recv_data(&ctx).await.unwrap_err();
    match err {
        TLSError::Terminated { reason, .. } => {
            assert!(reason.contains("illegal post-handshake"), "unexpected reason: {}", reason);
        }
        other => panic!("expected Terminated, got {:?}", other),
    }
}

#[async_std::test]
async fn key_update_outside_established_is_fatal() {
    init_logging();
    let rl = Arc::new(MockRecordLayer::new_13(vec![Ok(Packet13::Handshake13(vec![Handshake13::KeyUpdate(
        KeyUpdate {
            request_update: KeyUpdateRequest::UpdateNotRequested,
        },
    )]))]));
    let ctx = make_context(ProtocolVersion::Tls13, rl);
    // Established::NotEstablished is the default -- KeyUpdate must be rejected.

    let err = recv_data(&ctx).await.unwrap_err();
    match err {
        TLSError::Terminated { reason, .. } => {
            assert!(reason.contains("KeyUpdate outside Established"), "unexpected reason: {}", reason);
        }
        other => panic!("expected Terminated, got {:?}", other),
    }
}
