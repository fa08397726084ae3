//! Receive Loop (RX) -- §4.1 of SPEC_FULL.md.
//!
//! The heart of the driver: pulls one plaintext record at a time under the
//! read lock, classifies it, and either returns application data, loops
//! back for more, or terminates the session.

use bytes::Bytes;
use log::{debug, info, trace, warn};

use crate::alert::{AlertDescription, AlertLevel};
use crate::alert_termination::{on_error, terminate};
use crate::context::Context;
use crate::established::Established;
use crate::error::TLSError;
use crate::handshake_driver::HandshakeTrigger;
use crate::handshake_messages::{Handshake, Handshake13, HandshakeType, KeyUpdate, KeyUpdateRequest};
use crate::key_schedule;
use crate::record::{Packet, Packet13};
use crate::session_manager::{SessionData, SessionTicketInfo};
use crate::tx;

/// Returns the next non-empty chunk of application data, or an empty
/// byte-string on clean peer close. Fails with `Terminated` on fatal
/// protocol errors or fatal peer alerts.
pub async fn recv_data(ctx: &Context) -> Result<Bytes, TLSError> {
    if ctx.is_eof().await {
        return Ok(Bytes::new());
    }

    if ctx.version().is_tls13() {
        recv_data_13(ctx).await
    } else {
        recv_data_12(ctx).await
    }
}

async fn recv_data_12(ctx: &Context) -> Result<Bytes, TLSError> {
    loop {
        let packet = {
            let _read = ctx.acquire_read().await;
            ctx.record_layer().recv_packet().await
        };

        let packet = match packet {
            Ok(p) => p,
            Err(e) => {
                if let Err(terminated) = on_error(ctx, e).await {
                    return Err(terminated);
                }
                return Ok(Bytes::new());
            }
        };

        match packet {
            Packet::Handshake(messages) => {
                for message in messages {
                    match message {
                        Handshake::ClientHello(bytes) => {
                            if !ctx.options().allow_server_renegotiation {
                                let underlying = failure::err_msg("server-side renegotiation disabled");
                                return Err(terminate(
                                    ctx,
                                    underlying,
                                    AlertLevel::Fatal,
                                    AlertDescription::HandshakeFailure,
                                    "server-side renegotiation is disabled",
                                )
                                .await);
                            }
                            debug!("inbound ClientHello, entering server-side renegotiation");
                            ctx.handshake_driver()
                                .handshake_with(ctx, HandshakeTrigger::ClientHello(bytes))
                                .await?;
                        }
                        Handshake::HelloRequest => {
                            debug!("inbound HelloRequest, entering client-side renegotiation");
                            ctx.handshake_driver()
                                .handshake_with(ctx, HandshakeTrigger::HelloRequest)
                                .await?;
                        }
                        Handshake::Other(kind, _) => {
                            return Err(unexpected_message(ctx, kind).await);
                        }
                    }
                }
            }
            Packet::Alert(alerts) => {
                if let Some(result) = handle_alerts_12(ctx, alerts).await? {
                    return Ok(result);
                }
            }
            Packet::AppData(data) => {
                if data.is_empty() {
                    trace!("dropping zero-length AppData record");
                    continue;
                }
                return Ok(data);
            }
            Packet::ChangeCipherSpec => {
                return Err(unexpected(ctx, "unexpected ChangeCipherSpec record").await);
            }
        }
    }
}

/// Processes an `Alert` list from a <=1.2 record; returns `Some(bytes)` when
/// the loop should return immediately, `None` to keep reading.
async fn handle_alerts_12(
    ctx: &Context,
    alerts: Vec<(AlertLevel, AlertDescription)>,
) -> Result<Option<Bytes>, TLSError> {
    for (level, description) in alerts {
        match level {
            AlertLevel::Warning if description == AlertDescription::CloseNotify => {
                info!("received close_notify, closing session");
                let _ = tx::bye(ctx).await;
                ctx.set_eof().await;
                return Ok(Some(Bytes::new()));
            }
            AlertLevel::Fatal => {
                ctx.set_eof().await;
                let reason = format!("received fatal error: {:?}", description);
                let cause = failure::Error::from(TLSError::protocol("remote side fatal error", true, description));
                return Err(TLSError::Terminated { clean: true, reason, cause });
            }
            AlertLevel::Warning => {
                warn!("received non-fatal alert: {:?}", description);
            }
        }
    }
    Ok(None)
}

async fn recv_data_13(ctx: &Context) -> Result<Bytes, TLSError> {
    loop {
        let packet = {
            let _read = ctx.acquire_read().await;
            ctx.record_layer().recv_packet_13().await
        };

        let packet = match packet {
            Ok(p) => p,
            Err(e) => {
                if let Err(terminated) = on_error(ctx, e).await {
                    return Err(terminated);
                }
                return Ok(Bytes::new());
            }
        };

        match packet {
            Packet13::Handshake13(messages) => {
                if let Some(result) = process_handshake_13(ctx, messages).await? {
                    return Ok(result);
                }
            }
            Packet13::Alert13(alerts) => {
                if let Some(result) = handle_alerts_13(ctx, alerts).await? {
                    return Ok(result);
                }
            }
            Packet13::AppData13(data) => {
                if data.is_empty() {
                    trace!("dropping zero-length AppData13 record");
                    continue;
                }
                if let Some(result) = handle_app_data_13(ctx, data).await? {
                    return Ok(result);
                }
            }
            Packet13::ChangeCipherSpec13 => {
                trace!("ignoring middlebox-compatibility ChangeCipherSpec13");
                continue;
            }
        }
    }
}

async fn handle_alerts_13(
    ctx: &Context,
    alerts: Vec<(AlertLevel, AlertDescription)>,
) -> Result<Option<Bytes>, TLSError> {
    handle_alerts_12(ctx, alerts).await
}

async fn handle_app_data_13(ctx: &Context, data: Bytes) -> Result<Option<Bytes>, TLSError> {
    let established = ctx.shared().await.established;
    match established {
        Established::EarlyDataAllowed(remaining) => {
            let len = data.len() as u32;
            if len > remaining {
                let underlying = failure::err_msg("early data overflow");
                return Err(terminate(
                    ctx,
                    underlying,
                    AlertLevel::Fatal,
                    AlertDescription::UnexpectedMessage,
                    "early data overflow",
                )
                .await);
            }
            ctx.shared().await.established = Established::EarlyDataAllowed(remaining - len);
            Ok(Some(data))
        }
        Established::EarlyDataNotAllowed => {
            trace!("dropping early data after 0-RTT rejection");
            Ok(None)
        }
        Established::Established => Ok(Some(data)),
        Established::NotEstablished => {
            let underlying = failure::err_msg("data at not-established");
            Err(terminate(
                ctx,
                underlying,
                AlertLevel::Fatal,
                AlertDescription::UnexpectedMessage,
                "data at not-established",
            )
            .await)
        }
    }
}

/// §4.1.3: walks a `Handshake13` message list in order.
async fn process_handshake_13(ctx: &Context, messages: Vec<Handshake13>) -> Result<Option<Bytes>, TLSError> {
    for message in messages {
        match message {
            Handshake13::NewSessionTicket(ticket) => {
                install_session_ticket(ctx, ticket).await?;
            }
            Handshake13::KeyUpdate(KeyUpdate {
                request_update: KeyUpdateRequest::UpdateNotRequested,
            }) => {
                require_established(ctx, "KeyUpdate outside Established").await?;
                rx_key_update(ctx).await;
                info!("rx traffic secret advanced by peer KeyUpdate");
            }
            Handshake13::KeyUpdate(KeyUpdate {
                request_update: KeyUpdateRequest::UpdateRequested,
            }) => {
                require_established(ctx, "KeyUpdate outside Established").await?;
                rx_key_update(ctx).await;
                let reply = KeyUpdate {
                    request_update: KeyUpdateRequest::UpdateNotRequested,
                };
                ctx.record_layer()
                    .send_packet_13(Packet13::Handshake13(vec![Handshake13::KeyUpdate(reply)]))
                    .await?;
                tx_key_update(ctx).await;
                info!("rx/tx traffic secrets advanced responding to peer KeyUpdate(UpdateRequested)");
            }
            Handshake13::ClientHello13(_) => {
                return Err(unexpected(ctx, "ClientHello13 is illegal post-handshake").await);
            }
            Handshake13::Other(kind, payload) => {
                let action = ctx.shared().await.pending_actions.pop();
                match action {
                    Some(action) => {
                        let _rw = ctx.acquire_read_write().await;
                        action.run(ctx, Handshake13::Other(kind, payload)).await?;
                    }
                    None => {
                        return Err(unexpected_message(ctx, kind).await);
                    }
                }
            }
        }
    }
    Ok(None)
}

async fn require_established(ctx: &Context, reason: &str) -> Result<(), TLSError> {
    if ctx.is_established().await {
        return Ok(());
    }
    let underlying = failure::err_msg(reason.to_string());
    Err(terminate(
        ctx,
        underlying,
        AlertLevel::Fatal,
        AlertDescription::UnexpectedMessage,
        reason.to_string(),
    )
    .await)
}

async fn rx_key_update(ctx: &Context) {
    let current = ctx.record_layer().get_rx_state().await;
    let next = current.advanced();
    ctx.record_layer().set_rx_state(next).await;
}

async fn tx_key_update(ctx: &Context) {
    let current = ctx.record_layer().get_tx_state().await;
    let next = current.advanced();
    ctx.record_layer().set_tx_state(next).await;
}

async fn install_session_ticket(
    ctx: &Context,
    ticket: crate::handshake_messages::NewSessionTicket,
) -> Result<(), TLSError> {
    let rms = {
        let shared = ctx.shared().await;
        match shared.handshake.as_ref().and_then(|hs| hs.resumption_master_secret.clone()) {
            Some(rms) => rms,
            None => return Ok(()),
        }
    };

    let tx_state = ctx.record_layer().get_tx_state().await;
    let psk = key_schedule::resumption_psk(tx_state.hash, &rms, &ticket.ticket_nonce);
    let max_early_data_size = ticket.early_data_max_size();

    let ticket_info = SessionTicketInfo {
        lifetime_seconds: ticket.ticket_lifetime,
        age_add: ticket.ticket_age_add,
        nonce: None,
        received_at: std::time::SystemTime::now(),
    };
    let data = SessionData {
        cipher: tx_state.cipher,
        psk,
        max_early_data_size,
        ticket_info,
    };

    info!("installing NewSessionTicket (max_early_data={})", max_early_data_size);
    ctx.session_manager().establish(ticket.ticket, data).await;
    Ok(())
}

async fn unexpected(ctx: &Context, reason: &str) -> TLSError {
    let underlying = failure::err_msg(reason.to_string());
    terminate(
        ctx,
        underlying,
        AlertLevel::Fatal,
        AlertDescription::UnexpectedMessage,
        reason.to_string(),
    )
    .await
}

async fn unexpected_message(ctx: &Context, kind: HandshakeType) -> TLSError {
    unexpected(ctx, &format!("unexpected message: {:?}", kind)).await
}
