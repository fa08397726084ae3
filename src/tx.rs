//! Send Path (TX) -- §4.2 of SPEC_FULL.md.

use bytes::Bytes;
use log::info;

use crate::alert::{Alert, AlertDescription};
use crate::context::Context;
use crate::error::TLSError;
use crate::handshake_messages::{Handshake13, KeyUpdate, KeyUpdateRequest};
use crate::record::{Packet, Packet13};

/// Chunks `data` into records no larger than `ctx.options().max_fragment_size`
/// and writes each chunk through the version-appropriate packet encoder.
pub async fn send_data(ctx: &Context, data: &[u8]) -> Result<(), TLSError> {
    if ctx.is_eof().await {
        return Err(TLSError::misc("send_data on a terminated context"));
    }

    let max_fragment = ctx.options().max_fragment_size;
    for chunk in data.chunks(max_fragment.max(1)) {
        let bytes = Bytes::copy_from_slice(chunk);
        if ctx.version().is_tls13() {
            ctx.record_layer().send_packet_13(Packet13::AppData13(bytes)).await?;
        } else {
            ctx.record_layer().send_packet(Packet::AppData(bytes)).await?;
        }
    }
    Ok(())
}

/// Sends a best-effort `Alert(Warning, CloseNotify)` if EOF has not already
/// been observed. Required before transport close to keep a TLS <= 1.2
/// session resumable; does not itself close the transport.
pub async fn bye(ctx: &Context) -> Result<(), TLSError> {
    if ctx.is_eof().await {
        return Ok(());
    }
    let alert = Alert::close_notify();
    let result = if ctx.version().is_tls13() {
        ctx.record_layer()
            .send_packet_13(Packet13::Alert13(vec![(alert.level, alert.description)]))
            .await
    } else {
        ctx.record_layer()
            .send_packet(Packet::Alert(vec![(alert.level, alert.description)]))
            .await
    };
    info!("sent close_notify");
    result
}

/// One-sided (`OneWay`) or mutual (`TwoWay`) application-initiated key
/// update. Permitted only on TLS 1.3; returns `false` without side effects
/// on <=1.2, `true` after sending the `KeyUpdate` record and advancing the
/// local TX traffic secret.
pub async fn update_key(ctx: &Context, request: KeyUpdateRequest) -> Result<bool, TLSError> {
    if !ctx.version().is_tls13() {
        return Ok(false);
    }
    if !ctx.is_established().await {
        return Err(TLSError::protocol(
            "update_key outside Established",
            true,
            AlertDescription::UnexpectedMessage,
        ));
    }

    let message = KeyUpdate { request_update: request };
    ctx.record_layer()
        .send_packet_13(Packet13::Handshake13(vec![Handshake13::KeyUpdate(message)]))
        .await?;

    let current = ctx.record_layer().get_tx_state().await;
    let next = current.advanced();
    ctx.record_layer().set_tx_state(next).await;

    info!("application-initiated key update sent ({:?})", request);
    Ok(true)
}

/// Deprecated alias kept for callers migrating off the old chunked-iterator
/// API (SPEC_FULL.md §4.2). Repeatedly calls [crate::rx::recv_data] and
/// collects chunks until the first empty (clean-close) chunk.
///
/// The original API returned this lazily; this crate already has no
/// dependency on a stream-combinator crate elsewhere, so rather than pull
/// one in solely for a deprecated alias, this returns the fully-collected
/// `Vec` (see DESIGN.md). New code should call `recv_data` in a loop
/// directly instead of using this function at all.
#[deprecated(note = "call recv_data in a loop instead")]
pub async fn recv_data_lazy(ctx: &Context) -> Result<Vec<Bytes>, TLSError> {
    let mut chunks = Vec::new();
    loop {
        let chunk = crate::rx::recv_data(ctx).await?;
        if chunk.is_empty() {
            return Ok(chunks);
        }
        chunks.push(chunk);
    }
}
