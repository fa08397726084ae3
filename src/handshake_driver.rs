//! The handshake-negotiation collaborator (§6 "Upward", `handshake_with`).
//!
//! Initial handshake negotiation and TLS <= 1.2 renegotiation are out of
//! scope for this crate (SPEC_FULL.md §1); the receive loop only needs to
//! know how to hand control to whatever component does that work and get it
//! back once a `ClientHello`/`HelloRequest` has been serviced.
//!
//! Concurrency caveat (SPEC_FULL.md §9 Open Questions): this core does not
//! constrain how an implementation of `handshake_with` interacts with an
//! in-flight `send_data` call on the same `Context` -- a renegotiation that
//! races a concurrent application write is a known hazardous area left to
//! the collaborator to resolve.

use async_trait::async_trait;
use bytes::Bytes;

use crate::context::Context;
use crate::error::TLSError;

/// What triggered entry into (re)negotiation on a TLS <= 1.2 connection.
#[derive(Debug, Clone)]
pub enum HandshakeTrigger {
    /// Server-side renegotiation: a `Handshake[ClientHello]` arrived on an
    /// already-established connection.
    ClientHello(Bytes),
    /// Client-side renegotiation: a `Handshake[HelloRequest]` arrived.
    HelloRequest,
}

#[async_trait]
pub trait HandshakeDriver: Send + Sync {
    async fn handshake_with(&self, ctx: &Context, trigger: HandshakeTrigger) -> Result<(), TLSError>;
}
