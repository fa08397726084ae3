//! Pending-Action Queue (PAQ) -- §4.6 of SPEC_FULL.md.
//!
//! A FIFO of deferred handlers the initial handshake installs so that a
//! later post-handshake message (e.g. a post-handshake client-auth
//! CertificateRequest/Certificate/CertificateVerify/Finished sequence) gets
//! routed back to the code that knows how to continue it, rather than being
//! hard-coded into the receive loop.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::TLSError;
use crate::handshake_messages::Handshake13;

/// A single deferred continuation. Implementations may both read and write
/// on `ctx` -- the caller holds the read/write lock for the duration of the
/// call (SPEC_FULL.md §5).
#[async_trait]
pub trait PendingAction: Send + Sync {
    async fn run(&self, ctx: &Context, message: Handshake13) -> Result<(), TLSError>;
}

/// FIFO of installed [PendingAction]s.
#[derive(Default)]
pub struct PendingActionQueue {
    actions: VecDeque<Box<dyn PendingAction>>,
}

impl PendingActionQueue {
    pub fn new() -> Self {
        Self {
            actions: VecDeque::new(),
        }
    }

    pub fn push(&mut self, action: Box<dyn PendingAction>) {
        self.actions.push_back(action);
    }

    /// Pops the next pending action, if any. Atomic with respect to other
    /// callers by virtue of the caller holding `&mut self` through the
    /// Context's internal mutex.
    pub fn pop(&mut self) -> Option<Box<dyn PendingAction>> {
        self.actions.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
