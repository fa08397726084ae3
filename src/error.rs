//! The error sum type raised across the driver/dispatcher boundary.
//!
//! Mirrors the `failure`-based error handling used throughout the rest of
//! this codebase: a typed enum that also implements `Fail` so it composes
//! with callers that only know about `failure::Error`.

use failure::Fail;

use crate::alert::AlertDescription;

/// Errors that can flow out of the record layer / session driver.
///
/// `EOF` and `Protocol` are the two variants the record layer itself is
/// expected to raise; `Misc` is raised by this crate when it detects a
/// protocol violation that doesn't map cleanly onto a single alert
/// description ahead of time; `Terminated` is the single fault variant
/// actually returned to callers of the public API once a session has been
/// shut down.
#[derive(Debug, Fail)]
pub enum TLSError {
    /// Clean close observed before a payload was produced. Not a fault:
    /// callers see this converted into an empty byte return, never surfaced
    /// directly through the public API.
    #[fail(display = "unexpected end of file")]
    EOF,

    /// A protocol error, either detected locally or reported by the peer.
    /// `fatal` selects whether the resulting alert (if any) is sent/treated
    /// at the Fatal or Warning level.
    #[fail(display = "protocol error: {}", reason)]
    Protocol {
        reason: String,
        fatal: bool,
        description: AlertDescription,
    },

    /// A programmer-visible "this should never happen" condition. Always
    /// fatal, always reported as `UnexpectedMessage`.
    #[fail(display = "unexpected condition: {}", _0)]
    Misc(String),

    /// The single fault variant raised out of the core. `clean` records
    /// whether the underlying cause was an orderly peer-initiated shutdown
    /// (a fatal alert, a protocol violation the peer signaled) as opposed to
    /// something this side chose to abort for.
    #[fail(display = "session terminated: {}", reason)]
    Terminated {
        clean: bool,
        reason: String,
        cause: failure::Error,
    },
}

impl TLSError {
    pub fn protocol(reason: impl Into<String>, fatal: bool, description: AlertDescription) -> Self {
        TLSError::Protocol {
            reason: reason.into(),
            fatal,
            description,
        }
    }

    pub fn misc(reason: impl Into<String>) -> Self {
        TLSError::Misc(reason.into())
    }

    /// True for a record-layer error that should simply produce an empty
    /// read rather than propagate as a fault.
    pub fn is_eof(&self) -> bool {
        matches!(self, TLSError::EOF)
    }
}
