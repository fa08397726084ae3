//! Alert level/description sum types.
//!
//! https://tools.ietf.org/html/rfc8446#section-6

/// Severity of an alert record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Warning,
    Fatal,
}

/// Reason code carried alongside an [AlertLevel].
///
/// Only the subset of RFC 8446 §6 alert descriptions this driver itself
/// needs to name are enumerated; anything else flows through the record
/// layer collaborator without this crate needing to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDescription {
    CloseNotify,
    UnexpectedMessage,
    BadRecordMac,
    RecordOverflow,
    HandshakeFailure,
    DecodeError,
    DecryptError,
    ProtocolVersion,
    InternalError,
    UserCanceled,
    MissingExtension,
}

/// A single parsed alert record: `(level, description)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub description: AlertDescription,
}

impl Alert {
    pub fn new(level: AlertLevel, description: AlertDescription) -> Self {
        Self { level, description }
    }

    pub fn close_notify() -> Self {
        Self::new(AlertLevel::Warning, AlertDescription::CloseNotify)
    }

    pub fn is_close_notify(&self) -> bool {
        self.level == AlertLevel::Warning && self.description == AlertDescription::CloseNotify
    }
}
