//! Error types used throughout core.
//!
//! Per the error-handling design: validation, authorization, and
//! precondition failures on inbound protocol messages are never surfaced to
//! the embedder (they are logged and the message is dropped, see
//! [`crate::protocol`]). `ControlError` is the only error type that crosses
//! the core boundary, returned by the control-surface operations for
//! locally-detected failures (unknown id, unauthorized local caller, bad
//! config).

use thiserror::Error;

use crate::ids::MatchId;

/// Reasons an inbound protocol message was rejected. Used only for logging;
/// never returned to the embedder (see §7 of the spec).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("sender is not authorized for this action")]
    Unauthorized,

    #[error("unknown match id: {0}")]
    UnknownMatch(MatchId),

    #[error("state not yet initialized")]
    StateNotInitialized,

    #[error("precondition failed: {0}")]
    Precondition(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors returned by the persistence adapter. Always best-effort: the core
/// logs and continues in-memory rather than propagating these further.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("kv store quota exceeded")]
    QuotaExceeded,

    #[error("kv store unavailable: {0}")]
    Unavailable(String),

    #[error("stored record failed to deserialize: {0}")]
    Corrupt(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors returned by the control surface for locally-detected failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("unknown match id: {0}")]
    UnknownMatch(MatchId),

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tournament is not in the required state for this action")]
    WrongStatus,

    #[error("no bracket has been generated yet")]
    NoBracket,

    #[error("winner id is not a participant of this match")]
    InvalidWinner,

    #[error("invalid room slug: {0}")]
    InvalidRoomSlug(String),
}

pub type ControlResult<T> = Result<T, ControlError>;
