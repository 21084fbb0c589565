//! The module contains the errors the engine can throw.
//!
//! Validation errors (`EmptyParticipants`, `PayerNotInParticipants`,
//! `IncompleteAssignment`, `UnknownAssignee`, `InvalidAmount`) are reported
//! before anything touches the store. `Conflict` means a settlement
//! transition found the participant in a different state than its
//! precondition requires; callers should re-fetch and retry from the fresh
//! state.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("split has no participants")]
    EmptyParticipants,
    #[error("payer \"{0}\" is not among the participants")]
    PayerNotInParticipants(String),
    #[error("line item \"{0}\" is not assigned to any participant")]
    IncompleteAssignment(String),
    #[error("assignee \"{0}\" is not among the participants")]
    UnknownAssignee(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("collaborator unreachable: {0}")]
    Transport(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmptyParticipants, Self::EmptyParticipants) => true,
            (Self::PayerNotInParticipants(a), Self::PayerNotInParticipants(b)) => a == b,
            (Self::IncompleteAssignment(a), Self::IncompleteAssignment(b)) => a == b,
            (Self::UnknownAssignee(a), Self::UnknownAssignee(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::Transport(a), Self::Transport(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
