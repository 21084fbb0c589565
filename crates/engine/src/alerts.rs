//! Collaborator seams for alert text generation and push delivery.
//!
//! The ledger decides *whether* an alert fires (`quotas::detect_crossing`);
//! composing the human-readable text and delivering a push are external
//! concerns behind these traits. Both are best effort: a failed composition
//! or push is logged by the caller and never fails the ledger operation.

use crate::{EngineError, quotas::QuotaAlert};

/// Composed alert text returned by the text-generation collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct AlertMessage {
    pub title: String,
    pub message: String,
}

/// Turns a quota decision into user-facing alert text.
#[async_trait::async_trait]
pub trait AlertComposer: Send + Sync {
    async fn compose(&self, alert: &QuotaAlert, receipt_count: usize)
    -> Result<AlertMessage, EngineError>;
}

/// Delivers a push notification, fire and forget.
#[async_trait::async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, user_email: &str, title: &str, body: &str) -> Result<(), EngineError>;
}
