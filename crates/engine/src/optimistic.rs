//! Optimistic status application for clients.
//!
//! A client may show the target status before the backing mutation commits,
//! but the tentative value is not authoritative until `confirm` and must be
//! droppable via `revert` when the mutation fails. Modeling this as a
//! command keeps the rollback path explicit instead of ad-hoc state patching
//! in UI code.

use crate::participants::SettlementStatus;

/// A locally-applied status change awaiting the outcome of its mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TentativeStatus {
    prior: SettlementStatus,
    tentative: SettlementStatus,
}

impl TentativeStatus {
    /// Applies `tentative` locally, remembering `prior` for rollback.
    #[must_use]
    pub fn apply(prior: SettlementStatus, tentative: SettlementStatus) -> Self {
        Self { prior, tentative }
    }

    /// The status a client should display while the mutation is in flight.
    #[must_use]
    pub fn displayed(&self) -> SettlementStatus {
        self.tentative
    }

    /// The mutation committed; the tentative status becomes authoritative.
    #[must_use]
    pub fn confirm(self) -> SettlementStatus {
        self.tentative
    }

    /// The mutation failed; fall back to the pre-transition status.
    #[must_use]
    pub fn revert(self) -> SettlementStatus {
        self.prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_keeps_the_tentative_status() {
        let cmd = TentativeStatus::apply(SettlementStatus::Unsettled, SettlementStatus::Pending);
        assert_eq!(cmd.displayed(), SettlementStatus::Pending);
        assert_eq!(cmd.confirm(), SettlementStatus::Pending);
    }

    #[test]
    fn revert_restores_the_prior_status() {
        let cmd = TentativeStatus::apply(SettlementStatus::Unsettled, SettlementStatus::Pending);
        assert_eq!(cmd.revert(), SettlementStatus::Unsettled);
    }

    #[test]
    fn confirm_rollback_edge_stays_at_pending() {
        // A failed confirm rolls back to pending, not unsettled.
        let cmd = TentativeStatus::apply(SettlementStatus::Pending, SettlementStatus::Settled);
        assert_eq!(cmd.revert(), SettlementStatus::Pending);
    }
}
