//! Monetary share calculator.
//!
//! Pure functions: no store access, no side effects. Callers persist the
//! returned participants atomically with the receipt.

use std::collections::HashMap;

use crate::{
    EngineError,
    item_assignments::ItemAssignment,
    line_items::LineItem,
    participants::{Participant, SettlementStatus},
    splits::SplitStrategy,
};

/// Computes every participant's share of `total_minor`.
///
/// Under [`SplitStrategy::Equal`] each share is `total / n` in integer minor
/// units; the division remainder (at most `n - 1` paise) goes to the payer so
/// the shares always sum to the total exactly and no non-payer over-pays.
///
/// Under [`SplitStrategy::Custom`] a share is the sum of line totals assigned
/// to that participant; every line item must be assigned to exactly one
/// participant.
///
/// The payer's entry is born settled (`paid = total`, `owes = 0`); everyone
/// else starts unsettled with `owes = share`.
pub fn compute_shares(
    total_minor: i64,
    payer: &str,
    participants: &[String],
    strategy: SplitStrategy,
    line_items: &[LineItem],
    assignments: &[ItemAssignment],
) -> Result<Vec<Participant>, EngineError> {
    if participants.is_empty() {
        return Err(EngineError::EmptyParticipants);
    }
    if !participants.iter().any(|p| p == payer) {
        return Err(EngineError::PayerNotInParticipants(payer.to_string()));
    }

    let shares = match strategy {
        SplitStrategy::Equal => equal_shares(total_minor, payer, participants),
        SplitStrategy::Custom => custom_shares(participants, line_items, assignments)?,
    };

    Ok(participants
        .iter()
        .map(|email| {
            let share_minor = shares.get(email.as_str()).copied().unwrap_or(0);
            if email == payer {
                Participant {
                    email: email.clone(),
                    share_minor,
                    paid_minor: total_minor,
                    owes_minor: 0,
                    status: SettlementStatus::Settled,
                }
            } else {
                Participant {
                    email: email.clone(),
                    share_minor,
                    paid_minor: 0,
                    owes_minor: share_minor,
                    status: SettlementStatus::Unsettled,
                }
            }
        })
        .collect())
}

fn equal_shares<'a>(
    total_minor: i64,
    payer: &str,
    participants: &'a [String],
) -> HashMap<&'a str, i64> {
    let count = participants.len() as i64;
    let base = total_minor / count;
    let remainder = total_minor - base * count;

    participants
        .iter()
        .map(|email| {
            let share = if email == payer { base + remainder } else { base };
            (email.as_str(), share)
        })
        .collect()
}

fn custom_shares<'a>(
    participants: &'a [String],
    line_items: &[LineItem],
    assignments: &[ItemAssignment],
) -> Result<HashMap<&'a str, i64>, EngineError> {
    let mut shares: HashMap<&str, i64> =
        participants.iter().map(|p| (p.as_str(), 0)).collect();

    for item in line_items {
        let assignment = assignments
            .iter()
            .find(|a| a.line_item_id == item.id)
            .ok_or_else(|| EngineError::IncompleteAssignment(item.description.clone()))?;

        let share = shares
            .get_mut(assignment.assigned_to.as_str())
            .ok_or_else(|| EngineError::UnknownAssignee(assignment.assigned_to.clone()))?;
        *share += item.total_minor();
    }

    Ok(shares)
}
