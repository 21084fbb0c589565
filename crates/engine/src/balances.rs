//! Balance aggregation over the persisted receipt set.
//!
//! Everything here is a pure fold over already-loaded receipts: the
//! aggregator keeps no state between calls and is recomputed fully on every
//! read (`ops::balances` does the loading).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Category,
    participants::{Participant, SettlementStatus},
    receipts::Receipt,
};

/// Who owes whom in a single contribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The user owes the counterparty.
    Owe,
    /// The counterparty owes the user.
    Owed,
}

/// One (receipt, participant, direction) triple feeding a net balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub receipt_id: Uuid,
    pub merchant_name: String,
    pub transaction_date: NaiveDate,
    pub participant: Participant,
    pub direction: Direction,
}

/// Net position against one counterparty.
///
/// Sign convention: positive = the counterparty owes the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CounterpartyBalance {
    pub email: String,
    pub net_minor: i64,
    pub contributions: Vec<Contribution>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Sorted by `net_minor` descending (largest owed-to-user first).
    pub counterparties: Vec<CounterpartyBalance>,
    pub total_owed_to_user_minor: i64,
    pub total_user_owes_minor: i64,
}

/// Folds the user's split receipts into per-counterparty net balances.
///
/// A receipt contributes when the user is a non-payer participant that still
/// owes (status not settled, `owes > 0`), or when the user is the payer and
/// another participant still owes. Settled rows are skipped entirely.
#[must_use]
pub fn aggregate_balances(receipts: &[Receipt], user_email: &str) -> BalanceSummary {
    let mut summary = BalanceSummary::default();

    for receipt in receipts {
        let Some(split) = &receipt.split else { continue };

        // What the user owes the payer of this receipt.
        if split.payer != user_email {
            let mine = split
                .participants
                .iter()
                .find(|p| p.email == user_email && p.status != SettlementStatus::Settled);
            if let Some(mine) = mine
                && mine.owes_minor > 0
            {
                summary.total_user_owes_minor += mine.owes_minor;
                push_contribution(
                    &mut summary.counterparties,
                    &split.payer,
                    -mine.owes_minor,
                    Contribution {
                        receipt_id: receipt.id,
                        merchant_name: receipt.merchant_name.clone(),
                        transaction_date: receipt.transaction_date,
                        participant: mine.clone(),
                        direction: Direction::Owe,
                    },
                );
            }
        }

        // What the other participants owe the user.
        if split.payer == user_email {
            for p in &split.participants {
                if p.email == user_email
                    || p.status == SettlementStatus::Settled
                    || p.owes_minor <= 0
                {
                    continue;
                }
                summary.total_owed_to_user_minor += p.owes_minor;
                push_contribution(
                    &mut summary.counterparties,
                    &p.email,
                    p.owes_minor,
                    Contribution {
                        receipt_id: receipt.id,
                        merchant_name: receipt.merchant_name.clone(),
                        transaction_date: receipt.transaction_date,
                        participant: p.clone(),
                        direction: Direction::Owed,
                    },
                );
            }
        }
    }

    summary
        .counterparties
        .sort_by(|a, b| b.net_minor.cmp(&a.net_minor));
    summary
}

fn push_contribution(
    counterparties: &mut Vec<CounterpartyBalance>,
    email: &str,
    delta_minor: i64,
    contribution: Contribution,
) {
    match counterparties.iter_mut().find(|c| c.email == email) {
        Some(entry) => {
            entry.net_minor += delta_minor;
            entry.contributions.push(contribution);
        }
        None => counterparties.push(CounterpartyBalance {
            email: email.to_string(),
            net_minor: delta_minor,
            contributions: vec![contribution],
        }),
    }
}

/// The user's cumulative spend for one category in the month of `reference`.
///
/// Receipts the user uploaded count their full per-category line totals;
/// receipts where the user is only a participant count the user's share
/// scaled over the receipt's per-category totals. Amounts are INR minor
/// units.
#[must_use]
pub fn monthly_category_spend(
    receipts: &[Receipt],
    user_email: &str,
    category: Category,
    reference: NaiveDate,
) -> i64 {
    receipts
        .iter()
        .filter(|r| {
            r.transaction_date.year() == reference.year()
                && r.transaction_date.month() == reference.month()
        })
        .map(|r| {
            let category_total: i64 = r
                .line_items
                .iter()
                .filter(|item| item.category == category)
                .map(|item| item.total_minor())
                .sum();
            if category_total == 0 {
                return 0;
            }

            if r.user_email == user_email {
                return category_total;
            }

            // Participant on someone else's receipt: attribute the share
            // fraction of that category's total.
            let Some(split) = &r.split else { return 0 };
            let Some(mine) = split.participants.iter().find(|p| p.email == user_email) else {
                return 0;
            };
            if r.total_minor == 0 {
                return 0;
            }
            let fraction = mine.share_minor as f64 / r.total_minor as f64;
            (category_total as f64 * fraction).round() as i64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Category, Currency, LineItem,
        splits::{SplitInfo, SplitStrategy},
    };

    fn participant(email: &str, owes: i64, status: SettlementStatus) -> Participant {
        Participant {
            email: email.to_string(),
            share_minor: owes.max(1),
            paid_minor: 0,
            owes_minor: owes,
            status,
        }
    }

    fn split_receipt(
        owner: &str,
        merchant: &str,
        total_minor: i64,
        participants: Vec<Participant>,
    ) -> Receipt {
        Receipt {
            id: Uuid::new_v4(),
            user_email: owner.to_string(),
            merchant_name: merchant.to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            total_minor,
            currency: Currency::Inr,
            line_items: Vec::new(),
            warranty: None,
            split: Some(SplitInfo {
                id: Uuid::new_v4(),
                payer: owner.to_string(),
                strategy: SplitStrategy::Equal,
                participants,
                assignments: Vec::new(),
            }),
        }
    }

    #[test]
    fn nets_across_receipt_pairs() {
        // me owes x 50 on x's receipt; x owes me 30 on mine.
        let receipts = vec![
            split_receipt(
                "x@y.com",
                "Cafe",
                100_00,
                vec![
                    participant("x@y.com", 0, SettlementStatus::Settled),
                    participant("me@z.com", 50_00, SettlementStatus::Unsettled),
                ],
            ),
            split_receipt(
                "me@z.com",
                "Grocer",
                60_00,
                vec![
                    participant("me@z.com", 0, SettlementStatus::Settled),
                    participant("x@y.com", 30_00, SettlementStatus::Unsettled),
                ],
            ),
        ];

        let summary = aggregate_balances(&receipts, "me@z.com");
        assert_eq!(summary.counterparties.len(), 1);
        let x = &summary.counterparties[0];
        assert_eq!(x.email, "x@y.com");
        assert_eq!(x.net_minor, -20_00);
        assert_eq!(x.contributions.len(), 2);
        assert_eq!(summary.total_user_owes_minor, 50_00);
        assert_eq!(summary.total_owed_to_user_minor, 30_00);
    }

    #[test]
    fn settled_rows_do_not_contribute() {
        let receipts = vec![split_receipt(
            "me@z.com",
            "Cafe",
            100_00,
            vec![
                participant("me@z.com", 0, SettlementStatus::Settled),
                participant("x@y.com", 0, SettlementStatus::Settled),
            ],
        )];

        let summary = aggregate_balances(&receipts, "me@z.com");
        assert!(summary.counterparties.is_empty());
        assert_eq!(summary.total_owed_to_user_minor, 0);
    }

    #[test]
    fn pending_rows_still_count_as_owed() {
        let receipts = vec![split_receipt(
            "me@z.com",
            "Cafe",
            100_00,
            vec![
                participant("me@z.com", 0, SettlementStatus::Settled),
                participant("x@y.com", 40_00, SettlementStatus::Pending),
            ],
        )];

        let summary = aggregate_balances(&receipts, "me@z.com");
        assert_eq!(summary.total_owed_to_user_minor, 40_00);
        assert_eq!(summary.counterparties[0].net_minor, 40_00);
    }

    #[test]
    fn counterparties_sort_by_net_descending() {
        let receipts = vec![
            split_receipt(
                "me@z.com",
                "A",
                100_00,
                vec![
                    participant("me@z.com", 0, SettlementStatus::Settled),
                    participant("small@y.com", 10_00, SettlementStatus::Unsettled),
                ],
            ),
            split_receipt(
                "me@z.com",
                "B",
                200_00,
                vec![
                    participant("me@z.com", 0, SettlementStatus::Settled),
                    participant("big@y.com", 90_00, SettlementStatus::Unsettled),
                ],
            ),
        ];

        let summary = aggregate_balances(&receipts, "me@z.com");
        let order: Vec<&str> = summary
            .counterparties
            .iter()
            .map(|c| c.email.as_str())
            .collect();
        assert_eq!(order, vec!["big@y.com", "small@y.com"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let receipts = vec![split_receipt(
            "me@z.com",
            "Cafe",
            100_00,
            vec![
                participant("me@z.com", 0, SettlementStatus::Settled),
                participant("x@y.com", 50_00, SettlementStatus::Unsettled),
            ],
        )];

        let first = aggregate_balances(&receipts, "me@z.com");
        let second = aggregate_balances(&receipts, "me@z.com");
        assert_eq!(first, second);
    }

    fn item(category: Category, price_minor: i64) -> LineItem {
        LineItem {
            id: Uuid::new_v4(),
            description: category.as_str().to_string(),
            quantity: 1.0,
            price_minor,
            category,
        }
    }

    #[test]
    fn monthly_spend_counts_owned_receipts_fully() {
        let mut receipt = split_receipt("me@z.com", "Grocer", 100_00, Vec::new());
        receipt.split = None;
        receipt.line_items = vec![item(Category::Food, 70_00), item(Category::Fuel, 30_00)];

        let reference = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            monthly_category_spend(&[receipt.clone()], "me@z.com", Category::Food, reference),
            70_00
        );
        assert_eq!(
            monthly_category_spend(&[receipt], "me@z.com", Category::Fuel, reference),
            30_00
        );
    }

    #[test]
    fn monthly_spend_scales_participant_share() {
        let mut receipt = split_receipt(
            "x@y.com",
            "Dinner",
            100_00,
            vec![
                participant("x@y.com", 0, SettlementStatus::Settled),
                Participant {
                    email: "me@z.com".to_string(),
                    share_minor: 50_00,
                    paid_minor: 0,
                    owes_minor: 50_00,
                    status: SettlementStatus::Unsettled,
                },
            ],
        );
        receipt.line_items = vec![item(Category::Restaurant, 100_00)];

        let reference = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        assert_eq!(
            monthly_category_spend(&[receipt], "me@z.com", Category::Restaurant, reference),
            50_00
        );
    }

    #[test]
    fn monthly_spend_ignores_other_months() {
        let mut receipt = split_receipt("me@z.com", "Grocer", 100_00, Vec::new());
        receipt.split = None;
        receipt.transaction_date = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
        receipt.line_items = vec![item(Category::Food, 100_00)];

        let reference = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert_eq!(
            monthly_category_spend(&[receipt], "me@z.com", Category::Food, reference),
            0
        );
    }
}
