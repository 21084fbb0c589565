//! Settlement state transitions.
//!
//! Both transitions are compare-and-set updates filtered on the expected
//! current status, so two concurrent calls for the same participant cannot
//! both succeed.

use chrono::Utc;
use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, MoneyMinor, ResultEngine,
    notifications::{Notification, NotificationKind},
    participants::{self, SettlementStatus},
    receipts, splits,
};

use super::{Engine, normalize_email, with_tx};

impl Engine {
    /// A participant marks their share as paid (unsettled -> pending).
    ///
    /// Writes a "Payment Received" notification for the payer in the same
    /// transaction as the status change. Returns the created notification.
    pub async fn settle_up(
        &self,
        receipt_id: Uuid,
        user_email: &str,
    ) -> ResultEngine<Notification> {
        let user_email = normalize_email(user_email);
        let (header, split_row) = self.split_for_receipt(receipt_id).await?;

        let row = participants::Entity::find()
            .filter(participants::Column::SplitInfoId.eq(split_row.id.clone()))
            .filter(participants::Column::Email.eq(user_email.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| {
                EngineError::Forbidden("caller is not a participant of this split".to_string())
            })?;

        if user_email == split_row.payer_email {
            return Err(EngineError::Conflict(
                "the payer has nothing to settle".to_string(),
            ));
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            user_email: split_row.payer_email.clone(),
            title: "Payment Received".to_string(),
            message: format!(
                "{} has settled their share of {} for {}. Please confirm receipt.",
                user_email,
                MoneyMinor::new(row.owes_minor),
                header.merchant_name
            ),
            kind: NotificationKind::SplitSettlement,
            is_read: false,
            created_at: Utc::now(),
        };

        with_tx!(self, |db_tx| {
            async {
                let updated = participants::Entity::update_many()
                    .col_expr(
                        participants::Column::Status,
                        Expr::value(SettlementStatus::Pending.as_str()),
                    )
                    .filter(participants::Column::Id.eq(row.id.clone()))
                    .filter(
                        participants::Column::Status.eq(SettlementStatus::Unsettled.as_str()),
                    )
                    .exec(&db_tx)
                    .await?;
                if updated.rows_affected == 0 {
                    return Err(EngineError::Conflict(
                        "share is not in the unsettled state".to_string(),
                    ));
                }
                notification.model().insert(&db_tx).await?;
                Ok::<_, EngineError>(())
            }
            .await
        })?;

        tracing::info!(
            receipt = %receipt_id,
            participant = %user_email,
            "share marked as pending"
        );
        Ok(notification)
    }

    /// The payer confirms a pending settlement (pending -> settled, owes cleared).
    pub async fn confirm_settlement(
        &self,
        receipt_id: Uuid,
        participant_email: &str,
        caller_email: &str,
    ) -> ResultEngine<()> {
        let participant_email = normalize_email(participant_email);
        let caller_email = normalize_email(caller_email);
        let (_, split_row) = self.split_for_receipt(receipt_id).await?;

        if caller_email != split_row.payer_email {
            return Err(EngineError::Forbidden(
                "only the payer can confirm a settlement".to_string(),
            ));
        }

        let row = participants::Entity::find()
            .filter(participants::Column::SplitInfoId.eq(split_row.id.clone()))
            .filter(participants::Column::Email.eq(participant_email.clone()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))?;

        let updated = participants::Entity::update_many()
            .col_expr(
                participants::Column::Status,
                Expr::value(SettlementStatus::Settled.as_str()),
            )
            .col_expr(participants::Column::OwesMinor, Expr::value(0_i64))
            .filter(participants::Column::Id.eq(row.id))
            .filter(participants::Column::Status.eq(SettlementStatus::Pending.as_str()))
            .exec(&self.database)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "share is not in the pending state".to_string(),
            ));
        }

        tracing::info!(
            receipt = %receipt_id,
            participant = %participant_email,
            "settlement confirmed"
        );
        Ok(())
    }

    /// Loads the receipt header and its split row, or fails with `KeyNotFound`.
    async fn split_for_receipt(
        &self,
        receipt_id: Uuid,
    ) -> ResultEngine<(receipts::Model, splits::Model)> {
        let header = receipts::Entity::find_by_id(receipt_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("receipt not exists".to_string()))?;
        let split_row = splits::Entity::find()
            .filter(splits::Column::ReceiptId.eq(receipt_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("receipt is not split".to_string()))?;
        Ok((header, split_row))
    }
}
