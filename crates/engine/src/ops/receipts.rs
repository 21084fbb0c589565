//! Receipt creation and retrieval.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{Condition, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    commands::CreateReceiptCmd,
    item_assignments,
    line_items::{self, LineItem},
    participants,
    receipts::{self, Receipt, WarrantyInfo},
    shares::compute_shares,
    splits::{self, SplitInfo},
    warranty, Category, Currency,
};

use super::{Engine, normalize_email, with_tx};

impl Engine {
    /// Creates a receipt, computing participant shares when split.
    ///
    /// Foreign amounts are converted to INR before any share math; a failed
    /// conversion aborts the whole operation. The receipt header, line
    /// items, warranty row and the split subgraph are inserted as one DB
    /// transaction.
    pub async fn create_receipt(&self, cmd: CreateReceiptCmd) -> ResultEngine<Receipt> {
        let user_email = normalize_email(&cmd.user_email);
        let merchant_name = cmd.merchant_name.trim().to_string();
        if merchant_name.is_empty() {
            return Err(EngineError::InvalidAmount(
                "merchant name must not be empty".to_string(),
            ));
        }
        if cmd.line_items.is_empty() {
            return Err(EngineError::InvalidAmount(
                "receipt must have at least one line item".to_string(),
            ));
        }

        let mut items = Vec::with_capacity(cmd.line_items.len());
        for item in &cmd.line_items {
            if item.quantity <= 0.0 {
                return Err(EngineError::InvalidAmount(format!(
                    "quantity must be > 0 for \"{}\"",
                    item.description
                )));
            }
            if item.price_minor < 0 {
                return Err(EngineError::InvalidAmount(format!(
                    "price must be >= 0 for \"{}\"",
                    item.description
                )));
            }
            let price_minor = self.converter.to_home(item.price_minor, cmd.currency)?;
            items.push(LineItem {
                id: item.id,
                description: item.description.clone(),
                quantity: item.quantity,
                price_minor,
                category: item.category,
            });
        }

        let total_minor: i64 = items.iter().map(LineItem::total_minor).sum();

        let split = match &cmd.split {
            None => None,
            Some(new_split) => {
                let mut all: Vec<String> = vec![user_email.clone()];
                for p in &new_split.participants {
                    let email = normalize_email(p);
                    if email != user_email && !all.contains(&email) {
                        all.push(email);
                    }
                }

                let computed = compute_shares(
                    total_minor,
                    &user_email,
                    &all,
                    new_split.strategy,
                    &items,
                    &new_split.assignments,
                )?;

                Some(SplitInfo {
                    id: Uuid::new_v4(),
                    payer: user_email.clone(),
                    strategy: new_split.strategy,
                    participants: computed,
                    assignments: new_split.assignments.clone(),
                })
            }
        };

        // Warranty tracking only applies to receipts carrying a shopping item.
        let warranty_info = (cmd.track_warranty
            && items.iter().any(|i| i.category == Category::Shopping))
        .then(|| WarrantyInfo {
            is_tracked: true,
            end_date: None,
            days_remaining: None,
        });

        let receipt = Receipt {
            id: Uuid::new_v4(),
            user_email,
            merchant_name,
            transaction_date: cmd.transaction_date,
            total_minor,
            currency: Currency::Inr,
            line_items: items,
            warranty: warranty_info,
            split,
        };

        with_tx!(self, |db_tx| {
            async {
                receipt.header_model(Utc::now()).insert(&db_tx).await?;
                for item in &receipt.line_items {
                    item.model(receipt.id).insert(&db_tx).await?;
                }
                if let Some(info) = &receipt.warranty {
                    info.model(receipt.id).insert(&db_tx).await?;
                }
                if let Some(split) = &receipt.split {
                    split.model(receipt.id).insert(&db_tx).await?;
                    for participant in &split.participants {
                        participant.model(split.id).insert(&db_tx).await?;
                    }
                    for assignment in &split.assignments {
                        assignment.model(split.id).insert(&db_tx).await?;
                    }
                }
                Ok::<_, EngineError>(())
            }
            .await
        })?;

        Ok(receipt)
    }

    /// Returns one receipt with its full subgraph.
    pub async fn receipt(&self, receipt_id: Uuid) -> ResultEngine<Receipt> {
        let header = receipts::Entity::find_by_id(receipt_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("receipt not exists".to_string()))?;

        let mut loaded = self.load_receipts(vec![header]).await?;
        loaded
            .pop()
            .ok_or_else(|| EngineError::KeyNotFound("receipt not exists".to_string()))
    }

    /// Lists every receipt the user owns or participates in, newest first.
    pub async fn receipts_for_user(&self, user_email: &str) -> ResultEngine<Vec<Receipt>> {
        let user_email = normalize_email(user_email);

        // Receipts where the user appears as a split participant.
        let participant_rows: Vec<participants::Model> = participants::Entity::find()
            .filter(participants::Column::Email.eq(user_email.clone()))
            .all(&self.database)
            .await?;
        let split_ids: Vec<String> = participant_rows
            .into_iter()
            .map(|p| p.split_info_id)
            .collect();

        let mut participant_receipt_ids: Vec<String> = Vec::new();
        if !split_ids.is_empty() {
            let split_rows: Vec<splits::Model> = splits::Entity::find()
                .filter(splits::Column::Id.is_in(split_ids))
                .all(&self.database)
                .await?;
            participant_receipt_ids = split_rows.into_iter().map(|s| s.receipt_id).collect();
        }

        let mut condition = Condition::any().add(receipts::Column::UserEmail.eq(user_email));
        if !participant_receipt_ids.is_empty() {
            condition = condition.add(receipts::Column::Id.is_in(participant_receipt_ids));
        }

        let headers: Vec<receipts::Model> = receipts::Entity::find()
            .filter(condition)
            .order_by_desc(receipts::Column::TransactionDate)
            .order_by_desc(receipts::Column::CreatedAt)
            .all(&self.database)
            .await?;

        self.load_receipts(headers).await
    }

    /// Deletes a receipt and its subgraph. Owner only; cascades.
    pub async fn delete_receipt(&self, receipt_id: Uuid, user_email: &str) -> ResultEngine<()> {
        let user_email = normalize_email(user_email);
        let header = receipts::Entity::find_by_id(receipt_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("receipt not exists".to_string()))?;
        if header.user_email != user_email {
            return Err(EngineError::Forbidden(
                "only the uploader can delete a receipt".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            async {
                let split_rows: Vec<splits::Model> = splits::Entity::find()
                    .filter(splits::Column::ReceiptId.eq(receipt_id.to_string()))
                    .all(&db_tx)
                    .await?;
                for split_row in split_rows {
                    participants::Entity::delete_many()
                        .filter(participants::Column::SplitInfoId.eq(split_row.id.clone()))
                        .exec(&db_tx)
                        .await?;
                    item_assignments::Entity::delete_many()
                        .filter(item_assignments::Column::SplitInfoId.eq(split_row.id.clone()))
                        .exec(&db_tx)
                        .await?;
                    splits::Entity::delete_by_id(split_row.id).exec(&db_tx).await?;
                }
                line_items::Entity::delete_many()
                    .filter(line_items::Column::ReceiptId.eq(receipt_id.to_string()))
                    .exec(&db_tx)
                    .await?;
                warranty::Entity::delete_many()
                    .filter(warranty::Column::ReceiptId.eq(receipt_id.to_string()))
                    .exec(&db_tx)
                    .await?;
                receipts::Entity::delete_by_id(receipt_id.to_string())
                    .exec(&db_tx)
                    .await?;
                Ok::<_, EngineError>(())
            }
            .await
        })
    }

    /// Hydrates receipt headers with items, warranty and split subgraphs.
    pub(super) async fn load_receipts(
        &self,
        headers: Vec<receipts::Model>,
    ) -> ResultEngine<Vec<Receipt>> {
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let receipt_ids: Vec<String> = headers.iter().map(|h| h.id.clone()).collect();

        let item_rows: Vec<line_items::Model> = line_items::Entity::find()
            .filter(line_items::Column::ReceiptId.is_in(receipt_ids.clone()))
            .order_by_asc(line_items::Column::Id)
            .all(&self.database)
            .await?;
        let warranty_rows: Vec<warranty::Model> = warranty::Entity::find()
            .filter(warranty::Column::ReceiptId.is_in(receipt_ids.clone()))
            .all(&self.database)
            .await?;
        let split_rows: Vec<splits::Model> = splits::Entity::find()
            .filter(splits::Column::ReceiptId.is_in(receipt_ids.clone()))
            .all(&self.database)
            .await?;

        let split_ids: Vec<String> = split_rows.iter().map(|s| s.id.clone()).collect();
        let (participant_rows, assignment_rows) = if split_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let participant_rows: Vec<participants::Model> = participants::Entity::find()
                .filter(participants::Column::SplitInfoId.is_in(split_ids.clone()))
                .order_by_asc(participants::Column::Id)
                .all(&self.database)
                .await?;
            let assignment_rows: Vec<item_assignments::Model> = item_assignments::Entity::find()
                .filter(item_assignments::Column::SplitInfoId.is_in(split_ids))
                .all(&self.database)
                .await?;
            (participant_rows, assignment_rows)
        };

        let mut items_by_receipt: HashMap<String, Vec<LineItem>> = HashMap::new();
        for row in item_rows {
            let receipt_id = row.receipt_id.clone();
            items_by_receipt
                .entry(receipt_id)
                .or_default()
                .push(LineItem::try_from(row)?);
        }

        let mut warranty_by_receipt: HashMap<String, WarrantyInfo> = HashMap::new();
        for row in warranty_rows {
            warranty_by_receipt.insert(row.receipt_id.clone(), WarrantyInfo::from(row));
        }

        let mut splits_by_receipt: HashMap<String, SplitInfo> = HashMap::new();
        let mut receipt_by_split: HashMap<String, String> = HashMap::new();
        for row in split_rows {
            receipt_by_split.insert(row.id.clone(), row.receipt_id.clone());
            splits_by_receipt.insert(row.receipt_id.clone(), SplitInfo::try_from_header(row)?);
        }
        for row in participant_rows {
            if let Some(receipt_id) = receipt_by_split.get(&row.split_info_id)
                && let Some(split) = splits_by_receipt.get_mut(receipt_id)
            {
                split.participants.push(row.try_into()?);
            }
        }
        for row in assignment_rows {
            if let Some(receipt_id) = receipt_by_split.get(&row.split_info_id)
                && let Some(split) = splits_by_receipt.get_mut(receipt_id)
            {
                split.assignments.push(row.try_into()?);
            }
        }

        let mut out = Vec::with_capacity(headers.len());
        for header in headers {
            let id = header.id.clone();
            let mut receipt = Receipt::try_from_header(header)?;
            receipt.line_items = items_by_receipt.remove(&id).unwrap_or_default();
            receipt.warranty = warranty_by_receipt.remove(&id);
            receipt.split = splits_by_receipt.remove(&id);
            out.push(receipt);
        }
        Ok(out)
    }
}
