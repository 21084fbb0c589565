//! Receipt primitives.
//!
//! A `Receipt` is immutable after creation: line items, warranty info and the
//! split subgraph are inserted together and only participant settlement
//! status may change afterwards (see `ops::settlement`).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, line_items::LineItem, splits::SplitInfo};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Uuid,
    /// The original payer/uploader.
    pub user_email: String,
    pub merchant_name: String,
    pub transaction_date: NaiveDate,
    /// Total in INR minor units; always equals the sum of line totals.
    pub total_minor: i64,
    pub currency: Currency,
    pub line_items: Vec<LineItem>,
    pub warranty: Option<WarrantyInfo>,
    pub split: Option<SplitInfo>,
}

/// Warranty tracking attached to a receipt with shopping items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WarrantyInfo {
    pub is_tracked: bool,
    pub end_date: Option<NaiveDate>,
    pub days_remaining: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_email: String,
    pub merchant_name: String,
    pub transaction_date: Date,
    pub total_minor: i64,
    pub currency: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::line_items::Entity")]
    LineItems,
    #[sea_orm(has_one = "super::warranty::Entity")]
    Warranty,
    #[sea_orm(has_one = "super::splits::Entity")]
    SplitInfo,
}

impl Related<super::line_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::warranty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warranty.def()
    }
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SplitInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Receipt {
    pub(crate) fn header_model(&self, created_at: DateTime<Utc>) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            user_email: ActiveValue::Set(self.user_email.clone()),
            merchant_name: ActiveValue::Set(self.merchant_name.clone()),
            transaction_date: ActiveValue::Set(self.transaction_date),
            total_minor: ActiveValue::Set(self.total_minor),
            currency: ActiveValue::Set(self.currency.code().to_string()),
            created_at: ActiveValue::Set(created_at),
        }
    }

    /// Rebuilds a header-only receipt from its row; related collections are
    /// filled in by the loader.
    pub(crate) fn try_from_header(model: Model) -> Result<Self, EngineError> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound("invalid receipt id".to_string()))?;
        Ok(Self {
            id,
            user_email: model.user_email,
            merchant_name: model.merchant_name,
            transaction_date: model.transaction_date,
            total_minor: model.total_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            line_items: Vec::new(),
            warranty: None,
            split: None,
        })
    }
}
