//! Split subgraph attached to a shared receipt.
//!
//! The split row carries the payer and the strategy; shares live on
//! `split_participants` and custom item ownership on `item_assignments`.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    item_assignments::ItemAssignment,
    participants::Participant,
};

/// How a shared receipt is divided among participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    Equal,
    Custom,
}

impl SplitStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for SplitStrategy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "custom" => Ok(Self::Custom),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid split strategy: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitInfo {
    pub id: Uuid,
    /// Must equal the receipt's `user_email` and appear among participants.
    pub payer: String,
    pub strategy: SplitStrategy,
    pub participants: Vec<Participant>,
    /// Only populated for [`SplitStrategy::Custom`].
    pub assignments: Vec<ItemAssignment>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub receipt_id: String,
    pub payer_email: String,
    pub strategy: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receipts::Entity",
        from = "Column::ReceiptId",
        to = "super::receipts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Receipts,
    #[sea_orm(has_many = "super::participants::Entity")]
    Participants,
    #[sea_orm(has_many = "super::item_assignments::Entity")]
    Assignments,
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::item_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SplitInfo {
    pub(crate) fn model(&self, receipt_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            receipt_id: ActiveValue::Set(receipt_id.to_string()),
            payer_email: ActiveValue::Set(self.payer.clone()),
            strategy: ActiveValue::Set(self.strategy.as_str().to_string()),
        }
    }

    pub(crate) fn try_from_header(model: Model) -> Result<Self, EngineError> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound("invalid split id".to_string()))?;
        Ok(Self {
            id,
            payer: model.payer_email,
            strategy: SplitStrategy::try_from(model.strategy.as_str())?,
            participants: Vec::new(),
            assignments: Vec::new(),
        })
    }
}
