//! Participant rows: one obligation per (split, email) pair.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Lifecycle state of a participant's obligation.
///
/// Non-payers start `unsettled`; the only user-driven transitions are
/// `unsettled → pending` (settle up) and `pending → settled` (payer
/// confirmation). The payer's own row is born `settled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Unsettled,
    Pending,
    Settled,
}

impl SettlementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsettled => "unsettled",
            Self::Pending => "pending",
            Self::Settled => "settled",
        }
    }
}

impl TryFrom<&str> for SettlementStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unsettled" => Ok(Self::Unsettled),
            "pending" => Ok(Self::Pending),
            "settled" => Ok(Self::Settled),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid settlement status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    /// Computed portion of the receipt total.
    pub share_minor: i64,
    /// Amount already paid; the full total for the payer, 0 otherwise.
    pub paid_minor: i64,
    /// Remaining unpaid amount; 0 for the payer.
    pub owes_minor: i64,
    pub status: SettlementStatus,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "split_participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub split_info_id: String,
    pub email: String,
    pub share_minor: i64,
    pub paid_minor: i64,
    pub owes_minor: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::splits::Entity",
        from = "Column::SplitInfoId",
        to = "super::splits::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    SplitInfo,
}

impl Related<super::splits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SplitInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Participant {
    pub(crate) fn model(&self, split_info_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            split_info_id: ActiveValue::Set(split_info_id.to_string()),
            email: ActiveValue::Set(self.email.clone()),
            share_minor: ActiveValue::Set(self.share_minor),
            paid_minor: ActiveValue::Set(self.paid_minor),
            owes_minor: ActiveValue::Set(self.owes_minor),
            status: ActiveValue::Set(self.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Participant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            email: model.email,
            share_minor: model.share_minor,
            paid_minor: model.paid_minor,
            owes_minor: model.owes_minor,
            status: SettlementStatus::try_from(model.status.as_str())?,
        })
    }
}
