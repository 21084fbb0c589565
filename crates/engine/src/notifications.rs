//! Notification rows recorded alongside ledger events.
//!
//! Settlement notifications are inserted in the same DB transaction as the
//! status change they describe; spending alerts are recorded after receipt
//! creation, best effort.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SplitSettlement,
    SpendingAlert,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SplitSettlement => "split_settlement",
            Self::SpendingAlert => "spending_alert",
        }
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "split_settlement" => Ok(Self::SplitSettlement),
            "spending_alert" => Ok(Self::SpendingAlert),
            other => Err(EngineError::KeyNotFound(format!(
                "unknown notification kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_email: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Notification {
    pub(crate) fn model(&self) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            user_email: ActiveValue::Set(self.user_email.clone()),
            title: ActiveValue::Set(self.title.clone()),
            message: ActiveValue::Set(self.message.clone()),
            kind: ActiveValue::Set(self.kind.as_str().to_string()),
            is_read: ActiveValue::Set(self.is_read),
            created_at: ActiveValue::Set(self.created_at),
        }
    }
}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound("invalid notification id".to_string()))?;
        Ok(Self {
            id,
            user_email: model.user_email,
            title: model.title,
            message: model.message,
            kind: NotificationKind::try_from(model.kind.as_str())?,
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}
