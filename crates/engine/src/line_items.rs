use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Category, EngineError};

/// One purchased item on a receipt.
///
/// `quantity` may be fractional (weighed goods); the line total is
/// `round(price_minor × quantity)` so every derived amount stays in integer
/// minor units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: f64,
    /// Unit price in INR minor units.
    pub price_minor: i64,
    pub category: Category,
}

impl LineItem {
    /// `price × quantity`, rounded to the nearest minor unit.
    #[must_use]
    pub fn total_minor(&self) -> i64 {
        (self.price_minor as f64 * self.quantity).round() as i64
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub receipt_id: String,
    pub description: String,
    pub quantity: f64,
    pub price_minor: i64,
    pub category: String,
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
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl LineItem {
    pub(crate) fn model(&self, receipt_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(self.id.to_string()),
            receipt_id: ActiveValue::Set(receipt_id.to_string()),
            description: ActiveValue::Set(self.description.clone()),
            quantity: ActiveValue::Set(self.quantity),
            price_minor: ActiveValue::Set(self.price_minor),
            category: ActiveValue::Set(self.category.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for LineItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::KeyNotFound("invalid line item id".to_string()))?;
        Ok(Self {
            id,
            description: model.description,
            quantity: model.quantity,
            price_minor: model.price_minor,
            category: Category::try_from(model.category.as_str())?,
        })
    }
}
