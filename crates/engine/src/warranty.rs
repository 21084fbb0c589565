//! Warranty tracking rows (one per receipt, optional).

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::receipts::WarrantyInfo;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "warranty_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub receipt_id: String,
    pub is_tracked: bool,
    pub end_date: Option<Date>,
    pub days_remaining: Option<i32>,
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

impl WarrantyInfo {
    pub(crate) fn model(&self, receipt_id: Uuid) -> ActiveModel {
        ActiveModel {
            receipt_id: ActiveValue::Set(receipt_id.to_string()),
            is_tracked: ActiveValue::Set(self.is_tracked),
            end_date: ActiveValue::Set(self.end_date),
            days_remaining: ActiveValue::Set(self.days_remaining),
        }
    }
}

impl From<Model> for WarrantyInfo {
    fn from(model: Model) -> Self {
        Self {
            is_tracked: model.is_tracked,
            end_date: model.end_date,
            days_remaining: model.days_remaining,
        }
    }
}
