//! Item ownership rows for custom splits.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Maps one line item to the participant responsible for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemAssignment {
    pub line_item_id: Uuid,
    pub assigned_to: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "item_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub split_info_id: String,
    pub line_item_id: String,
    pub assigned_to: String,
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

impl ItemAssignment {
    pub(crate) fn model(&self, split_info_id: Uuid) -> ActiveModel {
        ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            split_info_id: ActiveValue::Set(split_info_id.to_string()),
            line_item_id: ActiveValue::Set(self.line_item_id.to_string()),
            assigned_to: ActiveValue::Set(self.assigned_to.clone()),
        }
    }
}

impl TryFrom<Model> for ItemAssignment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let line_item_id = Uuid::parse_str(&model.line_item_id)
            .map_err(|_| EngineError::KeyNotFound("invalid line item id".to_string()))?;
        Ok(Self {
            line_item_id,
            assigned_to: model.assigned_to,
        })
    }
}
