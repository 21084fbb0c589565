//! Per-category monthly spending quotas and the crossing detector.
//!
//! The detector is edge-triggered: an alert fires only when this receipt's
//! delta moves the cumulative spend across a threshold that the previous
//! cumulative spend was still below. Re-checking an already-exceeded
//! category never re-fires.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Category;

/// Which threshold a new receipt crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    /// Crossed 80% of the quota.
    Warning,
    /// Crossed 100% of the quota.
    Exceeded,
}

impl Crossing {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

/// Decision plus the numeric inputs the alert composer needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaAlert {
    pub category: Category,
    pub crossing: Crossing,
    pub current_spend_minor: i64,
    pub quota_minor: i64,
}

/// Pure threshold-crossing check.
///
/// `Exceeded` wins when one update crosses both thresholds at once. The 80%
/// comparison is done in integer arithmetic (`10·x` vs `8·quota`) to avoid
/// float edge cases on the boundary.
#[must_use]
pub fn detect_crossing(
    previous_minor: i64,
    delta_minor: i64,
    quota_minor: i64,
) -> Option<Crossing> {
    if quota_minor <= 0 {
        return None;
    }
    let current = previous_minor + delta_minor;

    if previous_minor < quota_minor && current >= quota_minor {
        return Some(Crossing::Exceeded);
    }
    if 10 * previous_minor < 8 * quota_minor && 10 * current >= 8 * quota_minor {
        return Some(Crossing::Warning);
    }
    None
}

/// One user's monthly budget for a category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quota {
    pub category: Category,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_quotas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_email: String,
    pub category: String,
    pub amount_minor: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Quota {
    type Error = crate::EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            category: Category::try_from(model.category.as_str())?,
            amount_minor: model.amount_minor,
        })
    }
}
