//! Quota storage and the post-receipt crossing check.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine,
    quotas::{self, Quota, QuotaAlert, detect_crossing},
};

use super::{Engine, normalize_email};

impl Engine {
    /// All quotas the user has configured, ordered by category.
    pub async fn quotas(&self, user_email: &str) -> ResultEngine<Vec<Quota>> {
        let user_email = normalize_email(user_email);
        let rows = quotas::Entity::find()
            .filter(quotas::Column::UserEmail.eq(user_email))
            .order_by_asc(quotas::Column::Category)
            .all(&self.database)
            .await?;
        rows.into_iter().map(Quota::try_from).collect()
    }

    /// Creates or replaces the quota for one category.
    pub async fn set_quota(
        &self,
        user_email: &str,
        category: Category,
        amount_minor: i64,
    ) -> ResultEngine<Quota> {
        if amount_minor < 0 {
            return Err(EngineError::InvalidAmount(
                "quota amount must be >= 0".to_string(),
            ));
        }
        let user_email = normalize_email(user_email);

        let updated = quotas::Entity::update_many()
            .col_expr(quotas::Column::AmountMinor, Expr::value(amount_minor))
            .col_expr(quotas::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(quotas::Column::UserEmail.eq(user_email.clone()))
            .filter(quotas::Column::Category.eq(category.as_str()))
            .exec(&self.database)
            .await?;
        if updated.rows_affected == 0 {
            quotas::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_email: ActiveValue::Set(user_email),
                category: ActiveValue::Set(category.as_str().to_string()),
                amount_minor: ActiveValue::Set(amount_minor),
                updated_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&self.database)
            .await?;
        }

        Ok(Quota {
            category,
            amount_minor,
        })
    }

    /// Edge-triggered threshold check after a receipt landed.
    ///
    /// `delta_minor` is the amount the new receipt added to the category;
    /// the month's spend already includes it. Returns an alert only when
    /// the receipt moved the cumulative spend across 80% or 100% of the
    /// quota for the month containing `reference`.
    pub async fn check_quota(
        &self,
        user_email: &str,
        category: Category,
        delta_minor: i64,
        reference: NaiveDate,
    ) -> ResultEngine<Option<QuotaAlert>> {
        let user_email = normalize_email(user_email);
        let row = quotas::Entity::find()
            .filter(quotas::Column::UserEmail.eq(user_email.clone()))
            .filter(quotas::Column::Category.eq(category.as_str()))
            .one(&self.database)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let current = self
            .category_spend(&user_email, category, reference)
            .await?;
        let previous = current - delta_minor;

        Ok(
            detect_crossing(previous, delta_minor, row.amount_minor).map(|crossing| QuotaAlert {
                category,
                crossing,
                current_spend_minor: current,
                quota_minor: row.amount_minor,
            }),
        )
    }
}
