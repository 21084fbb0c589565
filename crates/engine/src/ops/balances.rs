//! Balance queries built on the pure aggregation in [`crate::balances`].

use chrono::NaiveDate;

use crate::{
    Category, ResultEngine,
    balances::{BalanceSummary, aggregate_balances, monthly_category_spend},
};

use super::{Engine, normalize_email};

impl Engine {
    /// Net balance per counterparty across every split the user is part of.
    pub async fn balances(&self, user_email: &str) -> ResultEngine<BalanceSummary> {
        let user_email = normalize_email(user_email);
        let receipts = self.receipts_for_user(&user_email).await?;
        Ok(aggregate_balances(&receipts, &user_email))
    }

    /// The user's spend in one category for the month containing `reference`.
    pub async fn category_spend(
        &self,
        user_email: &str,
        category: Category,
        reference: NaiveDate,
    ) -> ResultEngine<i64> {
        let user_email = normalize_email(user_email);
        let receipts = self.receipts_for_user(&user_email).await?;
        Ok(monthly_category_spend(
            &receipts,
            &user_email,
            category,
            reference,
        ))
    }
}
