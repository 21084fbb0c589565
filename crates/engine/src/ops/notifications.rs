//! Notification listing and read marking.

use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    alerts::AlertMessage,
    notifications::{self, Notification, NotificationKind},
};

use super::{Engine, normalize_email};

impl Engine {
    /// The user's most recent notifications, newest first.
    pub async fn notifications(
        &self,
        user_email: &str,
        limit: u64,
    ) -> ResultEngine<Vec<Notification>> {
        let user_email = normalize_email(user_email);
        let rows = notifications::Entity::find()
            .filter(notifications::Column::UserEmail.eq(user_email))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(limit)
            .all(&self.database)
            .await?;
        rows.into_iter().map(Notification::try_from).collect()
    }

    /// Marks one notification as read. Owner only.
    pub async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_email: &str,
    ) -> ResultEngine<()> {
        let user_email = normalize_email(user_email);
        let updated = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::Id.eq(notification_id.to_string()))
            .filter(notifications::Column::UserEmail.eq(user_email))
            .exec(&self.database)
            .await?;
        if updated.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(
                "notification not exists".to_string(),
            ));
        }
        Ok(())
    }

    /// Records a spending alert as an in-app notification.
    pub async fn record_alert(
        &self,
        user_email: &str,
        message: &AlertMessage,
    ) -> ResultEngine<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_email: normalize_email(user_email),
            title: message.title.clone(),
            message: message.message.clone(),
            kind: NotificationKind::SpendingAlert,
            is_read: false,
            created_at: Utc::now(),
        };
        notification.model().insert(&self.database).await?;
        Ok(notification)
    }
}
