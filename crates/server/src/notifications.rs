//! Notification API endpoints.

use api_types::notification::{
    NotificationKind as ApiKind, NotificationListResponse, NotificationView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};
use engine::NotificationKind;

const DEFAULT_LIMIT: u64 = 50;

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<NotificationListResponse>, ServerError> {
    let notifications = state.engine.notifications(&user.email, DEFAULT_LIMIT).await?;
    Ok(Json(NotificationListResponse {
        notifications: notifications
            .into_iter()
            .map(|n| NotificationView {
                id: n.id,
                title: n.title,
                message: n.message,
                kind: match n.kind {
                    NotificationKind::SplitSettlement => ApiKind::SplitSettlement,
                    NotificationKind::SpendingAlert => ApiKind::SpendingAlert,
                },
                is_read: n.is_read,
                created_at: n.created_at,
            })
            .collect(),
    }))
}

pub async fn mark_read(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.mark_notification_read(id, &user.email).await?;
    Ok(StatusCode::ACCEPTED)
}
