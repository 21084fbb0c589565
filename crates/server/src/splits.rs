//! Settlement API endpoints.

use api_types::split::ConfirmSettlement;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

/// Participant marks their own share as paid.
pub async fn settle(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let notification = state.engine.settle_up(id, &user.email).await?;

    // Push to the payer, fire and forget.
    if let Err(err) = state
        .collaborators
        .push
        .send(
            &notification.user_email,
            &notification.title,
            &notification.message,
        )
        .await
    {
        tracing::warn!("push delivery failed: {err}");
    }

    Ok(StatusCode::ACCEPTED)
}

/// Payer confirms a participant's pending settlement.
pub async fn confirm(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmSettlement>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .confirm_settlement(id, &payload.participant_email, &user.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}
