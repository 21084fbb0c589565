//! Quota API endpoints.

use api_types::quota::{AlertView, Crossing as ApiCrossing, QuotaUpsert, QuotaView, QuotasResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, receipts, server::ServerState, user};
use engine::{Crossing, QuotaAlert};

pub(crate) fn alert_view(alert: QuotaAlert) -> AlertView {
    AlertView {
        category: receipts::map_category_back(alert.category),
        crossing: match alert.crossing {
            Crossing::Warning => ApiCrossing::Warning,
            Crossing::Exceeded => ApiCrossing::Exceeded,
        },
        current_spend_minor: alert.current_spend_minor,
        quota_minor: alert.quota_minor,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<QuotasResponse>, ServerError> {
    let quotas = state.engine.quotas(&user.email).await?;
    Ok(Json(QuotasResponse {
        quotas: quotas
            .into_iter()
            .map(|q| QuotaView {
                category: receipts::map_category_back(q.category),
                amount_minor: q.amount_minor,
            })
            .collect(),
    }))
}

pub async fn upsert(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<QuotaUpsert>,
) -> Result<(StatusCode, Json<QuotaView>), ServerError> {
    let quota = state
        .engine
        .set_quota(
            &user.email,
            receipts::map_category(payload.category),
            payload.amount_minor,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(QuotaView {
            category: receipts::map_category_back(quota.category),
            amount_minor: quota.amount_minor,
        }),
    ))
}
