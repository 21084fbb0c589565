//! Receipts API endpoints.

use api_types::receipt::{
    Category as ApiCategory, LineItemView, ReceiptCreated, ReceiptListResponse, ReceiptNew,
    ReceiptView, WarrantyView,
};
use api_types::split::{
    ParticipantView, SettlementStatus as ApiStatus, SplitStrategy as ApiStrategy, SplitView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Datelike;
use uuid::Uuid;

use crate::{ServerError, quotas, server::ServerState, user};
use engine::{
    Category, CreateReceiptCmd, Currency, ItemAssignment, NewLineItem, NewSplit, Receipt,
    SettlementStatus, SplitStrategy,
};

pub(crate) fn map_category(category: ApiCategory) -> Category {
    match category {
        ApiCategory::Home => Category::Home,
        ApiCategory::Food => Category::Food,
        ApiCategory::Health => Category::Health,
        ApiCategory::Restaurant => Category::Restaurant,
        ApiCategory::Shopping => Category::Shopping,
        ApiCategory::Travel => Category::Travel,
        ApiCategory::Entertainment => Category::Entertainment,
        ApiCategory::Fuel => Category::Fuel,
        ApiCategory::Other => Category::Other,
    }
}

pub(crate) fn map_category_back(category: Category) -> ApiCategory {
    match category {
        Category::Home => ApiCategory::Home,
        Category::Food => ApiCategory::Food,
        Category::Health => ApiCategory::Health,
        Category::Restaurant => ApiCategory::Restaurant,
        Category::Shopping => ApiCategory::Shopping,
        Category::Travel => ApiCategory::Travel,
        Category::Entertainment => ApiCategory::Entertainment,
        Category::Fuel => ApiCategory::Fuel,
        Category::Other => ApiCategory::Other,
    }
}

fn map_currency(currency: api_types::Currency) -> Currency {
    match currency {
        api_types::Currency::Inr => Currency::Inr,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Gbp => Currency::Gbp,
        api_types::Currency::Jpy => Currency::Jpy,
        api_types::Currency::Aud => Currency::Aud,
        api_types::Currency::Cad => Currency::Cad,
    }
}

fn map_status(status: SettlementStatus) -> ApiStatus {
    match status {
        SettlementStatus::Unsettled => ApiStatus::Unsettled,
        SettlementStatus::Pending => ApiStatus::Pending,
        SettlementStatus::Settled => ApiStatus::Settled,
    }
}

pub(crate) fn receipt_view(receipt: Receipt) -> ReceiptView {
    ReceiptView {
        id: receipt.id,
        user_email: receipt.user_email,
        merchant_name: receipt.merchant_name,
        transaction_date: receipt.transaction_date,
        total_minor: receipt.total_minor,
        line_items: receipt
            .line_items
            .into_iter()
            .map(|item| LineItemView {
                id: item.id,
                description: item.description,
                quantity: item.quantity,
                price_minor: item.price_minor,
                category: map_category_back(item.category),
            })
            .collect(),
        warranty: receipt.warranty.map(|w| WarrantyView {
            is_tracked: w.is_tracked,
            end_date: w.end_date,
            days_remaining: w.days_remaining,
        }),
        split: receipt.split.map(|split| SplitView {
            payer: split.payer,
            strategy: match split.strategy {
                SplitStrategy::Equal => ApiStrategy::Equal,
                SplitStrategy::Custom => ApiStrategy::Custom,
            },
            participants: split
                .participants
                .into_iter()
                .map(|p| ParticipantView {
                    email: p.email,
                    share_minor: p.share_minor,
                    paid_minor: p.paid_minor,
                    owes_minor: p.owes_minor,
                    status: map_status(p.status),
                })
                .collect(),
        }),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ReceiptNew>,
) -> Result<(StatusCode, Json<ReceiptCreated>), ServerError> {
    let mut cmd = CreateReceiptCmd::new(
        user.email.clone(),
        payload.merchant_name,
        payload.transaction_date,
    );
    cmd.currency = payload.currency.map(map_currency).unwrap_or_default();
    cmd.track_warranty = payload.track_warranty.unwrap_or(false);
    cmd.line_items = payload
        .line_items
        .into_iter()
        .map(|item| NewLineItem {
            id: item.id,
            description: item.description,
            quantity: item.quantity,
            price_minor: item.price_minor,
            category: map_category(item.category),
        })
        .collect();
    cmd.split = payload.split.map(|split| NewSplit {
        participants: split.participants,
        strategy: match split.strategy {
            api_types::split::SplitStrategy::Equal => SplitStrategy::Equal,
            api_types::split::SplitStrategy::Custom => SplitStrategy::Custom,
        },
        assignments: split
            .assignments
            .unwrap_or_default()
            .into_iter()
            .map(|a| ItemAssignment {
                line_item_id: a.line_item_id,
                assigned_to: a.assigned_to,
            })
            .collect(),
    });

    let receipt = state.engine.create_receipt(cmd).await?;
    let mut alerts = fire_quota_alerts(&state, &user.email, &receipt).await;

    Ok((
        StatusCode::CREATED,
        Json(ReceiptCreated {
            id: receipt.id,
            alert: if alerts.is_empty() {
                None
            } else {
                Some(quotas::alert_view(alerts.remove(0)))
            },
        }),
    ))
}

/// Checks every category the receipt touched against the uploader's quotas,
/// one alert per crossing category.
///
/// Alert composition, the notification rows and the pushes are best effort:
/// failures are logged and the receipt creation still succeeds.
async fn fire_quota_alerts(
    state: &ServerState,
    user_email: &str,
    receipt: &Receipt,
) -> Vec<engine::QuotaAlert> {
    let mut deltas: Vec<(Category, i64)> = Vec::new();
    for item in &receipt.line_items {
        match deltas.iter_mut().find(|(c, _)| *c == item.category) {
            Some((_, total)) => *total += item.total_minor(),
            None => deltas.push((item.category, item.total_minor())),
        }
    }

    let mut fired = Vec::new();
    for (category, delta) in deltas {
        match state
            .engine
            .check_quota(user_email, category, delta, receipt.transaction_date)
            .await
        {
            Ok(Some(alert)) => fired.push(alert),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("quota check failed: {err}");
            }
        }
    }
    if fired.is_empty() {
        return fired;
    }

    let receipts = match state.engine.receipts_for_user(user_email).await {
        Ok(receipts) => receipts,
        Err(err) => {
            tracing::warn!("receipt count for alert failed: {err}");
            Vec::new()
        }
    };

    for alert in &fired {
        let receipt_count = receipts
            .iter()
            .filter(|r| {
                r.transaction_date.year() == receipt.transaction_date.year()
                    && r.transaction_date.month() == receipt.transaction_date.month()
                    && r.line_items.iter().any(|i| i.category == alert.category)
            })
            .count()
            .max(1);

        match state
            .collaborators
            .composer
            .compose(alert, receipt_count)
            .await
        {
            Ok(message) => {
                if let Err(err) = state.engine.record_alert(user_email, &message).await {
                    tracing::warn!("failed to record spending alert: {err}");
                }
                if let Err(err) = state
                    .collaborators
                    .push
                    .send(user_email, &message.title, &message.message)
                    .await
                {
                    tracing::warn!("push delivery failed: {err}");
                }
            }
            Err(err) => {
                tracing::warn!("alert composition failed: {err}");
            }
        }
    }

    fired
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ReceiptListResponse>, ServerError> {
    let receipts = state.engine.receipts_for_user(&user.email).await?;
    Ok(Json(ReceiptListResponse {
        receipts: receipts.into_iter().map(receipt_view).collect(),
    }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReceiptView>, ServerError> {
    let receipt = state.engine.receipt(id).await?;
    let is_participant = receipt
        .split
        .as_ref()
        .is_some_and(|s| s.participants.iter().any(|p| p.email == user.email));
    if receipt.user_email != user.email && !is_participant {
        return Err(ServerError::Engine(engine::EngineError::Forbidden(
            "receipt belongs to another user".to_string(),
        )));
    }
    Ok(Json(receipt_view(receipt)))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_receipt(id, &user.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
