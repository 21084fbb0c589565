//! Balance API endpoint.

use api_types::balance::{BalancesResponse, ContributionView, CounterpartyView, Direction};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BalancesResponse>, ServerError> {
    let summary = state.engine.balances(&user.email).await?;

    let counterparties = summary
        .counterparties
        .into_iter()
        .map(|c| CounterpartyView {
            email: c.email,
            net_minor: c.net_minor,
            contributions: c
                .contributions
                .into_iter()
                .map(|contribution| ContributionView {
                    receipt_id: contribution.receipt_id,
                    merchant_name: contribution.merchant_name,
                    transaction_date: contribution.transaction_date,
                    amount_minor: contribution.participant.owes_minor,
                    direction: match contribution.direction {
                        engine::Direction::Owe => Direction::Owe,
                        engine::Direction::Owed => Direction::Owed,
                    },
                })
                .collect(),
        })
        .collect();

    Ok(Json(BalancesResponse {
        counterparties,
        total_owed_to_user_minor: summary.total_owed_to_user_minor,
        total_user_owes_minor: summary.total_user_owes_minor,
    }))
}
