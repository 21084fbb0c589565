use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use collaborators::{HttpPushSender, TemplateAlertComposer};
pub use server::{Collaborators, run, run_with_listener, spawn_with_listener};

mod balances;
mod collaborators;
mod notifications;
mod quotas;
mod receipts;
mod server;
mod splits;
mod user;

pub mod types {
    pub mod receipt {
        pub use api_types::receipt::{
            LineItemNew, LineItemView, ReceiptCreated, ReceiptListResponse, ReceiptNew,
            ReceiptView, WarrantyView,
        };
    }

    pub mod split {
        pub use api_types::split::{
            ConfirmSettlement, ItemAssignmentNew, ParticipantView, SplitNew, SplitView,
        };
    }

    pub mod balance {
        pub use api_types::balance::{BalancesResponse, ContributionView, CounterpartyView};
    }

    pub mod quota {
        pub use api_types::quota::{AlertView, QuotaUpsert, QuotaView, QuotasResponse};
    }

    pub mod notification {
        pub use api_types::notification::{NotificationListResponse, NotificationView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) | EngineError::Transport(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        EngineError::EmptyParticipants
        | EngineError::PayerNotInParticipants(_)
        | EngineError::IncompleteAssignment(_)
        | EngineError::UnknownAssignee(_)
        | EngineError::InvalidAmount(_)
        | EngineError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
