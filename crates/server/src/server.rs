use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{balances, collaborators, notifications, quotas, receipts, splits, user};
use engine::{AlertComposer, Engine, PushSender};

/// External services the server drives on a best-effort basis.
#[derive(Clone)]
pub struct Collaborators {
    pub composer: Arc<dyn AlertComposer>,
    pub push: Arc<dyn PushSender>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            composer: Arc::new(collaborators::TemplateAlertComposer),
            push: Arc::new(collaborators::NoopPushSender),
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub collaborators: Collaborators,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Email.eq(auth_header.username().to_ascii_lowercase()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = if let Some(user) = user {
        user
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/receipts", post(receipts::create).get(receipts::list))
        .route(
            "/receipts/{id}",
            get(receipts::get).delete(receipts::delete),
        )
        .route("/receipts/{id}/settle", post(splits::settle))
        .route("/receipts/{id}/confirm", post(splits::confirm))
        .route("/splits/balances", get(balances::get))
        .route("/quotas", get(quotas::list).post(quotas::upsert))
        .route("/notifications", get(notifications::list))
        .route(
            "/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, collaborators: Collaborators) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, collaborators, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    collaborators: Collaborators,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        collaborators,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    collaborators: Collaborators,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, collaborators, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
