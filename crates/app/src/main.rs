use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::{Collaborators, HttpPushSender};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "scontrino={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db.clone()).build();

    let mut collaborators = Collaborators::default();
    if let Some(endpoint) = settings.server.push_endpoint.clone() {
        collaborators.push = Arc::new(HttpPushSender::new(endpoint));
    }

    server::run(engine, db, collaborators).await;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;

    Ok(database)
}
