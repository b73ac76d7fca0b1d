use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, DatabaseConnection};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "money_tracker={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.database).await?;
    Migrator::up(&db, None).await?;
    tracing::info!("database schema is up to date");

    let engine = engine::Engine::builder()
        .database(db)
        .token_secret(&settings.auth.jwt_secret)
        .token_ttl(settings.auth.token_ttl()?)
        .build()
        .await?;

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    server::run(engine, &addr).await?;

    Ok(())
}

async fn connect(
    config: &settings::Database,
) -> Result<DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);

    tracing::info!(max_connections = config.max_connections, "connecting to database");
    let database = sea_orm::Database::connect(options).await?;
    Ok(database)
}
