use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use classbell_api::app::{create_app, AppDeps};
use classbell_api::config::Config;
use classbell_api::middleware::{init_logging, init_metrics};
use classbell_api::services::{HttpPushService, LogOnlyPushService};
use domain::services::PushService;
use persistence::repositories::{PgAccountStore, PgGroupStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_logging(&config.logging);
    init_metrics();

    info!("Starting ClassBell API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let push: Arc<dyn PushService> = if config.push.enabled {
        Arc::new(HttpPushService::new(&config.push)?)
    } else {
        info!("Push delivery disabled, alarms will be logged only");
        Arc::new(LogOnlyPushService)
    };

    let deps = AppDeps {
        groups: Arc::new(PgGroupStore::new(pool.clone())),
        accounts: Arc::new(PgAccountStore::new(pool.clone())),
        push,
        pool: Some(pool),
    };

    let addr = config.socket_addr()?;
    let app = create_app(config, deps);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
