use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use stock_groups_ws::cfg::CONFIG;
use stock_groups_ws::logging;
use stock_groups_ws::redis::RedisCache;
use stock_groups_ws::server::Server;
use tokio::sync::oneshot;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&CONFIG.database_url)
        .await?;
    let redis_cache = RedisCache::new(&CONFIG.redis_url).await?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("ctrl_c error: {}", e);
        }
        let _ = shutdown_tx.send(());
    });

    Server::new(pool, redis_cache).start(shutdown_rx).await
}
