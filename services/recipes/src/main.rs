use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use foodgram_recipes::config::RecipesConfig;
use foodgram_recipes::router::build_router;
use foodgram_recipes::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foodgram_core::tracing::init_tracing();

    let config = RecipesConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let router = build_router(AppState { db });
    let addr = format!("0.0.0.0:{}", config.recipes_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("recipes service listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
