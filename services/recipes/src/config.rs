use anyhow::Context as _;

/// Recipes service configuration loaded from environment variables.
#[derive(Debug)]
pub struct RecipesConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `RECIPES_PORT`.
    pub recipes_port: u16,
}

impl RecipesConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            recipes_port: parse_port(std::env::var("RECIPES_PORT").ok().as_deref())?,
        })
    }
}

fn parse_port(raw: Option<&str>) -> anyhow::Result<u16> {
    match raw {
        None => Ok(3114),
        Some(v) => v
            .parse()
            .with_context(|| format!("RECIPES_PORT is not a valid port: {v:?}")),
    }
}
