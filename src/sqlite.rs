use anyhow::Result;
use serde::Deserialize;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

// SQLITE_URL is stamped by the build script once it has provisioned the
// local database file.
pub fn default_url() -> &'static str {
    option_env!("SQLITE_URL").unwrap_or("sqlite://db/clubhub.db")
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

pub async fn create_pool(settings: &Settings) -> Result<SqlitePool> {
    match Sqlite::database_exists(&settings.url).await? {
        true => tracing::info!("Database already exists"),
        false => Sqlite::create_database(&settings.url).await?,
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;

    sqlx::migrate!("db/migrations").run(&pool).await?;

    Ok(pool)
}
