use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgSslMode},
};
use std::{str::FromStr, sync::Arc};

pub mod payment;
pub mod profile;
pub mod thumbnail;
pub mod user;

pub mod models {
    pub mod payment;
    pub mod profile;
    pub mod thumbnail;
    pub mod user;
}

pub mod dtos {
    pub mod payment;
    pub mod thumbnail;
}

/// Connects to the configured database, provisioning it on first run,
/// and applies pending migrations.
pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    ensure_database(database_url, require_ssl).await?;

    let pool = PgPool::connect_with(connect_options(database_url, require_ssl)?).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(Arc::new(pool))
}

fn connect_options(
    database_url: &str,
    require_ssl: bool,
) -> Result<PgConnectOptions, Box<dyn std::error::Error>> {
    let mut options = PgConnectOptions::from_str(database_url)?;
    if require_ssl {
        options = options.ssl_mode(PgSslMode::Require);
    }
    Ok(options)
}

/// Creates the target database if it does not exist yet, going through the
/// maintenance database on the same host.
async fn ensure_database(
    database_url: &str,
    require_ssl: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = url::Url::parse(database_url)?;
    let db_name = url.path().trim_start_matches('/');

    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");

    let admin_pool =
        PgPool::connect_with(connect_options(admin_url.as_str(), require_ssl)?).await?;

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(db_name)
            .fetch_one(&admin_pool)
            .await?;

    if !exists {
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name))
            .execute(&admin_pool)
            .await?;
    }

    admin_pool.close().await;
    Ok(())
}
