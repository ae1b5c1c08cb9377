use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;

/// Establishes a connection pool to the PostgreSQL database.
///
/// A full `url` in the settings wins over the discrete host/port/user fields.
/// The pool is the only shared state in the application; hand clones of it to
/// whichever repositories need it.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;

    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        max_connections = settings.max_connections,
        "Connecting to the database."
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_with(options)
        .await
        .map_err(DbError::ConnectionError)?;

    tracing::info!("Database connection established.");
    Ok(pool)
}

fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    if let Some(url) = &settings.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| DbError::ConnectionConfigError(format!("invalid database url: {e}")));
    }

    let ssl_mode = PgSslMode::from_str(&settings.ssl_mode)
        .map_err(|e| DbError::ConnectionConfigError(format!("invalid ssl_mode: {e}")))?;

    Ok(PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode))
}

/// Applies the embedded migrations, creating the `employees` table and its indexes.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}
