//! Postgres module

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use tracing::info;

mod history;
mod templates;

/// Database connection
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    /// The database connection pool
    pub pool: PgPool,
}

impl PostgresDatabase {
    /// Connect to the database described by `config`
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let mut options = PgConnectOptions::from_str(&config.connection_string)
            .context("invalid database connection string")?;

        if let Some(name) = &config.database_name {
            options = options.database(name);
        }

        let pool = PgPoolOptions::new()
            .connect_with(options)
            .await
            .context("failed to connect to the database")?;

        info!("connected to database");

        Ok(Self { pool })
    }

    /// Apply pending schema migrations
    #[mutants::skip]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run database migrations")?;

        Ok(())
    }

    /// Close every connection. Queries issued afterwards fail.
    #[mutants::skip]
    pub async fn close(&self) {
        self.pool.close().await;

        info!("disconnected from database");
    }
}

/// Database connection details
#[derive(Clone, Debug, Parser)]
pub struct DatabaseConfig {
    /// The database connection string
    #[clap(long = "database-url", env = "DATABASE_URL")]
    pub connection_string: String,

    /// Database name, overriding the one in the connection string
    #[clap(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,
}
