//! Database connection and initialization.

use std::collections::HashSet;
use std::time::Duration;

use sea_orm::{
    ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait, QueryOrder,
};
use sea_orm_migration::{seaql_migrations, MigratorTrait};

use crate::config::{Config, DB_CONNECT_TIMEOUT_SECS, DB_MAX_CONNECTIONS, DB_MIN_CONNECTIONS};

pub mod migrations;

pub use migrations::Migrator;

/// Shared handle to the PostgreSQL pool
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

async fn open_pool(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(DB_MAX_CONNECTIONS)
        .min_connections(DB_MIN_CONNECTIONS)
        .connect_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECS))
        .sqlx_logging(false);

    SeaDatabase::connect(options).await
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let connection = open_pool(config).await?;

        if let Err(e) = Migrator::up(&connection, None).await {
            tracing::error!(error = %e, "Failed to apply schema migrations");
            return Err(e);
        }

        tracing::info!(max_connections = DB_MAX_CONNECTIONS, "Database ready");

        Ok(Self { connection })
    }

    /// Wrap an existing connection without touching the schema.
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Open the pool for the `migrate` command, leaving the schema alone.
    pub async fn connect_without_migrations(config: &Config) -> Result<Self, DbErr> {
        Ok(Self {
            connection: open_pool(config).await?,
        })
    }

    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn run_migrations(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Roll back the most recent migration.
    pub async fn rollback_migration(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Every known migration paired with whether it has been applied.
    pub async fn migration_status(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .order_by_asc(seaql_migrations::Column::Version)
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|m| m.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let is_applied = applied.contains(&name);
                (name, is_applied)
            })
            .collect())
    }

    /// Drop every table and re-apply all migrations.
    pub async fn fresh_migrations(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}
