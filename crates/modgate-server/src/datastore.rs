//! Best-effort mirroring of verdicts to the external datastore.
//!
//! Failures are returned to the caller, which logs and discards them: a
//! datastore outage never changes a task's in-memory outcome.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use thiserror::Error;
use tracing::debug;

use crate::config::DatastoreConfig;

/// Datastore errors.
#[derive(Debug, Error)]
pub enum DatastoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Receives the final adult-content verdict for a file.
#[async_trait]
pub trait StatusNotifier: Send + Sync {
    async fn update_moderation_status(
        &self,
        filename: &str,
        is_adult: bool,
    ) -> Result<(), DatastoreError>;
}

/// Writes verdicts to the `flow` table, one connection per update.
pub struct PostgresNotifier {
    options: PgConnectOptions,
}

impl PostgresNotifier {
    pub fn new(config: &DatastoreConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .database(&config.db_name)
            .username(&config.db_user)
            .password(&config.db_password);
        Self { options }
    }
}

#[async_trait]
impl StatusNotifier for PostgresNotifier {
    async fn update_moderation_status(
        &self,
        filename: &str,
        is_adult: bool,
    ) -> Result<(), DatastoreError> {
        let mut conn = PgConnection::connect_with(&self.options).await?;

        let updated = sqlx::query("UPDATE flow SET is_nsfw = $1 WHERE media_url = $2")
            .bind(is_adult)
            .bind(filename)
            .execute(&mut conn)
            .await;
        let closed = conn.close().await;

        let rows = updated?.rows_affected();
        closed?;

        debug!(filename = %filename, is_adult, rows, "Moderation status written");
        Ok(())
    }
}

/// Notifier used when the datastore is disabled.
pub struct NoopNotifier;

#[async_trait]
impl StatusNotifier for NoopNotifier {
    async fn update_moderation_status(
        &self,
        filename: &str,
        is_adult: bool,
    ) -> Result<(), DatastoreError> {
        debug!(filename = %filename, is_adult, "Datastore disabled, skipping status update");
        Ok(())
    }
}
