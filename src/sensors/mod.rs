//! Persistence for sensor readings.
//!
//! HTTP handlers only see the [`ReadingStore`] trait; [`PgReadingStore`] is the
//! production implementation.

#[cfg(test)]
pub(crate) mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use postgres::PgReadingStore;

use crate::db::models::{NewReading, SensorReading};

#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be obtained (refused, auth failure, pool timeout).
    #[error("failed to acquire datastore connection: {0}")]
    Connect(#[source] sqlx::Error),
    /// A connection was obtained but the statement failed.
    #[error("datastore statement failed: {0}")]
    Statement(#[source] sqlx::Error),
}

/// Append-only access to the readings table.
///
/// Every call holds exactly one connection for the duration of one statement
/// and gives it back before returning, whether the statement succeeded or not.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Persist one reading. The store assigns its timestamp.
    async fn insert(&self, reading: NewReading) -> Result<(), StoreError>;

    /// Return up to `limit` readings, newest first. Readings sharing a
    /// timestamp come back in reverse insertion order.
    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>, StoreError>;
}
