use async_trait::async_trait;
use sqlx::PgPool;

use super::{ReadingStore, StoreError};
use crate::db::models::{NewReading, SensorReading};

#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert(&self, reading: NewReading) -> Result<(), StoreError> {
        // Returned to the pool when `conn` drops, on every path out of here.
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connect)?;

        sqlx::query("INSERT INTO sensor (temperature, humidity, light) VALUES ($1, $2, $3)")
            .bind(reading.temperature)
            .bind(reading.humidity)
            .bind(reading.light)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::Statement)?;

        Ok(())
    }

    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(StoreError::Connect)?;

        sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT temperature, humidity, light, "timestamp"
            FROM sensor
            ORDER BY "timestamp" DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&mut *conn)
        .await
        .map_err(StoreError::Statement)
    }
}
