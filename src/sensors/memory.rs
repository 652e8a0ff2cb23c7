use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{ReadingStore, StoreError};
use crate::db::models::{NewReading, SensorReading};

/// In-memory `ReadingStore` for handler tests.
///
/// Every operation takes a [`Lease`] standing in for a pooled connection, so
/// tests can check that failures never leave one outstanding. Clones share
/// state.
#[derive(Clone, Default)]
pub(crate) struct MemoryReadingStore {
    rows: Arc<RwLock<Vec<(u64, SensorReading)>>>,
    next_seq: Arc<AtomicUsize>,
    counters: Arc<LeaseCounters>,
    refuse_connections: Arc<AtomicBool>,
    fail_statements: Arc<AtomicBool>,
}

#[derive(Default)]
struct LeaseCounters {
    taken: AtomicUsize,
    outstanding: AtomicUsize,
}

struct Lease(Arc<LeaseCounters>);

impl Drop for Lease {
    fn drop(&mut self) {
        self.0.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryReadingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every subsequent acquire fails as if the database were down.
    pub(crate) fn refuse_connections(&self) {
        self.refuse_connections.store(true, Ordering::SeqCst);
    }

    /// Acquires succeed, but every statement errors.
    pub(crate) fn fail_statements(&self) {
        self.fail_statements.store(true, Ordering::SeqCst);
    }

    /// Number of successful acquires so far.
    pub(crate) fn leases_taken(&self) -> usize {
        self.counters.taken.load(Ordering::SeqCst)
    }

    /// Leases acquired but not yet released.
    pub(crate) fn leases_outstanding(&self) -> usize {
        self.counters.outstanding.load(Ordering::SeqCst)
    }

    pub(crate) async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Store a reading with an explicit timestamp, bypassing the lease
    /// bookkeeping.
    pub(crate) async fn seed(&self, reading: NewReading, timestamp: DateTime<Utc>) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) as u64;
        self.rows.write().await.push((seq, to_row(reading, timestamp)));
    }

    fn acquire(&self) -> Result<Lease, StoreError> {
        if self.refuse_connections.load(Ordering::SeqCst) {
            return Err(StoreError::Connect(sqlx::Error::PoolTimedOut));
        }
        self.counters.taken.fetch_add(1, Ordering::SeqCst);
        self.counters.outstanding.fetch_add(1, Ordering::SeqCst);
        Ok(Lease(self.counters.clone()))
    }

    fn check_statement(&self) -> Result<(), StoreError> {
        if self.fail_statements.load(Ordering::SeqCst) {
            return Err(StoreError::Statement(sqlx::Error::Protocol(
                "simulated statement failure".into(),
            )));
        }
        Ok(())
    }
}

fn to_row(reading: NewReading, timestamp: DateTime<Utc>) -> SensorReading {
    SensorReading {
        temperature: reading.temperature,
        humidity: reading.humidity,
        light: reading.light,
        timestamp,
    }
}

#[async_trait]
impl ReadingStore for MemoryReadingStore {
    async fn insert(&self, reading: NewReading) -> Result<(), StoreError> {
        let _lease = self.acquire()?;
        self.check_statement()?;
        self.seed(reading, Utc::now()).await;
        Ok(())
    }

    async fn latest(&self, limit: u32) -> Result<Vec<SensorReading>, StoreError> {
        let _lease = self.acquire()?;
        self.check_statement()?;

        let mut rows = self.rows.read().await.clone();
        rows.sort_by(|(a_seq, a), (b_seq, b)| {
            b.timestamp.cmp(&a.timestamp).then(b_seq.cmp(a_seq))
        });
        Ok(rows
            .into_iter()
            .take(limit as usize)
            .map(|(_, r)| r)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn reading(temperature: f64) -> NewReading {
        NewReading { temperature, humidity: 40.0, light: 10.0 }
    }

    #[tokio::test]
    async fn latest_orders_by_timestamp_then_insertion() {
        let store = MemoryReadingStore::new();
        let t0 = Utc::now();
        store.seed(reading(1.0), t0).await;
        store.seed(reading(2.0), t0 + Duration::seconds(5)).await;
        store.seed(reading(3.0), t0).await;

        let temps: Vec<f64> = store
            .latest(10)
            .await
            .unwrap()
            .iter()
            .map(|r| r.temperature)
            .collect();
        assert_eq!(temps, vec![2.0, 3.0, 1.0]);
    }

    #[tokio::test]
    async fn leases_are_released_after_statement_failure() {
        let store = MemoryReadingStore::new();
        store.fail_statements();

        assert!(matches!(
            store.insert(reading(1.0)).await,
            Err(StoreError::Statement(_))
        ));
        assert_eq!(store.leases_taken(), 1);
        assert_eq!(store.leases_outstanding(), 0);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn refused_connections_take_no_lease() {
        let store = MemoryReadingStore::new();
        store.refuse_connections();

        assert!(matches!(store.latest(10).await, Err(StoreError::Connect(_))));
        assert_eq!(store.leases_taken(), 0);
        assert_eq!(store.leases_outstanding(), 0);
    }
}
