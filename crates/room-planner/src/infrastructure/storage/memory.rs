//! In-memory layout repository.
//!
//! Keeps layouts in a map for the lifetime of the process.  Tests and demos
//! can add latency and make the next N calls fail with
//! [`RepositoryError::Unavailable`] to exercise the timeout and retry path
//! without a real service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use room_core::LayoutSnapshot;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::persist_layout::{LayoutId, LayoutRepository, RepositoryError};

#[derive(Debug, Default)]
pub struct InMemoryLayoutRepository {
    layouts: Mutex<HashMap<LayoutId, LayoutSnapshot>>,
    failures_left: AtomicU32,
    calls: AtomicU32,
    latency: Option<Duration>,
}

impl InMemoryLayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before doing anything.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    /// Makes the next `count` calls fail with `Unavailable`.
    pub fn fail_next(&self, count: u32) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Total `put` and `get` calls received, including failed ones.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn stored_count(&self) -> usize {
        self.layouts.lock().await.len()
    }

    async fn enter(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(RepositoryError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LayoutRepository for InMemoryLayoutRepository {
    async fn put(
        &self,
        id: Option<LayoutId>,
        snapshot: LayoutSnapshot,
    ) -> Result<LayoutId, RepositoryError> {
        self.enter().await?;
        let id = id.unwrap_or_else(Uuid::new_v4);
        self.layouts.lock().await.insert(id, snapshot);
        Ok(id)
    }

    async fn get(&self, id: LayoutId) -> Result<LayoutSnapshot, RepositoryError> {
        self.enter().await?;
        self.layouts
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }
}
