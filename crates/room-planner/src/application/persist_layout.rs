//! PersistLayoutUseCase: saves and fetches snapshots through a repository.
//!
//! The repository is an external service reached over an unreliable channel,
//! so every call is wrapped in a timeout and retried a bounded number of
//! times.  Failures that retrying cannot fix (`NotFound`, `Codec`) are
//! reported after the first attempt.  No failure is ever swallowed: the caller
//! always receives either the result or a [`SessionError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use room_core::{LayoutError, LayoutSnapshot};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::edit_session::PendingSave;

/// Opaque identifier of a persisted layout.
pub type LayoutId = Uuid;

/// Error type for repository adapters.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryError {
    #[error("layout {0} not found")]
    NotFound(LayoutId),
    #[error("storage I/O error: {0}")]
    Io(String),
    #[error("stored layout could not be encoded or decoded: {0}")]
    Codec(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// Returns `true` if another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Unavailable(_))
    }
}

/// Error type surfaced by the editing session.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("persistence failed after {attempts} attempt(s): {message}")]
    PersistenceFailure { attempts: u32, message: String },
    #[error("persistence timed out after {attempts} attempt(s) of {after:?} each")]
    Timeout { attempts: u32, after: Duration },
}

/// Trait for the persistence/sharing service.
///
/// Infrastructure implementations write files or keep layouts in memory;
/// test implementations record calls and inject failures.
#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// Stores `snapshot`, overwriting `id` if given, and returns the layout id.
    async fn put(
        &self,
        id: Option<LayoutId>,
        snapshot: LayoutSnapshot,
    ) -> Result<LayoutId, RepositoryError>;

    /// Retrieves the snapshot stored under `id`.
    async fn get(&self, id: LayoutId) -> Result<LayoutSnapshot, RepositoryError>;
}

/// Timeout and retry settings for repository calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Total attempts, including the first.  Values below 1 are treated as 1.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// A save that reached the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedLayout {
    pub layout_id: LayoutId,
    /// Edit counter the saved snapshot reflects.
    pub edit_stamp: u64,
    /// Layout generation the save was captured from.
    pub generation: u64,
}

enum LastFailure {
    Repository(RepositoryError),
    TimedOut,
}

/// Save and fetch with timeouts and bounded retries.
pub struct PersistLayoutUseCase {
    repository: Arc<dyn LayoutRepository>,
    policy: RetryPolicy,
}

impl PersistLayoutUseCase {
    pub fn new(repository: Arc<dyn LayoutRepository>, policy: RetryPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Saves a snapshot captured by `EditSession::begin_save`.
    ///
    /// # Errors
    ///
    /// [`SessionError::PersistenceFailure`] or [`SessionError::Timeout`] once
    /// the attempts are exhausted.
    pub async fn save(&self, pending: PendingSave) -> Result<SavedLayout, SessionError> {
        let PendingSave {
            snapshot,
            edit_stamp,
            layout_id,
            generation,
        } = pending;
        let repository = Arc::clone(&self.repository);

        let saved_id = self
            .with_retry("save", || {
                let repository = Arc::clone(&repository);
                let snapshot = snapshot.clone();
                async move { repository.put(layout_id, snapshot).await }
            })
            .await?;

        info!(layout_id = %saved_id, edit_stamp, "layout saved");
        Ok(SavedLayout {
            layout_id: saved_id,
            edit_stamp,
            generation,
        })
    }

    /// Fetches the snapshot stored under `layout_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save`].
    pub async fn fetch(&self, layout_id: LayoutId) -> Result<LayoutSnapshot, SessionError> {
        let repository = Arc::clone(&self.repository);
        self.with_retry("fetch", || {
            let repository = Arc::clone(&repository);
            async move { repository.get(layout_id).await }
        })
        .await
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, SessionError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RepositoryError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last = LastFailure::TimedOut;

        for attempt in 1..=max_attempts {
            match tokio::time::timeout(self.policy.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if !e.is_transient() => {
                    warn!(operation, attempt, error = %e, "repository call failed");
                    return Err(SessionError::PersistenceFailure {
                        attempts: attempt,
                        message: e.to_string(),
                    });
                }
                Ok(Err(e)) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        error = %e,
                        "repository call failed, retrying"
                    );
                    last = LastFailure::Repository(e);
                }
                Err(_) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        timeout = ?self.policy.timeout,
                        "repository call timed out"
                    );
                    last = LastFailure::TimedOut;
                }
            }
            if attempt < max_attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }

        Err(match last {
            LastFailure::Repository(e) => SessionError::PersistenceFailure {
                attempts: max_attempts,
                message: e.to_string(),
            },
            LastFailure::TimedOut => SessionError::Timeout {
                attempts: max_attempts,
                after: self.policy.timeout,
            },
        })
    }
}
