//! File-backed layout repository.
//!
//! Each layout is one `<layout-id>.json` file in the storage directory, written
//! with [`encode_snapshot`].  Writes go to a `.tmp` sibling first and are then
//! renamed over the target, so a reader never sees a half-written layout.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use room_core::{decode_snapshot, encode_snapshot, LayoutSnapshot};
use tracing::debug;
use uuid::Uuid;

use crate::application::persist_layout::{LayoutId, LayoutRepository, RepositoryError};

/// Stores layouts as JSON files under one directory.
#[derive(Debug, Clone)]
pub struct FileLayoutRepository {
    dir: PathBuf,
}

impl FileLayoutRepository {
    /// The directory is created on the first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: LayoutId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Io(format!("{}: {e}", path.display()))
}

#[async_trait]
impl LayoutRepository for FileLayoutRepository {
    async fn put(
        &self,
        id: Option<LayoutId>,
        snapshot: LayoutSnapshot,
    ) -> Result<LayoutId, RepositoryError> {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let text =
            encode_snapshot(&snapshot).map_err(|e| RepositoryError::Codec(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let path = self.path_for(id);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, text)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!(%id, path = %path.display(), items = snapshot.items.len(), "layout written");
        Ok(id)
    }

    async fn get(&self, id: LayoutId) -> Result<LayoutSnapshot, RepositoryError> {
        let path = self.path_for(id);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(id))
            }
            Err(e) => return Err(io_error(&path, e)),
        };
        decode_snapshot(&text).map_err(|e| RepositoryError::Codec(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use room_core::{serialize, Room};

    fn temp_repo() -> FileLayoutRepository {
        FileLayoutRepository::new(
            std::env::temp_dir().join(format!("roomplanner_layouts_{}", Uuid::new_v4())),
        )
    }

    fn cleanup(repo: &FileLayoutRepository) {
        std::fs::remove_dir_all(repo.dir()).ok();
    }

    #[tokio::test]
    async fn test_put_then_get_returns_same_snapshot() {
        // Arrange
        let repo = temp_repo();
        let snapshot = serialize(&Room::new(12.0, 10.0, 8.0).unwrap(), &[]);

        // Act
        let id = repo.put(None, snapshot.clone()).await.unwrap();
        let loaded = repo.get(id).await.unwrap();

        // Assert
        assert_eq!(loaded, snapshot);
        assert!(repo.dir().join(format!("{id}.json")).exists());
        cleanup(&repo);
    }

    #[tokio::test]
    async fn test_put_with_id_overwrites_existing_file() {
        let repo = temp_repo();
        let first = serialize(&Room::default(), &[]);
        let second = serialize(&Room::new(5.0, 5.0, 5.0).unwrap(), &[]);
        let id = repo.put(None, first).await.unwrap();

        let same = repo.put(Some(id), second.clone()).await.unwrap();

        assert_eq!(same, id);
        assert_eq!(repo.get(id).await.unwrap(), second);
        cleanup(&repo);
    }

    #[tokio::test]
    async fn test_get_missing_layout_returns_not_found() {
        let repo = temp_repo();
        let id = Uuid::new_v4();
        assert_eq!(repo.get(id).await, Err(RepositoryError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_get_corrupt_file_returns_codec_error() {
        let repo = temp_repo();
        let id = Uuid::new_v4();
        std::fs::create_dir_all(repo.dir()).unwrap();
        std::fs::write(repo.dir().join(format!("{id}.json")), "{ not json").unwrap();

        let result = repo.get(id).await;

        assert!(matches!(result, Err(RepositoryError::Codec(_))));
        cleanup(&repo);
    }
}
