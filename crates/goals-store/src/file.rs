// file.rs: Document-per-file persistence for goals.
//
// Each goal is stored as a JSON document: `<data_dir>/<goal_id>.json`.
// The directory is the collection; reopening it after a restart sees every
// goal written before.
//
// File I/O is blocking, so every operation runs on tokio's blocking pool.
// Documents are written to a temporary sibling and renamed into place, so a
// listing only ever sees complete documents. A document deleted between
// `read_dir` and the read is simply absent from that listing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::goal::Goal;
use crate::store::GoalStore;

/// Persistent goal store backed by a directory of JSON documents.
#[derive(Debug, Clone)]
pub struct JsonFileGoalStore {
    data_dir: PathBuf,
}

impl JsonFileGoalStore {
    /// Open a store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.display().to_string(),
            source,
        })?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn save(data_dir: &Path, goal: &Goal) -> Result<(), StoreError> {
        let path = goal_file(data_dir, goal.id.as_str());
        let staging = data_dir.join(format!(".{}.json.tmp", goal.id));
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(&staging, json).map_err(|source| StoreError::Io {
            path: staging.display().to_string(),
            source,
        })?;
        fs::rename(&staging, &path).map_err(|source| {
            let _ = fs::remove_file(&staging);
            StoreError::Io {
                path: path.display().to_string(),
                source,
            }
        })
    }

    fn read_all(data_dir: &Path) -> Result<Vec<Goal>, StoreError> {
        let mut goals = Vec::new();

        let entries = fs::read_dir(data_dir).map_err(|source| StoreError::Io {
            path: data_dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: data_dir.display().to_string(),
                source,
            })?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let json = match fs::read_to_string(&path) {
                    Ok(json) => json,
                    // Deleted since read_dir listed it.
                    Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                    Err(source) => {
                        return Err(StoreError::Io {
                            path: path.display().to_string(),
                            source,
                        })
                    }
                };
                match serde_json::from_str::<Goal>(&json) {
                    Ok(goal) => goals.push(goal),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable goal document");
                    }
                }
            }
        }

        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(goals)
    }

    fn remove(data_dir: &Path, id: &str) -> Result<bool, StoreError> {
        // Only ids this store could have issued map to a file name, which
        // also keeps ids like "../x" from reaching the filesystem.
        if Uuid::parse_str(id).is_err() {
            return Ok(false);
        }
        let path = goal_file(data_dir, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T, StoreError> + Send + 'static,
    {
        let data_dir = self.data_dir.clone();
        tokio::task::spawn_blocking(move || op(&data_dir))
            .await
            .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

#[async_trait]
impl GoalStore for JsonFileGoalStore {
    fn backend_tag(&self) -> &'static str {
        "file"
    }

    async fn list_all(&self) -> Result<Vec<Goal>, StoreError> {
        self.run_blocking(Self::read_all).await
    }

    async fn create(&self, text: &str) -> Result<Goal, StoreError> {
        let goal = Goal::new(text);
        self.run_blocking(move |dir| {
            Self::save(dir, &goal)?;
            Ok(goal)
        })
        .await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let id = id.to_string();
        self.run_blocking(move |dir| Self::remove(dir, &id)).await
    }
}

/// Path to the JSON document for a given goal id.
fn goal_file(data_dir: &Path, id: &str) -> PathBuf {
    data_dir.join(format!("{id}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path().join("goals")).unwrap();

        let goal = store.create("Learn Rust").await.unwrap();
        let listed = store.list_all().await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, goal.id);
        assert_eq!(listed[0].text, "Learn Rust");
    }

    #[tokio::test]
    async fn list_is_in_insertion_order() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path()).unwrap();

        let mut expected = Vec::new();
        for text in ["first", "second", "third"] {
            expected.push(store.create(text).await.unwrap().id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let ids: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn delete_existing_goal() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path()).unwrap();

        let goal = store.create("to delete").await.unwrap();
        assert!(store.delete_by_id(goal.id.as_str()).await.unwrap());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_false() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path()).unwrap();

        let missing = Uuid::new_v4().to_string();
        assert!(!store.delete_by_id(&missing).await.unwrap());
    }

    #[tokio::test]
    async fn delete_malformed_id_never_touches_filesystem() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path().join("goals")).unwrap();

        let outside = dir.path().join("victim.json");
        fs::write(&outside, "{}").unwrap();

        assert!(!store.delete_by_id("../victim").await.unwrap());
        assert!(!store.delete_by_id("not-an-id").await.unwrap());
        assert!(outside.exists());
    }

    #[tokio::test]
    async fn unreadable_documents_are_skipped() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path()).unwrap();

        store.create("good").await.unwrap();
        fs::write(dir.path().join("broken.json"), "not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].text, "good");
    }

    #[tokio::test]
    async fn store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals");

        let id = {
            let store = JsonFileGoalStore::open(&path).unwrap();
            store.create("Persistent").await.unwrap().id
        };

        let store = JsonFileGoalStore::open(&path).unwrap();
        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn listing_tolerates_concurrent_deletes() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileGoalStore::open(dir.path()).unwrap());

        for round in 0..20 {
            let mut ids = Vec::new();
            for i in 0..30 {
                ids.push(store.create(&format!("g{i}")).await.unwrap().id);
            }

            let deleter = {
                let store = store.clone();
                tokio::spawn(async move {
                    for id in ids {
                        store.delete_by_id(id.as_str()).await.unwrap();
                    }
                })
            };
            let listers: Vec<_> = (0..10)
                .map(|_| {
                    let store = store.clone();
                    tokio::spawn(async move { store.list_all().await })
                })
                .collect();

            for lister in listers {
                let listed = lister.await.unwrap();
                assert!(listed.is_ok(), "round {round}: {:?}", listed.err());
            }
            deleter.await.unwrap();
            assert!(store.list_all().await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn staging_files_are_not_left_behind() {
        let dir = tempdir().unwrap();
        let store = JsonFileGoalStore::open(dir.path()).unwrap();
        store.create("one").await.unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".json") && !names[0].starts_with('.'));
    }

    #[tokio::test]
    async fn list_fails_when_directory_disappears() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("goals");
        let store = JsonFileGoalStore::open(&path).unwrap();
        fs::remove_dir_all(&path).unwrap();

        let result = store.list_all().await;
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }
}
