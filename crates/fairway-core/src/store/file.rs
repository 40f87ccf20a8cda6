use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ClubDistances, Persistence, StoreError, UserDocument};
use crate::models::{ScoreEntry, UserId};

/// Subdirectory holding one document per user
const USERS_DIR: &str = "users";

/// JSON-on-disk store, one `<user>.json` document per user.
pub struct FileStore {
    root: PathBuf,
    // Serializes read-modify-write cycles on documents
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(root.join(USERS_DIR))?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, user: &UserId) -> PathBuf {
        self.root.join(USERS_DIR).join(format!("{}.json", user))
    }

    fn load(&self, user: &UserId) -> Result<UserDocument, StoreError> {
        let path = self.document_path(user);
        if !path.exists() {
            return Ok(UserDocument::default());
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, user: &UserId, doc: &UserDocument) -> Result<(), StoreError> {
        let path = self.document_path(user);
        let contents = serde_json::to_string_pretty(doc)?;
        // Write then rename so a crash never leaves a half-written document
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    async fn update<F>(&self, user: &UserId, apply: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UserDocument) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load(user)?;
        apply(&mut doc);
        self.save(user, &doc)
    }
}

#[async_trait]
impl Persistence for FileStore {
    // Reads skip write_lock: save() renames a complete file into place, so a
    // reader sees either the old document or the new one.
    async fn aggregated_distances(&self, user: &UserId) -> Result<ClubDistances, StoreError> {
        Ok(self.load(user)?.club_distances)
    }

    async fn merge_aggregated_distances(
        &self,
        user: &UserId,
        distances: &ClubDistances,
    ) -> Result<(), StoreError> {
        self.update(user, |doc| doc.merge_distances(distances)).await?;
        debug!(user = %user, clubs = distances.len(), "Saved club distances to disk");
        Ok(())
    }

    async fn append_score(&self, user: &UserId, entry: &ScoreEntry) -> Result<(), StoreError> {
        self.update(user, |doc| doc.push_score(entry.clone())).await?;
        debug!(user = %user, score = entry.score, "Saved score to disk");
        Ok(())
    }

    async fn list_scores(&self, user: &UserId) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.load(user)?.scores)
    }
}
