use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{ClubDistances, Persistence, StoreError, UserDocument};
use crate::models::{ScoreEntry, UserId};

/// In-process store. Reads and writes can be forced to fail to simulate an outage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: Mutex<HashMap<UserId, UserDocument>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write return `StoreError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read return `StoreError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of a user's document.
    pub async fn document(&self, user: &UserId) -> Option<UserDocument> {
        self.users.lock().await.get(user).cloned()
    }

    fn check_readable(&self) -> Result<(), StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn aggregated_distances(&self, user: &UserId) -> Result<ClubDistances, StoreError> {
        self.check_readable()?;
        let users = self.users.lock().await;
        Ok(users
            .get(user)
            .map(|doc| doc.club_distances.clone())
            .unwrap_or_default())
    }

    async fn merge_aggregated_distances(
        &self,
        user: &UserId,
        distances: &ClubDistances,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut users = self.users.lock().await;
        users.entry(user.clone()).or_default().merge_distances(distances);
        debug!(user = %user, clubs = distances.len(), "Merged club distances");
        Ok(())
    }

    async fn append_score(&self, user: &UserId, entry: &ScoreEntry) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut users = self.users.lock().await;
        users.entry(user.clone()).or_default().push_score(entry.clone());
        Ok(())
    }

    async fn list_scores(&self, user: &UserId) -> Result<Vec<ScoreEntry>, StoreError> {
        self.check_readable()?;
        let users = self.users.lock().await;
        Ok(users.get(user).map(|doc| doc.scores.clone()).unwrap_or_default())
    }
}
