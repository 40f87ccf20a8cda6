//! Persistence boundary for recorded shots and rounds.
//!
//! The core talks to storage only through the `Persistence` trait:
//! - `MemoryStore`: in-process store, also used by tests
//! - `FileStore`: one JSON document per user on local disk
//!
//! Every call is fallible. Callers keep their in-memory state until a write
//! is confirmed, so a failed write can simply be retried.

pub mod error;
pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Club, ScoreEntry, UserId};

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Yardages per club, as persisted.
pub type ClubDistances = BTreeMap<Club, Vec<f64>>;

/// Everything persisted for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub club_distances: ClubDistances,
    #[serde(default)]
    pub scores: Vec<ScoreEntry>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserDocument {
    /// Replace the stored list for each club present in `distances`.
    /// Clubs not mentioned are left alone.
    pub fn merge_distances(&mut self, distances: &ClubDistances) {
        for (club, yards) in distances {
            self.club_distances.insert(club.clone(), yards.clone());
        }
        self.touch();
    }

    pub fn push_score(&mut self, entry: ScoreEntry) {
        self.scores.push(entry);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

#[async_trait]
pub trait Persistence: Send + Sync {
    /// Previously persisted yardages per club. Empty if nothing was stored.
    async fn aggregated_distances(&self, user: &UserId) -> Result<ClubDistances, StoreError>;

    /// Store the given per-club lists, replacing those clubs' existing lists.
    async fn merge_aggregated_distances(
        &self,
        user: &UserId,
        distances: &ClubDistances,
    ) -> Result<(), StoreError>;

    async fn append_score(&self, user: &UserId, entry: &ScoreEntry) -> Result<(), StoreError>;

    async fn list_scores(&self, user: &UserId) -> Result<Vec<ScoreEntry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_replaces_only_named_clubs() {
        let mut doc = UserDocument::default();
        doc.club_distances.insert(Club::from("Driver"), vec![250.0]);
        doc.club_distances.insert(Club::from("7-Iron"), vec![140.0]);

        let mut update = ClubDistances::new();
        update.insert(Club::from("Driver"), vec![250.0, 262.0]);
        doc.merge_distances(&update);

        assert_eq!(doc.club_distances[&Club::from("Driver")], vec![250.0, 262.0]);
        assert_eq!(doc.club_distances[&Club::from("7-Iron")], vec![140.0]);
        assert!(doc.updated_at.is_some());
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc = UserDocument::default();
        doc.club_distances.insert(Club::from("Driver"), vec![250.5]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["club_distances"]["Driver"][0], 250.5);

        let parsed: UserDocument = serde_json::from_str("{}").unwrap();
        assert!(parsed.club_distances.is_empty());
        assert!(parsed.scores.is_empty());
    }
}
