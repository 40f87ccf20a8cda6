//! Per-session state: recorded shots, rounds, and the current pin.
//!
//! `Tracker` is the explicit context object the front end owns. The
//! recommendation and handicap engines stay pure and only read from it.
//!
//! Shots live in two lists. `pending` holds shots recorded this session that
//! have not been persisted yet; `history` holds shots already in the store.
//! A flush appends `pending` to the store and, only once the store confirms,
//! moves those shots into `history`. A failed flush leaves `pending` as it
//! was, so calling `flush_shots` again retries the same batch.
//!
//! Rounds recorded while nobody is signed in stay in `unsaved_scores` until
//! `flush_scores` can write them for a user.

use futures::try_join;
use tracing::{debug, info, warn};

use crate::auth::Identity;
use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::handicap::{compute_handicap, RatingConfig};
use crate::models::{aggregate_by_club, ClubSet, Coordinate, ScoreEntry, Shot, METERS_TO_YARDS};
use crate::recommend::{recommend, Recommendation};
use crate::store::{ClubDistances, Persistence};

/// What a persistence call ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Written to the store; carries the number of items.
    Saved(usize),
    /// Nobody is signed in, nothing was written.
    NoUser,
    /// There was nothing to write.
    NothingToSave,
}

/// Counts returned by `Tracker::load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub shots: usize,
    pub scores: usize,
}

pub struct Tracker {
    pending: Vec<Shot>,
    history: Vec<Shot>,
    scores: Vec<ScoreEntry>,
    unsaved_scores: Vec<ScoreEntry>,
    shot_start: Option<Coordinate>,
    hole: Coordinate,
    ratings: RatingConfig,
    clubs: ClubSet,
    course_name: String,
}

impl Tracker {
    pub fn new(config: &Config) -> Self {
        Self {
            pending: Vec::new(),
            history: Vec::new(),
            scores: Vec::new(),
            unsaved_scores: Vec::new(),
            shot_start: None,
            hole: config.hole,
            ratings: config.ratings,
            clubs: config.clubs.clone(),
            course_name: config.course_name.clone(),
        }
    }

    // ===== Accessors =====

    pub fn pending_shots(&self) -> &[Shot] {
        &self.pending
    }

    pub fn history(&self) -> &[Shot] {
        &self.history
    }

    /// Every shot known this session, persisted ones first.
    pub fn all_shots(&self) -> Vec<Shot> {
        self.history.iter().chain(self.pending.iter()).cloned().collect()
    }

    pub fn scores(&self) -> &[ScoreEntry] {
        &self.scores
    }

    /// Rounds that have not reached the store yet.
    pub fn unsaved_scores(&self) -> &[ScoreEntry] {
        &self.unsaved_scores
    }

    pub fn clubs(&self) -> &ClubSet {
        &self.clubs
    }

    pub fn hole(&self) -> Coordinate {
        self.hole
    }

    pub fn shot_in_progress(&self) -> bool {
        self.shot_start.is_some()
    }

    // ===== Pin and distances =====

    pub fn set_hole(&mut self, at: Coordinate) {
        debug!(lat = at.latitude, lon = at.longitude, "Moved pin");
        self.hole = at;
    }

    pub fn distance_to_hole_yards(&self, from: Coordinate) -> f64 {
        from.distance_meters(&self.hole) * METERS_TO_YARDS
    }

    // ===== Shots =====

    /// Mark where the next shot is played from. A second start replaces the first.
    pub fn start_shot(&mut self, at: Coordinate) {
        self.shot_start = Some(at);
    }

    /// Finish the shot in progress with the given club.
    pub fn end_shot(&mut self, at: Coordinate, club: &str) -> CoreResult<Shot> {
        let club = self
            .clubs
            .resolve(club)
            .ok_or_else(|| CoreError::UnknownClub(club.to_string()))?;
        let start = self.shot_start.ok_or(CoreError::NoShotInProgress)?;

        let shot = Shot::new(club, start.distance_meters(&at))?;
        self.shot_start = None;
        debug!(club = %shot.club, yards = shot.distance_yards(), "Recorded shot");
        self.pending.push(shot.clone());
        Ok(shot)
    }

    pub fn recommend(&self, target_yards: f64) -> Recommendation {
        recommend(&self.all_shots(), target_yards)
    }

    /// Recommend a club for the distance from `from` to the pin.
    pub fn recommend_from(&self, from: Coordinate) -> (f64, Recommendation) {
        let yards = self.distance_to_hole_yards(from);
        (yards, self.recommend(yards))
    }

    /// Append pending shots to the stored per-club yardages.
    pub async fn flush_shots(
        &mut self,
        store: &dyn Persistence,
        identity: &dyn Identity,
    ) -> CoreResult<SyncOutcome> {
        let Some(user) = identity.current_user_id() else {
            debug!("No user signed in, keeping shots in memory");
            return Ok(SyncOutcome::NoUser);
        };
        if self.pending.is_empty() {
            return Ok(SyncOutcome::NothingToSave);
        }

        let batch = self.pending.len();
        let mut stored = store.aggregated_distances(&user).await.map_err(|e| {
            warn!(user = %user, error = %e, "Failed to read stored club distances");
            e
        })?;

        let mut updates = ClubDistances::new();
        for (club, yards) in aggregate_by_club(&self.pending[..batch]) {
            let mut list = stored.remove(&club).unwrap_or_default();
            list.extend(yards);
            updates.insert(club, list);
        }

        if let Err(e) = store.merge_aggregated_distances(&user, &updates).await {
            warn!(user = %user, error = %e, pending = batch, "Failed to save shots, will retry");
            return Err(e.into());
        }

        let flushed: Vec<Shot> = self.pending.drain(..batch).collect();
        self.history.extend(flushed);
        info!(user = %user, shots = batch, "Saved shots");
        Ok(SyncOutcome::Saved(batch))
    }

    // ===== Scores =====

    /// Record a full round at the configured course.
    pub async fn record_score(
        &mut self,
        score: f64,
        store: &dyn Persistence,
        identity: &dyn Identity,
    ) -> CoreResult<SyncOutcome> {
        let entry = ScoreEntry::full_round(self.course_name.clone(), score);
        self.record_entry(entry, store, identity).await
    }

    /// Keep the round in memory, then mirror it to the store.
    /// The in-memory copy stays even if the store rejects it.
    pub async fn record_entry(
        &mut self,
        entry: ScoreEntry,
        store: &dyn Persistence,
        identity: &dyn Identity,
    ) -> CoreResult<SyncOutcome> {
        if !entry.score.is_finite() || entry.score <= 0.0 {
            return Err(CoreError::InvalidScore(entry.score.to_string()));
        }
        self.scores.push(entry.clone());

        let Some(user) = identity.current_user_id() else {
            self.unsaved_scores.push(entry);
            return Ok(SyncOutcome::NoUser);
        };
        match store.append_score(&user, &entry).await {
            Ok(()) => {
                info!(user = %user, score = entry.score, course = %entry.course, "Saved score");
                Ok(SyncOutcome::Saved(1))
            }
            Err(e) => {
                warn!(user = %user, error = %e, "Failed to save score");
                Err(e.into())
            }
        }
    }

    /// Write rounds recorded while signed out, oldest first. Each round
    /// leaves `unsaved_scores` only once the store has accepted it.
    pub async fn flush_scores(
        &mut self,
        store: &dyn Persistence,
        identity: &dyn Identity,
    ) -> CoreResult<SyncOutcome> {
        let Some(user) = identity.current_user_id() else {
            return Ok(SyncOutcome::NoUser);
        };
        if self.unsaved_scores.is_empty() {
            return Ok(SyncOutcome::NothingToSave);
        }

        let mut saved = 0;
        while let Some(entry) = self.unsaved_scores.first() {
            if let Err(e) = store.append_score(&user, entry).await {
                warn!(
                    user = %user,
                    error = %e,
                    unsaved = self.unsaved_scores.len(),
                    "Failed to save rounds"
                );
                return Err(e.into());
            }
            self.unsaved_scores.remove(0);
            saved += 1;
        }
        info!(user = %user, rounds = saved, "Saved rounds recorded while signed out");
        Ok(SyncOutcome::Saved(saved))
    }

    pub fn handicap(&self) -> CoreResult<f64> {
        compute_handicap(&self.scores, &self.ratings)
    }

    // ===== Loading =====

    /// Replace persisted shots and rounds with what the store holds for the
    /// signed-in user. Pending shots and unsaved rounds are kept, the rounds
    /// after the stored ones. Nothing changes if either read fails.
    pub async fn load(
        &mut self,
        store: &dyn Persistence,
        identity: &dyn Identity,
    ) -> CoreResult<LoadSummary> {
        let Some(user) = identity.current_user_id() else {
            return Ok(LoadSummary::default());
        };

        let (distances, scores) =
            try_join!(store.aggregated_distances(&user), store.list_scores(&user))?;

        let mut history = Vec::new();
        for (club, yards) in distances {
            for y in yards {
                match Shot::from_yards(club.clone(), y) {
                    Ok(shot) => history.push(shot),
                    Err(e) => warn!(club = %club, error = %e, "Skipping stored distance"),
                }
            }
        }

        self.history = history;
        self.scores = scores;
        self.scores.extend(self.unsaved_scores.iter().cloned());
        let summary = LoadSummary {
            shots: self.history.len(),
            scores: self.scores.len(),
        };
        info!(user = %user, shots = summary.shots, scores = summary.scores, "Loaded player data");
        Ok(summary)
    }

    /// Drop everything tied to the previous user.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.history.clear();
        self.scores.clear();
        self.unsaved_scores.clear();
        self.shot_start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Club, UserId};
    use crate::store::MemoryStore;

    fn signed_in() -> Option<UserId> {
        Some(UserId::new("golfer").unwrap())
    }

    fn tracker() -> Tracker {
        Tracker::new(&Config::default())
    }

    fn pending_shot(tracker: &mut Tracker, club: &str, yards: f64) {
        tracker
            .pending
            .push(Shot::from_yards(Club::from(club), yards).unwrap());
    }

    #[test]
    fn test_end_without_start() {
        let mut t = tracker();
        let err = t.end_shot(t.hole(), "Driver").unwrap_err();
        assert!(matches!(err, CoreError::NoShotInProgress));
    }

    #[test]
    fn test_unknown_club_keeps_shot_open() {
        let mut t = tracker();
        t.start_shot(Coordinate::new(45.0980, -93.5186).unwrap());
        let err = t.end_shot(t.hole(), "Putter").unwrap_err();
        assert!(matches!(err, CoreError::UnknownClub(_)));
        assert!(t.shot_in_progress());
    }

    #[test]
    fn test_shot_distance_from_coordinates() {
        let mut t = tracker();
        let start = Coordinate::new(45.0, -93.0).unwrap();
        let end = Coordinate::new(45.001, -93.0).unwrap();
        t.start_shot(start);
        let shot = t.end_shot(end, "7-iron").unwrap();

        assert_eq!(shot.club, Club::from("7-Iron"));
        // 0.001 degrees of latitude is ~111.2 m
        assert!((shot.distance_meters - 111.195).abs() < 0.01);
        assert!(!t.shot_in_progress());
        assert_eq!(t.pending_shots().len(), 1);
    }

    #[test]
    fn test_recommend_uses_history_and_pending() {
        let mut t = tracker();
        assert_eq!(t.recommend(150.0), Recommendation::NoRecommendation);

        t.history
            .push(Shot::from_yards(Club::from("Driver"), 250.0).unwrap());
        pending_shot(&mut t, "Driver", 260.0);
        pending_shot(&mut t, "7-Iron", 140.0);
        assert_eq!(t.recommend(145.0).club(), Some(&Club::from("7-Iron")));
        assert_eq!(t.recommend(250.0).club(), Some(&Club::from("Driver")));
    }

    #[test]
    fn test_recommend_from_pin() {
        let mut t = tracker();
        pending_shot(&mut t, "Sand Wedge", 5.0);
        pending_shot(&mut t, "Driver", 250.0);
        let (yards, rec) = t.recommend_from(t.hole());
        assert_eq!(yards, 0.0);
        assert_eq!(rec.club(), Some(&Club::from("Sand Wedge")));
    }

    #[tokio::test]
    async fn test_flush_appends_to_stored_lists() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();

        pending_shot(&mut t, "Driver", 250.0);
        assert_eq!(t.flush_shots(&store, &user).await.unwrap(), SyncOutcome::Saved(1));

        pending_shot(&mut t, "Driver", 260.0);
        pending_shot(&mut t, "7-Iron", 140.0);
        assert_eq!(t.flush_shots(&store, &user).await.unwrap(), SyncOutcome::Saved(2));

        let stored = store
            .aggregated_distances(user.as_ref().unwrap())
            .await
            .unwrap();
        let driver = &stored[&Club::from("Driver")];
        assert_eq!(driver.len(), 2);
        assert!((driver[0] - 250.0).abs() < 1e-9);
        assert!((driver[1] - 260.0).abs() < 1e-9);
        assert_eq!(stored[&Club::from("7-Iron")].len(), 1);

        assert!(t.pending_shots().is_empty());
        assert_eq!(t.history().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_pending_for_retry() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();
        pending_shot(&mut t, "5-Iron", 180.0);

        store.set_fail_writes(true);
        let err = t.flush_shots(&store, &user).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(t.pending_shots().len(), 1);
        assert!(t.history().is_empty());

        store.set_fail_writes(false);
        assert_eq!(t.flush_shots(&store, &user).await.unwrap(), SyncOutcome::Saved(1));
        assert!(t.pending_shots().is_empty());
    }

    #[tokio::test]
    async fn test_flush_without_user_is_noop() {
        let store = MemoryStore::new();
        let mut t = tracker();
        pending_shot(&mut t, "Driver", 250.0);

        let outcome = t.flush_shots(&store, &None::<UserId>).await.unwrap();
        assert_eq!(outcome, SyncOutcome::NoUser);
        assert_eq!(t.pending_shots().len(), 1);

        let mut empty = tracker();
        let outcome = empty.flush_shots(&store, &signed_in()).await.unwrap();
        assert_eq!(outcome, SyncOutcome::NothingToSave);
    }

    #[tokio::test]
    async fn test_scores_flow_into_handicap() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();

        for score in [80.0, 81.0] {
            t.record_score(score, &store, &user).await.unwrap();
        }
        assert!(matches!(t.handicap(), Err(CoreError::InsufficientData { remaining: 1 })));

        for score in [90.0, 85.0] {
            t.record_score(score, &store, &user).await.unwrap();
        }
        // differentials 8, 9, 18, 13 -> lowest three average 10
        assert!((t.handicap().unwrap() - 9.6).abs() < 1e-9);

        let stored = store.list_scores(user.as_ref().unwrap()).await.unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[0].course, "Minnehaha Creek");
    }

    #[tokio::test]
    async fn test_failed_score_save_keeps_round() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let mut t = tracker();

        let err = t.record_score(88.0, &store, &signed_in()).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(t.scores().len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_invalid_score() {
        let store = MemoryStore::new();
        let mut t = tracker();
        assert!(t.record_score(0.0, &store, &signed_in()).await.is_err());
        assert!(t.record_score(f64::NAN, &store, &signed_in()).await.is_err());
        assert!(t.scores().is_empty());
    }

    #[tokio::test]
    async fn test_load_rehydrates_in_meters() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut distances = ClubDistances::new();
        distances.insert(Club::from("Driver"), vec![109.361, 218.722]);
        store
            .merge_aggregated_distances(user.as_ref().unwrap(), &distances)
            .await
            .unwrap();
        store
            .append_score(user.as_ref().unwrap(), &ScoreEntry::full_round("Home", 95.0))
            .await
            .unwrap();

        let mut t = tracker();
        pending_shot(&mut t, "9-Iron", 120.0);
        let summary = t.load(&store, &user).await.unwrap();

        assert_eq!(summary, LoadSummary { shots: 2, scores: 1 });
        assert!((t.history()[0].distance_meters - 100.0).abs() < 1e-9);
        assert_eq!(t.pending_shots().len(), 1);
    }

    #[tokio::test]
    async fn test_load_then_flush_does_not_duplicate() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();
        pending_shot(&mut t, "Driver", 250.0);
        t.flush_shots(&store, &user).await.unwrap();

        let mut next = tracker();
        next.load(&store, &user).await.unwrap();
        pending_shot(&mut next, "Driver", 255.0);
        next.flush_shots(&store, &user).await.unwrap();

        let stored = store
            .aggregated_distances(user.as_ref().unwrap())
            .await
            .unwrap();
        assert_eq!(stored[&Club::from("Driver")].len(), 2);
    }

    #[tokio::test]
    async fn test_signed_out_rounds_reach_store_after_sign_in() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();

        for score in [80.0, 81.0] {
            let outcome = t.record_score(score, &store, &None::<UserId>).await.unwrap();
            assert_eq!(outcome, SyncOutcome::NoUser);
        }
        assert_eq!(t.unsaved_scores().len(), 2);

        assert_eq!(t.flush_scores(&store, &user).await.unwrap(), SyncOutcome::Saved(2));
        assert!(t.unsaved_scores().is_empty());

        let summary = t.load(&store, &user).await.unwrap();
        assert_eq!(summary.scores, 2);
        let stored = store.list_scores(user.as_ref().unwrap()).await.unwrap();
        assert_eq!(stored[0].score, 80.0);
        assert_eq!(stored[1].score, 81.0);

        t.record_score(82.0, &store, &user).await.unwrap();
        assert!((t.handicap().unwrap() - 8.64).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_load_keeps_unsaved_rounds() {
        let store = MemoryStore::new();
        let user = signed_in();
        store
            .append_score(user.as_ref().unwrap(), &ScoreEntry::full_round("Home", 95.0))
            .await
            .unwrap();

        let mut t = tracker();
        t.record_score(80.0, &store, &None::<UserId>).await.unwrap();
        let summary = t.load(&store, &user).await.unwrap();

        assert_eq!(summary.scores, 2);
        assert_eq!(t.scores()[0].score, 95.0);
        assert_eq!(t.scores()[1].score, 80.0);
        assert_eq!(t.unsaved_scores().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_score_flush_keeps_rounds() {
        let store = MemoryStore::new();
        let mut t = tracker();
        t.record_score(80.0, &store, &None::<UserId>).await.unwrap();

        store.set_fail_writes(true);
        let err = t.flush_scores(&store, &signed_in()).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(t.unsaved_scores().len(), 1);

        store.set_fail_writes(false);
        assert_eq!(t.flush_scores(&store, &signed_in()).await.unwrap(), SyncOutcome::Saved(1));
        assert_eq!(t.flush_scores(&store, &signed_in()).await.unwrap(), SyncOutcome::NothingToSave);
    }

    #[tokio::test]
    async fn test_failed_load_changes_nothing() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();
        t.history
            .push(Shot::from_yards(Club::from("Driver"), 250.0).unwrap());
        t.scores.push(ScoreEntry::full_round("Home", 90.0));
        pending_shot(&mut t, "9-Iron", 120.0);

        store.set_fail_reads(true);
        let err = t.load(&store, &user).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(t.history().len(), 1);
        assert_eq!(t.scores().len(), 1);
        assert_eq!(t.pending_shots().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_during_flush_keeps_pending() {
        let store = MemoryStore::new();
        let user = signed_in();
        let mut t = tracker();
        pending_shot(&mut t, "Driver", 250.0);
        pending_shot(&mut t, "7-Iron", 140.0);

        store.set_fail_reads(true);
        let err = t.flush_shots(&store, &user).await.unwrap_err();
        assert!(matches!(err, CoreError::PersistenceFailure(_)));
        assert_eq!(t.pending_shots().len(), 2);
        assert!(t.history().is_empty());
        assert!(store.document(user.as_ref().unwrap()).await.is_none());
    }

    #[test]
    fn test_reset_clears_user_data() {
        let mut t = tracker();
        pending_shot(&mut t, "Driver", 250.0);
        t.scores.push(ScoreEntry::full_round("Home", 90.0));
        t.start_shot(t.hole());
        t.reset();
        assert!(t.all_shots().is_empty());
        assert!(t.scores().is_empty());
        assert!(!t.shot_in_progress());
    }
}
