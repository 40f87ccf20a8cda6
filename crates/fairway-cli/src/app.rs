//! Application state for the fairway console.
//!
//! `App` owns the configuration, the signed-in session, the store and the
//! shot tracker, and turns parsed commands into output lines.

use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info, warn};

use fairway_core::format::{distance_label, handicap_label, recommendation_label};
use fairway_core::models::{aggregate_by_club, Coordinate, UserId};
use fairway_core::recommend::club_averages;
use fairway_core::{
    Config, CoreError, FileStore, Identity, Persistence, Session, SyncOutcome, Tracker,
};

use crate::commands::{Command, HELP};

/// Whether the command loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub config: Config,
    pub session: Session,
    pub tracker: Tracker,
    store: Box<dyn Persistence>,
}

impl App {
    /// Build the app from the config file, with a file store in the data dir.
    pub fn new() -> Result<Self> {
        let config = Config::load()?;
        let data_dir = config.data_dir()?;
        let store = FileStore::new(data_dir.clone())?;
        Ok(Self::with_store(config, data_dir, Box::new(store)))
    }

    pub fn with_store(config: Config, data_dir: PathBuf, store: Box<dyn Persistence>) -> Self {
        let tracker = Tracker::new(&config);
        Self {
            config,
            session: Session::new(data_dir),
            tracker,
            store,
        }
    }

    /// Restore the previous session and load that player's data.
    pub async fn restore_session(&mut self) -> Vec<String> {
        match self.session.load() {
            Ok(true) => self.load_player_data().await,
            Ok(false) => vec![
                "Not signed in. Shots stay in memory until you 'signin'.".to_string(),
            ],
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session");
                vec!["Not signed in.".to_string()]
            }
        }
    }

    async fn load_player_data(&mut self) -> Vec<String> {
        let user = self
            .session
            .current_user_id()
            .map(|u| u.to_string())
            .unwrap_or_default();
        match self.tracker.load(self.store.as_ref(), &self.session).await {
            Ok(summary) => vec![format!(
                "Signed in as {} ({} shots, {} rounds)",
                user, summary.shots, summary.scores
            )],
            Err(e) => vec![format!("Signed in as {}, but loading data failed: {}", user, e)],
        }
    }

    /// Run one command. Failures are reported as output, not returned.
    pub async fn execute(&mut self, command: Command) -> (Flow, Vec<String>) {
        debug!(?command, "Executing command");
        let lines = match command {
            Command::Quit => return (Flow::Quit, self.shutdown().await),
            Command::Help => vec![HELP.to_string()],
            Command::SignIn { user, display_name } => self.sign_in(&user, display_name).await,
            Command::SignOut => self.sign_out().await,
            Command::WhoAmI => vec![match &self.session.data {
                Some(data) => match &data.display_name {
                    Some(name) => format!("{} ({})", name, data.user_id),
                    None => data.user_id.to_string(),
                },
                None => "Not signed in".to_string(),
            }],
            Command::Hole(at) => {
                self.tracker.set_hole(at);
                vec![format!("Pin set at {:.6}, {:.6}", at.latitude, at.longitude)]
            }
            Command::Distance(from) => {
                vec![distance_label(self.tracker.distance_to_hole_yards(from))]
            }
            Command::Start(at) => {
                self.tracker.start_shot(at);
                vec!["Distance: Shot started".to_string()]
            }
            Command::End { at, club } => self.end_shot(at, &club).await,
            Command::RecommendFrom(from) => {
                let (yards, recommendation) = self.tracker.recommend_from(from);
                vec![distance_label(yards), recommendation_label(&recommendation)]
            }
            Command::RecommendYards(yards) => {
                vec![recommendation_label(&self.tracker.recommend(yards))]
            }
            Command::Score(score) => self.record_score(score).await,
            Command::Handicap => vec![handicap_label(&self.tracker.handicap())],
            Command::Shots => self.shot_summary(),
            Command::Clubs => self
                .tracker
                .clubs()
                .iter()
                .enumerate()
                .map(|(i, name)| format!("{:>2}. {}", i + 1, name))
                .collect(),
            Command::Save => self.save_shots().await,
        };
        (Flow::Continue, lines)
    }

    async fn sign_in(&mut self, user: &str, display_name: Option<String>) -> Vec<String> {
        let user_id = match UserId::new(user) {
            Ok(id) => id,
            Err(e) => return vec![e.to_string()],
        };

        let mut lines = Vec::new();
        if self.session.is_signed_in() {
            // Last chance for the previous player's shots
            lines.extend(self.save_shots().await);
            let unsaved = self.tracker.pending_shots().len();
            if unsaved > 0 {
                lines.push(format!("Discarding {} unsaved shots", unsaved));
            }
            self.tracker.reset();
        }

        if let Err(e) = self.session.sign_in(user_id, display_name) {
            warn!(error = %e, "Failed to persist session");
            lines.push(format!("Could not remember sign-in: {}", e));
        }

        // Shots and rounds recorded while signed out go to the new player
        lines.extend(self.save_shots().await);
        lines.extend(self.save_scores().await);
        lines.extend(self.load_player_data().await);
        lines
    }

    async fn sign_out(&mut self) -> Vec<String> {
        let mut lines = self.save_shots().await;
        let unsaved = self.tracker.pending_shots().len();
        if unsaved > 0 {
            lines.push(format!("Discarding {} unsaved shots", unsaved));
        }
        self.tracker.reset();
        match self.session.sign_out() {
            Ok(()) => lines.push("Signed out".to_string()),
            Err(e) => lines.push(format!("Sign out failed: {}", e)),
        }
        lines
    }

    async fn end_shot(&mut self, at: Coordinate, club: &str) -> Vec<String> {
        let shot = match self.tracker.end_shot(at, club) {
            Ok(shot) => shot,
            Err(e) => return vec![e.to_string()],
        };
        let mut lines = vec![format!(
            "{} with {}",
            distance_label(shot.distance_yards()),
            shot.club
        )];
        lines.extend(self.save_shots().await);
        lines
    }

    async fn save_shots(&mut self) -> Vec<String> {
        match self.tracker.flush_shots(self.store.as_ref(), &self.session).await {
            Ok(SyncOutcome::Saved(n)) => vec![format!("Saved {} shots", n)],
            Ok(SyncOutcome::NoUser) | Ok(SyncOutcome::NothingToSave) => Vec::new(),
            Err(e) => vec![format!(
                "{} ({} shots kept, 'save' to retry)",
                e,
                self.tracker.pending_shots().len()
            )],
        }
    }

    async fn save_scores(&mut self) -> Vec<String> {
        match self.tracker.flush_scores(self.store.as_ref(), &self.session).await {
            Ok(SyncOutcome::Saved(n)) => vec![format!("Saved {} rounds", n)],
            Ok(SyncOutcome::NoUser) | Ok(SyncOutcome::NothingToSave) => Vec::new(),
            Err(e) => vec![format!(
                "{} ({} rounds kept for this session)",
                e,
                self.tracker.unsaved_scores().len()
            )],
        }
    }

    async fn record_score(&mut self, score: f64) -> Vec<String> {
        let mut lines = Vec::new();
        match self
            .tracker
            .record_score(score, self.store.as_ref(), &self.session)
            .await
        {
            Ok(SyncOutcome::NoUser) => {
                lines.push("Score kept for this session only (not signed in)".to_string())
            }
            Ok(_) => {}
            Err(e @ CoreError::InvalidScore(_)) => return vec![handicap_label(&Err(e))],
            Err(e) => lines.push(e.to_string()),
        }
        lines.push(handicap_label(&self.tracker.handicap()));
        lines
    }

    fn shot_summary(&self) -> Vec<String> {
        let shots = self.tracker.all_shots();
        if shots.is_empty() {
            return vec!["No shots recorded".to_string()];
        }
        let counts = aggregate_by_club(&shots);
        let mut lines: Vec<String> = club_averages(&shots)
            .into_iter()
            .map(|(club, avg)| {
                let n = counts.get(&club).map(|v| v.len()).unwrap_or(0);
                format!("{:<16} {:>6.1} yards  ({} shots)", club.name(), avg, n)
            })
            .collect();
        let unsaved = self.tracker.pending_shots().len();
        if unsaved > 0 {
            lines.push(format!("{} unsaved", unsaved));
        }
        lines
    }

    /// Last attempt to save before exit.
    pub async fn shutdown(&mut self) -> Vec<String> {
        let lines = self.save_shots().await;
        let unsaved = self.tracker.pending_shots().len();
        if unsaved > 0 {
            warn!(unsaved, "Exiting with unsaved shots");
        }
        info!("Fairway shutting down");
        lines
    }
}
