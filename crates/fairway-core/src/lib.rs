//! Fairway core library.
//!
//! Shot tracking, club recommendation and handicap calculation, plus the
//! storage and identity boundaries a front end plugs into.
//!
//! - `recommend`: nearest-average club pick over recorded shots
//! - `handicap`: differential-based handicap index
//! - `tracker`: per-session context owning shots, rounds and the pin
//! - `store`: persistence trait with in-memory and JSON file backends
//! - `auth`: who is signed in

pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod handicap;
pub mod models;
pub mod recommend;
pub mod store;
pub mod tracker;

pub use auth::{Identity, Session};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use handicap::{compute_handicap, RatingConfig};
pub use recommend::{recommend, ClubChoice, Recommendation};
pub use store::{FileStore, MemoryStore, Persistence, StoreError};
pub use tracker::{LoadSummary, SyncOutcome, Tracker};
