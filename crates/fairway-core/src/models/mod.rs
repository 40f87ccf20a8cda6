//! Data models for recorded golf data.
//!
//! - `Club`, `ClubSet`: club identifiers and the configured bag
//! - `Shot`: a recorded stroke, stored in meters
//! - `ScoreEntry`: a recorded round
//! - `Coordinate`: GPS positions for shots and the pin
//! - `UserId`: account key for persisted data

pub mod club;
pub mod geo;
pub mod score;
pub mod shot;
pub mod user;

pub use club::{Club, ClubSet, DEFAULT_CLUBS};
pub use geo::{Coordinate, DEFAULT_HOLE};
pub use score::{parse_score, ScoreEntry};
pub use shot::{aggregate_by_club, Shot, METERS_TO_YARDS};
pub use user::UserId;
