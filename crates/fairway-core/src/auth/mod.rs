//! Identity of the current player.
//!
//! - `Identity`: anything that can answer "who is signed in"
//! - `Session`: the signed-in user, persisted to `session.json`
//!
//! No user is not an error. Operations that need one skip persistence.

pub mod session;

pub use session::{Session, SessionData};

use crate::models::UserId;

pub trait Identity {
    fn current_user_id(&self) -> Option<UserId>;
}

impl Identity for Option<UserId> {
    fn current_user_id(&self) -> Option<UserId> {
        self.clone()
    }
}
