//! Session and audit tracking for asp
//!
//! Every generated config artifact lands in a timestamped session folder
//! with an auto-incrementing number, so a series of operations can be
//! replayed and audited later.

pub mod error;
pub mod tracker;

pub use error::{SessionError, SessionResult};
pub use tracker::{
    list_sessions, SessionInfo, SessionTracker, CURRENT_SESSION_FILE, SESSION_INFO_FILE,
};
