//! Per-user study sessions.
//!
//! A session owns the user's score cache and the calendar index from the
//! last build-or-load. Sessions live in a [`SessionRegistry`] held by the
//! application state. Each one sits behind its own async mutex, so requests
//! from the same user are serialized while different users proceed in
//! parallel.

pub mod cache;
pub mod registry;
pub mod routes;

pub use cache::ScoreCache;
pub use registry::{SessionRegistry, SharedSession, StudySession};
pub use routes::routes;
