//! Named-profile face recognition module

pub mod matcher;
pub mod profile;
pub mod store;

pub use matcher::{match_descriptor, MatchDecision, DEFAULT_MATCH_THRESHOLD};
pub use profile::Profile;
pub use store::ProfileStore;
