pub mod api;
pub mod db;
pub mod domain;
pub mod models;

// Re-export commonly used types
pub use db::{create_pool, health_check, with_retry, DatabaseError};
pub use domain::{
    apply_match, create_match, delete_match, reverse_match, score_match, update_match,
    DomainError, MatchResult, Outcome, StandingDelta,
};
pub use models::{League, Match, PointConfig, Standing, Team};
