use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// leagues table - owns the point configuration consumed by the ledger
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct League {
    pub id: i64,
    pub name: String,
    pub competition: String,
    pub description: Option<String>,
    pub max_teams: Option<i32>,
    pub first_place_points: i32,
    pub second_place_points: i32,
    pub draw_points: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Point configuration slice of a league, the scoring policy's only input
/// besides the two scores. A NULL draw_points is treated as 0.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct PointConfig {
    pub first_place_points: i32,
    pub second_place_points: i32,
    pub draw_points: Option<i32>,
}

/// teams table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// matches table - one recorded contest between two teams in a league
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Match {
    pub id: i64,
    pub league_id: i64,
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_score: i32,
    pub team2_score: i32,
    pub event_type: String,
    pub event_location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// standings table - cumulative record for one (league, team) pair.
/// Mutated only through the ledger's atomic delta updates.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Standing {
    pub id: i64,
    pub league_id: i64,
    pub team_id: i64,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub points: i32,
}
