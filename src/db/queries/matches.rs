use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::api::{MatchFilters, NewMatch, UpdateMatch};
use crate::models::records::Match;

const MATCH_COLUMNS: &str = "id, league_id, team1_id, team2_id, team1_score, team2_score, \
     event_type, event_location, created_at, updated_at";

/// Get a match by league and ID
pub async fn get_match(pool: &PgPool, league_id: i64, match_id: i64) -> Result<Match> {
    sqlx::query_as::<_, Match>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 AND league_id = $2"
    ))
    .bind(match_id)
    .bind(league_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("Match not found for id: {}", match_id))
        }
        _ => DatabaseError::QueryError(e),
    })
}

/// Get a match inside a lifecycle transaction, taking a row lock.
/// FOR UPDATE serializes concurrent reverse/apply sequences on the same
/// match and fixes the snapshot the reversal is computed from.
pub async fn get_match_for_update(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    match_id: i64,
) -> Result<Match> {
    sqlx::query_as::<_, Match>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1 AND league_id = $2 FOR UPDATE"
    ))
    .bind(match_id)
    .bind(league_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("Match not found for id: {}", match_id))
        }
        _ => DatabaseError::QueryError(e),
    })
}

/// List matches for a league, optionally filtered by a participating team
pub async fn list_matches(
    pool: &PgPool,
    league_id: i64,
    filters: &MatchFilters,
) -> Result<Vec<Match>> {
    let rows = match filters.team_id {
        Some(team_id) => {
            sqlx::query_as::<_, Match>(&format!(
                r#"
                SELECT {MATCH_COLUMNS} FROM matches
                WHERE league_id = $1 AND (team1_id = $2 OR team2_id = $2)
                ORDER BY id
                "#
            ))
            .bind(league_id)
            .bind(team_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Match>(&format!(
                "SELECT {MATCH_COLUMNS} FROM matches WHERE league_id = $1 ORDER BY id"
            ))
            .bind(league_id)
            .fetch_all(pool)
            .await
        }
    }
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Check whether a team has any recorded matches in a league. The leave
/// path refuses to drop a standing that recorded matches still reference.
pub async fn team_has_matches(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<bool> {
    let row: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM matches
            WHERE league_id = $1 AND (team1_id = $2 OR team2_id = $2)
        )
        "#,
    )
    .bind(league_id)
    .bind(team_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(row.0)
}

/// Insert a match row and return it
#[tracing::instrument(skip(tx, payload), fields(league_id = league_id))]
pub async fn insert_match(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    payload: &NewMatch,
) -> Result<Match> {
    debug!("Inserting match");

    let row = sqlx::query_as::<_, Match>(&format!(
        r#"
        INSERT INTO matches (
            league_id, team1_id, team2_id, team1_score, team2_score,
            event_type, event_location
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(league_id)
    .bind(payload.team1_id)
    .bind(payload.team2_id)
    .bind(payload.team1_score)
    .bind(payload.team2_score)
    .bind(payload.event_type.as_str())
    .bind(&payload.event_location)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| DatabaseError::from_fk_violation(e, "League or team does not exist"))?;

    info!("Inserted match with ID: {}", row.id);
    Ok(row)
}

/// Persist an update to a match row and return the new state
#[tracing::instrument(skip(tx, payload), fields(match_id = match_id))]
pub async fn update_match_row(
    tx: &mut Transaction<'_, Postgres>,
    match_id: i64,
    payload: &UpdateMatch,
) -> Result<Match> {
    debug!("Updating match row");

    let row = sqlx::query_as::<_, Match>(&format!(
        r#"
        UPDATE matches SET
            team1_id = $2,
            team2_id = $3,
            team1_score = $4,
            team2_score = $5,
            event_type = $6,
            event_location = $7,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {MATCH_COLUMNS}
        "#
    ))
    .bind(match_id)
    .bind(payload.team1_id)
    .bind(payload.team2_id)
    .bind(payload.team1_score)
    .bind(payload.team2_score)
    .bind(payload.event_type.as_str())
    .bind(&payload.event_location)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("Match not found for id: {}", match_id))
        }
        _ => DatabaseError::from_fk_violation(e, "League or team does not exist"),
    })?;

    info!("Updated match {}", match_id);
    Ok(row)
}

/// Delete a match row
pub async fn delete_match_row(tx: &mut Transaction<'_, Postgres>, match_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(match_id)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!(
            "Match not found for id: {}",
            match_id
        )));
    }

    info!("Deleted match {}", match_id);
    Ok(())
}
