use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::models::records::Standing;

const STANDING_COLUMNS: &str = "id, league_id, team_id, wins, losses, draws, points";

/// Find the standing for a (league, team) pair, if one exists
pub async fn find_standing(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<Option<Standing>> {
    let row = sqlx::query_as::<_, Standing>(&format!(
        "SELECT {STANDING_COLUMNS} FROM standings WHERE league_id = $1 AND team_id = $2"
    ))
    .bind(league_id)
    .bind(team_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(row)
}

/// Locate the standing for a (league, team) pair, creating a zeroed row on
/// first use. The INSERT uses ON CONFLICT DO NOTHING so two concurrent
/// first applications for the same team cannot race into duplicates.
pub async fn find_or_create_standing(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<Standing> {
    sqlx::query(
        r#"
        INSERT INTO standings (league_id, team_id)
        VALUES ($1, $2)
        ON CONFLICT (league_id, team_id) DO NOTHING
        "#,
    )
    .bind(league_id)
    .bind(team_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| DatabaseError::from_fk_violation(e, "League or team does not exist"))?;

    find_standing(tx, league_id, team_id).await?.ok_or_else(|| {
        DatabaseError::NotFound(format!(
            "Standing missing for league {} team {}",
            league_id, team_id
        ))
    })
}

/// Apply signed counter deltas to a standing as one atomic update.
/// The WHERE guard refuses any delta that would drive a counter negative,
/// which is how an unbalanced reverse (reverse without a prior apply, or a
/// double reverse) is caught instead of corrupting the table.
#[tracing::instrument(skip(tx), fields(standing_id = standing_id))]
pub async fn apply_standing_delta(
    tx: &mut Transaction<'_, Postgres>,
    standing_id: i64,
    wins: i32,
    losses: i32,
    draws: i32,
    points: i32,
) -> Result<()> {
    debug!(
        wins = wins,
        losses = losses,
        draws = draws,
        points = points,
        "Applying standing delta"
    );

    let result = sqlx::query(
        r#"
        UPDATE standings
        SET wins = wins + $2,
            losses = losses + $3,
            draws = draws + $4,
            points = points + $5,
            updated_at = NOW()
        WHERE id = $1
            AND wins + $2 >= 0
            AND losses + $3 >= 0
            AND draws + $4 >= 0
        "#,
    )
    .bind(standing_id)
    .bind(wins)
    .bind(losses)
    .bind(draws)
    .bind(points)
    .execute(&mut **tx)
    .await
    .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() != 1 {
        return Err(DatabaseError::IntegrityError(format!(
            "Standing {} rejected delta ({:+}/{:+}/{:+}, {:+} pts)",
            standing_id, wins, losses, draws, points
        )));
    }

    Ok(())
}

/// Delete the standing for a (league, team) pair, used when a team leaves
/// a league
pub async fn delete_standing(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM standings WHERE league_id = $1 AND team_id = $2")
        .bind(league_id)
        .bind(team_id)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::QueryError)?;

    Ok(result.rows_affected())
}

/// The standings table for a league, best record first
pub async fn list_standings(pool: &PgPool, league_id: i64) -> Result<Vec<Standing>> {
    let rows = sqlx::query_as::<_, Standing>(&format!(
        r#"
        SELECT {STANDING_COLUMNS}
        FROM standings
        WHERE league_id = $1
        ORDER BY points DESC, wins DESC, team_id
        "#
    ))
    .bind(league_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}
