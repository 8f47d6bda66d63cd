use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::api::{NewLeague, UpdateLeague};
use crate::models::records::{League, PointConfig};

const LEAGUE_COLUMNS: &str = "id, name, competition, description, max_teams, \
     first_place_points, second_place_points, draw_points, created_at, updated_at";

/// Insert a new league and return the full row
#[tracing::instrument(skip(pool, league), fields(name = %league.name))]
pub async fn insert_league(pool: &PgPool, league: &NewLeague) -> Result<League> {
    debug!("Inserting league");

    let row = sqlx::query_as::<_, League>(&format!(
        r#"
        INSERT INTO leagues (
            name, competition, description, max_teams,
            first_place_points, second_place_points, draw_points
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {LEAGUE_COLUMNS}
        "#
    ))
    .bind(&league.name)
    .bind(&league.competition)
    .bind(&league.description)
    .bind(league.max_teams)
    .bind(league.first_place_points)
    .bind(league.second_place_points)
    .bind(league.draw_points)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!("Inserted league with ID: {}", row.id);
    Ok(row)
}

/// Get a league by ID
pub async fn get_league(pool: &PgPool, league_id: i64) -> Result<League> {
    sqlx::query_as::<_, League>(&format!(
        "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1"
    ))
    .bind(league_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("League not found for id: {}", league_id))
        }
        _ => DatabaseError::QueryError(e),
    })
}

/// List leagues, optionally filtered by a name substring
pub async fn list_leagues(pool: &PgPool, name: Option<&str>) -> Result<Vec<League>> {
    let rows = match name {
        Some(name) => {
            sqlx::query_as::<_, League>(&format!(
                "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE name ILIKE $1 ORDER BY id"
            ))
            .bind(format!("%{}%", name))
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, League>(&format!(
                "SELECT {LEAGUE_COLUMNS} FROM leagues ORDER BY id"
            ))
            .fetch_all(pool)
            .await
        }
    }
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Update a league in place. Absent fields keep their stored values; point
/// configuration changes apply to future ledger operations only.
#[tracing::instrument(skip(pool, update), fields(league_id = league_id))]
pub async fn update_league(
    pool: &PgPool,
    league_id: i64,
    update: &UpdateLeague,
) -> Result<League> {
    debug!("Updating league");

    let row = sqlx::query_as::<_, League>(&format!(
        r#"
        UPDATE leagues SET
            name = COALESCE($2, name),
            competition = COALESCE($3, competition),
            description = COALESCE($4, description),
            max_teams = COALESCE($5, max_teams),
            first_place_points = COALESCE($6, first_place_points),
            second_place_points = COALESCE($7, second_place_points),
            draw_points = COALESCE($8, draw_points),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {LEAGUE_COLUMNS}
        "#
    ))
    .bind(league_id)
    .bind(&update.name)
    .bind(&update.competition)
    .bind(&update.description)
    .bind(update.max_teams)
    .bind(update.first_place_points)
    .bind(update.second_place_points)
    .bind(update.draw_points)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("League not found for id: {}", league_id))
        }
        _ => DatabaseError::QueryError(e),
    })?;

    info!("Updated league {}", league_id);
    Ok(row)
}

/// Delete a league. Standings, membership and matches cascade.
pub async fn delete_league(pool: &PgPool, league_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM leagues WHERE id = $1")
        .bind(league_id)
        .execute(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!(
            "League not found for id: {}",
            league_id
        )));
    }

    info!("Deleted league {}", league_id);
    Ok(())
}

/// Load the point configuration for a league inside a lifecycle transaction.
/// The ledger calls this before computing deltas; a vanished league fails
/// the whole operation.
pub async fn load_point_config(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
) -> Result<PointConfig> {
    sqlx::query_as::<_, PointConfig>(
        r#"
        SELECT first_place_points, second_place_points, draw_points
        FROM leagues
        WHERE id = $1
        "#,
    )
    .bind(league_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("League not found for id: {}", league_id))
        }
        _ => DatabaseError::QueryError(e),
    })
}
