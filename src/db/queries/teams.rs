use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::api::{NewTeam, UpdateTeam};
use crate::models::records::Team;

/// Insert a new team and return the full row
pub async fn insert_team(pool: &PgPool, team: &NewTeam) -> Result<Team> {
    let row = sqlx::query_as::<_, Team>(
        r#"
        INSERT INTO teams (name, city)
        VALUES ($1, $2)
        RETURNING id, name, city, created_at, updated_at
        "#,
    )
    .bind(&team.name)
    .bind(&team.city)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!("Inserted team with ID: {}", row.id);
    Ok(row)
}

/// Get a team by ID
pub async fn get_team(pool: &PgPool, team_id: i64) -> Result<Team> {
    sqlx::query_as::<_, Team>(
        "SELECT id, name, city, created_at, updated_at FROM teams WHERE id = $1",
    )
    .bind(team_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("Team not found for id: {}", team_id))
        }
        _ => DatabaseError::QueryError(e),
    })
}

/// List all teams
pub async fn list_teams(pool: &PgPool) -> Result<Vec<Team>> {
    let rows = sqlx::query_as::<_, Team>(
        "SELECT id, name, city, created_at, updated_at FROM teams ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Delete a team. Membership, standings and matches cascade.
pub async fn delete_team(pool: &PgPool, team_id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!(
            "Team not found for id: {}",
            team_id
        )));
    }

    info!("Deleted team {}", team_id);
    Ok(())
}

/// Update a team in place. Absent fields keep their stored values.
#[tracing::instrument(skip(pool, update), fields(team_id = team_id))]
pub async fn update_team(pool: &PgPool, team_id: i64, update: &UpdateTeam) -> Result<Team> {
    debug!("Updating team");

    let row = sqlx::query_as::<_, Team>(
        r#"
        UPDATE teams SET
            name = COALESCE($2, name),
            city = COALESCE($3, city),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, city, created_at, updated_at
        "#,
    )
    .bind(team_id)
    .bind(&update.name)
    .bind(&update.city)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => {
            DatabaseError::NotFound(format!("Team not found for id: {}", team_id))
        }
        _ => DatabaseError::QueryError(e),
    })?;

    info!("Updated team {}", team_id);
    Ok(row)
}

/// Add a team to a league. A duplicate join surfaces as IntegrityError,
/// a missing league or team as NotFound.
#[tracing::instrument(skip(tx), fields(league_id = league_id, team_id = team_id))]
pub async fn add_league_member(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<()> {
    debug!("Adding team to league");

    sqlx::query(
        r#"
        INSERT INTO league_teams (league_id, team_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(league_id)
    .bind(team_id)
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        if let Some(db_error) = e.as_database_error() {
            if db_error.code().as_deref() == Some("23505") {
                return DatabaseError::IntegrityError(
                    "Team is already a member of the league".to_string(),
                );
            }
        }
        DatabaseError::from_fk_violation(e, "League or team does not exist")
    })?;

    info!("Team {} joined league {}", team_id, league_id);
    Ok(())
}

/// Remove a team from a league
pub async fn remove_league_member(
    tx: &mut Transaction<'_, Postgres>,
    league_id: i64,
    team_id: i64,
) -> Result<()> {
    let result = sqlx::query("DELETE FROM league_teams WHERE league_id = $1 AND team_id = $2")
        .bind(league_id)
        .bind(team_id)
        .execute(&mut **tx)
        .await
        .map_err(DatabaseError::QueryError)?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!(
            "Team {} is not a member of league {}",
            team_id, league_id
        )));
    }

    info!("Team {} left league {}", team_id, league_id);
    Ok(())
}
