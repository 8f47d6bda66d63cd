// League CRUD and league membership handlers.
// Thin: validate, call the query layer, translate errors.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::db::queries;
use crate::models::api::{JoinLeaguePayload, NewLeague, UpdateLeague};
use crate::models::records::League;

#[derive(Debug, Default, Deserialize)]
pub struct LeagueFilters {
    pub name: Option<String>,
}

#[tracing::instrument(skip(pool, payload))]
pub async fn create_league(
    State(pool): State<PgPool>,
    Json(payload): Json<NewLeague>,
) -> ApiResult<(StatusCode, Json<League>)> {
    payload.validate().map_err(ApiError::Validation)?;

    let league = queries::insert_league(&pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(league)))
}

pub async fn list_leagues(
    Query(filters): Query<LeagueFilters>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Vec<League>>> {
    let leagues = queries::list_leagues(&pool, filters.name.as_deref()).await?;
    Ok(Json(leagues))
}

pub async fn get_league(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<League>> {
    let league = queries::get_league(&pool, league_id).await?;
    Ok(Json(league))
}

#[tracing::instrument(skip(pool, payload), fields(league_id = league_id))]
pub async fn update_league(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
    Json(payload): Json<UpdateLeague>,
) -> ApiResult<Json<League>> {
    let league = queries::update_league(&pool, league_id, &payload).await?;
    Ok(Json(league))
}

#[tracing::instrument(skip(pool), fields(league_id = league_id))]
pub async fn delete_league(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<StatusCode> {
    queries::delete_league(&pool, league_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A team joins a league. The membership row and a zeroed standing are
/// created in one transaction, so the standings table lists the team
/// before it has played a match.
#[tracing::instrument(skip(pool, payload), fields(league_id = league_id))]
pub async fn join_league(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
    Json(payload): Json<JoinLeaguePayload>,
) -> ApiResult<StatusCode> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::Database(format!("Failed to start transaction: {}", e)))?;

    queries::add_league_member(&mut tx, league_id, payload.team_id).await?;
    queries::find_or_create_standing(&mut tx, league_id, payload.team_id).await?;

    tx.commit()
        .await
        .map_err(|e| ApiError::Database(format!("Failed to commit transaction: {}", e)))?;

    info!("Team {} joined league {}", payload.team_id, league_id);
    Ok(StatusCode::CREATED)
}

/// A team leaves a league; its standing goes with it. Refused while the
/// team still has recorded matches in the league: deleting the standing
/// would strand those matches with outcomes that can no longer be
/// reversed. Delete or reassign the matches first.
#[tracing::instrument(skip(pool), fields(league_id = league_id, team_id = team_id))]
pub async fn leave_league(
    Path((league_id, team_id)): Path<(i64, i64)>,
    State(pool): State<PgPool>,
) -> ApiResult<StatusCode> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::Database(format!("Failed to start transaction: {}", e)))?;

    if queries::team_has_matches(&mut tx, league_id, team_id).await? {
        return Err(ApiError::Conflict(format!(
            "Team {} has recorded matches in league {}; delete them before leaving",
            team_id, league_id
        )));
    }

    queries::remove_league_member(&mut tx, league_id, team_id).await?;
    queries::delete_standing(&mut tx, league_id, team_id).await?;

    tx.commit()
        .await
        .map_err(|e| ApiError::Database(format!("Failed to commit transaction: {}", e)))?;

    info!("Team {} left league {}", team_id, league_id);
    Ok(StatusCode::NO_CONTENT)
}
