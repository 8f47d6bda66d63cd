use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::api::error::{ApiError, ApiResult};
use crate::db::queries;
use crate::models::api::{NewTeam, UpdateTeam};
use crate::models::records::Team;

#[tracing::instrument(skip(pool, payload))]
pub async fn create_team(
    State(pool): State<PgPool>,
    Json(payload): Json<NewTeam>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    payload.validate().map_err(ApiError::Validation)?;

    let team = queries::insert_team(&pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(State(pool): State<PgPool>) -> ApiResult<Json<Vec<Team>>> {
    let teams = queries::list_teams(&pool).await?;
    Ok(Json(teams))
}

pub async fn get_team(
    Path(team_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Team>> {
    let team = queries::get_team(&pool, team_id).await?;
    Ok(Json(team))
}

#[tracing::instrument(skip(pool, payload), fields(team_id = team_id))]
pub async fn update_team(
    Path(team_id): Path<i64>,
    State(pool): State<PgPool>,
    Json(payload): Json<UpdateTeam>,
) -> ApiResult<Json<Team>> {
    payload.validate().map_err(ApiError::Validation)?;

    let team = queries::update_team(&pool, team_id, &payload).await?;
    Ok(Json(team))
}

/// Delete a team. Its memberships, standings and matches cascade away;
/// standings of past opponents keep the outcomes already applied.
#[tracing::instrument(skip(pool), fields(team_id = team_id))]
pub async fn delete_team(
    Path(team_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<StatusCode> {
    queries::delete_team(&pool, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
