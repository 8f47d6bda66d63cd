// Match CRUD handlers. The three mutating routes go through the lifecycle
// coordinator so every persistence step carries its ledger operation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;

use crate::api::error::ApiResult;
use crate::db::queries;
use crate::domain;
use crate::models::api::{MatchFilters, NewMatch, UpdateMatch};
use crate::models::records::Match;

pub async fn list_matches(
    Path(league_id): Path<i64>,
    Query(filters): Query<MatchFilters>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Vec<Match>>> {
    let matches = queries::list_matches(&pool, league_id, &filters).await?;
    Ok(Json(matches))
}

pub async fn get_match(
    Path((league_id, match_id)): Path<(i64, i64)>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Match>> {
    let stored = queries::get_match(&pool, league_id, match_id).await?;
    Ok(Json(stored))
}

#[tracing::instrument(skip(pool, payload), fields(league_id = league_id))]
pub async fn create_match(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
    Json(payload): Json<NewMatch>,
) -> ApiResult<(StatusCode, Json<Match>)> {
    let stored = domain::create_match(&pool, league_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[tracing::instrument(skip(pool, payload), fields(league_id = league_id, match_id = match_id))]
pub async fn update_match(
    Path((league_id, match_id)): Path<(i64, i64)>,
    State(pool): State<PgPool>,
    Json(payload): Json<UpdateMatch>,
) -> ApiResult<Json<Match>> {
    let updated = domain::update_match(&pool, league_id, match_id, &payload).await?;
    Ok(Json(updated))
}

#[tracing::instrument(skip(pool), fields(league_id = league_id, match_id = match_id))]
pub async fn delete_match(
    Path((league_id, match_id)): Path<(i64, i64)>,
    State(pool): State<PgPool>,
) -> ApiResult<StatusCode> {
    domain::delete_match(&pool, league_id, match_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
