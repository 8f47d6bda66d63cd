use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;

use crate::api::error::ApiResult;
use crate::db::queries;
use crate::models::records::Standing;

/// The standings table for a league, best record first. Reflects exactly
/// the set of currently recorded matches plus zeroed rows for teams that
/// joined but have not played.
pub async fn league_standings(
    Path(league_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Vec<Standing>>> {
    // 404 for a league that does not exist, empty table for one that does
    queries::get_league(&pool, league_id).await?;

    let standings = queries::list_standings(&pool, league_id).await?;
    Ok(Json(standings))
}
