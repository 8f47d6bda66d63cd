use sqlx::PgPool;
use tracing::info;

use crate::db::queries::{
    delete_match_row, get_match_for_update, insert_match, update_match_row,
};
use crate::domain::ledger::{apply_match, reverse_match};
use crate::domain::DomainError;
use crate::models::api::{NewMatch, UpdateMatch};
use crate::models::records::Match;

/// Match lifecycle coordinator - the ledger's only caller.
///
/// Each entry point runs one transaction around the persistence step and
/// the corresponding ledger operation, so the match table and the
/// standings table can never diverge: an error anywhere rolls back both.

/// Record a new match and install its outcome into the standings.
#[tracing::instrument(skip(pool, payload), fields(league_id = league_id))]
pub async fn create_match(
    pool: &PgPool,
    league_id: i64,
    payload: &NewMatch,
) -> Result<Match, DomainError> {
    payload.validate().map_err(DomainError::Validation)?;

    let mut tx = pool.begin().await?;

    let stored = insert_match(&mut tx, league_id, payload).await?;
    apply_match(&mut tx, &stored).await?;

    tx.commit().await?;

    info!("Match {} created and applied to standings", stored.id);
    Ok(stored)
}

/// Correct a recorded match: reverse the stored outcome, persist the new
/// values, then apply the new outcome.
///
/// The stored row is fetched under FOR UPDATE before anything else, which
/// both captures the pre-update snapshot the reversal needs and serializes
/// concurrent lifecycles on the same match.
#[tracing::instrument(skip(pool, payload), fields(league_id = league_id, match_id = match_id))]
pub async fn update_match(
    pool: &PgPool,
    league_id: i64,
    match_id: i64,
    payload: &UpdateMatch,
) -> Result<Match, DomainError> {
    payload.validate().map_err(DomainError::Validation)?;

    let mut tx = pool.begin().await?;

    let stored = get_match_for_update(&mut tx, league_id, match_id).await?;
    reverse_match(&mut tx, &stored).await?;

    let updated = update_match_row(&mut tx, match_id, payload).await?;
    apply_match(&mut tx, &updated).await?;

    tx.commit().await?;

    info!("Match {} updated, standings moved to the new outcome", match_id);
    Ok(updated)
}

/// Remove a match and take its outcome back out of the standings.
#[tracing::instrument(skip(pool), fields(league_id = league_id, match_id = match_id))]
pub async fn delete_match(
    pool: &PgPool,
    league_id: i64,
    match_id: i64,
) -> Result<(), DomainError> {
    let mut tx = pool.begin().await?;

    let stored = get_match_for_update(&mut tx, league_id, match_id).await?;
    reverse_match(&mut tx, &stored).await?;
    delete_match_row(&mut tx, match_id).await?;

    tx.commit().await?;

    info!("Match {} deleted and reversed out of standings", match_id);
    Ok(())
}
