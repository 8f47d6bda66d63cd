use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::db::queries::{
    apply_standing_delta, find_or_create_standing, find_standing, load_point_config,
};
use crate::domain::policy::{score_match, MatchResult, Outcome};
use crate::domain::DomainError;
use crate::models::records::{Match, PointConfig};

/// Signed counter deltas for one standing. Applying a match produces the
/// positive form; reversing it applies the inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingDelta {
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub points: i32,
}

impl StandingDelta {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let (wins, losses, draws) = match outcome.result {
            MatchResult::Win => (1, 0, 0),
            MatchResult::Loss => (0, 1, 0),
            MatchResult::Draw => (0, 0, 1),
        };
        StandingDelta {
            wins,
            losses,
            draws,
            points: outcome.points,
        }
    }

    pub fn invert(&self) -> Self {
        StandingDelta {
            wins: -self.wins,
            losses: -self.losses,
            draws: -self.draws,
            points: -self.points,
        }
    }
}

/// Compute the standing deltas a match's current scores produce for
/// (team1, team2) under the league's point configuration. Pure.
pub fn match_deltas(
    team1_score: i32,
    team2_score: i32,
    config: &PointConfig,
) -> (StandingDelta, StandingDelta) {
    let (team1_outcome, team2_outcome) = score_match(team1_score, team2_score, config);
    (
        StandingDelta::from_outcome(&team1_outcome),
        StandingDelta::from_outcome(&team2_outcome),
    )
}

/// Install a match's outcome into both teams' standings.
///
/// Runs inside the caller's transaction: the league's point configuration
/// is read, the outcome computed from the match's current scores, and each
/// team's standing (created lazily on first use) incremented atomically.
/// Any failure leaves the transaction poisoned so no partial counter
/// update survives.
#[tracing::instrument(skip(tx, stored_match), fields(match_id = stored_match.id, league_id = stored_match.league_id))]
pub async fn apply_match(
    tx: &mut Transaction<'_, Postgres>,
    stored_match: &Match,
) -> Result<(), DomainError> {
    debug!("Applying match outcome to standings");

    let config = load_point_config(tx, stored_match.league_id).await?;
    let (team1_delta, team2_delta) =
        match_deltas(stored_match.team1_score, stored_match.team2_score, &config);

    let mut updates = [
        (stored_match.team1_id, team1_delta),
        (stored_match.team2_id, team2_delta),
    ];
    // Touch standings in ascending team id order so two concurrent
    // lifecycles over the same teams cannot deadlock on row locks.
    updates.sort_by_key(|(team_id, _)| *team_id);

    for (team_id, delta) in updates {
        let standing = find_or_create_standing(tx, stored_match.league_id, team_id).await?;
        apply_standing_delta(
            tx,
            standing.id,
            delta.wins,
            delta.losses,
            delta.draws,
            delta.points,
        )
        .await?;
    }

    Ok(())
}

/// Remove a previously applied match outcome from both teams' standings.
///
/// The deltas are recomputed from the match row as currently stored, so the
/// caller must pass the pre-update snapshot (fetched under FOR UPDATE)
/// before mutating the row. A missing standing means the outcome was never
/// applied, which is a consistency violation rather than a quiet no-op.
#[tracing::instrument(skip(tx, stored_match), fields(match_id = stored_match.id, league_id = stored_match.league_id))]
pub async fn reverse_match(
    tx: &mut Transaction<'_, Postgres>,
    stored_match: &Match,
) -> Result<(), DomainError> {
    debug!("Reversing match outcome in standings");

    let config = load_point_config(tx, stored_match.league_id).await?;
    let (team1_delta, team2_delta) =
        match_deltas(stored_match.team1_score, stored_match.team2_score, &config);

    let mut updates = [
        (stored_match.team1_id, team1_delta),
        (stored_match.team2_id, team2_delta),
    ];
    updates.sort_by_key(|(team_id, _)| *team_id);

    for (team_id, delta) in updates {
        let standing = find_standing(tx, stored_match.league_id, team_id)
            .await?
            .ok_or_else(|| {
                DomainError::Consistency(format!(
                    "No standing to reverse for league {} team {}",
                    stored_match.league_id, team_id
                ))
            })?;

        let delta = delta.invert();
        apply_standing_delta(
            tx,
            standing.id,
            delta.wins,
            delta.losses,
            delta.draws,
            delta.points,
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PointConfig {
        PointConfig {
            first_place_points: 3,
            second_place_points: 1,
            draw_points: Some(1),
        }
    }

    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    struct Counters {
        wins: i32,
        losses: i32,
        draws: i32,
        points: i32,
    }

    impl Counters {
        fn plus(self, d: StandingDelta) -> Self {
            Counters {
                wins: self.wins + d.wins,
                losses: self.losses + d.losses,
                draws: self.draws + d.draws,
                points: self.points + d.points,
            }
        }
    }

    #[test]
    fn test_win_deltas() {
        // 2:1 with 3/1/1 points: winner gets a win and 3 points, loser a
        // loss and 1 point
        let (team1, team2) = match_deltas(2, 1, &test_config());

        assert_eq!(
            team1,
            StandingDelta {
                wins: 1,
                losses: 0,
                draws: 0,
                points: 3
            }
        );
        assert_eq!(
            team2,
            StandingDelta {
                wins: 0,
                losses: 1,
                draws: 0,
                points: 1
            }
        );
    }

    #[test]
    fn test_draw_deltas() {
        let (team1, team2) = match_deltas(1, 1, &test_config());

        assert_eq!(team1, team2);
        assert_eq!(
            team1,
            StandingDelta {
                wins: 0,
                losses: 0,
                draws: 1,
                points: 1
            }
        );
    }

    #[test]
    fn test_apply_then_reverse_restores_counters() {
        let (team1, team2) = match_deltas(2, 1, &test_config());

        let start = Counters::default();
        let after_team1 = start.plus(team1).plus(team1.invert());
        let after_team2 = start.plus(team2).plus(team2.invert());

        assert_eq!(after_team1, start);
        assert_eq!(after_team2, start);
    }

    #[test]
    fn test_update_to_same_scores_is_net_noop() {
        // reverse(old) + apply(new) with old == new must not move counters
        let (old1, old2) = match_deltas(2, 2, &test_config());
        let (new1, new2) = match_deltas(2, 2, &test_config());

        let team1 = Counters::default().plus(old1).plus(old1.invert()).plus(new1);
        let team2 = Counters::default().plus(old2).plus(old2.invert()).plus(new2);

        assert_eq!(team1, Counters::default().plus(old1));
        assert_eq!(team2, Counters::default().plus(old2));
    }

    #[test]
    fn test_update_win_to_draw() {
        // Scenario: 2:1 recorded, then corrected to 1:1
        let (win_delta, loss_delta) = match_deltas(2, 1, &test_config());
        let (draw1, draw2) = match_deltas(1, 1, &test_config());

        let team1 = Counters::default()
            .plus(win_delta)
            .plus(win_delta.invert())
            .plus(draw1);
        let team2 = Counters::default()
            .plus(loss_delta)
            .plus(loss_delta.invert())
            .plus(draw2);

        assert_eq!(
            team1,
            Counters {
                wins: 0,
                losses: 0,
                draws: 1,
                points: 1
            }
        );
        assert_eq!(
            team2,
            Counters {
                wins: 0,
                losses: 0,
                draws: 1,
                points: 1
            }
        );
    }

    #[test]
    fn test_win_and_draw_accumulate() {
        // One win (3 pts) and one draw (1 pt) for the same team
        let (win_delta, _) = match_deltas(3, 0, &test_config());
        let (draw_delta, _) = match_deltas(0, 0, &test_config());

        let team = Counters::default().plus(win_delta).plus(draw_delta);

        assert_eq!(
            team,
            Counters {
                wins: 1,
                losses: 0,
                draws: 1,
                points: 4
            }
        );
    }

    #[test]
    fn test_invert_is_involution() {
        let (team1, team2) = match_deltas(0, 5, &test_config());

        assert_eq!(team1.invert().invert(), team1);
        assert_eq!(team2.invert().invert(), team2);
    }
}
