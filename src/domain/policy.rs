use crate::models::records::PointConfig;

/// How one side of a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

/// The (result, points) pair the league's policy awards one side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub result: MatchResult,
    pub points: i32,
}

/// Map a match's two scores onto an outcome for each side.
///
/// The higher score wins and takes `first_place_points`, the opponent takes
/// `second_place_points`; equal scores give both sides `draw_points`
/// (absent draw_points counts as 0). Pure and deterministic.
pub fn score_match(
    team1_score: i32,
    team2_score: i32,
    config: &PointConfig,
) -> (Outcome, Outcome) {
    if team1_score > team2_score {
        (
            Outcome {
                result: MatchResult::Win,
                points: config.first_place_points,
            },
            Outcome {
                result: MatchResult::Loss,
                points: config.second_place_points,
            },
        )
    } else if team1_score < team2_score {
        (
            Outcome {
                result: MatchResult::Loss,
                points: config.second_place_points,
            },
            Outcome {
                result: MatchResult::Win,
                points: config.first_place_points,
            },
        )
    } else {
        let draw = Outcome {
            result: MatchResult::Draw,
            points: config.draw_points.unwrap_or(0),
        };
        (draw, draw)
    }
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

    #[test]
    fn test_team1_win() {
        let (team1, team2) = score_match(2, 1, &test_config());

        assert_eq!(team1.result, MatchResult::Win);
        assert_eq!(team1.points, 3);
        assert_eq!(team2.result, MatchResult::Loss);
        assert_eq!(team2.points, 1);
    }

    #[test]
    fn test_team2_win() {
        let (team1, team2) = score_match(0, 4, &test_config());

        assert_eq!(team1.result, MatchResult::Loss);
        assert_eq!(team1.points, 1);
        assert_eq!(team2.result, MatchResult::Win);
        assert_eq!(team2.points, 3);
    }

    #[test]
    fn test_draw() {
        let (team1, team2) = score_match(1, 1, &test_config());

        assert_eq!(team1.result, MatchResult::Draw);
        assert_eq!(team2.result, MatchResult::Draw);
        assert_eq!(team1.points, 1);
        assert_eq!(team2.points, 1);
    }

    #[test]
    fn test_missing_draw_points_counts_as_zero() {
        let config = PointConfig {
            first_place_points: 2,
            second_place_points: 0,
            draw_points: None,
        };

        let (team1, team2) = score_match(0, 0, &config);

        assert_eq!(team1.result, MatchResult::Draw);
        assert_eq!(team1.points, 0);
        assert_eq!(team2.points, 0);
    }

    #[test]
    fn test_zero_zero_is_a_draw() {
        let (team1, _) = score_match(0, 0, &test_config());
        assert_eq!(team1.result, MatchResult::Draw);
    }
}
