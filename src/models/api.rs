use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of event a match was played as. Stored as TEXT in the matches table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    Friendly,
    League,
    Tournament,
    Final,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Friendly => "Friendly",
            EventType::League => "League",
            EventType::Tournament => "Tournament",
            EventType::Final => "Final",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Friendly" => Ok(EventType::Friendly),
            "League" => Ok(EventType::League),
            "Tournament" => Ok(EventType::Tournament),
            "Final" => Ok(EventType::Final),
            other => Err(format!("Unknown event type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewLeague {
    pub name: String,
    pub competition: String,
    pub description: Option<String>,
    pub max_teams: Option<i32>,
    pub first_place_points: i32,
    pub second_place_points: i32,
    pub draw_points: Option<i32>,
}

impl NewLeague {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("League name must not be empty".to_string());
        }
        if self.competition.trim().is_empty() {
            return Err("Competition must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial league update. Point configuration changes do not rewrite
/// standings already accumulated from recorded matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeague {
    pub name: Option<String>,
    pub competition: Option<String>,
    pub description: Option<String>,
    pub max_teams: Option<i32>,
    pub first_place_points: Option<i32>,
    pub second_place_points: Option<i32>,
    pub draw_points: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTeam {
    pub name: String,
    pub city: Option<String>,
}

impl NewTeam {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Team name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Partial team update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeam {
    pub name: Option<String>,
    pub city: Option<String>,
}

impl UpdateTeam {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Team name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinLeaguePayload {
    pub team_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMatch {
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_score: i32,
    pub team2_score: i32,
    pub event_type: EventType,
    pub event_location: String,
}

impl NewMatch {
    pub fn validate(&self) -> Result<(), String> {
        if self.team1_id == self.team2_id {
            return Err("A team cannot play against itself".to_string());
        }
        if self.team1_score < 0 || self.team2_score < 0 {
            return Err("Match scores must be non-negative".to_string());
        }
        Ok(())
    }
}

/// Full replacement of a match's mutable fields. The coordinator reverses
/// the stored outcome before persisting these values.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMatch {
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_score: i32,
    pub team2_score: i32,
    pub event_type: EventType,
    pub event_location: String,
}

impl UpdateMatch {
    pub fn validate(&self) -> Result<(), String> {
        if self.team1_id == self.team2_id {
            return Err("A team cannot play against itself".to_string());
        }
        if self.team1_score < 0 || self.team2_score < 0 {
            return Err("Match scores must be non-negative".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchFilters {
    pub team_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trip() {
        for name in ["Friendly", "League", "Tournament", "Final"] {
            let parsed: EventType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn test_event_type_unknown() {
        assert!("Playoff".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_type_serde() {
        let json = serde_json::to_string(&EventType::Tournament).unwrap();
        assert_eq!(json, "\"Tournament\"");
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventType::Tournament);
    }

    #[test]
    fn test_new_match_rejects_same_team() {
        let payload = NewMatch {
            team1_id: 7,
            team2_id: 7,
            team1_score: 1,
            team2_score: 0,
            event_type: EventType::League,
            event_location: "Home".to_string(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_new_match_rejects_negative_score() {
        let payload = NewMatch {
            team1_id: 1,
            team2_id: 2,
            team1_score: -1,
            team2_score: 0,
            event_type: EventType::Friendly,
            event_location: "Away".to_string(),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_team_rejects_blank_name() {
        let payload = UpdateTeam {
            name: Some("  ".to_string()),
            city: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_update_team_allows_city_only_change() {
        let payload = UpdateTeam {
            name: None,
            city: Some("Leeds".to_string()),
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_new_league_requires_name() {
        let payload = NewLeague {
            name: "  ".to_string(),
            competition: "Soccer".to_string(),
            description: None,
            max_teams: None,
            first_place_points: 3,
            second_place_points: 0,
            draw_points: Some(1),
        };
        assert!(payload.validate().is_err());
    }
}
