pub mod api;
pub mod records;

pub use api::{
    EventType, JoinLeaguePayload, MatchFilters, NewLeague, NewMatch, NewTeam, UpdateLeague,
    UpdateMatch,
};
pub use records::{League, Match, PointConfig, Standing, Team};
