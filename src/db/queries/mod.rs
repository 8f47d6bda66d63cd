// Database queries organized by domain
// Each module contains focused queries for a specific table

pub mod leagues;
pub mod matches;
pub mod standings;
pub mod teams;

pub use leagues::{delete_league, get_league, insert_league, list_leagues, load_point_config, update_league};
pub use matches::{
    delete_match_row, get_match, get_match_for_update, insert_match, list_matches,
    team_has_matches, update_match_row,
};
pub use standings::{
    apply_standing_delta, delete_standing, find_or_create_standing, find_standing, list_standings,
};
pub use teams::{
    add_league_member, delete_team, get_team, insert_team, list_teams, remove_league_member,
    update_team,
};
