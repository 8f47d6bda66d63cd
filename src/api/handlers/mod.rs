pub mod leagues;
pub mod matches;
pub mod standings;
pub mod teams;
