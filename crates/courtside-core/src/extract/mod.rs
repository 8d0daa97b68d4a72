//! Anchor-then-iterate extractors, one module per page kind.
//!
//! Each extractor locates a container by a stable class/id anchor, walks its
//! rows or items, and returns owned records. A missing anchor yields an empty
//! result rather than an error; defaults are applied by the assembler.

pub mod game;
pub mod html;
pub mod player;
pub mod team;

pub use game::{BoxScoreLine, GameDetail, QuarterLine, extract_game_page};
pub use player::{SeasonLogLine, extract_season_log};
pub use team::{RosterItem, ScheduleItem, SeasonAverages, TeamHeader, TeamPage, extract_team_page};
