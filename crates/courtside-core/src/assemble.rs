//! Builds the relational row sets from extracted records.
//!
//! This is the only place where missing fields are replaced by defaults.

use crate::extract::{GameDetail, RosterItem, ScheduleItem, SeasonAverages, SeasonLogLine, TeamHeader};
use crate::identity::{self, PlayerIndex};
use crate::traits::sanitize_stem;
use crate::models::{
    EntityId, GamePlayerStatRow, GameRow, GameTeamStatRow, PlayerRow, PlayerSeasonLogRow,
    RosterRow, Tables, TeamRow,
};

pub const DEFAULT_TEAM_NAME: &str = "Unknown Team";
pub const DEFAULT_PLAYER_NAME: &str = "Unknown";
pub const DEFAULT_NUMBER: &str = "0";

/// Accumulates rows for one run. Rows are only ever appended.
#[derive(Debug)]
pub struct TableAssembler {
    team_id: EntityId,
    team_name: String,
    season_id: String,
    index: PlayerIndex,
    tables: Tables,
}

impl TableAssembler {
    pub fn new(team_id: &str, season_id: &str) -> Self {
        Self {
            team_id: EntityId::Resolved(team_id.to_string()),
            team_name: DEFAULT_TEAM_NAME.to_string(),
            season_id: season_id.to_string(),
            index: PlayerIndex::new(),
            tables: Tables::default(),
        }
    }

    pub fn team_id(&self) -> &EntityId {
        &self.team_id
    }

    /// Add the subject team. `logo` and `cover` are the stored image
    /// references.
    pub fn team(
        &mut self,
        header: &TeamHeader,
        averages: &SeasonAverages,
        logo: String,
        cover: String,
    ) {
        self.team_name = header
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_TEAM_NAME.to_string());
        let average = |title: &str| averages.get(title).unwrap_or("").to_string();
        self.tables.teams.push(TeamRow {
            team_id: self.team_id.clone(),
            name: self.team_name.clone(),
            logo,
            cover,
            ppg: average("PPG"),
            rpg: average("RPG"),
            apg: average("APG"),
            oppg: average("OPPG"),
        });
    }

    /// File stem for a roster photo: `player_<number>_<index>`, with the
    /// number reduced to file-name-safe characters.
    pub fn photo_stem(index: usize, item: &RosterItem) -> String {
        sanitize_stem(&format!("player_{}_{index}", roster_number(item)))
    }

    /// Add a roster entry and its player; returns the player's id.
    pub fn roster_player(&mut self, index: usize, item: &RosterItem, photo: String) -> EntityId {
        let player_id = identity::player_id(item.link.as_deref(), index);
        let name = item
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());

        self.index.insert(&name, player_id.clone());
        self.tables.players.push(PlayerRow {
            player_id: player_id.clone(),
            name,
            photo,
        });
        self.tables.roster.push(RosterRow {
            team_id: self.team_id.clone(),
            player_id: player_id.clone(),
            number: roster_number(item).to_string(),
        });
        player_id
    }

    /// Add the whole roster. `photos[i]` is the stored reference for
    /// `items[i]`; missing entries become `""`.
    pub fn roster(&mut self, items: &[RosterItem], photos: &[String]) -> Vec<EntityId> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let photo = photos.get(i).cloned().unwrap_or_default();
                self.roster_player(i, item, photo)
            })
            .collect()
    }

    /// Add every scheduled game, in page order.
    pub fn schedule(&mut self, items: &[ScheduleItem]) -> Vec<EntityId> {
        items.iter().map(|item| self.game(item)).collect()
    }

    /// Add a scheduled game; returns its id.
    pub fn game(&mut self, item: &ScheduleItem) -> EntityId {
        let game_id = identity::game_id(item.link.as_deref());
        let (home_score, away_score) = split_score(&item.score);
        self.tables.games.push(GameRow {
            game_id: game_id.clone(),
            season_id: self.season_id.clone(),
            date: item.date.clone(),
            home_team_id: self.team_id.clone(),
            away_team: EntityId::RawName(item.opponent.clone()),
            home_score,
            away_score,
        });
        game_id
    }

    /// Add quarter and box-score rows for one game.
    pub fn game_detail(&mut self, game_id: &EntityId, detail: &GameDetail) {
        for line in &detail.quarters {
            let quarter = |i: usize| line.scores.get(i).cloned().unwrap_or_default();
            self.tables.game_team_stats.push(GameTeamStatRow {
                game_id: game_id.clone(),
                team_id: identity::team_ref(&line.team, &self.team_name, &self.team_id),
                quarters: [quarter(0), quarter(1), quarter(2), quarter(3)],
                total: quarter_total(&line.scores),
            });
        }
        for line in &detail.box_score {
            self.tables.game_player_stats.push(GamePlayerStatRow {
                game_id: game_id.clone(),
                player_id: self.index.resolve(&line.player),
                team_id: self.team_id.clone(),
                stats: line.stats.clone(),
            });
        }
    }

    /// Add a player's season-log rows.
    pub fn season_log(&mut self, player_id: &EntityId, player_name: &str, lines: &[SeasonLogLine]) {
        self.tables
            .season_logs
            .extend(lines.iter().map(|line| PlayerSeasonLogRow {
                player_id: player_id.clone(),
                player_name: player_name.to_string(),
                date: line.date.clone(),
                opponent: line.opponent.clone(),
                stats: line.stats.clone(),
            }));
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn finish(self) -> Tables {
        self.tables
    }
}

fn roster_number(item: &RosterItem) -> &str {
    item.number
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_NUMBER)
}

/// Split `"H-A"` into home and away scores; both empty unless the text
/// has a `-`.
pub fn split_score(score: &str) -> (String, String) {
    let mut parts = score.split('-');
    match (parts.next(), parts.next()) {
        (Some(home), Some(away)) => (home.trim().to_string(), away.trim().to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Sum of the all-digit period scores; anything else is left out.
/// Saturates at `u32::MAX`.
pub fn quarter_total(scores: &[String]) -> u32 {
    scores
        .iter()
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|s| s.parse::<u32>().ok())
        .fold(0, u32::saturating_add)
}
