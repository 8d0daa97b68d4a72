use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::StatLine;

pub const DEFAULT_BASE_URL: &str = "https://basketball.biji.co";
pub const DEFAULT_TEAM_ID: &str = "happy";
pub const DEFAULT_SEASON_ID: &str = "2025-q1";

/// Column positions of the fifteen stat fields in a statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatColumns {
    pub points: usize,
    pub fg2_made: usize,
    pub fg2_attempted: usize,
    pub fg3_made: usize,
    pub fg3_attempted: usize,
    pub ft_made: usize,
    pub ft_attempted: usize,
    pub off_rebounds: usize,
    pub def_rebounds: usize,
    pub rebounds: usize,
    pub assists: usize,
    pub steals: usize,
    pub blocks: usize,
    pub fouls: usize,
    pub turnovers: usize,
}

impl StatColumns {
    /// Columns in a game's box score: name, record type, then the stats
    /// with a percentage column after each made/attempted pair.
    pub fn box_score() -> Self {
        Self::starting_at(2)
    }

    /// Columns on a player page: date, opponent, points, record type, then
    /// the same run of shooting and counting stats shifted by one.
    pub fn season_log() -> Self {
        let mut cols = Self::starting_at(3);
        cols.points = 2;
        cols
    }

    fn starting_at(points: usize) -> Self {
        Self {
            points,
            fg2_made: points + 1,
            fg2_attempted: points + 2,
            fg3_made: points + 4,
            fg3_attempted: points + 5,
            ft_made: points + 7,
            ft_attempted: points + 8,
            off_rebounds: points + 10,
            def_rebounds: points + 11,
            rebounds: points + 12,
            assists: points + 13,
            steals: points + 14,
            blocks: points + 15,
            fouls: points + 16,
            turnovers: points + 17,
        }
    }

    fn indices(&self) -> [usize; 15] {
        [
            self.points,
            self.fg2_made,
            self.fg2_attempted,
            self.fg3_made,
            self.fg3_attempted,
            self.ft_made,
            self.ft_attempted,
            self.off_rebounds,
            self.def_rebounds,
            self.rebounds,
            self.assists,
            self.steals,
            self.blocks,
            self.fouls,
            self.turnovers,
        ]
    }

    /// Read a stat line from a row's cleaned cells.
    pub fn read(&self, cells: &[String]) -> StatLine {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
        StatLine {
            points: cell(self.points),
            fg2_made: cell(self.fg2_made),
            fg2_attempted: cell(self.fg2_attempted),
            fg3_made: cell(self.fg3_made),
            fg3_attempted: cell(self.fg3_attempted),
            ft_made: cell(self.ft_made),
            ft_attempted: cell(self.ft_attempted),
            off_rebounds: cell(self.off_rebounds),
            def_rebounds: cell(self.def_rebounds),
            rebounds: cell(self.rebounds),
            assists: cell(self.assists),
            steals: cell(self.steals),
            blocks: cell(self.blocks),
            fouls: cell(self.fouls),
            turnovers: cell(self.turnovers),
        }
    }
}

/// Layout of the per-game box-score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxScoreLayout {
    /// Rows with fewer cells are dropped.
    pub min_cells: usize,
    pub stats: StatColumns,
    /// Expected header label per column index, checked when the table has
    /// a header row.
    #[serde(default)]
    pub headers: BTreeMap<usize, String>,
}

impl Default for BoxScoreLayout {
    fn default() -> Self {
        Self {
            min_cells: 20,
            stats: StatColumns::box_score(),
            headers: BTreeMap::new(),
        }
    }
}

/// Layout of the season-log table on a player's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonLogLayout {
    pub min_cells: usize,
    pub date: usize,
    pub opponent: usize,
    pub stats: StatColumns,
    #[serde(default)]
    pub headers: BTreeMap<usize, String>,
}

impl Default for SeasonLogLayout {
    fn default() -> Self {
        Self {
            min_cells: 21,
            date: 0,
            opponent: 1,
            stats: StatColumns::season_log(),
            headers: BTreeMap::new(),
        }
    }
}

/// Column layouts for both statistics tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layouts {
    #[serde(default)]
    pub box_score: BoxScoreLayout,
    #[serde(default)]
    pub season_log: SeasonLogLayout,
}

impl Layouts {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let layouts: Layouts = serde_json::from_str(json)?;
        layouts.validate()?;
        Ok(layouts)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read layout file {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Every mapped column must fall inside the accepted row width.
    pub fn validate(&self) -> Result<(), AppError> {
        check_columns(
            "box_score",
            self.box_score.min_cells,
            self.box_score.stats.indices().into_iter(),
        )?;
        let season = &self.season_log;
        check_columns(
            "season_log",
            season.min_cells,
            season
                .stats
                .indices()
                .into_iter()
                .chain([season.date, season.opponent]),
        )
    }
}

fn check_columns(
    table: &str,
    min_cells: usize,
    mut indices: impl Iterator<Item = usize>,
) -> Result<(), AppError> {
    match indices.find(|&i| i >= min_cells) {
        Some(i) => Err(AppError::ConfigError(format!(
            "{table}: column {i} is outside min_cells {min_cells}"
        ))),
        None => Ok(()),
    }
}

/// Settings for one scrape run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Id of the subject team; every run covers one team.
    pub team_id: String,
    pub season_id: String,
    /// Prefix for root-relative links found on the team page.
    pub base_url: String,
    /// Spacing between detail-page requests.
    pub page_delay: Duration,
    /// Spacing between image downloads.
    pub image_delay: Duration,
    pub layouts: Layouts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            team_id: DEFAULT_TEAM_ID.to_string(),
            season_id: DEFAULT_SEASON_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_delay: Duration::from_millis(500),
            image_delay: Duration::from_millis(100),
            layouts: Layouts::default(),
        }
    }
}

impl RunConfig {
    pub fn with_team_id(mut self, id: impl Into<String>) -> Self {
        self.team_id = id.into();
        self
    }

    pub fn with_season_id(mut self, id: impl Into<String>) -> Self {
        self.season_id = id.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_image_delay(mut self, delay: Duration) -> Self {
        self.image_delay = delay;
        self
    }

    pub fn with_layouts(mut self, layouts: Layouts) -> Self {
        self.layouts = layouts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_box_score_columns() {
        let cols = StatColumns::box_score();
        assert_eq!(cols.points, 2);
        assert_eq!((cols.fg2_made, cols.fg2_attempted), (3, 4));
        assert_eq!((cols.fg3_made, cols.fg3_attempted), (6, 7));
        assert_eq!((cols.ft_made, cols.ft_attempted), (9, 10));
        assert_eq!(
            (cols.off_rebounds, cols.def_rebounds, cols.rebounds),
            (12, 13, 14)
        );
        assert_eq!(
            (cols.assists, cols.steals, cols.blocks, cols.fouls, cols.turnovers),
            (15, 16, 17, 18, 19)
        );
    }

    #[test]
    fn default_season_log_columns() {
        let cols = StatColumns::season_log();
        assert_eq!(cols.points, 2);
        assert_eq!((cols.fg2_made, cols.fg2_attempted), (4, 5));
        assert_eq!((cols.ft_made, cols.ft_attempted), (10, 11));
        assert_eq!(cols.rebounds, 15);
        assert_eq!(cols.turnovers, 20);
    }

    #[test]
    fn defaults_validate() {
        Layouts::default().validate().unwrap();
    }

    #[test]
    fn column_outside_row_width_is_rejected() {
        let mut layouts = Layouts::default();
        layouts.box_score.min_cells = 15;
        let err = layouts.validate().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("box_score"));
    }

    #[test]
    fn layouts_roundtrip_through_json() {
        let mut layouts = Layouts::default();
        layouts.box_score.headers.insert(2, "得分".into());
        let json = layouts.to_json_pretty().unwrap();
        assert_eq!(Layouts::from_json(&json).unwrap(), layouts);
    }

    #[test]
    fn partial_layout_file_keeps_other_defaults() {
        let json = r#"{
            "box_score": {
                "min_cells": 22,
                "stats": {
                    "points": 3, "fg2_made": 4, "fg2_attempted": 5,
                    "fg3_made": 7, "fg3_attempted": 8, "ft_made": 10,
                    "ft_attempted": 11, "off_rebounds": 13, "def_rebounds": 14,
                    "rebounds": 15, "assists": 16, "steals": 17, "blocks": 18,
                    "fouls": 19, "turnovers": 20
                }
            }
        }"#;
        let layouts = Layouts::from_json(json).unwrap();
        assert_eq!(layouts.box_score.min_cells, 22);
        assert_eq!(layouts.box_score.stats.points, 3);
        assert_eq!(layouts.season_log, SeasonLogLayout::default());
    }

    #[test]
    fn read_missing_cells_as_empty() {
        let cells: Vec<String> = vec!["a".into(), "b".into(), "12".into()];
        let line = StatColumns::box_score().read(&cells);
        assert_eq!(line.points, "12");
        assert_eq!(line.turnovers, "");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = RunConfig::default().with_base_url("https://example.com/");
        assert_eq!(config.base_url, "https://example.com");
    }
}
