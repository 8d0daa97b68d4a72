//! Extractor for the season log on a player's page.

use scraper::Html;

use super::game::STAT_ROWS;
use super::html::{check_headers, header_labels, row_cells, selector};
use crate::config::SeasonLogLayout;
use crate::error::AppError;
use crate::models::StatLine;

/// League boilerplate appended to opponent names on player pages.
pub const LEAGUE_SUFFIXES: [&str; 3] = ["快樂聯盟冠軍賽", "快樂聯盟季後賽", "快樂聯盟例行賽"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonLogLine {
    /// Date part of the date/time cell.
    pub date: String,
    pub opponent: String,
    pub stats: StatLine,
}

pub fn extract_season_log(
    html: &str,
    layout: &SeasonLogLayout,
) -> Result<Vec<SeasonLogLine>, AppError> {
    let doc = Html::parse_document(html);
    let Some(table) = doc
        .select(&selector("table.statistics-data-item")?)
        .next()
    else {
        return Ok(Vec::new());
    };

    if !layout.headers.is_empty() {
        let header = header_labels(&table, &selector("tr")?);
        check_headers("season_log", header.as_deref(), &layout.headers);
    }

    let mut lines = Vec::new();
    let mut dropped = 0usize;
    for row in table.select(&selector(STAT_ROWS)?) {
        let cells = row_cells(&row);
        if cells.len() < layout.min_cells {
            dropped += 1;
            continue;
        }
        let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
        lines.push(SeasonLogLine {
            date: cell(layout.date)
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string(),
            opponent: strip_league_suffix(cell(layout.opponent)),
            stats: layout.stats.read(&cells),
        });
    }
    if dropped > 0 {
        tracing::debug!(dropped, min_cells = layout.min_cells, "Dropped short season-log rows");
    }
    Ok(lines)
}

pub fn strip_league_suffix(opponent: &str) -> String {
    LEAGUE_SUFFIXES
        .iter()
        .fold(opponent.to_string(), |name, suffix| name.replace(suffix, ""))
        .trim()
        .to_string()
}
