//! Extractors for a game's result page.

use scraper::Html;

use super::html::{check_headers, first_text, header_labels, row_cells, selector};
use crate::config::BoxScoreLayout;
use crate::error::AppError;
use crate::models::StatLine;

/// Rows of a statistics table; other rows (headers, team totals) are ignored.
pub(crate) const STAT_ROWS: &str = "tr.statistics-data-odd, tr.statistics-data-double";

/// One team's line in the quarter-score table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuarterLine {
    pub team: String,
    /// Period scores in column order, as text.
    pub scores: Vec<String>,
}

/// One player's line in the home box score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxScoreLine {
    /// Display name as printed, including any `#<number>` suffix.
    pub player: String,
    pub stats: StatLine,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameDetail {
    pub quarters: Vec<QuarterLine>,
    pub box_score: Vec<BoxScoreLine>,
}

pub fn extract_game_page(html: &str, layout: &BoxScoreLayout) -> Result<GameDetail, AppError> {
    let doc = Html::parse_document(html);
    Ok(GameDetail {
        quarters: extract_quarter_scores(&doc)?,
        box_score: extract_box_score(&doc, layout)?,
    })
}

pub fn extract_quarter_scores(doc: &Html) -> Result<Vec<QuarterLine>, AppError> {
    let Some(table) = doc
        .select(&selector("div.game-section-point table")?)
        .next()
    else {
        return Ok(Vec::new());
    };

    let lines = table
        .select(&selector("tr")?)
        .skip(1)
        .filter_map(|row| {
            let mut cells = row_cells(&row).into_iter();
            let team = cells.next()?;
            Some(QuarterLine {
                team,
                scores: cells.collect(),
            })
        })
        .collect();
    Ok(lines)
}

pub fn extract_box_score(
    doc: &Html,
    layout: &BoxScoreLayout,
) -> Result<Vec<BoxScoreLine>, AppError> {
    let Some(table) = doc
        .select(&selector("table.statistics-data-item#home-team-tab")?)
        .next()
    else {
        return Ok(Vec::new());
    };
    let rows = selector(STAT_ROWS)?;
    let name_sel = selector("td.player-name a")?;

    if !layout.headers.is_empty() {
        let header = header_labels(&table, &selector("tr")?);
        check_headers("box_score", header.as_deref(), &layout.headers);
    }

    let mut lines = Vec::new();
    let mut dropped = 0usize;
    for row in table.select(&rows) {
        let Some(player) = first_text(&row, &name_sel) else {
            continue;
        };
        let cells = row_cells(&row);
        if cells.len() < layout.min_cells {
            dropped += 1;
            continue;
        }
        lines.push(BoxScoreLine {
            player,
            stats: layout.stats.read(&cells),
        });
    }
    if dropped > 0 {
        tracing::debug!(dropped, min_cells = layout.min_cells, "Dropped short box-score rows");
    }
    Ok(lines)
}
