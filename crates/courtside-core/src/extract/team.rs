//! Extractors for the team page: header, season averages, roster and
//! recent schedule.

use scraper::{ElementRef, Html};

use super::html::{
    absolutize, background_image_url, collapse_whitespace, element_text, first_text,
    row_cell_elements, selector,
};
use crate::error::AppError;
use crate::identity::id_param;

/// Glyphs marking a win or a loss in the schedule's result cell.
pub const OUTCOME_GLYPHS: [char; 2] = ['勝', '敗'];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamHeader {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub cover_url: Option<String>,
}

/// Season averages keyed by their title (`PPG`, `RPG`, …), in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonAverages {
    pub items: Vec<(String, String)>,
}

impl SeasonAverages {
    /// Value under `title`; the last item wins when a title repeats.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.items
            .iter()
            .rev()
            .find(|(t, _)| t == title)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterItem {
    pub name: Option<String>,
    pub number: Option<String>,
    /// Absolute profile link.
    pub link: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleItem {
    pub date: String,
    pub opponent: String,
    /// `勝`, `敗` or empty.
    pub outcome: String,
    pub score: String,
    /// Absolute result link.
    pub link: Option<String>,
}

/// Everything the team page contributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPage {
    pub header: TeamHeader,
    pub averages: SeasonAverages,
    pub roster: Vec<RosterItem>,
    pub schedule: Vec<ScheduleItem>,
}

/// Parse the team page once and run every team-page extractor over it.
pub fn extract_team_page(html: &str, base_url: &str) -> Result<TeamPage, AppError> {
    let doc = Html::parse_document(html);
    Ok(TeamPage {
        header: extract_team_header(&doc)?,
        averages: extract_season_averages(&doc)?,
        roster: extract_roster(&doc, base_url)?,
        schedule: extract_schedule(&doc, base_url)?,
    })
}

pub fn extract_team_header(doc: &Html) -> Result<TeamHeader, AppError> {
    let root = doc.root_element();
    let name = first_text(&root, &selector("div.team-name")?).filter(|s| !s.is_empty());
    let logo_url = root
        .select(&selector("div.team-logo img[src]")?)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty());
    let cover_url = root
        .select(&selector("div.team-pic[style]")?)
        .next()
        .and_then(|div| div.value().attr("style"))
        .and_then(background_image_url);

    Ok(TeamHeader {
        name,
        logo_url,
        cover_url,
    })
}

pub fn extract_season_averages(doc: &Html) -> Result<SeasonAverages, AppError> {
    let point = selector("div.point")?;
    let title = selector("div.title")?;
    let items = doc
        .select(&selector("div.average-item")?)
        .filter_map(|item| Some((first_text(&item, &title)?, first_text(&item, &point)?)))
        .collect();
    Ok(SeasonAverages { items })
}

pub fn extract_roster(doc: &Html, base_url: &str) -> Result<Vec<RosterItem>, AppError> {
    let Some(list) = doc.select(&selector("ul#active-player-list")?).next() else {
        return Ok(Vec::new());
    };
    let item_sel = selector("li.player-item")?;
    let name_sel = selector("div.player-name")?;
    let number_sel = selector("div.other-info")?;
    let link_sel = selector("a[href]")?;
    let lazy_sel = selector("[data-original]")?;
    let style_sel = selector("[style]")?;

    let roster = list
        .select(&item_sel)
        .map(|item| RosterItem {
            name: first_text(&item, &name_sel),
            number: first_text(&item, &number_sel)
                .and_then(|info| info.strip_prefix('#').map(|n| n.trim().to_string())),
            link: item
                .select(&link_sel)
                .filter_map(|a| a.value().attr("href"))
                .find(|href| is_profile_link(href))
                .map(|href| profile_url(base_url, href)),
            photo_url: player_photo(&item, &lazy_sel, &style_sel)
                .map(|url| absolutize(base_url, &url)),
        })
        .collect();
    Ok(roster)
}

fn profile_url(base_url: &str, href: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        href.trim().trim_start_matches('/')
    )
}

fn is_profile_link(href: &str) -> bool {
    href.trim().trim_start_matches('/').starts_with("index.php?")
        && href.contains("act=player-info")
        && id_param(href).is_some()
}

/// Lazy-loaded `data-original` first, then an inline background image.
fn player_photo(
    item: &ElementRef<'_>,
    lazy: &scraper::Selector,
    style: &scraper::Selector,
) -> Option<String> {
    item.select(lazy)
        .filter_map(|el| el.value().attr("data-original"))
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| {
            item.select(style)
                .filter_map(|el| el.value().attr("style"))
                .find_map(background_image_url)
        })
}

pub fn extract_schedule(doc: &Html, base_url: &str) -> Result<Vec<ScheduleItem>, AppError> {
    let Some(table) = doc
        .select(&selector("div.recent-schedule-info.recent-games table.info")?)
        .next()
    else {
        return Ok(Vec::new());
    };
    let link_sel = selector("a[href]")?;

    let schedule = table
        .select(&selector("tr")?)
        .filter_map(|row| {
            let cells = row_cell_elements(&row);
            if cells.len() < 4 {
                return None;
            }
            let (outcome, score) = split_outcome(&element_text(&cells[2]));
            let link = cells[3]
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::trim)
                .filter(|href| !href.is_empty())
                .map(|href| absolutize(base_url, href));
            Some(ScheduleItem {
                date: element_text(&cells[0]),
                opponent: clean_opponent(&element_text(&cells[1])),
                outcome,
                score,
                link,
            })
        })
        .collect();
    Ok(schedule)
}

/// Remove the `vs.` marker and collapse whitespace.
pub fn clean_opponent(text: &str) -> String {
    collapse_whitespace(&text.replace("vs.", ""))
}

/// Split a result cell into its outcome glyph and the score after it.
///
/// Without a glyph the outcome is empty and the whole text is the score.
pub fn split_outcome(text: &str) -> (String, String) {
    match text.char_indices().find(|(_, c)| OUTCOME_GLYPHS.contains(c)) {
        Some((i, glyph)) => (
            glyph.to_string(),
            text[i + glyph.len_utf8()..].trim().to_string(),
        ),
        None => (String::new(), text.trim().to_string()),
    }
}
