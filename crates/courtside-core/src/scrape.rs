use std::fmt;

use crate::assemble::TableAssembler;
use crate::config::RunConfig;
use crate::error::AppError;
use crate::extract::{GameDetail, SeasonLogLine, extract_game_page, extract_season_log, extract_team_page};
use crate::models::{EntityId, Tables};
use crate::throttle::{Throttle, ThrottledFetcher};
use crate::traits::{Fetcher, ImageStore};

/// Kind of detail page a skip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Game,
    Player,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Game => f.write_str("game"),
            PageKind::Player => f.write_str("player"),
        }
    }
}

/// A detail page whose contribution was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    pub kind: PageKind,
    pub id: EntityId,
    pub url: String,
    pub reason: String,
}

/// Result of one run: the assembled tables plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub tables: Tables,
    /// Games whose detail page was fetched and parsed.
    pub detailed_games: usize,
    pub skipped: Vec<SkippedPage>,
}

/// Orchestrates one run: team page → images → game pages → player pages
/// → tables.
///
/// Generic over the fetcher and the image store so tests run without HTTP.
/// Detail-page failures are logged and skipped; only the team page itself
/// can fail the run.
pub struct TeamScrapeService<F, I>
where
    F: Fetcher,
    I: ImageStore,
{
    fetcher: ThrottledFetcher<F>,
    images: I,
    config: RunConfig,
}

impl<F, I> TeamScrapeService<F, I>
where
    F: Fetcher,
    I: ImageStore,
{
    /// Detail-page requests are spaced by `config.page_delay`.
    pub fn new(fetcher: F, images: I, config: RunConfig) -> Self {
        let throttle = Throttle::new(config.page_delay);
        Self {
            fetcher: ThrottledFetcher::new(fetcher, throttle),
            images,
            config,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Fetch the team page from `url`, then run as [`Self::run`].
    pub async fn scrape(&self, url: &str) -> Result<ScrapeOutcome, AppError> {
        tracing::info!(url = %url, "Fetching team page");
        let html = self.fetcher.fetch(url).await?;
        self.run(&html).await
    }

    /// Build every table from an already-loaded team page.
    pub async fn run(&self, team_html: &str) -> Result<ScrapeOutcome, AppError> {
        let page = extract_team_page(team_html, &self.config.base_url)?;
        tracing::info!(
            roster = page.roster.len(),
            schedule = page.schedule.len(),
            "Parsed team page"
        );

        let mut tables = TableAssembler::new(&self.config.team_id, &self.config.season_id);
        let mut outcome = ScrapeOutcome::default();

        let logo = self
            .store_image(page.header.logo_url.as_deref(), "team_logo")
            .await;
        let cover = self
            .store_image(page.header.cover_url.as_deref(), "team_cover")
            .await;
        tables.team(&page.header, &page.averages, logo, cover);

        let mut photos = Vec::with_capacity(page.roster.len());
        for (i, item) in page.roster.iter().enumerate() {
            let stem = TableAssembler::photo_stem(i, item);
            photos.push(self.store_image(item.photo_url.as_deref(), &stem).await);
        }
        let player_ids = tables.roster(&page.roster, &photos);

        let game_ids = tables.schedule(&page.schedule);
        for (item, game_id) in page.schedule.iter().zip(&game_ids) {
            let Some(link) = item.link.as_deref() else {
                tracing::debug!(date = %item.date, opponent = %item.opponent, "No result link");
                continue;
            };
            match self.game_detail(link).await {
                Ok(detail) => {
                    tracing::debug!(
                        game_id = %game_id,
                        quarters = detail.quarters.len(),
                        players = detail.box_score.len(),
                        "Parsed game page"
                    );
                    tables.game_detail(game_id, &detail);
                    outcome.detailed_games += 1;
                }
                Err(e) => {
                    tracing::warn!(game_id = %game_id, url = %link, error = %e, "Skipping game");
                    outcome.skipped.push(SkippedPage {
                        kind: PageKind::Game,
                        id: game_id.clone(),
                        url: link.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        for (item, player_id) in page.roster.iter().zip(&player_ids) {
            let Some(link) = item.link.as_deref() else {
                tracing::debug!(player_id = %player_id, "No profile link");
                continue;
            };
            match self.season_log(link).await {
                Ok(lines) => {
                    let name = tables
                        .tables()
                        .players
                        .iter()
                        .find(|p| &p.player_id == player_id)
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    tables.season_log(player_id, &name, &lines);
                }
                Err(e) => {
                    tracing::warn!(
                        player_id = %player_id,
                        url = %link,
                        error = %e,
                        "Skipping player"
                    );
                    outcome.skipped.push(SkippedPage {
                        kind: PageKind::Player,
                        id: player_id.clone(),
                        url: link.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome.tables = tables.finish();
        Ok(outcome)
    }

    async fn game_detail(&self, url: &str) -> Result<GameDetail, AppError> {
        let html = self.fetcher.fetch(url).await?;
        extract_game_page(&html, &self.config.layouts.box_score)
    }

    async fn season_log(&self, url: &str) -> Result<Vec<SeasonLogLine>, AppError> {
        let html = self.fetcher.fetch(url).await?;
        extract_season_log(&html, &self.config.layouts.season_log)
    }

    /// Stored reference for an image: `""` without a URL, the remote URL
    /// when storing fails.
    async fn store_image(&self, url: Option<&str>, stem: &str) -> String {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            return String::new();
        };
        match self.images.store(url, stem).await {
            Ok(reference) => reference,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Image not stored; keeping remote URL");
                url.to_string()
            }
        }
    }
}
