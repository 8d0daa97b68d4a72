use std::time::Duration;

use courtside_core::config::RunConfig;
use courtside_core::models::Tables;
use courtside_core::scrape::TeamScrapeService;
use courtside_core::testutil::{BASE_URL, MockFetcher, MockImageStore, TEAM_PAGE, fixture_fetcher};

/// Run the scrape service over the HTML fixtures.
pub async fn fixture_tables() -> Tables {
    run_with(fixture_fetcher()).await
}

pub async fn run_with(fetcher: MockFetcher) -> Tables {
    let config = RunConfig::default()
        .with_base_url(BASE_URL)
        .with_page_delay(Duration::ZERO);
    TeamScrapeService::new(fetcher, MockImageStore::new(), config)
        .run(TEAM_PAGE)
        .await
        .expect("fixture run should succeed")
        .tables
}

/// Rows of a written CSV file, header included.
pub fn read_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("table file should exist");
    rdr.records()
        .map(|r| r.expect("valid csv").iter().map(str::to_string).collect())
        .collect()
}
