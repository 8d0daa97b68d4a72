use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use courtside_client::{ImageDownloader, ReqwestFetcher};
use courtside_core::config::{DEFAULT_BASE_URL, DEFAULT_SEASON_ID, DEFAULT_TEAM_ID, Layouts, RunConfig};
use courtside_core::scrape::{ScrapeOutcome, TeamScrapeService};
use courtside_core::traits::{ImageStore, RemoteImages};
use courtside_store::{CsvTableWriter, WrittenTable};

#[derive(Parser)]
#[command(name = "courtside", version, about = "Basketball team page scraper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a saved team page and the pages it links to into CSV tables
    Scrape(ScrapeArgs),

    /// Print the default column layouts as JSON (a starting point for --layout)
    Layout,
}

#[derive(clap::Args, Debug)]
struct ScrapeArgs {
    /// Path to the saved team page HTML
    page: PathBuf,

    /// Directory the CSV tables are written to
    #[arg(long, env = "COURTSIDE_OUT_DIR", default_value = "data")]
    out_dir: PathBuf,

    /// Directory downloaded images are saved to
    #[arg(long, env = "COURTSIDE_IMAGES_DIR", default_value = "images")]
    images_dir: PathBuf,

    /// Id of the team the page belongs to
    #[arg(long, env = "COURTSIDE_TEAM_ID", default_value = DEFAULT_TEAM_ID)]
    team_id: String,

    /// Season id stamped on every game row
    #[arg(long, env = "COURTSIDE_SEASON_ID", default_value = DEFAULT_SEASON_ID)]
    season_id: String,

    /// Site root that relative links are resolved against
    #[arg(long, env = "COURTSIDE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// User-Agent header for every request
    #[arg(long, env = "COURTSIDE_USER_AGENT", default_value = courtside_client::fetcher::DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Delay between detail-page requests, in milliseconds
    #[arg(long, env = "COURTSIDE_PAGE_DELAY_MS", default_value_t = 500)]
    page_delay_ms: u64,

    /// Delay between image downloads, in milliseconds
    #[arg(long, env = "COURTSIDE_IMAGE_DELAY_MS", default_value_t = 100)]
    image_delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "COURTSIDE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// JSON file overriding the statistics table column layouts
    #[arg(long, env = "COURTSIDE_LAYOUT")]
    layout: Option<PathBuf>,

    /// Keep remote image URLs instead of downloading
    #[arg(long, default_value_t = false)]
    no_images: bool,

    /// Also write player_season_logs.csv
    #[arg(long, default_value_t = false)]
    season_logs: bool,
}

impl ScrapeArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let layouts = match &self.layout {
            Some(path) => Layouts::load(path)
                .with_context(|| format!("Invalid layout file: {}", path.display()))?,
            None => Layouts::default(),
        };
        Ok(RunConfig::default()
            .with_team_id(&self.team_id)
            .with_season_id(&self.season_id)
            .with_base_url(&self.base_url)
            .with_page_delay(Duration::from_millis(self.page_delay_ms))
            .with_image_delay(Duration::from_millis(self.image_delay_ms))
            .with_layouts(layouts))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("courtside=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape(args) => cmd_scrape(&args).await?,
        Commands::Layout => {
            println!("{}", Layouts::default().to_json_pretty()?);
        }
    }

    Ok(())
}

async fn cmd_scrape(args: &ScrapeArgs) -> Result<()> {
    let config = args.run_config()?;
    let html = std::fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read team page: {}", args.page.display()))?;

    let timeout = Duration::from_secs(args.timeout_secs);
    let fetcher =
        ReqwestFetcher::with_options(&args.user_agent, timeout).context("Failed to create HTTP client")?;

    let outcome = if args.no_images {
        scrape_with(fetcher, RemoteImages, config, &html).await?
    } else {
        let images = ImageDownloader::with_options(
            &args.images_dir,
            &args.user_agent,
            timeout,
            config.image_delay,
        )
        .context("Failed to create image downloader")?;
        scrape_with(fetcher, images, config, &html).await?
    };

    let writer = CsvTableWriter::new(&args.out_dir);
    let written = writer
        .write_all(&outcome.tables, args.season_logs)
        .with_context(|| format!("Failed to write tables to {}", args.out_dir.display()))?;

    log_summary(&outcome, &written, writer.dir());
    Ok(())
}

async fn scrape_with<I: ImageStore>(
    fetcher: ReqwestFetcher,
    images: I,
    config: RunConfig,
    html: &str,
) -> Result<ScrapeOutcome> {
    let service = TeamScrapeService::new(fetcher, images, config);
    service.run(html).await.context("Failed to parse team page")
}

fn log_summary(outcome: &ScrapeOutcome, written: &[WrittenTable], dir: &Path) {
    let tables = &outcome.tables;
    tracing::info!(
        players = tables.players.len(),
        games = tables.games.len(),
        detailed_games = outcome.detailed_games,
        season_log_rows = tables.season_logs.len(),
        skipped = outcome.skipped.len(),
        out_dir = %dir.display(),
        "Scrape complete"
    );
    for table in written {
        tracing::info!(
            table = table.table,
            rows = table.rows,
            sha256 = %&table.digest[..12],
            "Table written"
        );
    }
    for page in &outcome.skipped {
        tracing::info!(kind = %page.kind, id = %page.id, reason = %page.reason, "Skipped page");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ScrapeArgs {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Scrape(args) => args,
            Commands::Layout => panic!("expected scrape"),
        }
    }

    #[test]
    fn scrape_defaults() {
        let args = parse(&["courtside", "scrape", "team.html"]);
        assert_eq!(args.page, PathBuf::from("team.html"));
        assert!(!args.no_images);
        assert!(!args.season_logs);

        let config = args.run_config().unwrap();
        assert_eq!(config.page_delay, Duration::from_millis(args.page_delay_ms));
        assert_eq!(config.layouts, Layouts::default());
    }

    #[test]
    fn scrape_flags() {
        let args = parse(&[
            "courtside",
            "scrape",
            "team.html",
            "--team-id",
            "thunder",
            "--season-id",
            "2025-q2",
            "--base-url",
            "https://example.com/",
            "--page-delay-ms",
            "0",
            "--no-images",
            "--season-logs",
        ]);
        assert!(args.no_images);
        assert!(args.season_logs);

        let config = args.run_config().unwrap();
        assert_eq!(config.team_id, "thunder");
        assert_eq!(config.season_id, "2025-q2");
        assert_eq!(config.base_url, "https://example.com");
        assert_eq!(config.page_delay, Duration::ZERO);
    }

    #[test]
    fn missing_layout_file_is_an_error() {
        let args = parse(&["courtside", "scrape", "team.html", "--layout", "/nonexistent/layout.json"]);
        let err = args.run_config().unwrap_err();
        assert!(format!("{err:#}").contains("layout"));
    }

    #[test]
    fn layout_subcommand_parses() {
        let cli = Cli::try_parse_from(["courtside", "layout"]).unwrap();
        assert!(matches!(cli.command, Commands::Layout));
    }
}
