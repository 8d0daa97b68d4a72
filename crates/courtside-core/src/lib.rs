pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod identity;
pub mod models;
pub mod scrape;
pub mod throttle;
pub mod traits;

#[cfg(any(test, feature = "test-util"))]
pub mod testutil;

pub use assemble::TableAssembler;
pub use config::{Layouts, RunConfig};
pub use error::AppError;
pub use models::{EntityId, TableRow, Tables, compute_hash};
pub use scrape::{ScrapeOutcome, TeamScrapeService};
pub use traits::{Fetcher, ImageStore, RemoteImages};
