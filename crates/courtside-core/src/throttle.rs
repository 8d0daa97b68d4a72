//! Per-host request spacing.
//!
//! A [`Throttle`] hands out request slots per host, spaced by its delay.
//! [`ThrottledFetcher`] wraps any [`Fetcher`] with one for detail pages; the
//! image downloader keeps its own, shorter one.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use courtside_core::throttle::{Throttle, ThrottledFetcher};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! # use courtside_core::traits::Fetcher;
//! # #[derive(Clone)] struct MyFetcher;
//! # impl Fetcher for MyFetcher {
//! #     async fn fetch(&self, _: &str) -> Result<String, courtside_core::error::AppError> { todo!() }
//! # }
//! let fetcher = ThrottledFetcher::new(MyFetcher, Throttle::new(Duration::from_millis(500)));
//! let html = fetcher.fetch("https://basketball.biji.co/index.php?id=1").await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use url::Url;

use crate::error::AppError;
use crate::traits::Fetcher;

/// Minimum spacing between consecutive requests to the same host.
///
/// Each host gets a queue of request slots `delay` apart: a caller takes
/// the next free slot and sleeps until it comes up. Clones share the slots.
#[derive(Clone)]
pub struct Throttle {
    delay: Duration,
    /// Earliest instant the next request to each host may go out.
    next_slot: Arc<Mutex<HashMap<String, Instant>>>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_slot: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// `scheme://host:port` of `url`, with the scheme's default port filled in.
    fn host_key(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        let port = url.port_or_known_default()?;
        Some(format!("{}://{host}:{port}", url.scheme()))
    }

    /// Reserve the next slot for `url`'s host and sleep until it arrives.
    /// URLs without a host are not throttled.
    pub async fn wait(&self, url: &str) {
        let Some(host) = Self::host_key(url) else {
            return;
        };
        let now = Instant::now();
        let slot = {
            let mut next = self.next_slot.lock().await;
            let slot = next.get(&host).copied().filter(|t| *t > now).unwrap_or(now);
            next.insert(host.clone(), slot + self.delay);
            slot
        };
        if slot > now {
            tracing::debug!(host = %host, wait_ms = %(slot - now).as_millis(), "Throttling request");
            tokio::time::sleep_until(slot.into()).await;
        }
    }
}

impl Default for Throttle {
    /// 500ms, the spacing used between detail-page requests.
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

/// A [`Fetcher`] wrapper that enforces per-domain throttling.
#[derive(Clone)]
pub struct ThrottledFetcher<F> {
    inner: F,
    throttle: Throttle,
}

impl<F: Fetcher> ThrottledFetcher<F> {
    /// Wrap an existing fetcher with throttling.
    pub fn new(inner: F, throttle: Throttle) -> Self {
        Self { inner, throttle }
    }
}

impl<F: Fetcher> Fetcher for ThrottledFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.throttle.wait(url).await;
        self.inner.fetch(url).await
    }
}
