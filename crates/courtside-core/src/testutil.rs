//! Test utilities: mock implementations of the core traits and HTML
//! fixtures for the three page kinds.
//!
//! Mocks use `Arc<Mutex<_>>` so clones share state and tests can assert on
//! recorded calls after handing a clone to the service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::traits::{Fetcher, ImageStore, image_file_name, image_ref};

/// Base URL the fixtures' links resolve against.
pub const BASE_URL: &str = "https://basketball.biji.co";

/// Team page: header, averages, a three-player roster and three games.
pub const TEAM_PAGE: &str = include_str!("../fixtures/team.html");

/// Game result page: quarter table and home box score.
pub const GAME_PAGE: &str = include_str!("../fixtures/game.html");

/// Player page with a three-row season log.
pub const PLAYER_PAGE: &str = include_str!("../fixtures/player.html");

/// Absolute result link as it appears after resolving the team page.
pub fn game_url(id: u32) -> String {
    format!("{BASE_URL}/index.php?q=game&act=result&id={id}")
}

/// Absolute profile link as it appears after resolving the team page.
pub fn player_url(id: u32) -> String {
    format!("{BASE_URL}/index.php?q=tools&act=player-info&id={id}")
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

type Response = Result<String, String>;

/// Mock fetcher with per-URL canned responses.
///
/// Unrouted URLs get the fallback response, or an HTTP 404 error when there
/// is none. Error responses surface as [`AppError::HttpError`].
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<HashMap<String, Response>>>,
    fallback: Option<Response>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Every URL returns `html`.
    pub fn new(html: &str) -> Self {
        Self {
            fallback: Some(Ok(html.to_string())),
            ..Self::default()
        }
    }

    /// No fallback: only routed URLs succeed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every URL fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fallback: Some(Err(message.to_string())),
            ..Self::default()
        }
    }

    pub fn route(self, url: &str, html: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn route_error(self, url: &str, message: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.requests.lock().unwrap().push(url.to_string());
        let routed = self.routes.lock().unwrap().get(url).cloned();
        match routed.or_else(|| self.fallback.clone()) {
            Some(Ok(html)) => Ok(html),
            Some(Err(message)) => Err(AppError::HttpError(message)),
            None => Err(AppError::HttpError(format!("HTTP 404 Not Found for {url}"))),
        }
    }
}

/// Fetcher serving the game fixture for games 1001/1002 and the player
/// fixture for players 501/502, matching the links on [`TEAM_PAGE`].
pub fn fixture_fetcher() -> MockFetcher {
    MockFetcher::empty()
        .route(&game_url(1001), GAME_PAGE)
        .route(&game_url(1002), GAME_PAGE)
        .route(&player_url(501), PLAYER_PAGE)
        .route(&player_url(502), PLAYER_PAGE)
}

// ---------------------------------------------------------------------------
// MockImageStore
// ---------------------------------------------------------------------------

/// Mock image store that records calls and returns local references
/// without touching disk.
#[derive(Clone, Default)]
pub struct MockImageStore {
    fail: bool,
    stored: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every store call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(url, stem)` pairs passed to `store`, in order.
    pub fn stored(&self) -> Vec<(String, String)> {
        self.stored.lock().unwrap().clone()
    }
}

impl ImageStore for MockImageStore {
    async fn store(&self, url: &str, stem: &str) -> Result<String, AppError> {
        self.stored
            .lock()
            .unwrap()
            .push((url.to_string(), stem.to_string()));
        if self.fail {
            return Err(AppError::HttpError(format!("image download failed: {url}")));
        }
        Ok(image_ref(&image_file_name(url, stem)))
    }
}
