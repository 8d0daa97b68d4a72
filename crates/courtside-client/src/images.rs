use std::path::{Path, PathBuf};
use std::time::Duration;

use courtside_core::error::AppError;
use courtside_core::throttle::Throttle;
use courtside_core::traits::{ImageStore, image_file_name, image_ref};
use reqwest::Client;

use crate::fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, build_client, get};

/// Spacing between image downloads unless overridden.
pub const DEFAULT_IMAGE_DELAY: Duration = Duration::from_millis(100);

/// Downloads images into a local directory.
///
/// Files are named `<stem><ext>` and overwritten on every run. The
/// returned reference is always `./images/<file>`, whatever the directory.
#[derive(Clone)]
pub struct ImageDownloader {
    client: Client,
    dir: PathBuf,
    throttle: Throttle,
    timeout_secs: u64,
}

impl ImageDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        Self::with_options(dir, DEFAULT_USER_AGENT, DEFAULT_TIMEOUT, DEFAULT_IMAGE_DELAY)
    }

    pub fn with_options(
        dir: impl Into<PathBuf>,
        user_agent: &str,
        timeout: Duration,
        delay: Duration,
    ) -> Result<Self, AppError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            dir: dir.into(),
            throttle: Throttle::new(delay),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageStore for ImageDownloader {
    async fn store(&self, url: &str, stem: &str) -> Result<String, AppError> {
        self.throttle.wait(url).await;

        let file_name = image_file_name(url, stem);
        let response = get(&self.client, url, self.timeout_secs).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read image body: {e}")))?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), &bytes).await?;
        tracing::debug!(url = %url, file = %file_name, bytes = bytes.len(), "Saved image");

        Ok(image_ref(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;

    use super::*;
    use crate::test_server::{image, serve};

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

    fn downloader(dir: &Path) -> ImageDownloader {
        ImageDownloader::with_options(dir, DEFAULT_USER_AGENT, Duration::from_secs(5), Duration::ZERO)
            .unwrap()
    }

    #[tokio::test]
    async fn saves_file_and_returns_local_reference() {
        let base = serve(image("/team/logo.png", PNG)).await;
        let tmp = tempfile::tempdir().unwrap();
        let images = downloader(&tmp.path().join("images"));

        let reference = images
            .store(&format!("{base}/team/logo.png"), "team_logo")
            .await
            .unwrap();

        assert_eq!(reference, "./images/team_logo.png");
        let saved = std::fs::read(tmp.path().join("images/team_logo.png")).unwrap();
        assert_eq!(saved, PNG);
    }

    #[tokio::test]
    async fn query_is_not_part_of_extension() {
        let base = serve(image("/cover.jpeg", PNG)).await;
        let tmp = tempfile::tempdir().unwrap();
        let images = downloader(tmp.path());

        let reference = images
            .store(&format!("{base}/cover.jpeg?v=3"), "team_cover")
            .await
            .unwrap();
        assert_eq!(reference, "./images/team_cover.jpeg");
        assert!(tmp.path().join("team_cover.jpeg").exists());
    }

    #[tokio::test]
    async fn missing_extension_defaults_to_jpg() {
        let base = serve(image("/photo", PNG)).await;
        let tmp = tempfile::tempdir().unwrap();

        let reference = downloader(tmp.path())
            .store(&format!("{base}/photo"), "player_0_2")
            .await
            .unwrap();
        assert_eq!(reference, "./images/player_0_2.jpg");
    }

    #[tokio::test]
    async fn stem_cannot_escape_images_dir() {
        let base = serve(image("/p.png", PNG)).await;
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("images");

        let reference = downloader(&dir)
            .store(&format!("{base}/p.png"), "../player_1_0")
            .await
            .unwrap();
        assert_eq!(reference, "./images/___player_1_0.png");
        assert!(dir.join("___player_1_0.png").exists());
        assert!(!tmp.path().join("player_1_0.png").exists());
    }

    #[tokio::test]
    async fn failed_download_writes_nothing() {
        let base = serve(Router::new()).await;
        let tmp = tempfile::tempdir().unwrap();
        let images = downloader(&tmp.path().join("images"));

        let err = images
            .store(&format!("{base}/gone.png"), "team_logo")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HTTP 404"));
        assert!(!tmp.path().join("images/team_logo.png").exists());
    }
}
