use std::future::Future;

use crate::error::AppError;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Saves remote images locally.
pub trait ImageStore: Send + Sync + Clone {
    /// Store the image at `url` under the file stem `stem` and return the
    /// reference rows should carry for it.
    fn store(&self, url: &str, stem: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// An ImageStore that downloads nothing and keeps the remote URL.
#[derive(Debug, Clone)]
pub struct RemoteImages;

impl ImageStore for RemoteImages {
    async fn store(&self, url: &str, _stem: &str) -> Result<String, AppError> {
        Ok(url.to_string())
    }
}

/// Prefix of the reference rows carry for a stored image.
pub const IMAGE_REF_PREFIX: &str = "./images/";

/// Extension used when an image URL's path has none.
pub const DEFAULT_IMAGE_EXT: &str = ".jpg";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Local file name for an image: the sanitized `stem` plus the extension of
/// the URL's path, query and fragment removed.
pub fn image_file_name(url: &str, stem: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let last = path.rsplit('/').next().unwrap_or("");
    let ext = match last.rsplit_once('.') {
        Some((name, ext))
            if !name.is_empty() && !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{ext}")
        }
        _ => DEFAULT_IMAGE_EXT.to_string(),
    };
    format!("{}{ext}", sanitize_stem(stem))
}

/// The reference stored in table rows for a saved image file.
pub fn image_ref(file_name: &str) -> String {
    format!("{IMAGE_REF_PREFIX}{file_name}")
}
