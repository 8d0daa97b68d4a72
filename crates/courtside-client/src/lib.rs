pub mod fetcher;
pub mod images;

#[cfg(test)]
mod test_server;

pub use fetcher::ReqwestFetcher;
pub use images::ImageDownloader;
