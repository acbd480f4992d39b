//! HTTP client code for wallmancer.
//!
//! This crate provides the wallhaven.cc search page fetcher used by the
//! query cache, and the downloader that materializes a selected image in
//! the cache directory.

pub mod download;
pub mod wallhaven;

pub use download::ImageDownloader;
pub use wallhaven::{FetcherConfig, WallhavenFetcher};

#[cfg(test)]
mod test_support;
