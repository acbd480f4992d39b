//! Materializes a selected image in the cache directory.

use std::path::{Path, PathBuf};

use reqwest::{Client, StatusCode};

use wallmancer_core::{CacheDir, Error};

/// Downloads selected images to `<cache>/<provider>/<file name>`.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    http: Client,
    dir: CacheDir,
}

impl ImageDownloader {
    pub fn new(http: Client, dir: CacheDir) -> Self {
        Self { http, dir }
    }

    /// Download `identifier` and return the local path it was written to.
    pub async fn apply(&self, identifier: &str, provider: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(provider).join(file_name(identifier)?);

        let response = self
            .http
            .get(identifier)
            .send()
            .await
            .map_err(|e| Error::DownloadFailed { url: identifier.to_string(), message: e.to_string() })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::DownloadFailed { url: identifier.to_string(), message: format!("status {status}") });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::DownloadFailed { url: identifier.to_string(), message: e.to_string() })?;

        self.dir.write_bytes(&relative, &bytes)?;
        let output = self.dir.join(&relative);
        tracing::info!(url = identifier, path = %output.display(), bytes = bytes.len(), "downloaded wallpaper");
        Ok(output)
    }
}

/// Last non-empty path segment of an identifier URL, or the file name of a
/// plain path when the identifier is not a URL.
fn file_name(identifier: &str) -> Result<String, Error> {
    let name = match url::Url::parse(identifier) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.rfind(|s| !s.is_empty()).map(str::to_string)),
        Err(_) => Path::new(identifier)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string),
    };

    name.ok_or_else(|| Error::InvalidInput(format!("no file name in identifier: {identifier}")))
}
