//! wallhaven.cc provider.

use std::sync::Arc;

use async_trait::async_trait;

use wallmancer_client::{FetcherConfig, ImageDownloader, WallhavenFetcher};
use wallmancer_core::cache::Bucket;
use wallmancer_core::{AppConfig, CacheDir, Error, Query, QueryCache};

use super::{Mode, Provider};

/// Length of generated random-sort seeds.
const SEED_LEN: usize = 6;

/// File recording the last applied identifier and its local path.
const CURRENT_FILE: &str = "current";

/// Settings that shape the search query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub base_url: String,
    pub apikey: Option<String>,
    pub nsfw: bool,
    pub seed: Option<String>,
}

impl From<&AppConfig> for SearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            apikey: config.apikey.clone(),
            nsfw: config.nsfw,
            seed: config.seed.clone(),
        }
    }
}

pub struct WallhavenProvider {
    options: SearchOptions,
    cache: QueryCache,
    downloader: ImageDownloader,
}

impl WallhavenProvider {
    pub const NAME: &'static str = "wallhaven";

    pub fn new(options: SearchOptions, cache: QueryCache, downloader: ImageDownloader) -> Self {
        Self { options, cache, downloader }
    }

    /// Wire the HTTP fetcher, query cache and downloader under `cache/wallhaven`.
    pub fn from_config(config: &AppConfig, cache: &CacheDir) -> Result<Self, Error> {
        let fetcher =
            WallhavenFetcher::new(&FetcherConfig { user_agent: config.user_agent.clone(), timeout: config.timeout() })?;
        let downloader = ImageDownloader::new(fetcher.http().clone(), cache.clone());
        let query_cache = QueryCache::new(cache.subdir(Self::NAME)?, Arc::new(fetcher))
            .with_ttl(config.ttl())
            .with_max_pages(config.max_pages);

        Ok(Self::new(SearchOptions::from(config), query_cache, downloader))
    }
}

#[async_trait]
impl Provider for WallhavenProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn resolve(&self, mode: &Mode) -> Result<String, Error> {
        let (query, bucket) = compose_query(&self.options, mode);
        tracing::debug!(bucket = %bucket, signature = %query.signature(), "composed search query");

        let resolved = self.cache.resolve(&query, bucket).await?;
        let output = self.downloader.apply(&resolved.identifier, Self::NAME).await?;

        self.cache
            .dir()
            .write_string(CURRENT_FILE, &format!("{}\n{}", resolved.identifier, output.display()))?;

        Ok(resolved.identifier)
    }
}

/// Build the search query for `mode` and the bucket its results belong in.
pub fn compose_query(options: &SearchOptions, mode: &Mode) -> (Query, Bucket) {
    let mut query = Query::new(options.base_url.as_str());

    let seed = options.seed.clone().unwrap_or_else(|| generate_seed(SEED_LEN));
    query.add_string("seed", &seed);

    if let Some(apikey) = &options.apikey {
        query.add_string("apikey", apikey);
    }

    query.set_string("purity", if options.nsfw { "111" } else { "100" });

    let bucket = match mode {
        Mode::Random(terms) => {
            query.set_string("sorting", "random");
            query.add_string("q", terms);
            Bucket::Random
        }
        Mode::Hot => {
            query.set_string("sorting", "hot");
            Bucket::Hot
        }
        Mode::Top => {
            query.set_string("sorting", "toplist");
            Bucket::Top
        }
    };

    (query, bucket)
}

/// Random alphanumeric seed for wallhaven's random sorting.
pub fn generate_seed(len: usize) -> String {
    std::iter::repeat_with(fastrand::alphanumeric).take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> SearchOptions {
        SearchOptions {
            base_url: "https://wallhaven.cc/api/v1/search".into(),
            apikey: None,
            nsfw: false,
            seed: Some("abc123".into()),
        }
    }

    #[test]
    fn test_random_query() {
        let (query, bucket) = compose_query(&options(), &Mode::Random("misty forest".into()));

        assert_eq!(bucket, Bucket::Random);
        assert_eq!(
            query.build(),
            "https://wallhaven.cc/api/v1/search?purity=100&q=misty+forest&seed=abc123&sorting=random"
        );
    }

    #[test]
    fn test_hot_and_top_buckets() {
        let (query, bucket) = compose_query(&options(), &Mode::Hot);
        assert_eq!(bucket, Bucket::Hot);
        assert_eq!(query.get_string("sorting"), Some("hot"));
        assert!(!query.has("q"));

        let (query, bucket) = compose_query(&options(), &Mode::Top);
        assert_eq!(bucket, Bucket::Top);
        assert_eq!(query.get_string("sorting"), Some("toplist"));
    }

    #[test]
    fn test_nsfw_purity() {
        let options = SearchOptions { nsfw: true, ..options() };
        let (query, _) = compose_query(&options, &Mode::Hot);
        assert_eq!(query.get_all("purity"), ["111"]);
    }

    #[test]
    fn test_signature_stable_across_seeds_and_keys() {
        let first = SearchOptions { seed: None, apikey: Some("one".into()), ..options() };
        let second = SearchOptions { seed: None, apikey: Some("two".into()), ..options() };
        let mode = Mode::Random("cats".into());

        let (a, _) = compose_query(&first, &mode);
        let (b, _) = compose_query(&second, &mode);

        assert_ne!(a.get_string("seed"), None);
        assert_eq!(a.signature(), b.signature());
        assert!(!a.signature().as_str().contains("apikey"));
    }

    #[test]
    fn test_generate_seed() {
        let seed = generate_seed(SEED_LEN);
        assert_eq!(seed.len(), SEED_LEN);
        assert!(seed.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
