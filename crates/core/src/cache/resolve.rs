//! Cache-or-refetch decision engine.
//!
//! [`QueryCache::resolve`] answers one question: can the result set already
//! on disk for a bucket serve this query? If so a random entry is picked
//! from it. Otherwise every page up to the configured cap is fetched into a
//! [`LinkCollector`], the list is persisted, and the pick is made from the
//! fresh file.
//!
//! For signature-sensitive buckets the stored signature is blanked before the
//! result list is rewritten and set to the new signature only afterwards. A
//! failed page fetch writes nothing; an interruption between the two writes
//! leaves an empty marker, which is a miss for every query.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::bucket::{Bucket, SIGNATURE_FILE};
use super::dir::CacheDir;
use super::select::pick_random;
use crate::clock::{Clock, SystemClock};
use crate::{Error, LinkCollector, PageMeta, PageSource, Query, Signature};

/// Default time-to-live for a bucket's result list: 10 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Default cap on pages fetched per refetch.
pub const DEFAULT_MAX_PAGES: u32 = 5;

/// Why a cache check fell through to a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    NoSignature,
    QueryChanged,
    NoResults,
    Expired,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissReason::NoSignature => "no stored query signature",
            MissReason::QueryChanged => "query changed",
            MissReason::NoResults => "no cached results",
            MissReason::Expired => "cached results expired",
        })
    }
}

/// Outcome of a cache check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheCheck {
    Hit,
    Miss(MissReason),
}

/// How a resolved identifier was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CacheHit,
    Refetched { pages: u32, links: usize },
}

/// A selected identifier and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub identifier: String,
    pub outcome: Outcome,
}

impl Resolved {
    pub fn is_cache_hit(&self) -> bool {
        self.outcome == Outcome::CacheHit
    }
}

/// Query-result cache over one provider's cache directory.
pub struct QueryCache {
    dir: CacheDir,
    source: Arc<dyn PageSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    max_pages: u32,
}

impl QueryCache {
    pub fn new(dir: CacheDir, source: Arc<dyn PageSource>) -> Self {
        Self { dir, source, clock: Arc::new(SystemClock), ttl: DEFAULT_TTL, max_pages: DEFAULT_MAX_PAGES }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cap on pages per refetch; values below 1 are raised to 1.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn dir(&self) -> &CacheDir {
        &self.dir
    }

    pub fn result_path(&self, bucket: Bucket) -> PathBuf {
        self.dir.join(bucket.name())
    }

    /// Resolve `query` against `bucket`, hitting the cache when possible.
    ///
    /// # Errors
    ///
    /// - `EmptyCache` if a fresh result file has no usable lines
    /// - `NoResults` if the first page of a refetch is empty
    /// - `PageFetch` wrapping `Network`, `HttpStatus` or `Decode` from any page
    /// - `CacheIo` if persisting the result list fails
    pub async fn resolve(&self, query: &Query, bucket: Bucket) -> Result<Resolved, Error> {
        let signature = bucket.is_signature_sensitive().then(|| query.signature());

        match self.check(bucket, signature.as_ref()) {
            CacheCheck::Hit => {
                tracing::info!(bucket = %bucket, "using cached results");
                let identifier = self.select_cached(bucket)?;
                return Ok(Resolved { identifier, outcome: Outcome::CacheHit });
            }
            CacheCheck::Miss(reason) => {
                tracing::info!(bucket = %bucket, %reason, "fetching new query results");
            }
        }

        let (pages, links) = self.refetch(query, bucket, signature.as_ref()).await?;
        let identifier = pick_random(&self.result_path(bucket))?;
        Ok(Resolved { identifier, outcome: Outcome::Refetched { pages, links } })
    }

    /// Decide whether the bucket's cached result set can serve `signature`.
    ///
    /// Absence, staleness and unreadable signature files are all misses.
    pub fn check(&self, bucket: Bucket, signature: Option<&Signature>) -> CacheCheck {
        if let Some(signature) = signature {
            let stored = match self.dir.read_string(SIGNATURE_FILE) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!(bucket = %bucket, error = %e, "failed to read stored signature");
                    None
                }
            };

            match stored.as_deref().map(str::trim) {
                None | Some("") => return CacheCheck::Miss(MissReason::NoSignature),
                Some(stored) if stored != signature.as_str() => return CacheCheck::Miss(MissReason::QueryChanged),
                Some(_) => {}
            }
        }

        let path = self.result_path(bucket);
        if self.dir.is_fresh(&path, self.ttl, self.clock.now()) {
            CacheCheck::Hit
        } else if path.exists() {
            CacheCheck::Miss(MissReason::Expired)
        } else {
            CacheCheck::Miss(MissReason::NoResults)
        }
    }

    fn select_cached(&self, bucket: Bucket) -> Result<String, Error> {
        pick_random(&self.result_path(bucket)).map_err(|e| match e {
            Error::EmptyFile(_) => Error::EmptyCache { bucket: bucket.to_string() },
            other => other,
        })
    }

    /// Fetch pages `1..=min(last_page, max_pages)` and persist the aggregate.
    ///
    /// Any page error aborts before anything is written.
    async fn refetch(
        &self, query: &Query, bucket: Bucket, signature: Option<&Signature>,
    ) -> Result<(u32, usize), Error> {
        let links = LinkCollector::new();
        let first = self.fetch_page(query, bucket, 1, &links).await?;

        if links.is_empty() {
            if signature.is_some() {
                self.dir.write_string(SIGNATURE_FILE, "")?;
            }
            return Err(Error::NoResults { bucket: bucket.to_string(), url: query.redacted() });
        }

        let last_page = first.last_page.min(self.max_pages).max(1);
        tracing::debug!(
            bucket = %bucket,
            total = first.total,
            reported_last_page = first.last_page,
            last_page,
            "fetched first page"
        );

        let mut page_query = query.clone();
        for page in 2..=last_page {
            page_query.set_int("page", i64::from(page));
            self.fetch_page(&page_query, bucket, page, &links).await?;
            tracing::debug!(bucket = %bucket, page, collected = links.count(), "fetched page");
        }

        let links = links.into_links();
        self.store_results(bucket, &links, signature.is_some())?;
        if let Some(signature) = signature {
            self.dir.write_string(SIGNATURE_FILE, signature.as_str())?;
        }

        tracing::info!(bucket = %bucket, pages = last_page, links = links.len(), "cached query results");
        Ok((last_page, links.len()))
    }

    async fn fetch_page(
        &self, query: &Query, bucket: Bucket, page: u32, links: &LinkCollector,
    ) -> Result<PageMeta, Error> {
        self.source.fetch_page(query, links).await.map_err(|e| {
            tracing::warn!(bucket = %bucket, page, error = %e, "page fetch failed; aborting refetch");
            Error::PageFetch { bucket: bucket.to_string(), page, source: Box::new(e) }
        })
    }

    /// Rewrite the bucket's result list, blanking the stored signature first
    /// when the bucket is signature-sensitive.
    fn store_results(&self, bucket: Bucket, links: &[String], signature_sensitive: bool) -> Result<(), Error> {
        if signature_sensitive {
            self.dir.write_string(SIGNATURE_FILE, "")?;
        }
        self.dir.write_lines(bucket.name(), links)
    }
}
