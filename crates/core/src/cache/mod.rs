//! File-backed query-result cache.
//!
//! Each provider owns a directory holding one result file per [`Bucket`]
//! (one identifier per line) plus a `last_query` file with the canonical
//! signature of the query behind the signature-sensitive bucket. File
//! modification times anchor freshness.

pub mod bucket;
pub mod dir;
pub mod resolve;
pub mod select;

pub use bucket::{Bucket, SIGNATURE_FILE};
pub use dir::CacheDir;
pub use resolve::{CacheCheck, DEFAULT_MAX_PAGES, DEFAULT_TTL, MissReason, Outcome, QueryCache, Resolved};
pub use select::pick_random;
