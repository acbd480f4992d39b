//! Core types and shared functionality for wallmancer.
//!
//! This crate provides:
//! - Query composition with canonical signatures
//! - The file-backed query-result cache and its refetch loop
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod links;
pub mod query;
pub mod source;

pub use cache::{Bucket, CacheDir, QueryCache, Resolved};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, ConfigOverrides};
pub use error::Error;
pub use links::LinkCollector;
pub use query::{Query, Signature};
pub use source::{PageMeta, PageSource};
