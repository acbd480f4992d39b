//! Wallpaper providers and the registry that maps names to them.

pub mod wallhaven;

use std::collections::HashMap;

use async_trait::async_trait;

use wallmancer_core::{AppConfig, CacheDir, Error};

pub use wallhaven::WallhavenProvider;

/// What to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Free-text search with random sorting.
    Random(String),
    Hot,
    Top,
}

/// A source of wallpapers.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Select a wallpaper for `mode` and return its identifier.
    async fn resolve(&self, mode: &Mode) -> Result<String, Error>;
}

/// Providers keyed by name, built once at startup.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Box<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its own name, replacing any previous entry.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Provider> {
        self.providers.get(name).map(Box::as_ref)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Build the registry of every available provider.
pub fn registry(config: &AppConfig, cache: &CacheDir) -> Result<ProviderRegistry, Error> {
    let mut registry = ProviderRegistry::new();
    registry.register(Box::new(WallhavenProvider::from_config(config, cache)?));
    Ok(registry)
}
