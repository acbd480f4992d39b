//! Command line flags.

use clap::Parser;

use wallmancer_core::ConfigOverrides;

use crate::providers::Mode;

#[derive(Debug, Parser)]
#[command(name = "wallmancer")]
#[command(about = "Pick a random wallpaper from cached wallhaven.cc search results")]
#[command(version)]
pub struct Args {
    /// Wallpaper provider
    #[arg(long)]
    pub provider: Option<String>,

    /// wallhaven.cc username (accepted for compatibility, currently unused)
    #[arg(long)]
    pub username: Option<String>,

    /// wallhaven.cc API key
    #[arg(long)]
    pub apikey: Option<String>,

    /// Fetch NSFW images
    #[arg(long)]
    pub nsfw: bool,

    /// Cache expiry in seconds
    #[arg(long)]
    pub expiry: Option<u64>,

    /// Maximum result pages fetched per query
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Clear the wallmancer cache
    #[arg(long)]
    pub clear: bool,

    /// Query for a random wallpaper
    #[arg(long, value_name = "QUERY")]
    pub random: Option<String>,

    /// Pick from the hot list
    #[arg(long)]
    pub hot: bool,

    /// Pick from the toplist
    #[arg(long)]
    pub top: bool,

    /// Random seed for search
    #[arg(long)]
    pub seed: Option<String>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Flag values that override config file and environment settings.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider.clone(),
            apikey: self.apikey.clone(),
            username: self.username.clone(),
            nsfw: self.nsfw.then_some(true),
            seed: self.seed.clone(),
            expiry: self.expiry,
            max_pages: self.max_pages,
        }
    }

    /// Selected search mode. `--top` wins over `--hot`, which wins over `--random`.
    pub fn mode(&self) -> Option<Mode> {
        if self.top {
            Some(Mode::Top)
        } else if self.hot {
            Some(Mode::Hot)
        } else {
            self.random
                .as_deref()
                .filter(|terms| !terms.is_empty())
                .map(|terms| Mode::Random(terms.to_string()))
        }
    }
}
