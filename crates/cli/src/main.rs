//! wallmancer entry point.
//!
//! Prints the selected wallpaper identifier on stdout. Logging goes to stderr
//! so the output can be piped into other tools.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wallmancer_core::{AppConfig, CacheDir};

mod args;
mod providers;

use args::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    if let Some(output) = run(&args).await? {
        println!("{output}");
    }

    Ok(())
}

fn init_tracing(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn run(args: &Args) -> Result<Option<String>> {
    let config = AppConfig::load(&args.overrides()).context("failed to load config")?;
    tracing::debug!(
        provider = %config.provider,
        expiry = config.expiry,
        max_pages = config.max_pages,
        nsfw = config.nsfw,
        "loaded configuration"
    );

    let cache = CacheDir::open(config.cache_root()?).context("error creating cache")?;

    if args.clear {
        tracing::info!(path = %cache.root().display(), "clearing the cache");
        cache.clear().context("error deleting cache")?;
        return Ok(Some("Cache deleted".into()));
    }

    let registry = providers::registry(&config, &cache).context("failed to set up providers")?;
    let provider = registry.get(&config.provider).with_context(|| {
        format!("unknown provider: {} (available: {})", config.provider, registry.names().join(", "))
    })?;

    let Some(mode) = args.mode() else {
        tracing::info!("no search mode given; use --random, --hot or --top");
        return Ok(None);
    };

    let identifier = provider
        .resolve(&mode)
        .await
        .with_context(|| format!("{} provider failed", provider.name()))?;

    Ok(Some(identifier))
}
