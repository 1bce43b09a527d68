//! Vinyl Catalog Library
//!
//! Reconciles a seed record list with live snapshots and runs search and
//! filter queries over the merged collection.

pub mod catalog;
pub mod config;
pub mod render;
pub mod session;
pub mod sources;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export commonly used types for convenience
pub use catalog::{
    classify_value, reconcile, run_query, FilterState, FilterUpdate, MergedRecord,
    MergedRecordSet, Record, ValuationConfig, ValueTier,
};
pub use config::{AppConfig, SourceArgs};
pub use render::{JsonRenderer, OutputFormat, Renderer, TableRenderer};
pub use session::{CollectionSession, FilterCommand, RenderPolicy, SessionDriver};
pub use sources::{LiveFeed, LiveSource, SeedLoader, SourceError, Subscription};

/// Installs the global tracing subscriber, logging to stderr.
///
/// The level defaults to INFO and is read from `LOG_LEVEL`.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")
}
