//! Lingosite CLI Library
//!
//! Serves and builds the SEO artifacts of a multilingual content site:
//! sitemap with hreflang alternates, robots.txt, OpenGraph cards and the
//! newsletter signup action.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (serve, build, check)
//! - [`server`] - HTTP routes
//! - [`site`] - Configuration and paths shared by the commands
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use lingosite::cmd;
//!
//! cmd::check::run(Path::new("lingosite.toml"), false).unwrap();
//! ```

pub mod cmd;
pub mod server;
pub mod site;

pub use lingosite_core::{Config, Localizer};
pub use lingosite_generator::{BuildStats, Builder, ContentCollector, SiteContent};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
