//! Lingosite Generator Library
//!
//! SEO artifact generation for Lingosite sites.
//!
//! # Modules
//!
//! - [`collector`] - Content collection and translation grouping
//! - [`sitemap`] - XML sitemap with hreflang alternates
//! - [`robots`] - robots.txt generation
//! - [`opengraph`] - OpenGraph card images
//! - [`build`] - Build orchestration

pub mod build;
pub mod collector;
pub mod opengraph;
pub mod robots;
pub mod sitemap;

pub use build::{BuildStats, Builder};
pub use collector::{ContentCollector, ContentGroup, ContentIssue, SiteContent};
pub use opengraph::{FontSource, OpenGraphError, OpenGraphRenderer};
pub use robots::RobotsGenerator;
pub use sitemap::SitemapGenerator;
