//! Robots.txt generation.
//!
//! Generates the robots.txt file for search engine crawlers.

use std::{fmt::Write as _, fs, path::Path};

use lingosite_core::Config;
use thiserror::Error;
use tracing::info;

/// Robots generation errors.
#[derive(Debug, Error)]
pub enum RobotsError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for robots generation.
pub type Result<T> = std::result::Result<T, RobotsError>;

/// Robots.txt generator.
#[derive(Debug)]
pub struct RobotsGenerator<'a> {
    config: &'a Config,
}

impl<'a> RobotsGenerator<'a> {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render robots.txt.
    pub fn generate(&self) -> String {
        let robots = &self.config.robots;
        let mut out = String::from("User-agent: *\n");

        // Writing into a String cannot fail.
        for path in &robots.allow {
            let _ = writeln!(out, "Allow: {path}");
        }
        for path in &robots.disallow {
            let _ = writeln!(out, "Disallow: {path}");
        }

        let _ = write!(out, "\nSitemap: {}\n", self.config.url_for("sitemap.xml"));
        out
    }

    /// Write robots.txt into `output_dir`. Does nothing when disabled.
    pub fn write(&self, output_dir: &Path) -> Result<()> {
        if !self.config.robots.enabled {
            return Ok(());
        }

        info!("generating robots.txt");
        fs::write(output_dir.join("robots.txt"), self.generate())?;
        Ok(())
    }
}
