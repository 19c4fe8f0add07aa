//! Build orchestration.
//!
//! Writes the static SEO artifacts: sitemap, its stylesheet, robots.txt and
//! one OpenGraph card per page.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use lingosite_core::{Config, EntryKind, Localizer};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    collector::{CollectorError, ContentCollector, SiteContent},
    opengraph::{self, OpenGraphError},
    robots::{RobotsError, RobotsGenerator},
    sitemap::{SitemapError, SitemapGenerator, generate_sitemap_xsl},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Robots generation error.
    #[error("robots error: {0}")]
    Robots(#[from] RobotsError),

    /// OpenGraph generation error.
    #[error("OpenGraph error for {id}: {source}")]
    OpenGraph {
        id: String,
        #[source]
        source: OpenGraphError,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Entries collected.
    pub entries: usize,

    /// `<url>` elements written to the sitemap.
    pub sitemap_urls: usize,

    /// OpenGraph cards written.
    pub opengraph_images: usize,

    /// Content files that failed to parse.
    pub failures: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    localizer: Localizer,
    content_dir: PathBuf,
    output_dir: PathBuf,
    font: Option<Arc<[u8]>>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        localizer: Localizer,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            localizer,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            font: None,
        }
    }

    /// Font used for OpenGraph cards. Without one, cards are skipped.
    #[must_use]
    pub fn with_font(mut self, font: Arc<[u8]>) -> Self {
        self.font = Some(font);
        self
    }

    /// Execute the full build.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        fs::create_dir_all(&self.output_dir)?;

        let collector = ContentCollector::new(self.config.clone(), &self.content_dir);
        let content = collector.collect()?;
        stats.entries = content.len();
        stats.failures = content.failures.len();

        stats.sitemap_urls = self.write_sitemap(&content)?;
        RobotsGenerator::new(&self.config).write(&self.output_dir)?;

        match &self.font {
            Some(font) => stats.opengraph_images = self.write_opengraph_images(&content, font)?,
            None => warn!("no OpenGraph font available, skipping card images"),
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            entries = stats.entries,
            sitemap_urls = stats.sitemap_urls,
            opengraph_images = stats.opengraph_images,
            failures = stats.failures,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Write sitemap.xml and, when referenced, sitemap.xsl.
    fn write_sitemap(&self, content: &SiteContent) -> Result<usize> {
        let generator = SitemapGenerator::new(&self.config, &self.localizer);
        let urls = generator.static_urls().len() + generator.entry_urls(content).len();

        let output_path = self.output_dir.join("sitemap.xml");
        let mut file = fs::File::create(&output_path)?;
        generator.write_to(content, &mut file)?;
        info!(path = %output_path.display(), urls, "generated sitemap");

        if self.config.sitemap.stylesheet {
            fs::write(self.output_dir.join("sitemap.xsl"), generate_sitemap_xsl())?;
            debug!("wrote sitemap stylesheet");
        }

        Ok(urls)
    }

    /// Render a card for every page in parallel.
    fn write_opengraph_images(&self, content: &SiteContent, font: &[u8]) -> Result<usize> {
        let pages: Vec<_> = content.of_kind(EntryKind::Page).collect();
        info!(count = pages.len(), "generating OpenGraph cards");

        let results: Vec<_> = pages
            .par_iter()
            .map(|page| {
                let png = opengraph::render_entry_card(page, &self.config, &self.localizer, font)
                    .map_err(|source| BuildError::OpenGraph {
                        id: page.id.clone(),
                        source,
                    })?;
                let path = image_path(&self.output_dir, &page.id);
                fs::write(&path, png)?;
                debug!(path = %path.display(), "wrote OpenGraph card");
                Ok::<_, BuildError>(())
            })
            .collect();

        let mut count = 0;
        for result in results {
            match result {
                Ok(()) => count += 1,
                Err(e) => warn!(error = %e, "failed to generate OpenGraph card"),
            }
        }

        Ok(count)
    }
}

fn image_path(output_dir: &Path, id: &str) -> PathBuf {
    output_dir.join(opengraph::image_name(id))
}
