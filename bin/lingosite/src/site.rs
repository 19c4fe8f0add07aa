//! Site context shared by all commands.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use lingosite_core::{Config, Localizer};
use lingosite_generator::{ContentCollector, SiteContent, collector::CollectorError};

/// Configuration plus the paths derived from it.
///
/// Relative paths in the configuration resolve against the directory holding
/// the configuration file.
#[derive(Debug, Clone)]
pub struct Site {
    pub config: Config,
    pub localizer: Localizer,
    pub root: PathBuf,
}

impl Site {
    /// Load `config_path` with environment overrides and its message catalogs.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = Config::load_with_env(config_path)
            .wrap_err_with(|| format!("Failed to load {}", config_path.display()))?;
        let root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::from_config(config, root)
    }

    /// Build a site from an already loaded configuration.
    pub fn from_config(config: Config, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let localizer =
            Localizer::init(&config.i18n, &root).wrap_err("Failed to load message catalogs")?;
        Ok(Self {
            config,
            localizer,
            root,
        })
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.config.collections.content_dir)
    }

    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.config.server.public_dir)
    }

    /// On-disk location of the OpenGraph font.
    pub fn font_file(&self) -> PathBuf {
        self.public_dir()
            .join(self.config.opengraph.font_path.trim_start_matches('/'))
    }

    /// Collect content entries. Blocking.
    pub fn collect(&self) -> std::result::Result<SiteContent, CollectorError> {
        ContentCollector::new(self.config.clone(), self.content_dir()).collect()
    }
}
