//! Site configuration management.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for Lingosite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Locale set and routing table.
    #[serde(default)]
    pub i18n: I18nConfig,

    /// Content collection locations.
    #[serde(default)]
    pub collections: CollectionsConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Robots.txt settings.
    #[serde(default)]
    pub robots: RobotsConfig,

    /// OpenGraph card settings.
    #[serde(default)]
    pub opengraph: OpenGraphConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Static build settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Site origin (e.g., "https://example.com").
    pub origin: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,
}

/// Localization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I18nConfig {
    /// Closed set of supported locale tags.
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Locale served from un-prefixed URLs.
    #[serde(default = "default_locale")]
    pub base_locale: String,

    /// Extra right-to-left locales on top of the built-in set.
    #[serde(default)]
    pub rtl_locales: Vec<String>,

    /// Per-locale routing overrides.
    #[serde(default)]
    pub routing: HashMap<String, LocaleRoute>,

    /// Directory holding `{locale}.json` message catalogs.
    #[serde(default)]
    pub messages_dir: Option<String>,
}

/// Routing entry for one locale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleRoute {
    /// URL prefix such as "/fr". An empty string means un-prefixed.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Exact path replacements, e.g. "/about" -> "/a-propos".
    #[serde(default)]
    pub paths: HashMap<String, String>,
}

/// Content collection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsConfig {
    /// Root directory containing `posts/` and `pages/`.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Route under which posts are served.
    #[serde(default = "default_posts_route")]
    pub posts_route: String,

    /// Route under which pages are served.
    #[serde(default)]
    pub pages_route: String,
}

/// How often a sitemap URL is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Value used in the `<changefreq>` element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// A fixed route listed in the sitemap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticRoute {
    /// Bare (un-localized) path, e.g. "/about".
    pub path: String,

    /// Overrides the default change frequency.
    #[serde(default)]
    pub changefreq: Option<ChangeFreq>,

    /// Overrides the default priority.
    #[serde(default)]
    pub priority: Option<f32>,
}

impl StaticRoute {
    /// Route with default frequency and priority.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            changefreq: None,
            priority: None,
        }
    }
}

/// Sitemap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Fixed routes emitted ahead of collection entries.
    #[serde(default = "default_static_routes")]
    pub routes: Vec<StaticRoute>,

    /// Change frequency for entries without an override.
    #[serde(default)]
    pub changefreq: ChangeFreq,

    /// Priority for entries without an override.
    #[serde(default = "default_priority")]
    pub priority: f32,

    /// Whether to reference `/sitemap.xsl` from the sitemap.
    #[serde(default = "default_true")]
    pub stylesheet: bool,
}

/// Robots.txt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    /// Whether robots.txt is served.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Paths crawlers may visit.
    #[serde(default = "default_allow")]
    pub allow: Vec<String>,

    /// Paths crawlers should skip.
    #[serde(default)]
    pub disallow: Vec<String>,
}

/// OpenGraph card configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenGraphConfig {
    /// Font path relative to the site origin.
    #[serde(default = "default_font_path")]
    pub font_path: String,

    /// Card width in pixels.
    #[serde(default = "default_og_width")]
    pub width: u32,

    /// Card height in pixels.
    #[serde(default = "default_og_height")]
    pub height: u32,

    /// Background colour.
    #[serde(default = "default_background")]
    pub background: String,

    /// Text colour.
    #[serde(default = "default_foreground")]
    pub foreground: String,

    /// Accent bar colour.
    #[serde(default = "default_accent")]
    pub accent: String,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static files (fonts, images).
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether to include drafts.
    #[serde(default)]
    pub drafts: bool,
}

// Default value functions
fn default_locale() -> String {
    "en".to_string()
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_posts_route() -> String {
    "/blog".to_string()
}

fn default_static_routes() -> Vec<StaticRoute> {
    vec![StaticRoute::new("/")]
}

fn default_priority() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_allow() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_font_path() -> String {
    "/fonts/opengraph.ttf".to_string()
}

fn default_og_width() -> u32 {
    1200
}

fn default_og_height() -> u32 {
    630
}

fn default_background() -> String {
    "#0f172a".to_string()
}

fn default_foreground() -> String {
    "#f8fafc".to_string()
}

fn default_accent() -> String {
    "#38bdf8".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4321
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            base_locale: default_locale(),
            rtl_locales: Vec::new(),
            routing: HashMap::new(),
            messages_dir: None,
        }
    }
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            posts_route: default_posts_route(),
            pages_route: String::new(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            routes: default_static_routes(),
            changefreq: ChangeFreq::default(),
            priority: default_priority(),
            stylesheet: true,
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow: default_allow(),
            disallow: Vec::new(),
        }
    }
}

impl Default for OpenGraphConfig {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
            width: default_og_width(),
            height: default_og_height(),
            background: default_background(),
            foreground: default_foreground(),
            accent: default_accent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            drafts: false,
        }
    }
}

impl Config {
    /// Minimal configuration for a single-locale site.
    pub fn new(title: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                origin: origin.into(),
                description: None,
            },
            i18n: I18nConfig::default(),
            collections: CollectionsConfig::default(),
            sitemap: SitemapConfig::default(),
            robots: RobotsConfig::default(),
            opengraph: OpenGraphConfig::default(),
            server: ServerConfig::default(),
            build: BuildConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            CoreError::Toml(source) => CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                source,
            ),
            other => other,
        })?;

        Ok(config)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `LINGOSITE__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("LINGOSITE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.origin.is_empty() {
            return Err(CoreError::config("site.origin cannot be empty"));
        }

        if self.site.origin.ends_with('/') {
            tracing::warn!("site.origin should not have a trailing slash");
        }

        if !self.has_locale(&self.i18n.base_locale) {
            return Err(CoreError::config(format!(
                "i18n.base_locale '{}' is not listed in i18n.locales",
                self.i18n.base_locale
            )));
        }

        for (i, locale) in self.i18n.locales.iter().enumerate() {
            if self.i18n.locales[..i].contains(locale) {
                return Err(CoreError::config(format!(
                    "i18n.locales lists '{locale}' more than once"
                )));
            }
        }

        if let Some(unknown) = self.i18n.routing.keys().find(|l| !self.has_locale(l)) {
            return Err(CoreError::config(format!(
                "i18n.routing references unknown locale '{unknown}'"
            )));
        }

        let priorities = std::iter::once(self.sitemap.priority)
            .chain(self.sitemap.routes.iter().filter_map(|r| r.priority));
        for priority in priorities {
            if !(0.0..=1.0).contains(&priority) {
                return Err(CoreError::config(format!(
                    "sitemap priority {priority} is outside [0.0, 1.0]"
                )));
            }
        }

        Ok(())
    }

    /// Site origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.site.origin.trim_end_matches('/')
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.origin())
    }

    /// Whether the locale is part of the configured set.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.i18n.locales.iter().any(|l| l == locale)
    }

    /// Configured locales except the base locale, in configuration order.
    pub fn non_base_locales(&self) -> impl Iterator<Item = &str> {
        self.i18n
            .locales
            .iter()
            .map(String::as_str)
            .filter(|l| *l != self.i18n.base_locale)
    }
}
