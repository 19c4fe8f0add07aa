//! Localization context.
//!
//! A [`Localizer`] is built once from configuration and passed to whatever
//! needs it. It owns the locale set, the routing table used to localize
//! hrefs, the right-to-left set and the message catalogs.

use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{I18nConfig, LocaleRoute},
    error::{CoreError, Result},
};

/// Locales written right to left.
pub const RTL_LOCALES: &[&str] = &["ar", "he", "fa", "ur"];

/// Text direction of a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for the HTML/SVG `dir`/`direction` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Localization context for one site.
#[derive(Debug, Clone)]
pub struct Localizer {
    locales: Vec<String>,
    base_locale: String,
    rtl: HashSet<String>,
    routing: HashMap<String, LocaleRoute>,
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl Localizer {
    /// Build a localizer without message catalogs.
    pub fn new(config: &I18nConfig) -> Self {
        let rtl = RTL_LOCALES
            .iter()
            .map(|l| (*l).to_string())
            .chain(config.rtl_locales.iter().cloned())
            .collect();

        Self {
            locales: config.locales.clone(),
            base_locale: config.base_locale.clone(),
            rtl,
            routing: config.routing.clone(),
            catalogs: HashMap::new(),
        }
    }

    /// Build a localizer and load `{locale}.json` catalogs from
    /// `messages_dir`, resolved against `root`.
    ///
    /// Locales without a catalog file are skipped.
    pub fn init(config: &I18nConfig, root: &Path) -> Result<Self> {
        let mut localizer = Self::new(config);

        let Some(dir) = &config.messages_dir else {
            return Ok(localizer);
        };
        let dir = root.join(dir);

        for locale in &config.locales {
            let path = dir.join(format!("{locale}.json"));
            if !path.is_file() {
                debug!(%locale, path = %path.display(), "no message catalog");
                continue;
            }
            let raw = std::fs::read_to_string(&path)?;
            let value: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| CoreError::catalog(&path, e.to_string()))?;
            let mut messages = HashMap::new();
            flatten_messages(&value, String::new(), &mut messages);
            debug!(%locale, count = messages.len(), "loaded message catalog");
            localizer.catalogs.insert(locale.clone(), messages);
        }

        Ok(localizer)
    }

    /// Register messages for a locale, replacing existing keys.
    pub fn with_messages<I, K, V>(mut self, locale: &str, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = self.catalogs.entry(locale.to_string()).or_default();
        catalog.extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The base locale.
    pub fn base_locale(&self) -> &str {
        &self.base_locale
    }

    /// All configured locales.
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Whether `locale` is in the configured set.
    pub fn is_supported(&self, locale: &str) -> bool {
        self.locales.iter().any(|l| l == locale)
    }

    /// Map an arbitrary tag onto a supported locale, falling back to the base.
    pub fn resolve<'a>(&'a self, locale: &'a str) -> &'a str {
        if self.is_supported(locale) {
            locale
        } else {
            &self.base_locale
        }
    }

    /// Text direction for a locale.
    pub fn direction(&self, locale: &str) -> TextDirection {
        if self.rtl.contains(locale) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    /// Localize a bare path for `locale` using the routing table.
    ///
    /// The base locale is un-prefixed unless configured otherwise; other
    /// locales default to a `/{locale}` prefix. Exact path mappings are
    /// applied before the prefix.
    pub fn localize_href(&self, path: &str, locale: &str) -> String {
        let locale = self.resolve(locale);
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        let route = self.routing.get(locale);
        let mapped = route
            .and_then(|r| r.paths.get(&path))
            .cloned()
            .unwrap_or(path);

        let prefix = match route.and_then(|r| r.prefix.as_deref()) {
            Some(prefix) => prefix.trim_end_matches('/').to_string(),
            None if locale == self.base_locale => String::new(),
            None => format!("/{locale}"),
        };

        if mapped == "/" {
            format!("{prefix}/")
        } else {
            format!("{prefix}{mapped}")
        }
    }

    /// Absolute URL of a localized path.
    pub fn absolute_url(&self, origin: &str, path: &str, locale: &str) -> String {
        format!(
            "{}{}",
            origin.trim_end_matches('/'),
            self.localize_href(path, locale)
        )
    }

    /// Translate `key`, falling back to the base locale, then to the key.
    pub fn t(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.base_locale, key))
            .map_or_else(|| key.to_string(), str::to_string)
    }

    /// Translate `key` and substitute `{{name}}` placeholders.
    pub fn t_with(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter().fold(self.t(locale, key), |text, (name, value)| {
            text.replace(&format!("{{{{{name}}}}}"), value)
        })
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(locale)
            .and_then(|c| c.get(key))
            .map(String::as_str)
    }
}

/// Flatten nested JSON objects into dotted keys.
fn flatten_messages(value: &serde_json::Value, prefix: String, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_messages(child, key, out);
            }
        }
        serde_json::Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        serde_json::Value::Null => {}
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}
