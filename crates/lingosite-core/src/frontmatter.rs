//! Frontmatter parsing for content files.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    content::Alternate,
    error::{CoreError, Result},
};

/// Frontmatter metadata for content files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Entry title (required).
    pub title: String,

    /// Description for meta tags and OpenGraph cards.
    #[serde(default)]
    pub description: Option<String>,

    /// Canonical slug. Derived from the file name when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Locale tag of this file. `lang` is accepted as an alias.
    #[serde(default, alias = "lang")]
    pub locale: Option<String>,

    /// Publication date.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,

    /// Last updated date.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub updated: Option<DateTime<Utc>>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Translations of the same content unit.
    #[serde(default)]
    pub alternates: Vec<Alternate>,

    /// Custom extra fields (for extensibility).
    #[serde(default, flatten)]
    pub extra: std::collections::HashMap<String, serde_yaml::Value>,
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();

    let after_first = &content[delimiter.len()..];
    let closing_pos = after_first.find(delimiter)?;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse frontmatter from a string.
///
/// Content collections are schema-validated, so a file without frontmatter
/// is an error rather than an untitled entry.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(path, "no frontmatter block found"));
    };

    let frontmatter: Frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    frontmatter.validate(path)?;
    Ok((frontmatter, body.to_string()))
}

impl Frontmatter {
    /// Validate required fields.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::frontmatter(path, "title is required"));
        }
        if self.slug.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(CoreError::frontmatter(path, "slug cannot be empty"));
        }
        for alt in &self.alternates {
            if alt.locale.is_empty() || alt.slug.is_empty() {
                return Err(CoreError::frontmatter(
                    path,
                    "alternates need both locale and slug",
                ));
            }
        }
        Ok(())
    }
}
