//! Content types and structures.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::CollectionsConfig, frontmatter::Frontmatter};

/// Collection a content entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Dated article under `content/posts`.
    Post,
    /// Standalone page under `content/pages`.
    Page,
}

impl EntryKind {
    /// Directory name of the collection.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Page => "pages",
        }
    }

    /// Route prefix configured for the collection.
    pub fn route<'a>(&self, collections: &'a CollectionsConfig) -> &'a str {
        match self {
            Self::Post => &collections.posts_route,
            Self::Page => &collections.pages_route,
        }
    }
}

/// A translation of a content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternate {
    /// Locale of the translation.
    pub locale: String,

    /// Slug of the translation inside its locale.
    pub slug: String,
}

/// Supported content source extensions.
pub fn is_content_extension(ext: &str) -> bool {
    matches!(ext.to_lowercase().as_str(), "md" | "mdx" | "markdown")
}

/// Content path with locale and slug extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Original file path.
    pub path: PathBuf,

    /// Locale detected from the path, if any.
    pub locale: Option<String>,

    /// Language-neutral identifier, e.g. "hello" or "guides/setup".
    pub canonical_id: String,
}

impl ContentPath {
    /// Parse a path relative to its collection directory.
    ///
    /// Supports patterns like:
    /// - `hello.md` -> locale: none, canonical_id: "hello"
    /// - `hello.fr.md` -> locale: "fr", canonical_id: "hello"
    /// - `fr/hello.md` -> locale: "fr", canonical_id: "hello"
    /// - `hello/index.fr.mdx` -> locale: "fr", canonical_id: "hello"
    ///
    /// Only tags present in `locales` are treated as locales.
    pub fn from_path(path: &Path, locales: &[String]) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if !is_content_extension(extension) {
            return None;
        }

        let stem = path.file_stem()?.to_str()?;
        let is_locale = |tag: &str| locales.iter().any(|l| l == tag);

        let (base_stem, suffix_locale) = match stem.rsplit_once('.') {
            Some((base, tag)) if is_locale(tag) => (base, Some(tag.to_string())),
            _ => (stem, None),
        };

        let mut segments: Vec<String> = path
            .parent()
            .map(|p| {
                p.components()
                    .map(|c| c.as_os_str().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let dir_locale = match segments.first() {
            Some(first) if is_locale(first) => Some(segments.remove(0)),
            _ => None,
        };

        if base_stem != "index" {
            segments.push(base_stem.to_string());
        }

        let canonical_id = segments.join("/").trim_matches('/').to_string();

        Some(Self {
            path: path.to_path_buf(),
            locale: suffix_locale.or(dir_locale),
            canonical_id,
        })
    }
}

/// A localized content item from a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier used in URLs such as `/opengraph-page-{id}.png`.
    pub id: String,

    /// Collection of the entry.
    pub kind: EntryKind,

    /// Locale of this file.
    pub locale: String,

    /// Slug inside the locale.
    pub slug: String,

    /// Language-neutral identifier derived from the path.
    pub canonical_id: String,

    /// Title.
    pub title: String,

    /// Description.
    #[serde(default)]
    pub description: Option<String>,

    /// Publication date.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,

    /// Last updated date.
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Translations of this content unit.
    #[serde(default)]
    pub alternates: Vec<Alternate>,

    /// Source file path.
    #[serde(default)]
    pub source_path: Option<PathBuf>,
}

impl Entry {
    /// Build an entry from parsed frontmatter and its content path.
    ///
    /// Frontmatter `locale` wins over the path; both fall back to `base_locale`.
    pub fn from_frontmatter(
        fm: Frontmatter,
        content_path: &ContentPath,
        kind: EntryKind,
        base_locale: &str,
    ) -> Self {
        let locale = fm
            .locale
            .or_else(|| content_path.locale.clone())
            .unwrap_or_else(|| base_locale.to_string());

        let slug = fm
            .slug
            .unwrap_or_else(|| content_path.canonical_id.clone())
            .trim_matches('/')
            .to_string();

        let neutral = content_path.canonical_id.replace('/', "-");
        let id = if locale == base_locale {
            neutral
        } else {
            format!("{locale}-{neutral}")
        };

        Self {
            id,
            kind,
            locale,
            slug,
            canonical_id: content_path.canonical_id.clone(),
            title: fm.title,
            description: fm.description,
            date: fm.date,
            updated: fm.updated,
            draft: fm.draft,
            alternates: fm.alternates,
            source_path: Some(content_path.path.clone()),
        }
    }

    /// Un-localized route path of the entry, e.g. "/blog/hello".
    pub fn route_path(&self, collections: &CollectionsConfig) -> String {
        join_route(self.kind.route(collections), &self.slug)
    }

    /// Un-localized route path of one of the entry's alternates.
    pub fn alternate_route_path(&self, alt: &Alternate, collections: &CollectionsConfig) -> String {
        join_route(self.kind.route(collections), &alt.slug)
    }

    /// Most recent known modification date.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.date)
    }
}

/// Join a collection route and a slug into an absolute path.
pub fn join_route(route: &str, slug: &str) -> String {
    let route = route.trim_matches('/');
    let slug = slug.trim_matches('/');
    match (route.is_empty(), slug.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{slug}"),
        (false, true) => format!("/{route}"),
        (false, false) => format!("/{route}/{slug}"),
    }
}
