//! Content collection and grouping.
//!
//! Walks `posts/` and `pages/` under the content directory, parses every
//! entry and groups translations into logical content units.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use lingosite_core::{
    Config, ContentPath, Entry, EntryKind, Localizer, content::is_content_extension,
    frontmatter::parse_frontmatter,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Frontmatter or schema error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid content path.
    #[error("invalid content path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Collected content entries.
#[derive(Debug, Default)]
pub struct SiteContent {
    /// All entries, sorted by kind, locale and slug.
    pub entries: Vec<Entry>,

    /// Files that failed to parse and were skipped.
    pub failures: Vec<CollectorError>,
}

impl SiteContent {
    /// Build content from already-parsed entries.
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        sort_entries(&mut entries);
        Self {
            entries,
            failures: Vec::new(),
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Look up a page (not a post) by id.
    pub fn page(&self, id: &str) -> Option<&Entry> {
        self.of_kind(EntryKind::Page).find(|e| e.id == id)
    }

    /// Entries of one collection.
    pub fn of_kind(&self, kind: EntryKind) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        (a.kind == EntryKind::Page, &a.locale, &a.slug)
            .cmp(&(b.kind == EntryKind::Page, &b.locale, &b.slug))
    });
}

/// Content collector that walks directories and parses files.
#[derive(Debug)]
pub struct ContentCollector {
    config: Config,
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(config: Config, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
        }
    }

    /// Collect every post and page.
    ///
    /// Files that fail to parse are skipped and recorded in
    /// [`SiteContent::failures`]; drafts are dropped unless enabled.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let mut files = Vec::new();
        for kind in [EntryKind::Post, EntryKind::Page] {
            let dir = self.content_dir.join(kind.dir_name());
            for path in find_content_files(&dir)? {
                files.push((kind, dir.clone(), path));
            }
        }
        info!(count = files.len(), "found content files");

        let results: Vec<_> = files
            .par_iter()
            .map(|(kind, root, path)| self.parse_file(*kind, root, path))
            .collect();

        let mut content = SiteContent::default();
        for result in results {
            match result {
                Ok(entry) if entry.draft && !self.config.build.drafts => {
                    debug!(id = %entry.id, "skipping draft");
                }
                Ok(entry) => content.entries.push(entry),
                Err(e) => {
                    warn!(error = %e, "failed to parse content file");
                    content.failures.push(e);
                }
            }
        }
        sort_entries(&mut content.entries);

        info!(
            entries = content.entries.len(),
            failures = content.failures.len(),
            "content collection complete"
        );

        Ok(content)
    }

    /// Parse a single content file into an entry.
    fn parse_file(&self, kind: EntryKind, root: &Path, path: &Path) -> Result<Entry> {
        debug!(path = %path.display(), "parsing file");

        let raw = fs::read_to_string(path)?;

        let relative_path = path.strip_prefix(root).unwrap_or(path);
        let content_path = ContentPath::from_path(relative_path, &self.config.i18n.locales)
            .ok_or_else(|| CollectorError::InvalidPath(path.to_path_buf()))?;

        let (frontmatter, _body) =
            parse_frontmatter(&raw, path).map_err(|e| CollectorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut entry = Entry::from_frontmatter(
            frontmatter,
            &content_path,
            kind,
            &self.config.i18n.base_locale,
        );
        entry.source_path = Some(path.to_path_buf());
        Ok(entry)
    }
}

/// Find content files below `dir`, skipping hidden directories.
fn find_content_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir).into_iter().filter_entry(|e| {
        e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
    });
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| is_content_extension(&ext.to_string_lossy()))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// A logical content unit: the base-locale anchor and its translations.
#[derive(Debug)]
pub struct ContentGroup<'a> {
    /// The base-locale entry.
    pub anchor: &'a Entry,

    /// Translation entries found on disk for the anchor's alternates.
    pub translations: Vec<&'a Entry>,
}

/// Group entries into content units anchored on base-locale entries.
///
/// Returns the groups plus the non-base entries that no anchor claims.
pub fn group_by_unit<'a>(
    entries: &'a [Entry],
    base_locale: &str,
) -> (Vec<ContentGroup<'a>>, Vec<&'a Entry>) {
    let index: HashMap<(EntryKind, &str, &str), &Entry> = entries
        .iter()
        .map(|e| ((e.kind, e.locale.as_str(), e.slug.as_str()), e))
        .collect();

    let mut claimed = HashSet::new();
    let mut groups = Vec::new();

    for anchor in entries.iter().filter(|e| e.locale == base_locale) {
        let translations: Vec<&Entry> = anchor
            .alternates
            .iter()
            .filter(|alt| alt.locale != base_locale)
            .filter_map(|alt| {
                index
                    .get(&(anchor.kind, alt.locale.as_str(), alt.slug.as_str()))
                    .copied()
            })
            .collect();
        claimed.extend(translations.iter().map(|&e| e.id.as_str()));
        groups.push(ContentGroup {
            anchor,
            translations,
        });
    }

    let orphans = entries
        .iter()
        .filter(|e| e.locale != base_locale && !claimed.contains(e.id.as_str()))
        .collect();

    (groups, orphans)
}

/// A problem found in collected content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentIssue {
    /// Entry locale outside the configured set.
    #[error("{id}: locale '{locale}' is not configured")]
    UnknownLocale { id: String, locale: String },

    /// Alternate locale outside the configured set.
    #[error("{id}: alternate locale '{locale}' is not configured")]
    UnknownAlternateLocale { id: String, locale: String },

    /// Two alternates share a locale.
    #[error("{id}: alternate locale '{locale}' listed more than once")]
    DuplicateAlternate { id: String, locale: String },

    /// An alternate points back at the entry's own locale.
    #[error("{id}: alternate references its own locale '{locale}'")]
    SelfAlternate { id: String, locale: String },

    /// Two base-locale entries share a slug.
    #[error("{id}: slug '{slug}' is used by another base-locale entry")]
    DuplicateAnchor { id: String, slug: String },

    /// A non-base entry that no base-locale entry lists as an alternate.
    #[error("{id}: no base-locale entry lists this translation")]
    Orphan { id: String },

    /// An alternate without a matching file.
    #[error("{id}: translation '{locale}/{slug}' has no content file")]
    MissingTranslation {
        id: String,
        locale: String,
        slug: String,
    },
}

impl ContentIssue {
    /// Whether the issue breaks a content invariant (as opposed to a warning).
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Orphan { .. } | Self::MissingTranslation { .. })
    }
}

/// Check the content-group invariants of collected entries.
pub fn validate_groups(entries: &[Entry], localizer: &Localizer) -> Vec<ContentIssue> {
    let base = localizer.base_locale();
    let mut issues = Vec::new();

    for entry in entries {
        if !localizer.is_supported(&entry.locale) {
            issues.push(ContentIssue::UnknownLocale {
                id: entry.id.clone(),
                locale: entry.locale.clone(),
            });
        }

        let mut seen = HashSet::new();
        for alt in &entry.alternates {
            if !localizer.is_supported(&alt.locale) {
                issues.push(ContentIssue::UnknownAlternateLocale {
                    id: entry.id.clone(),
                    locale: alt.locale.clone(),
                });
            }
            if alt.locale == entry.locale {
                issues.push(ContentIssue::SelfAlternate {
                    id: entry.id.clone(),
                    locale: alt.locale.clone(),
                });
            }
            if !seen.insert(alt.locale.as_str()) {
                issues.push(ContentIssue::DuplicateAlternate {
                    id: entry.id.clone(),
                    locale: alt.locale.clone(),
                });
            }
        }
    }

    let mut anchors = HashSet::new();
    for entry in entries.iter().filter(|e| e.locale == base) {
        if !anchors.insert((entry.kind, entry.slug.as_str())) {
            issues.push(ContentIssue::DuplicateAnchor {
                id: entry.id.clone(),
                slug: entry.slug.clone(),
            });
        }
    }

    let (groups, orphans) = group_by_unit(entries, base);
    for group in &groups {
        for alt in group.anchor.alternates.iter().filter(|a| a.locale != base) {
            let found = group
                .translations
                .iter()
                .any(|t| t.locale == alt.locale && t.slug == alt.slug);
            if !found {
                issues.push(ContentIssue::MissingTranslation {
                    id: group.anchor.id.clone(),
                    locale: alt.locale.clone(),
                    slug: alt.slug.clone(),
                });
            }
        }
    }
    issues.extend(orphans.into_iter().map(|e| ContentIssue::Orphan { id: e.id.clone() }));

    issues
}

#[cfg(test)]
mod tests {
    use lingosite_core::{Alternate, config::I18nConfig};

    use super::*;

    fn entry(kind: EntryKind, locale: &str, slug: &str, alternates: &[(&str, &str)]) -> Entry {
        Entry {
            id: format!("{locale}-{slug}"),
            kind,
            locale: locale.to_string(),
            slug: slug.to_string(),
            canonical_id: slug.to_string(),
            title: slug.to_string(),
            description: None,
            date: None,
            updated: None,
            draft: false,
            alternates: alternates
                .iter()
                .map(|(l, s)| Alternate {
                    locale: (*l).to_string(),
                    slug: (*s).to_string(),
                })
                .collect(),
            source_path: None,
        }
    }

    fn localizer() -> Localizer {
        Localizer::new(&I18nConfig {
            locales: vec!["en".into(), "fr".into(), "de".into()],
            ..Default::default()
        })
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    #[test]
    fn test_group_by_unit() {
        let entries = vec![
            entry(EntryKind::Post, "en", "hello", &[("fr", "bonjour"), ("de", "hallo")]),
            entry(EntryKind::Post, "fr", "bonjour", &[("en", "hello")]),
            entry(EntryKind::Post, "de", "hallo", &[]),
            entry(EntryKind::Post, "en", "solo", &[]),
            entry(EntryKind::Post, "fr", "perdu", &[]),
        ];

        let (groups, orphans) = group_by_unit(&entries, "en");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].anchor.slug, "hello");
        assert_eq!(groups[0].translations.len(), 2);
        assert!(groups[1].translations.is_empty());
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].slug, "perdu");
    }

    #[test]
    fn test_group_does_not_cross_collections() {
        let entries = vec![
            entry(EntryKind::Page, "en", "about", &[("fr", "a-propos")]),
            entry(EntryKind::Post, "fr", "a-propos", &[]),
        ];

        let (groups, orphans) = group_by_unit(&entries, "en");
        assert!(groups[0].translations.is_empty());
        assert_eq!(orphans.len(), 1);
    }

    #[test]
    fn test_validate_groups_reports_invariant_breaks() {
        let entries = vec![
            entry(
                EntryKind::Post,
                "en",
                "hello",
                &[("fr", "bonjour"), ("fr", "salut"), ("en", "hello"), ("xx", "zz")],
            ),
            entry(EntryKind::Post, "en", "hello", &[]),
            entry(EntryKind::Post, "fr", "bonjour", &[]),
        ];

        let issues = validate_groups(&entries, &localizer());

        assert!(issues.contains(&ContentIssue::DuplicateAlternate {
            id: "en-hello".into(),
            locale: "fr".into()
        }));
        assert!(issues.contains(&ContentIssue::SelfAlternate {
            id: "en-hello".into(),
            locale: "en".into()
        }));
        assert!(issues.contains(&ContentIssue::UnknownAlternateLocale {
            id: "en-hello".into(),
            locale: "xx".into()
        }));
        assert!(issues.contains(&ContentIssue::DuplicateAnchor {
            id: "en-hello".into(),
            slug: "hello".into()
        }));
        assert!(issues.contains(&ContentIssue::MissingTranslation {
            id: "en-hello".into(),
            locale: "fr".into(),
            slug: "salut".into()
        }));
        assert!(issues.iter().any(ContentIssue::is_error));
    }

    #[test]
    fn test_validate_clean_content() {
        let entries = vec![
            entry(EntryKind::Page, "en", "about", &[("fr", "a-propos")]),
            entry(EntryKind::Page, "fr", "a-propos", &[("en", "about")]),
        ];
        assert!(validate_groups(&entries, &localizer()).is_empty());
    }

    #[test]
    fn test_orphan_is_warning() {
        let issue = ContentIssue::Orphan { id: "fr-x".into() };
        assert!(!issue.is_error());
        assert_eq!(issue.to_string(), "fr-x: no base-locale entry lists this translation");
    }

    #[test]
    fn test_collect_from_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "posts/hello.md",
            "---\ntitle: Hello\nalternates:\n  - locale: fr\n    slug: bonjour\n---\nBody",
        );
        write(
            dir.path(),
            "posts/fr/bonjour.md",
            "---\ntitle: Bonjour\n---\nCorps",
        );
        write(dir.path(), "posts/draft.md", "---\ntitle: WIP\ndraft: true\n---\n");
        write(dir.path(), "posts/.hidden/skip.md", "---\ntitle: Hidden\n---\n");
        write(dir.path(), "pages/about.mdx", "+++\ntitle = \"About\"\n+++\n");
        write(dir.path(), "pages/broken.md", "no frontmatter here");
        write(dir.path(), "pages/notes.txt", "ignored");

        let mut config = Config::new("Test", "https://example.com");
        config.i18n.locales = vec!["en".into(), "fr".into()];
        let content = ContentCollector::new(config, dir.path())
            .collect()
            .expect("collect");

        assert_eq!(content.len(), 3);
        assert_eq!(content.failures.len(), 1);

        let hello = content.get("hello").expect("hello entry");
        assert_eq!(hello.kind, EntryKind::Post);
        assert_eq!(hello.alternates.len(), 1);

        let bonjour = content.get("fr-bonjour").expect("french entry");
        assert_eq!(bonjour.locale, "fr");
        assert_eq!(bonjour.slug, "bonjour");

        assert!(content.page("about").is_some());
        assert!(content.page("hello").is_none());
        assert!(content.get("draft").is_none());
    }

    #[test]
    fn test_collect_includes_drafts_when_enabled() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(dir.path(), "posts/draft.md", "---\ntitle: WIP\ndraft: true\n---\n");

        let mut config = Config::new("Test", "https://example.com");
        config.build.drafts = true;
        let content = ContentCollector::new(config, dir.path())
            .collect()
            .expect("collect");

        assert!(content.get("draft").is_some());
    }

    #[test]
    fn test_collect_missing_dir_is_empty() {
        let config = Config::new("Test", "https://example.com");
        let content = ContentCollector::new(config, "/nonexistent/content")
            .collect()
            .expect("collect");
        assert!(content.is_empty());
    }
}
