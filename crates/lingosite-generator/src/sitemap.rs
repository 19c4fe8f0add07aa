//! Sitemap generation.
//!
//! Emits a sitemaps.org 0.9 document with `xhtml:link` hreflang alternates.
//! Static routes produce one `<url>` each with a link per non-base locale;
//! collection entries produce one `<url>` per content unit, anchored on the
//! base-locale entry.

use std::io::Write;

use chrono::{DateTime, Utc};
use lingosite_core::{ChangeFreq, Config, Localizer, StaticRoute};
use thiserror::Error;
use tracing::{debug, warn};

use crate::collector::{SiteContent, group_by_unit};

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    /// URL location.
    pub loc: String,

    /// Last modification date.
    pub lastmod: Option<DateTime<Utc>>,

    /// Change frequency.
    pub changefreq: ChangeFreq,

    /// Priority, clamped to 0.0..=1.0.
    pub priority: f32,

    /// Alternate language versions.
    pub alternates: Vec<AlternateLink>,
}

/// Alternate language link for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    /// Locale tag (e.g., "fr").
    pub hreflang: String,

    /// Absolute URL of this language version.
    pub href: String,
}

/// Sitemap generator.
#[derive(Debug)]
pub struct SitemapGenerator<'a> {
    config: &'a Config,
    localizer: &'a Localizer,
}

impl<'a> SitemapGenerator<'a> {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(config: &'a Config, localizer: &'a Localizer) -> Self {
        Self { config, localizer }
    }

    /// Generate sitemap XML from the configured static routes and `content`.
    pub fn generate(&self, content: &SiteContent) -> String {
        let mut urls = self.static_urls();
        urls.extend(self.entry_urls(content));
        debug!(count = urls.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        if self.config.sitemap.stylesheet {
            xml.push_str(r#"<?xml-stylesheet type="text/xsl" href="/sitemap.xsl"?>"#);
            xml.push('\n');
        }
        xml.push_str(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">"#,
        );
        xml.push('\n');

        for url in &urls {
            xml.push_str(&url_to_xml(url));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// One entry per static route.
    pub fn static_urls(&self) -> Vec<SitemapUrl> {
        self.config
            .sitemap
            .routes
            .iter()
            .map(|route| self.static_url(route))
            .collect()
    }

    fn static_url(&self, route: &StaticRoute) -> SitemapUrl {
        let origin = self.config.origin();
        let base = self.localizer.base_locale();

        let alternates = self
            .config
            .non_base_locales()
            .map(|locale| AlternateLink {
                hreflang: locale.to_string(),
                href: self.localizer.absolute_url(origin, &route.path, locale),
            })
            .collect();

        SitemapUrl {
            loc: self.localizer.absolute_url(origin, &route.path, base),
            lastmod: None,
            changefreq: route.changefreq.unwrap_or(self.config.sitemap.changefreq),
            priority: clamp_priority(route.priority.unwrap_or(self.config.sitemap.priority)),
            alternates,
        }
    }

    /// One entry per content unit, anchored on the base-locale entry.
    pub fn entry_urls(&self, content: &SiteContent) -> Vec<SitemapUrl> {
        let origin = self.config.origin();
        let base = self.localizer.base_locale();
        let collections = &self.config.collections;

        let (groups, orphans) = group_by_unit(&content.entries, base);
        for orphan in orphans {
            warn!(
                id = %orphan.id,
                locale = %orphan.locale,
                "translation without base-locale entry left out of sitemap"
            );
        }

        groups
            .into_iter()
            .map(|group| {
                let anchor = group.anchor;
                let alternates = anchor
                    .alternates
                    .iter()
                    .filter(|alt| alt.locale != base)
                    .filter(|alt| {
                        let supported = self.localizer.is_supported(&alt.locale);
                        if !supported {
                            warn!(
                                id = %anchor.id,
                                locale = %alt.locale,
                                "skipping alternate with unknown locale"
                            );
                        }
                        supported
                    })
                    .map(|alt| AlternateLink {
                        hreflang: alt.locale.clone(),
                        href: self.localizer.absolute_url(
                            origin,
                            &anchor.alternate_route_path(alt, collections),
                            &alt.locale,
                        ),
                    })
                    .collect();

                SitemapUrl {
                    loc: self.localizer.absolute_url(
                        origin,
                        &anchor.route_path(collections),
                        base,
                    ),
                    lastmod: anchor.last_modified(),
                    changefreq: self.config.sitemap.changefreq,
                    priority: clamp_priority(self.config.sitemap.priority),
                    alternates,
                }
            })
            .collect()
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(&self, content: &SiteContent, writer: &mut W) -> Result<()> {
        let xml = self.generate(content);
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

fn clamp_priority(priority: f32) -> f32 {
    if priority.is_nan() {
        return 0.5;
    }
    priority.clamp(0.0, 1.0)
}

/// Shortest decimal form of `priority`, always with a fractional part.
fn format_priority(priority: f32) -> String {
    let text = priority.to_string();
    if text.contains('.') { text } else { format!("{text}.0") }
}

/// Convert a URL entry to XML.
fn url_to_xml(url: &SitemapUrl) -> String {
    let mut xml = String::from("  <url>\n");

    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));

    for alt in &url.alternates {
        xml.push_str(&format!(
            r#"    <xhtml:link rel="alternate" hreflang="{}" href="{}"/>"#,
            escape_xml(&alt.hreflang),
            escape_xml(&alt.href)
        ));
        xml.push('\n');
    }

    if let Some(lastmod) = &url.lastmod {
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            lastmod.format("%Y-%m-%d")
        ));
    }

    xml.push_str(&format!(
        "    <changefreq>{}</changefreq>\n",
        url.changefreq.as_str()
    ));
    xml.push_str(&format!(
        "    <priority>{}</priority>\n",
        format_priority(url.priority)
    ));

    xml.push_str("  </url>\n");
    xml
}

/// Escape special XML characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// XSLT stylesheet that renders the sitemap as a table in browsers.
#[must_use]
pub fn generate_sitemap_xsl() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<xsl:stylesheet version="1.0"
    xmlns:xsl="http://www.w3.org/1999/XSL/Transform"
    xmlns:sitemap="http://www.sitemaps.org/schemas/sitemap/0.9"
    xmlns:xhtml="http://www.w3.org/1999/xhtml">
<xsl:output method="html" encoding="UTF-8" indent="yes"/>
<xsl:template match="/">
<html>
<head>
  <meta charset="UTF-8"/>
  <title>Sitemap</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; color: #0f172a; }
    table { border-collapse: collapse; width: 100%; }
    th, td { text-align: left; padding: .5rem .75rem; border-bottom: 1px solid #e2e8f0; }
    th { font-size: .75rem; text-transform: uppercase; color: #475569; }
    .alt { color: #64748b; font-size: .8rem; margin-right: .5rem; }
    @media (prefers-color-scheme: dark) {
      body { background: #0f172a; color: #f1f5f9; }
      th, td { border-color: #334155; }
    }
  </style>
</head>
<body>
  <h1>Sitemap</h1>
  <p><xsl:value-of select="count(sitemap:urlset/sitemap:url)"/> URLs</p>
  <table>
    <tr><th>URL</th><th>Translations</th><th>Priority</th><th>Change frequency</th></tr>
    <xsl:for-each select="sitemap:urlset/sitemap:url">
      <tr>
        <td><a href="{sitemap:loc}"><xsl:value-of select="sitemap:loc"/></a></td>
        <td>
          <xsl:for-each select="xhtml:link">
            <a class="alt" href="{@href}"><xsl:value-of select="@hreflang"/></a>
          </xsl:for-each>
        </td>
        <td><xsl:value-of select="sitemap:priority"/></td>
        <td><xsl:value-of select="sitemap:changefreq"/></td>
      </tr>
    </xsl:for-each>
  </table>
</body>
</html>
</xsl:template>
</xsl:stylesheet>
"#
}

#[cfg(test)]
mod tests {
    use lingosite_core::{Alternate, Entry, EntryKind, config::I18nConfig};

    use super::*;

    fn test_config() -> Config {
        let mut config = Config::new("Test Site", "https://example.com");
        config.i18n = I18nConfig {
            locales: vec!["en".into(), "fr".into(), "de".into()],
            base_locale: "en".into(),
            ..Default::default()
        };
        config.sitemap.routes = vec![StaticRoute::new("/"), StaticRoute::new("/about")];
        config
    }

    fn post(locale: &str, slug: &str, alternates: &[(&str, &str)]) -> Entry {
        Entry {
            id: format!("{locale}-{slug}"),
            kind: EntryKind::Post,
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

    #[test]
    fn test_static_route_defaults() {
        let config = test_config();
        let localizer = Localizer::new(&config.i18n);
        let generator = SitemapGenerator::new(&config, &localizer);

        let urls = generator.static_urls();

        assert_eq!(urls.len(), 2);
        let about = &urls[1];
        assert_eq!(about.loc, "https://example.com/about");
        assert_eq!(about.changefreq, ChangeFreq::Monthly);
        assert_eq!(about.priority, 1.0);
        assert_eq!(
            about.alternates,
            vec![
                AlternateLink {
                    hreflang: "fr".into(),
                    href: "https://example.com/fr/about".into()
                },
                AlternateLink {
                    hreflang: "de".into(),
                    href: "https://example.com/de/about".into()
                },
            ]
        );
    }

    #[test]
    fn test_static_route_overrides() {
        let mut config = test_config();
        config.sitemap.routes = vec![StaticRoute {
            path: "/pricing".into(),
            changefreq: Some(ChangeFreq::Weekly),
            priority: Some(0.3),
        }];
        let localizer = Localizer::new(&config.i18n);
        let xml = SitemapGenerator::new(&config, &localizer).generate(&SiteContent::default());

        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.3</priority>"));
    }

    #[test]
    fn test_one_url_per_content_unit() {
        let config = test_config();
        let localizer = Localizer::new(&config.i18n);
        let content = SiteContent::from_entries(vec![
            post("en", "hello", &[("fr", "bonjour"), ("de", "hallo"), ("en", "hello")]),
            post("fr", "bonjour", &[("en", "hello"), ("de", "hallo")]),
            post("de", "hallo", &[("en", "hello"), ("fr", "bonjour")]),
        ]);

        let urls = SitemapGenerator::new(&config, &localizer).entry_urls(&content);

        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].loc, "https://example.com/blog/hello");
        assert_eq!(urls[0].alternates.len(), 2);
        assert_eq!(urls[0].alternates[0].href, "https://example.com/fr/blog/bonjour");
        assert_eq!(urls[0].alternates[1].hreflang, "de");
    }

    #[test]
    fn test_unknown_alternate_locale_skipped() {
        let config = test_config();
        let localizer = Localizer::new(&config.i18n);
        let content = SiteContent::from_entries(vec![post("en", "hello", &[("xx", "zz")])]);

        let urls = SitemapGenerator::new(&config, &localizer).entry_urls(&content);
        assert!(urls[0].alternates.is_empty());
    }

    #[test]
    fn test_generate_sitemap_document() {
        let config = test_config();
        let localizer = Localizer::new(&config.i18n);
        let mut entry = post("en", "hello", &[("fr", "bonjour")]);
        entry.updated = Some(
            DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .expect("date")
                .with_timezone(&Utc),
        );
        let content = SiteContent::from_entries(vec![entry]);

        let xml = SitemapGenerator::new(&config, &localizer).generate(&content);

        assert!(xml.starts_with(r#"<?xml version="1.0""#));
        assert!(xml.contains(r#"href="/sitemap.xsl""#));
        assert!(xml.contains(r#"xmlns:xhtml="http://www.w3.org/1999/xhtml""#));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains(
            r#"<xhtml:link rel="alternate" hreflang="fr" href="https://example.com/fr/blog/bonjour"/>"#
        ));
        assert!(xml.contains("<lastmod>2024-05-01</lastmod>"));
        assert!(xml.contains("<changefreq>monthly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn test_stylesheet_can_be_disabled() {
        let mut config = test_config();
        config.sitemap.stylesheet = false;
        let localizer = Localizer::new(&config.i18n);
        let xml = SitemapGenerator::new(&config, &localizer).generate(&SiteContent::default());
        assert!(!xml.contains("xml-stylesheet"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_clamp_priority() {
        assert_eq!(clamp_priority(1.7), 1.0);
        assert_eq!(clamp_priority(-0.2), 0.0);
        assert_eq!(clamp_priority(f32::NAN), 0.5);
    }

    #[test]
    fn test_priority_keeps_configured_precision() {
        let mut config = test_config();
        config.sitemap.routes = vec![
            StaticRoute {
                path: "/docs".into(),
                changefreq: None,
                priority: Some(0.85),
            },
            StaticRoute {
                path: "/legal".into(),
                changefreq: None,
                priority: Some(0.25),
            },
        ];
        let localizer = Localizer::new(&config.i18n);
        let xml = SitemapGenerator::new(&config, &localizer).generate(&SiteContent::default());

        assert!(xml.contains("<priority>0.85</priority>"), "{xml}");
        assert!(xml.contains("<priority>0.25</priority>"), "{xml}");
        assert_eq!(format_priority(1.0), "1.0");
        assert_eq!(format_priority(0.0), "0.0");
        assert_eq!(format_priority(0.5), "0.5");
    }

    #[test]
    fn test_write_to() {
        let config = test_config();
        let localizer = Localizer::new(&config.i18n);
        let mut out = Vec::new();
        SitemapGenerator::new(&config, &localizer)
            .write_to(&SiteContent::default(), &mut out)
            .expect("write");
        assert!(String::from_utf8(out).expect("utf8").ends_with("</urlset>\n"));
    }
}
