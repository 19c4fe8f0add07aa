//! Declarative layout tree for OpenGraph cards.

use lingosite_core::{Entry, Localizer, TextDirection, config::OpenGraphConfig};

/// Input for one OpenGraph card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenGraphRequest {
    /// Page id.
    pub id: String,

    /// Page title.
    pub title: String,

    /// Page description.
    pub description: Option<String>,

    /// Locale of the page.
    pub locale: String,

    /// Text direction derived from the locale.
    pub direction: TextDirection,
}

impl OpenGraphRequest {
    /// Build a request for a content entry.
    pub fn from_entry(entry: &Entry, localizer: &Localizer) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            locale: entry.locale.clone(),
            direction: localizer.direction(&entry.locale),
        }
    }
}

/// Inline style of a layout node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub background: Option<String>,
    pub color: Option<String>,
    pub font_size: f32,
    pub font_weight: u16,
    pub line_height: f32,
    pub padding: f32,
    /// Vertical space between children.
    pub gap: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Lines kept before truncating with an ellipsis.
    pub max_lines: Option<usize>,
    /// Inherited by children when unset on them.
    pub direction: Option<TextDirection>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            background: None,
            color: None,
            font_size: 16.0,
            font_weight: 400,
            line_height: 1.2,
            padding: 0.0,
            gap: 0.0,
            width: None,
            height: None,
            max_lines: None,
            direction: None,
        }
    }
}

/// A node of the card layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// Container stacking its children vertically.
    Box {
        style: Style,
        children: Vec<LayoutNode>,
    },
    /// Title text.
    Heading { style: Style, text: String },
    /// Body text.
    Paragraph { style: Style, text: String },
}

impl LayoutNode {
    /// Style of the node.
    pub fn style(&self) -> &Style {
        match self {
            Self::Box { style, .. }
            | Self::Heading { style, .. }
            | Self::Paragraph { style, .. } => style,
        }
    }
}

/// Build the card tree for `request`.
///
/// The tree is a full-size box holding the site name, an accent bar, the
/// title and, when present, the description.
pub fn build_layout(
    request: &OpenGraphRequest,
    config: &OpenGraphConfig,
    site_title: &str,
) -> LayoutNode {
    let mut children = vec![
        LayoutNode::Paragraph {
            style: Style {
                color: Some(config.accent.clone()),
                font_size: 28.0,
                font_weight: 600,
                ..Style::default()
            },
            text: site_title.to_string(),
        },
        LayoutNode::Box {
            style: Style {
                background: Some(config.accent.clone()),
                width: Some(120.0),
                height: Some(8.0),
                ..Style::default()
            },
            children: Vec::new(),
        },
        LayoutNode::Heading {
            style: Style {
                font_size: 64.0,
                font_weight: 700,
                line_height: 1.15,
                max_lines: Some(3),
                ..Style::default()
            },
            text: request.title.clone(),
        },
    ];

    if let Some(description) = request.description.as_deref().filter(|d| !d.trim().is_empty()) {
        children.push(LayoutNode::Paragraph {
            style: Style {
                font_size: 32.0,
                line_height: 1.4,
                max_lines: Some(3),
                ..Style::default()
            },
            text: description.to_string(),
        });
    }

    LayoutNode::Box {
        style: Style {
            background: Some(config.background.clone()),
            color: Some(config.foreground.clone()),
            padding: 80.0,
            gap: 32.0,
            width: Some(config.width as f32),
            height: Some(config.height as f32),
            direction: Some(request.direction),
            ..Style::default()
        },
        children,
    }
}
