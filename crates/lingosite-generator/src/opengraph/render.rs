//! Layout tree to SVG, SVG to PNG.

use std::{fmt::Write as _, sync::Arc};

use lingosite_core::{TextDirection, config::OpenGraphConfig};
use resvg::{
    tiny_skia,
    usvg::{self, fontdb},
};
use thiserror::Error;
use tracing::{debug, warn};

use super::layout::LayoutNode;
use crate::sitemap::escape_xml;

/// Average glyph advance as a fraction of the font size, used for wrapping.
const AVERAGE_ADVANCE: f32 = 0.55;

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The generated SVG was rejected by the parser.
    #[error("SVG error: {0}")]
    Svg(String),

    /// The canvas could not be allocated.
    #[error("invalid canvas size {width}x{height}")]
    Canvas { width: u32, height: u32 },

    /// PNG encoding failed.
    #[error("PNG encoding error: {0}")]
    Encode(String),
}

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Renders layout trees into SVG and PNG.
#[derive(Debug, Clone, Copy)]
pub struct OpenGraphRenderer {
    width: u32,
    height: u32,
}

/// Area available to a node.
struct Frame {
    x: f32,
    width: f32,
    direction: TextDirection,
    color: String,
}

impl OpenGraphRenderer {
    /// Renderer for a `width` x `height` canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Renderer sized from configuration.
    #[must_use]
    pub fn from_config(config: &OpenGraphConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// Lay the tree out into an SVG document using `font_family` for text.
    pub fn render_svg(&self, tree: &LayoutNode, font_family: &str) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        svg.push('\n');

        let frame = Frame {
            x: 0.0,
            width: self.width as f32,
            direction: TextDirection::Ltr,
            color: "#000000".to_string(),
        };
        layout_node(tree, &frame, 0.0, &escape_xml(font_family), &mut svg);

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize the tree into PNG bytes using the given font file.
    ///
    /// Font data without usable faces is not an error; text is then dropped
    /// by the rasterizer.
    pub fn render_png(&self, tree: &LayoutNode, font: &[u8]) -> Result<Vec<u8>> {
        let mut pixmap =
            tiny_skia::Pixmap::new(self.width, self.height).ok_or(RenderError::Canvas {
                width: self.width,
                height: self.height,
            })?;

        let mut db = fontdb::Database::new();
        db.load_font_data(font.to_vec());
        if db.len() == 0 {
            warn!(bytes = font.len(), "font data contained no usable faces");
        }

        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "sans-serif".to_string());
        debug!(%family, "rendering OpenGraph card");

        let svg = self.render_svg(tree, &family);

        let mut options = usvg::Options::default();
        options.font_family = family;
        options.fontdb = Arc::new(db);

        let svg_tree =
            usvg::Tree::from_str(&svg, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

        resvg::render(&svg_tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

/// Emit `node` at vertical offset `y`; returns the height it occupies.
fn layout_node(node: &LayoutNode, frame: &Frame, y: f32, family: &str, out: &mut String) -> f32 {
    match node {
        LayoutNode::Box { style, children } => {
            let width = style.width.unwrap_or(frame.width).min(frame.width);
            let direction = style.direction.unwrap_or(frame.direction);
            let x = match direction {
                TextDirection::Ltr => frame.x,
                TextDirection::Rtl => frame.x + frame.width - width,
            };
            let inner = Frame {
                x: x + style.padding,
                width: (width - 2.0 * style.padding).max(0.0),
                direction,
                color: style.color.clone().unwrap_or_else(|| frame.color.clone()),
            };

            let mut body = String::new();
            let mut cursor = y + style.padding;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    cursor += style.gap;
                }
                cursor += layout_node(child, &inner, cursor, family, &mut body);
            }
            let height = style.height.unwrap_or(cursor - y + style.padding);

            if let Some(background) = &style.background {
                let _ = writeln!(
                    out,
                    r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
                    escape_xml(background)
                );
            }
            out.push_str(&body);
            height
        }
        LayoutNode::Heading { style, text } | LayoutNode::Paragraph { style, text } => {
            let direction = style.direction.unwrap_or(frame.direction);
            let color = style.color.as_deref().unwrap_or(&frame.color);
            let max_chars =
                ((frame.width / (style.font_size * AVERAGE_ADVANCE)).floor() as usize).max(1);
            let lines = wrap_text(text, max_chars, style.max_lines);
            let line_px = style.font_size * style.line_height;

            let (x, anchor) = match direction {
                TextDirection::Ltr => (frame.x, "start"),
                TextDirection::Rtl => (frame.x + frame.width, "end"),
            };

            for (i, line) in lines.iter().enumerate() {
                let baseline = y + style.font_size + i as f32 * line_px;
                let _ = writeln!(
                    out,
                    r#"<text x="{x}" y="{baseline}" font-family="{family}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{anchor}" direction="{}">{}</text>"#,
                    style.font_size,
                    style.font_weight,
                    escape_xml(color),
                    direction.as_str(),
                    escape_xml(line)
                );
            }
            lines.len() as f32 * line_px
        }
    }
}

/// Greedy word wrap to `max_chars` per line, truncating with an ellipsis
/// after `max_lines`.
pub fn wrap_text(text: &str, max_chars: usize, max_lines: Option<usize>) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if let Some(max) = max_lines
        && lines.len() > max
    {
        lines.truncate(max);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(max_chars.saturating_sub(1)).collect();
            *last = format!("{}…", kept.trim_end());
        }
    }

    lines
}
