//! OpenGraph card images.
//!
//! A card is described as a small [`LayoutNode`] tree, laid out into SVG and
//! rasterized to PNG with resvg. Text direction follows the page locale.

mod font;
mod layout;
mod render;

pub use font::{FontError, FontSource};
pub use layout::{LayoutNode, OpenGraphRequest, Style, build_layout};
use lingosite_core::{Config, Entry, Localizer};
pub use render::{OpenGraphRenderer, RenderError, wrap_text};
use thiserror::Error;
use tracing::info;

/// OpenGraph generation errors.
#[derive(Debug, Error)]
pub enum OpenGraphError {
    /// The font could not be retrieved.
    #[error(transparent)]
    Font(#[from] FontError),

    /// The card could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for OpenGraph generation.
pub type Result<T> = std::result::Result<T, OpenGraphError>;

/// File name of the card for page `id`.
#[must_use]
pub fn image_name(id: &str) -> String {
    format!("opengraph-page-{id}.png")
}

/// Extract the page id from a card file name.
#[must_use]
pub fn parse_image_name(name: &str) -> Option<&str> {
    name.strip_prefix("opengraph-page-")
        .and_then(|rest| rest.strip_suffix(".png"))
        .filter(|id| !id.is_empty())
}

/// Render the card for `entry` using already loaded font data.
pub fn render_entry_card(
    entry: &Entry,
    config: &Config,
    localizer: &Localizer,
    font: &[u8],
) -> Result<Vec<u8>> {
    let request = OpenGraphRequest::from_entry(entry, localizer);
    let tree = build_layout(&request, &config.opengraph, &config.site.title);
    let png = OpenGraphRenderer::from_config(&config.opengraph).render_png(&tree, font)?;

    info!(id = %entry.id, locale = %entry.locale, bytes = png.len(), "rendered OpenGraph card");
    Ok(png)
}
