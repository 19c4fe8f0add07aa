//! Lingosite Core Library
//!
//! Core types, configuration, localization and error handling for Lingosite.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod i18n;

pub use config::{ChangeFreq, Config, StaticRoute};
pub use content::{Alternate, ContentPath, Entry, EntryKind};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use i18n::{Localizer, TextDirection};
