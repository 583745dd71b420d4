//! Client code for forum-harvest.
//!
//! This crate provides post extraction from rendered topic pages, the
//! Markdown archive export, and the browser driver used by the CLI.

pub mod export;
pub mod extract;
pub mod render;

pub use export::{ArchiveOptions, render_archive};
pub use extract::{
    DateLocale, ExtractConfig, ExtractedPost, PostExtractor, RelativeDateNormalizer, clean_text,
    normalize_relative_date,
};
pub use render::{LaunchOptions, PageDriver, RenderError};

#[cfg(feature = "render")]
pub use render::BrowserSession;
