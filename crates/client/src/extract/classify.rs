//! Emoji vs photo classification for `<img>` elements.
//!
//! Heuristic, first match wins:
//! 1. `src` contains the emoji path marker
//! 2. `alt` is non-empty and at most 4 characters
//! 3. declared `width` or `height` is in (0, 80]
//! 4. `class` contains "emoji"
//!
//! Everything else is a content photo. False positives are expected.

use scraper::ElementRef;

/// Default path segment identifying emoji sprites.
pub const EMOJI_PATH_MARKER: &str = "/emoji/";

const MAX_EMOJI_ALT_CHARS: usize = 4;
const MAX_EMOJI_DIMENSION: f64 = 80.0;

/// Result of classifying one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Emoji,
    Photo,
}

/// The attributes the classifier looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef<'a> {
    pub src: &'a str,
    pub class: &'a str,
    pub alt: &'a str,
    pub width: &'a str,
    pub height: &'a str,
}

impl<'a> ImageRef<'a> {
    /// Read the attributes from an element; missing ones are empty.
    pub fn from_element(el: &ElementRef<'a>) -> Self {
        let attr = |name: &str| -> &'a str { el.value().attr(name).unwrap_or("") };
        Self { src: attr("src"), class: attr("class"), alt: attr("alt"), width: attr("width"), height: attr("height") }
    }
}

/// Numeric value of a dimension attribute; empty counts as 0, junk as absent.
fn dimension(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>().ok()
}

fn is_small(raw: &str) -> bool {
    matches!(dimension(raw), Some(v) if v > 0.0 && v <= MAX_EMOJI_DIMENSION)
}

/// Classify an image using the default emoji path marker.
pub fn classify(img: &ImageRef<'_>) -> ImageKind {
    classify_with_marker(img, EMOJI_PATH_MARKER)
}

/// Classify an image, matching `marker` against the lowercased `src`.
pub fn classify_with_marker(img: &ImageRef<'_>, marker: &str) -> ImageKind {
    if img.src.to_lowercase().contains(marker) {
        return ImageKind::Emoji;
    }

    let alt_len = img.alt.chars().count();
    if alt_len > 0 && alt_len <= MAX_EMOJI_ALT_CHARS {
        return ImageKind::Emoji;
    }

    if is_small(img.width) || is_small(img.height) {
        return ImageKind::Emoji;
    }

    if img.class.to_lowercase().contains("emoji") {
        return ImageKind::Emoji;
    }

    ImageKind::Photo
}
