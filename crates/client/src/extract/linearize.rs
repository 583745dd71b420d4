//! Flatten a post body into text with inline emoji markers.
//!
//! The walk reads the parsed tree and builds a new string, so the source
//! document is never modified. Emoji images become `[[EMOJI:<url>]]`, photo
//! images are dropped from the text and collected, `<br>` becomes `\n`.

use scraper::{ElementRef, Node};

use super::classify::{ImageKind, ImageRef, classify_with_marker};
use super::normalize::clean_text;

/// Inline marker substituted for an emoji image.
pub fn emoji_marker(url: &str) -> String {
    format!("[[EMOJI:{url}]]")
}

/// Output of [`linearize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Linearized {
    pub text: String,
    /// Emoji URLs in document order, duplicates kept.
    pub emojis: Vec<String>,
    /// Photo URLs in document order, duplicates kept.
    pub photos: Vec<String>,
}

/// Linearize `root` using `emoji_marker_path` for classification.
///
/// `None` (no content container) yields an empty result.
pub fn linearize(root: Option<ElementRef<'_>>, emoji_marker_path: &str) -> Linearized {
    let Some(root) = root else {
        return Linearized::default();
    };

    let mut out = Linearized::default();
    let mut text = String::new();
    walk(root, emoji_marker_path, &mut text, &mut out);
    out.text = clean_text(&text);
    out
}

fn walk(el: ElementRef<'_>, marker: &str, text: &mut String, out: &mut Linearized) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match child_el.value().name() {
                    "img" => push_image(child_el, marker, text, out),
                    "br" => text.push('\n'),
                    _ => walk(child_el, marker, text, out),
                }
            }
            _ => {}
        }
    }
}

fn push_image(img: ElementRef<'_>, marker: &str, text: &mut String, out: &mut Linearized) {
    let image = ImageRef::from_element(&img);
    if image.src.is_empty() {
        return;
    }

    match classify_with_marker(&image, marker) {
        ImageKind::Emoji => {
            text.push_str(&emoji_marker(image.src));
            out.emojis.push(image.src.to_string());
        }
        ImageKind::Photo => out.photos.push(image.src.to_string()),
    }
}
