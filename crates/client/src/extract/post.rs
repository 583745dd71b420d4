//! Per-post extraction from a rendered topic page.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use super::ExtractConfig;
use super::album::recover_album_photos;
use super::linearize::linearize;
use super::normalize::clean_text;
use harvest_core::Error;

/// Raw post as read from the page, before record normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPost {
    pub post_id: String,
    pub author: String,
    pub date_text: String,
    /// Linearized body with emoji markers.
    pub text: String,
    pub emojis: Vec<String>,
    pub photos: Vec<String>,
}

/// Order-preserving union without empty entries.
fn unique<'a>(lists: impl IntoIterator<Item = &'a [String]>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for url in lists.into_iter().flatten() {
        if !url.is_empty() && seen.insert(url.as_str()) {
            out.push(url.clone());
        }
    }
    out
}

fn parse_selector(field: &str, raw: &str) -> Result<Selector, Error> {
    Selector::parse(raw).map_err(|e| Error::InvalidInput(format!("{field} selector {raw:?}: {e}")))
}

/// Compiled selectors and markers for one page layout.
#[derive(Debug, Clone)]
pub struct PostExtractor {
    config: ExtractConfig,
    post: Selector,
    author: Selector,
    date: Selector,
    text: Selector,
    img: Selector,
}

impl PostExtractor {
    /// Compile the selectors in `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if any selector fails to parse.
    pub fn new(config: ExtractConfig) -> Result<Self, Error> {
        Ok(Self {
            post: parse_selector("post", &config.post_selector)?,
            author: parse_selector("author", &config.author_selector)?,
            date: parse_selector("date", &config.date_selector)?,
            text: parse_selector("text", &config.text_selector)?,
            img: parse_selector("img", "img")?,
            config,
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract every post with non-empty text from a full page.
    pub fn extract_page(&self, html: &str) -> Vec<ExtractedPost> {
        let document = Html::parse_document(html);
        let posts: Vec<ExtractedPost> = document
            .select(&self.post)
            .filter_map(|post| self.extract_post(post))
            .collect();

        tracing::debug!(count = posts.len(), "extracted posts from page");
        posts
    }

    fn first_text(&self, post: ElementRef<'_>, selector: &Selector) -> String {
        post.select(selector)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .unwrap_or_default()
    }

    /// Extract one post element; `None` when its body text is empty.
    pub fn extract_post(&self, post: ElementRef<'_>) -> Option<ExtractedPost> {
        let cfg = &self.config;

        let raw_id = post.value().attr(&cfg.id_attribute).unwrap_or("");
        let post_id = raw_id.replacen(&cfg.id_prefix, "", 1);
        let author = self.first_text(post, &self.author);
        let date_text = self.first_text(post, &self.date);

        let body = linearize(post.select(&self.text).next(), &cfg.emoji_marker);
        if body.text.is_empty() {
            return None;
        }

        // Second, coarser pass over every image in the post: avatars are
        // skipped and only the path marker separates emoji from photos.
        let mut rescan_emojis = Vec::new();
        let mut rescan_photos = Vec::new();
        for img in post.select(&self.img) {
            let src = img.value().attr("src").unwrap_or("");
            if src.is_empty() || src.contains(&cfg.avatar_marker) {
                continue;
            }
            if src.to_lowercase().contains(&cfg.emoji_marker) {
                rescan_emojis.push(src.to_string());
            } else {
                rescan_photos.push(src.to_string());
            }
        }

        let album = recover_album_photos(post, &cfg.album_trigger);

        Some(ExtractedPost {
            post_id,
            author,
            date_text,
            emojis: unique([body.emojis.as_slice(), rescan_emojis.as_slice()]),
            photos: unique([body.photos.as_slice(), rescan_photos.as_slice(), album.as_slice()]),
            text: body.text,
        })
    }
}
