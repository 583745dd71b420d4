//! Post extraction from rendered topic pages.
//!
//! Everything here works on parsed HTML (`scraper`), never on a live browser,
//! so it can be tested against fixture markup.
//!
//! ### Pipeline
//! - `classify`: emoji vs content photo for a single `<img>`.
//! - `linearize`: post body to text with `[[EMOJI:<url>]]` markers.
//! - `album`: full-size photo URLs recovered from thumbnail click handlers.
//! - `post`: assembles one [`ExtractedPost`] per post element.
//! - `normalize`: whitespace cleanup and relative date rewriting, applied by
//!   the caller when turning extracted posts into records.

pub mod album;
pub mod classify;
pub mod linearize;
pub mod normalize;
pub mod post;

pub use album::{ALBUM_TRIGGER, pick_best_album_url, recover_album_photos};
pub use classify::{EMOJI_PATH_MARKER, ImageKind, ImageRef, classify};
pub use linearize::{Linearized, emoji_marker, linearize};
pub use normalize::{DateLocale, RelativeDateNormalizer, clean_text, normalize_relative_date};
pub use post::{ExtractedPost, PostExtractor};

/// Selectors and markers describing the topic page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// One element per post (default: `div.bp_post`).
    pub post_selector: String,
    /// Attribute holding the post id (default: `id`).
    pub id_attribute: String,
    /// Prefix stripped from the id attribute (default: `post-`).
    pub id_prefix: String,
    /// Author link inside a post (default: `a.bp_author`).
    pub author_selector: String,
    /// Date link inside a post (default: `a.bp_date`).
    pub date_selector: String,
    /// Body container inside a post (default: `div.bp_text`).
    pub text_selector: String,
    /// Path fragment marking emoji images (default: `/emoji/`).
    pub emoji_marker: String,
    /// `src` fragment marking avatar images (default: `ava=1`).
    pub avatar_marker: String,
    /// Click handler name on album thumbnails (default: `showPhoto`).
    pub album_trigger: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            post_selector: "div.bp_post".into(),
            id_attribute: "id".into(),
            id_prefix: "post-".into(),
            author_selector: "a.bp_author".into(),
            date_selector: "a.bp_date".into(),
            text_selector: "div.bp_text".into(),
            emoji_marker: EMOJI_PATH_MARKER.into(),
            avatar_marker: "ava=1".into(),
            album_trigger: ALBUM_TRIGGER.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three posts: one without text, one with an emoji, one with a photo.
    const TOPIC_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Topic</title></head>
        <body>
            <div class="bp_post" id="post-100_1">
                <a class="bp_author">Empty</a>
                <a class="bp_date">12 mar 2024 at 10:00</a>
                <div class="bp_text"> </div>
            </div>
            <div class="bp_post" id="post-100_2">
                <img class="bp_img" src="https://cdn.example.com/u1.jpg?ava=1">
                <a class="bp_author">Alice</a>
                <a class="bp_date">today at 1:10</a>
                <div class="bp_text">Good morning <img class="emoji" src="https://vk.com/emoji/e/2600.png" alt="☀"></div>
            </div>
            <div class="bp_post" id="post-100_3">
                <img class="bp_img" src="https://cdn.example.com/u2.jpg?ava=1">
                <a class="bp_author">Bob</a>
                <a class="bp_date">yesterday at 23:59</a>
                <div class="bp_text">Our trip<br>Day one<img src="https://cdn.example.com/lake.jpg" width="604" height="403"></div>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_extract_config_default() {
        let config = ExtractConfig::default();
        assert_eq!(config.post_selector, "div.bp_post");
        assert_eq!(config.id_prefix, "post-");
        assert_eq!(config.emoji_marker, "/emoji/");
        assert_eq!(config.avatar_marker, "ava=1");
        assert_eq!(config.album_trigger, "showPhoto");
    }

    #[test]
    fn test_extract_topic_page() {
        let extractor = PostExtractor::new(ExtractConfig::default()).unwrap();
        let posts = extractor.extract_page(TOPIC_PAGE);

        assert_eq!(posts.len(), 2);

        assert_eq!(posts[0].post_id, "100_2");
        assert_eq!(posts[0].author, "Alice");
        assert_eq!(posts[0].text, "Good morning [[EMOJI:https://vk.com/emoji/e/2600.png]]");
        assert_eq!(posts[0].emojis, vec!["https://vk.com/emoji/e/2600.png"]);
        assert!(posts[0].photos.is_empty());

        assert_eq!(posts[1].post_id, "100_3");
        assert_eq!(posts[1].text, "Our trip\nDay one");
        assert!(posts[1].emojis.is_empty());
        assert_eq!(posts[1].photos, vec!["https://cdn.example.com/lake.jpg"]);
    }

    #[test]
    fn test_extract_empty_page() {
        let extractor = PostExtractor::new(ExtractConfig::default()).unwrap();
        assert!(extractor.extract_page("").is_empty());
        assert!(extractor.extract_page("<html><body><p>login</p></body></html>").is_empty());
    }
}
