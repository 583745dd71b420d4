//! Album photo recovery from thumbnail click handlers.
//!
//! Album thumbnails carry their full-size URLs inside an inline `onclick`
//! handler, JS-escaped and tagged with `type=album`, e.g.
//! `showPhoto('-1_2', {"temp":{"x":"https:\/\/cdn\/a.jpg?size=604x403&amp;type=album"}})`.
//! Each handler may list several sizes; the largest one is kept.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Default substring identifying photo-viewer click handlers.
pub const ALBUM_TRIGGER: &str = "showPhoto";

static ALBUM_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?:\\/\\/[^"' ]+?type=album"#).expect("invalid album url pattern"));

static SIZE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)size=(\d+)x(\d+)").expect("invalid size pattern"));

static ONCLICK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[onclick]").expect("invalid selector"));

/// Undo the JS/HTML escaping found in handler attributes.
pub fn decode_escapes(raw: &str) -> String {
    raw.replace("\\/", "/").replace("&amp;", "&")
}

/// Pixel area from a `size=WxH` parameter, if present.
fn size_area(url: &str) -> Option<u64> {
    let caps = SIZE_PARAM.captures(url)?;
    let w: u64 = caps[1].parse().ok()?;
    let h: u64 = caps[2].parse().ok()?;
    Some(w.saturating_mul(h))
}

/// Pick the candidate with the largest `size=WxH` area.
///
/// Without any size parameter the first candidate wins; an empty slice gives
/// `None`.
pub fn pick_best_album_url(urls: &[String]) -> Option<&str> {
    let mut best: Option<(&str, Option<u64>)> = None;

    for url in urls {
        let area = size_area(url);
        best = match (best, area) {
            (None, _) => Some((url.as_str(), area)),
            (Some((_, None)), Some(_)) => Some((url.as_str(), area)),
            (Some((_, Some(best_area))), Some(a)) if a > best_area => Some((url.as_str(), area)),
            (current, _) => current,
        };
    }

    best.map(|(url, _)| url)
}

/// Decoded album URLs from one handler string.
pub fn album_candidates(onclick: &str) -> Vec<String> {
    ALBUM_URL
        .find_iter(onclick)
        .map(|m| decode_escapes(m.as_str()))
        .collect()
}

/// Recover one full-size URL per album thumbnail inside `post`.
///
/// Elements whose handler lacks `trigger` or any album URL are skipped.
/// The result is unique, in first-seen order.
pub fn recover_album_photos(post: ElementRef<'_>, trigger: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for el in post.select(&ONCLICK) {
        let onclick = el.value().attr("onclick").unwrap_or("");
        if onclick.is_empty() || !onclick.contains(trigger) {
            continue;
        }

        let candidates = album_candidates(onclick);
        if let Some(best) = pick_best_album_url(&candidates)
            && seen.insert(best.to_string())
        {
            out.push(best.to_string());
        }
    }

    out
}
