//! Markdown archive export for harvested records.
//!
//! Posts are grouped by year, then month, in the order they first appear.
//! Frontmatter format:
//! ```yaml
//! ---
//! title: <archive title>
//! source: <records file>
//! generated_at: <ISO8601 timestamp>
//! records: <count>
//! ---
//! ```

pub mod dates;

pub use dates::parse_post_date;

use chrono::{DateTime, Datelike, Utc};
use harvest_core::PostRecord;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

use crate::extract::DateLocale;

static EMOJI_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[EMOJI:(.+?)\]\]").expect("invalid emoji marker pattern"));

/// Options for [`render_archive`].
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub title: String,
    /// Where the records came from, shown in the header.
    pub source: String,
    /// Origin used to resolve `/path` and `//host` URLs.
    pub base_url: Url,
    pub generated_at: DateTime<Utc>,
}

/// Resolve relative image URLs against `base`; absolute URLs pass through.
pub fn resolve_url(raw: &str, base: &Url) -> String {
    let u = raw.trim();
    if u.starts_with("//") {
        return format!("{}:{u}", base.scheme());
    }
    if u.starts_with('/') {
        return base.join(u).map(|j| j.to_string()).unwrap_or_else(|_| u.to_string());
    }
    u.to_string()
}

/// Escape special YAML characters in a string.
fn escape_yaml(s: &str) -> String {
    if s.contains('\n') || s.contains(':') && s.len() > 1 {
        let escaped = s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
        format!("\"{escaped}\"")
    } else if s.is_empty() {
        "\"\"".to_string()
    } else {
        s.to_string()
    }
}

/// One text line with emoji markers turned into inline images.
fn render_line(line: &str, base: &Url) -> String {
    EMOJI_MARKER
        .replace_all(line, |caps: &Captures| format!("![]({})", resolve_url(&caps[1], base)))
        .into_owned()
}

fn render_post(out: &mut String, record: &PostRecord, locale: &DateLocale, base: &Url) {
    let heading = record.date.trim();
    let heading = if heading.is_empty() { locale.undated } else { heading };
    out.push_str(&format!("### {heading}\n\n"));

    let text = record.text.replace("\r\n", "\n").replace('\r', "\n");
    for line in text.split('\n') {
        if line.trim().is_empty() {
            out.push('\n');
            continue;
        }
        out.push_str(&render_line(line, base));
        out.push_str("  \n");
    }
    out.push('\n');

    if !record.photos.is_empty() {
        out.push_str("**Photos:**\n\n");
        for photo in &record.photos {
            out.push_str(&format!("![photo]({})\n\n", resolve_url(photo, base)));
        }
    }
}

/// Group key: (year heading, month heading).
fn group_of(record: &PostRecord, locale: &DateLocale) -> (String, String) {
    match parse_post_date(&record.date, locale) {
        Some(date) => (date.year().to_string(), locale.month_names[date.month0() as usize].to_string()),
        None => (locale.undated.to_string(), locale.undated.to_string()),
    }
}

/// Render records into a Markdown archive.
pub fn render_archive(records: &[PostRecord], locale: &DateLocale, opts: &ArchiveOptions) -> String {
    // year -> month -> records, all in first-seen order
    let mut groups: Vec<(String, Vec<(String, Vec<&PostRecord>)>)> = Vec::new();

    for record in records.iter().filter(|r| !r.text.trim().is_empty()) {
        let (year, month) = group_of(record, locale);

        let year_idx = match groups.iter().position(|(y, _)| *y == year) {
            Some(i) => i,
            None => {
                groups.push((year, Vec::new()));
                groups.len() - 1
            }
        };
        let months = &mut groups[year_idx].1;
        let month_idx = match months.iter().position(|(m, _)| *m == month) {
            Some(i) => i,
            None => {
                months.push((month, Vec::new()));
                months.len() - 1
            }
        };
        months[month_idx].1.push(record);
    }

    let mut out = format!(
        "---\ntitle: {title}\nsource: {source}\ngenerated_at: {timestamp}\nrecords: {count}\n---\n\n",
        title = escape_yaml(&opts.title),
        source = escape_yaml(&opts.source),
        timestamp = opts.generated_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        count = records.len(),
    );

    for (year, months) in &groups {
        out.push_str(&format!("# {year}\n\n"));
        for (month, posts) in months {
            out.push_str(&format!("## {month}\n\n"));
            for record in posts {
                render_post(&mut out, record, locale, &opts.base_url);
            }
        }
    }

    out.trim_end().to_string() + "\n"
}
