//! Parsing of absolute post dates for archive grouping.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

use crate::extract::DateLocale;

static ABSOLUTE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+(\p{L}{3})\.?\s+(\d{4})\b")
        .expect("invalid date pattern")
});

/// Calendar date of a post as shown on the page ("25 jul 2017 at 21:31").
///
/// Only the leading `D MON YYYY` is read, with month abbreviations from
/// `locale`; any time of day after it is ignored. Returns `None` for relative
/// phrases, unknown months, or impossible calendar dates.
pub fn parse_post_date(raw: &str, locale: &DateLocale) -> Option<NaiveDate> {
    let s = raw.trim().to_lowercase();
    let caps = ABSOLUTE_DATE.captures(&s)?;

    let day: u32 = caps[1].parse().ok()?;
    let month = locale.month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
