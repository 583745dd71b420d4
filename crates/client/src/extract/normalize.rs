//! Text cleanup and relative date normalization.
//!
//! Post dates arrive either absolute ("25 jul 2017 at 21:31") or relative to
//! the day the page was rendered ("today at 1:10", "yesterday at 23:59").
//! Relative phrases are rewritten into the absolute form using the run date so
//! the stored records stay meaningful later.

use chrono::{Datelike, Days, NaiveDate};
use harvest_core::DateLocaleName;
use regex::Regex;

/// Keyword and month tables for one page language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLocale {
    pub today: &'static str,
    pub yesterday: &'static str,
    /// Word between the date and the time ("at" in "today at 1:10").
    pub at: &'static str,
    /// Three-letter month abbreviations, January first.
    pub months: [&'static str; 12],
    /// Full month names used for archive headings.
    pub month_names: [&'static str; 12],
    /// Heading for posts whose date cannot be parsed.
    pub undated: &'static str,
}

impl DateLocale {
    pub const ENGLISH: DateLocale = DateLocale {
        today: "today",
        yesterday: "yesterday",
        at: "at",
        months: ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"],
        month_names: [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        undated: "Undated",
    };

    pub const RUSSIAN: DateLocale = DateLocale {
        today: "сегодня",
        yesterday: "вчера",
        at: "в",
        months: ["янв", "фев", "мар", "апр", "май", "июн", "июл", "авг", "сен", "окт", "ноя", "дек"],
        month_names: [
            "Январь",
            "Февраль",
            "Март",
            "Апрель",
            "Май",
            "Июнь",
            "Июль",
            "Август",
            "Сентябрь",
            "Октябрь",
            "Ноябрь",
            "Декабрь",
        ],
        undated: "Без даты",
    };

    pub fn from_name(name: DateLocaleName) -> &'static DateLocale {
        match name {
            DateLocaleName::En => &Self::ENGLISH,
            DateLocaleName::Ru => &Self::RUSSIAN,
        }
    }

    /// 1-based month number for an abbreviation, case-insensitive.
    pub fn month_number(&self, abbrev: &str) -> Option<u32> {
        let abbrev = abbrev.to_lowercase();
        self.months
            .iter()
            .position(|m| *m == abbrev)
            .map(|i| i as u32 + 1)
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        Self::ENGLISH
    }
}

/// Replace non-breaking spaces with regular spaces and trim.
pub fn clean_text(s: &str) -> String {
    s.replace('\u{00A0}', " ").trim().to_string()
}

/// Rewrites "today/yesterday at H:MM" into an absolute date.
#[derive(Debug, Clone)]
pub struct RelativeDateNormalizer {
    locale: &'static DateLocale,
    pattern: Regex,
}

impl RelativeDateNormalizer {
    pub fn new(locale: &'static DateLocale) -> Self {
        let pattern = format!(
            r"(?i)^({today}|{yesterday})\s+{at}\s+(\d{{1,2}}):(\d{{2}})$",
            today = regex::escape(locale.today),
            yesterday = regex::escape(locale.yesterday),
            at = regex::escape(locale.at),
        );
        let pattern = Regex::new(&pattern).expect("date pattern built from escaped keywords");
        Self { locale, pattern }
    }

    /// Normalize a date string against `reference` (the run date).
    ///
    /// Renders `DAY MON YEAR at H:MM`, keeping the hour and minute exactly as
    /// written. Anything that is not a relative phrase is returned unchanged.
    pub fn normalize(&self, text: &str, reference: NaiveDate) -> String {
        let cleaned = clean_text(text).to_lowercase();
        if cleaned.is_empty() {
            return text.to_string();
        }

        let Some(caps) = self.pattern.captures(&cleaned) else {
            return text.to_string();
        };

        let date = if &caps[1] == self.locale.yesterday {
            reference.checked_sub_days(Days::new(1))
        } else {
            Some(reference)
        };
        let Some(date) = date else {
            return text.to_string();
        };

        format!(
            "{day} {month} {year} {at} {hour}:{minute}",
            day = date.day(),
            month = self.locale.months[date.month0() as usize],
            year = date.year(),
            at = self.locale.at,
            hour = &caps[2],
            minute = &caps[3],
        )
    }
}

/// One-shot form of [`RelativeDateNormalizer::normalize`].
pub fn normalize_relative_date(text: &str, reference: NaiveDate, locale: &'static DateLocale) -> String {
    RelativeDateNormalizer::new(locale).normalize(text, reference)
}
