//! Date/time parsing and formatting for date and date-time fields.
//!
//! Display patterns use the `dd.MM.yyyy HH:mm` token style found in the
//! settings. A [`DatePattern`] translates such a pattern into a chrono format
//! string and into a digit regex (every pattern letter becomes `\d`). The
//! regex keeps parsing strict: `26.12.2` is an unfinished entry, not the year 2.
//!
//! Fields only use the contract exposed here: parse from ISO-8601, parse from
//! a pattern, format to a pattern, and the validity reported as `Option`.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d{4}-\d{2}-\d{2}([T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?)?$",
    )
    .expect("valid regex")
});

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Output format for ISO-8601 date-times.
pub const ISO_DATETIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Output format for ISO-8601 dates.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Returns `true` if `s` looks like an ISO-8601 date or date-time.
pub fn is_iso(s: &str) -> bool {
    ISO_RE.is_match(s)
}

/// Parses an ISO-8601 date or date-time.
///
/// Offsets are accepted and dropped: the wall-clock time is kept as written.
pub fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if !is_iso(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_local());
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, ISO_DATE)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// A display pattern such as `dd.MM.yyyy HH:mm`.
#[derive(Debug, Clone)]
pub struct DatePattern {
    pattern: String,
    chrono_format: String,
    exact: Regex,
    search: Regex,
    has_date: bool,
    has_time: bool,
}

impl DatePattern {
    /// Compiles a display pattern.
    ///
    /// Recognized tokens: `yyyy`, `yy`, `MM`, `dd`, `HH`, `mm`, `ss`. Any other
    /// character is a literal.
    pub fn new(pattern: &str) -> Self {
        let body = digit_regex(pattern);
        Self {
            pattern: pattern.to_string(),
            chrono_format: to_chrono_format(pattern),
            exact: Regex::new(&format!("^{body}$")).expect("escaped pattern is a valid regex"),
            search: Regex::new(&body).expect("escaped pattern is a valid regex"),
            has_date: pattern.contains('d') || pattern.contains('y'),
            has_time: pattern.contains('H'),
        }
    }

    /// The pattern as written in the settings.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// The equivalent chrono format string.
    pub fn chrono_format(&self) -> &str {
        &self.chrono_format
    }

    /// Parses `s`, which must match the pattern exactly.
    ///
    /// A date-only pattern yields midnight; a time-only pattern yields the
    /// time on 1970-01-01.
    pub fn parse(&self, s: &str) -> Option<NaiveDateTime> {
        if !self.exact.is_match(s) {
            return None;
        }
        match (self.has_date, self.has_time) {
            (true, true) => NaiveDateTime::parse_from_str(s, &self.chrono_format).ok(),
            (true, false) => NaiveDate::parse_from_str(s, &self.chrono_format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN)),
            (false, true) => NaiveTime::parse_from_str(s, &self.chrono_format)
                .ok()
                .map(|t| NaiveDate::default().and_time(t)),
            (false, false) => None,
        }
    }

    /// Locates the first pattern-shaped substring of `s` and parses it.
    pub fn find(&self, s: &str) -> Option<NaiveDateTime> {
        self.search
            .find_iter(s)
            .find_map(|m| self.parse(m.as_str()))
    }

    /// Formats a date-time with this pattern.
    pub fn format(&self, dt: &NaiveDateTime) -> String {
        dt.format(&self.chrono_format).to_string()
    }
}

/// Translates pattern tokens to chrono specifiers.
fn to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let spec = match (c, run) {
            ('y', 4) => Some("%Y"),
            ('y', 2) => Some("%y"),
            ('M', 2) => Some("%m"),
            ('d', 2) => Some("%d"),
            ('H', 2) => Some("%H"),
            ('m', 2) => Some("%M"),
            ('s', 2) => Some("%S"),
            _ => None,
        };
        if let Some(spec) = spec {
            out.push_str(spec);
            i += run;
        } else {
            if c == '%' {
                out.push('%');
            }
            out.push(c);
            i += 1;
        }
    }
    out
}

/// Builds the digit regex: letters become `\d`, everything else is escaped.
fn digit_regex(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| {
            if c.is_ascii_alphabetic() {
                r"\d".to_string()
            } else {
                regex::escape(&c.to_string())
            }
        })
        .collect()
}

/// Splits a date-time pattern into its date part and its time part.
///
/// `("dd.MM.yyyy HH:mm", "dd.MM.yyyy")` gives `"HH:mm"`. When the date
/// pattern is not a prefix, the time part starts at the first `H`.
pub fn time_part(datetime_pattern: &str, date_pattern: &str) -> String {
    datetime_pattern
        .strip_prefix(date_pattern)
        .map(str::to_string)
        .or_else(|| {
            datetime_pattern
                .find('H')
                .map(|i| datetime_pattern[i..].to_string())
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}
