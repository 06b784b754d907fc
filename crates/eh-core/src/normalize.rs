//! Field normalizers shared by the Event and Booking pipelines.
//!
//! Every normalizer is idempotent: feeding its own output back in returns the
//! same value.

use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::ValidationError;

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid slug regex"));

static TIME_12H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(1[0-2]|0?[1-9]):([0-5][0-9])\s?(AM|PM)$").expect("invalid 12h time regex")
});

static TIME_24H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("invalid 24h time regex")
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const DATETIME_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]"),
    format_description!("[month repr:long case_sensitive:false] [day padding:none] [year]"),
    format_description!("[month repr:short case_sensitive:false] [day padding:none], [year]"),
    format_description!("[month repr:short case_sensitive:false] [day padding:none] [year]"),
    format_description!("[day padding:none] [month repr:long case_sensitive:false] [year]"),
    format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
];

/// Derive a URL-safe slug: lowercase, runs of anything outside `[a-z0-9]`
/// collapsed to one hyphen, no leading or trailing hyphen.
///
/// Returns an empty string when the title has no ASCII letters or digits.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_owned()
}

/// Parse a calendar date and render it as `YYYY-MM-DD`.
///
/// Timestamps keep the calendar day as written in their own offset; no UTC
/// shift is applied.
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidDate(input.to_owned());
    let date = parse_date(input.trim()).ok_or_else(invalid)?;
    date.format(ISO_DATE).map_err(|_| invalid())
}

fn parse_date(s: &str) -> Option<Date> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(dt.date());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(s, *fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| DATE_FORMATS.iter().find_map(|fmt| Date::parse(s, *fmt).ok()))
}

/// Normalize `HH:MM` (24h) or `H:MM AM/PM` (12h) into 24h `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();

    if let Some(caps) = TIME_12H_RE.captures(trimmed) {
        let hours: u8 = caps[1]
            .parse()
            .map_err(|_| ValidationError::InvalidTime(input.to_owned()))?;
        let pm = caps[3].eq_ignore_ascii_case("PM");
        let hours = match (hours, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
        return Ok(format!("{:02}:{}", hours, &caps[2]));
    }

    let caps = TIME_24H_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidTime(input.to_owned()))?;
    Ok(format!("{:0>2}:{}", &caps[1], &caps[2]))
}

/// Trim and lowercase an email address, then check its `local@domain.tld` shape.
pub fn normalize_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail(input.trim().to_owned()));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_clean_slug(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("React Summit 2026"), "react-summit-2026");
        assert_eq!(slugify("KubeCon + CloudNativeCon Europe 2026"), "kubecon-cloudnativecon-europe-2026");
        assert_eq!(slugify("  AWS re:Invent 2025!! "), "aws-re-invent-2025");
        assert_eq!(slugify("--Next.js Conf--"), "next-js-conf");
        assert_eq!(slugify("!!! ??? ***"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slugify_is_idempotent_and_clean() {
        let titles = [
            "React Summit 2026",
            "PyCon US 2026 — Pittsburgh",
            "HackMIT   2026",
            "Google Cloud Next '26",
            "Café & Code",
            "__init__ conf",
        ];
        for title in titles {
            let slug = slugify(title);
            assert!(is_clean_slug(&slug), "{:?} -> {:?}", title, slug);
            assert_eq!(slugify(&slug), slug);
            assert_eq!(slugify(title), slug);
        }
    }

    #[test]
    fn normalize_date_formats() {
        let cases = [
            "2026-06-12",
            "2026-6-12",
            "2026/06/12",
            "06/12/2026",
            "June 12, 2026",
            "june 12 2026",
            "Jun 12, 2026",
            "12 June 2026",
            "2026-06-12T09:00:00",
            "2026-06-12 18:30",
            "2026-06-12T23:30:00-05:00",
            "  2026-06-12  ",
        ];
        for input in cases {
            assert_eq!(normalize_date(input).unwrap(), "2026-06-12", "input {:?}", input);
        }
    }

    #[test]
    fn normalize_date_keeps_local_day() {
        // 23:30 at -05:00 is already the 13th in UTC.
        assert_eq!(normalize_date("2026-06-12T23:30:00-05:00").unwrap(), "2026-06-12");
        assert_eq!(normalize_date("2026-06-13T01:00:00+09:00").unwrap(), "2026-06-13");
    }

    #[test]
    fn normalize_date_rejects_garbage() {
        for input in ["not-a-date", "", "2026-13-01", "2026-02-30", "June 40, 2026", "12:30"] {
            assert_eq!(
                normalize_date(input).unwrap_err(),
                ValidationError::InvalidDate(input.to_owned()),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn normalize_time_formats() {
        assert_eq!(normalize_time("2:30 PM").unwrap(), "14:30");
        assert_eq!(normalize_time("14:30").unwrap(), "14:30");
        assert_eq!(normalize_time("12:00 AM").unwrap(), "00:00");
        assert_eq!(normalize_time("12:15 pm").unwrap(), "12:15");
        assert_eq!(normalize_time("09:05am").unwrap(), "09:05");
        assert_eq!(normalize_time("11:59 PM").unwrap(), "23:59");
        assert_eq!(normalize_time("9:00").unwrap(), "09:00");
        assert_eq!(normalize_time(" 00:00 ").unwrap(), "00:00");
    }

    #[test]
    fn normalize_time_rejects_garbage() {
        for input in ["25:00", "24:00", "12:60", "13:00 PM", "0:30 AM", "noon", "14:30:00", ""] {
            assert!(normalize_time(input).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn normalizers_are_idempotent() {
        let date = normalize_date("June 12, 2026").unwrap();
        assert_eq!(normalize_date(&date).unwrap(), date);

        let time = normalize_time("2:30 PM").unwrap();
        assert_eq!(normalize_time(&time).unwrap(), time);

        let email = normalize_email("  Ada@Example.COM ").unwrap();
        assert_eq!(email, "ada@example.com");
        assert_eq!(normalize_email(&email).unwrap(), email);
    }

    #[test]
    fn normalize_email_shape() {
        for bad in ["", "ada", "ada@", "@example.com", "ada@example", "a da@example.com", "ada@@example.com"] {
            assert!(normalize_email(bad).is_err(), "input {:?}", bad);
        }
        assert!(normalize_email("first.last+tag@sub.example.co.uk").is_ok());
    }
}
