//! Layer 6 — date-of-birth extraction (spec §4.2).
//!
//! Recognizes `DD.MM.YYYY`, `DD/MM/YYYY`, `YYYY-MM-DD`, and the textual
//! `DD month YYYY` form in Russian/Ukrainian/English, anchored to a
//! preceding DOB marker token (`д.р.`, `дата народження`, `born`, `dob`)
//! when one is present within a short window, otherwise emitted with a
//! lower confidence as an unanchored date.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DateOfBirth, DatePrecision};

static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[./](\d{1,2})[./](\d{4})\b|\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());

/// `15 марта 1980` / `15 березня 1980` — Cyrillic textual month, RU/UK
/// case endings folded by matching on the invariant stem.
static TEXTUAL_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s+([а-яіїєґ]+)\s+(\d{4})\b").unwrap()
});

static DOB_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)д\.?\s*р\.?|дата\s+народження|дата\s+рождения|\bdob\b|\bborn\b").unwrap()
});

const MONTH_WINDOW_CHARS: usize = 24;

/// RU/UK month-name stems (lower-cased, diacritic-free), indexed 1-12.
/// Matched by prefix so genitive/other case endings (`марта`, `березня`)
/// still resolve.
const MONTH_STEMS: [&str; 12] = [
    "янв", "фев", "мар", "апр", "ма", "июн", "июл", "авг", "сен", "окт", "ноя", "дек",
];
const MONTH_STEMS_UK: [&str; 12] = [
    "січ", "лют", "берез", "квіт", "трав", "черв", "лип", "серп", "верес", "жовт", "листопад", "груд",
];

fn month_from_stem(word: &str) -> Option<u32> {
    let w = word.to_lowercase();
    for (i, stem) in MONTH_STEMS_UK.iter().enumerate() {
        if w.starts_with(stem) {
            return Some(i as u32 + 1);
        }
    }
    for (i, stem) in MONTH_STEMS.iter().enumerate() {
        if w.starts_with(stem) {
            return Some(i as u32 + 1);
        }
    }
    None
}

/// Extract DOB candidates from `text`. Each candidate carries `anchored`
/// implicitly via its confidence: anchored matches score 0.9, unanchored
/// numeric dates score 0.4 (§4.2 "a bare date is weak evidence").
pub fn extract(text: &str) -> Vec<DateOfBirth> {
    let markers: Vec<(usize, usize)> = DOB_MARKER.find_iter(text).map(|m| (m.start(), m.end())).collect();
    let mut out = Vec::new();

    for caps in NUMERIC_DATE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let (y, m, d) = if let Some(y) = caps.get(4) {
            (
                y.as_str().parse::<i32>().unwrap_or(0),
                caps.get(5).unwrap().as_str().parse::<u32>().unwrap_or(0),
                caps.get(6).unwrap().as_str().parse::<u32>().unwrap_or(0),
            )
        } else {
            (
                caps.get(3).unwrap().as_str().parse::<i32>().unwrap_or(0),
                caps.get(2).unwrap().as_str().parse::<u32>().unwrap_or(0),
                caps.get(1).unwrap().as_str().parse::<u32>().unwrap_or(0),
            )
        };

        if !is_plausible_date(y, m, d) {
            continue;
        }

        let anchored = is_anchored(&markers, whole.start(), whole.end());

        out.push(DateOfBirth {
            value: format!("{y:04}-{m:02}-{d:02}"),
            precision: DatePrecision::Day,
            confidence: if anchored { 0.9 } else { 0.4 },
            raw: whole.as_str().to_string(),
        });
    }

    for caps in TEXTUAL_DATE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        let day: u32 = caps.get(1).unwrap().as_str().parse().unwrap_or(0);
        let month_word = caps.get(2).unwrap().as_str();
        let year: i32 = caps.get(3).unwrap().as_str().parse().unwrap_or(0);

        let Some(month) = month_from_stem(month_word) else {
            continue;
        };
        if !is_plausible_date(year, month, day) {
            continue;
        }

        let anchored = is_anchored(&markers, whole.start(), whole.end());

        out.push(DateOfBirth {
            value: format!("{year:04}-{month:02}-{day:02}"),
            precision: DatePrecision::Day,
            confidence: if anchored { 0.9 } else { 0.4 },
            raw: whole.as_str().to_string(),
        });
    }

    out
}

fn is_anchored(markers: &[(usize, usize)], start: usize, end: usize) -> bool {
    markers
        .iter()
        .any(|&(ms, me)| start.saturating_sub(me) < MONTH_WINDOW_CHARS || ms.saturating_sub(end) < MONTH_WINDOW_CHARS)
}

fn is_plausible_date(year: i32, month: u32, day: u32) -> bool {
    (1900..=2026).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_dob_scores_higher_than_bare_date() {
        let anchored = extract("д.р. 15.03.1980 перевод");
        let bare = extract("накладная №15.03.1980 отправлена");
        assert_eq!(anchored[0].confidence, 0.9);
        assert_eq!(bare[0].confidence, 0.4);
    }

    #[test]
    fn iso_date_parses() {
        let dates = extract("dob 1980-03-15");
        assert_eq!(dates[0].value, "1980-03-15");
    }

    #[test]
    fn implausible_dates_are_rejected() {
        let dates = extract("32.13.1980");
        assert!(dates.is_empty());
    }

    #[test]
    fn russian_textual_month_parses() {
        let dates = extract("дата рождения 15 марта 1980");
        assert_eq!(dates[0].value, "1980-03-15");
        assert_eq!(dates[0].confidence, 0.9);
    }

    #[test]
    fn ukrainian_textual_month_parses() {
        let dates = extract("15 березня 1980 народження");
        assert_eq!(dates[0].value, "1980-03-15");
    }

    #[test]
    fn unknown_month_word_is_skipped() {
        let dates = extract("15 футбол 1980");
        assert!(dates.is_empty());
    }
}
