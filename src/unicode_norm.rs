//! Layer 4 — Unicode normalization (spec §2).
//!
//! NFKC normalization, homoglyph folding (Latin look-alikes inside Cyrillic
//! runs and vice versa), quote/dash canonicalization, and optional ё→е
//! folding driven by `ru_yo_strategy`. Grounded in the teacher's use of
//! `unicode-normalization` + `deunicode` for adversarial-input defense
//! (`packages/gate` dependency list).

use unicode_normalization::UnicodeNormalization;

use crate::config::YoStrategy;

/// Cyrillic/Latin homoglyph pairs that show up in adversarial or simply
/// keyboard-layout-confused payment narratives. Mapped to the Cyrillic
/// form when the surrounding run is predominantly Cyrillic; left as Latin
/// in a predominantly-Latin run by `fold_homoglyphs`.
const HOMOGLYPHS: &[(char, char)] = &[
    ('a', 'а'), ('A', 'А'),
    ('e', 'е'), ('E', 'Е'),
    ('o', 'о'), ('O', 'О'),
    ('p', 'р'), ('P', 'Р'),
    ('c', 'с'), ('C', 'С'),
    ('x', 'х'), ('X', 'Х'),
    ('y', 'у'), ('Y', 'У'),
    ('i', 'і'), ('I', 'І'),
    ('k', 'к'), ('K', 'К'),
    ('H', 'Н'), ('B', 'В'),
    ('M', 'М'), ('T', 'Т'),
];

pub fn normalize(text: &str, yo_strategy: YoStrategy) -> String {
    let nfkc: String = text.nfkc().collect();
    let quotes_dashes = canonicalize_quotes_and_dashes(&nfkc);
    let folded = fold_homoglyphs(&quotes_dashes);
    match yo_strategy {
        YoStrategy::Preserve => folded,
        YoStrategy::Fold => fold_yo(&folded),
    }
}

fn canonicalize_quotes_and_dashes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{00AB}' | '\u{00BB}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
            other => other,
        })
        .collect()
}

/// Replace Latin look-alikes with their Cyrillic counterpart only when a
/// token is itself mixed-script (a Cyrillic token with a stray Latin
/// letter), which is the common adversarial/typo pattern. Pure-Latin
/// tokens (e.g. English names) are left untouched.
fn fold_homoglyphs(text: &str) -> String {
    text.split_whitespace()
        .map(fold_token_homoglyphs)
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_token_homoglyphs(token: &str) -> String {
    let has_cyrillic = token.chars().any(is_cyrillic);
    let has_latin = token.chars().any(|c| c.is_ascii_alphabetic());

    if has_cyrillic && has_latin {
        token
            .chars()
            .map(|c| {
                HOMOGLYPHS
                    .iter()
                    .find(|(latin, _)| *latin == c)
                    .map(|(_, cyr)| *cyr)
                    .unwrap_or(c)
            })
            .collect()
    } else {
        token.to_string()
    }
}

fn fold_yo(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'ё' => 'е',
            'Ё' => 'Е',
            other => other,
        })
        .collect()
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_curly_quotes_and_em_dash() {
        let out = normalize("“Рога і Копита” — тов", YoStrategy::Preserve);
        assert!(out.contains('"'));
        assert!(out.contains('-'));
    }

    #[test]
    fn preserves_yo_by_default() {
        let out = normalize("Алёна Фёдоров", YoStrategy::Preserve);
        assert!(out.contains('ё'));
    }

    #[test]
    fn folds_yo_when_requested() {
        let out = normalize("Алёна Фёдоров", YoStrategy::Fold);
        assert!(!out.contains('ё'));
        assert!(out.contains("Алена"));
    }

    #[test]
    fn folds_latin_lookalikes_inside_mixed_token() {
        // "Ivanov" with a Latin 'a' injected into an otherwise Cyrillic token.
        let mixed = "Иaанов";
        let out = normalize(mixed, YoStrategy::Preserve);
        assert_eq!(out, "Иaанов".replace('a', "а"));
    }

    #[test]
    fn leaves_pure_latin_tokens_untouched() {
        let out = normalize("Bill Gates", YoStrategy::Preserve);
        assert_eq!(out, "Bill Gates");
    }
}
