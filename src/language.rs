//! Layer 3 — Language detection (spec §2).
//!
//! A lightweight script/character-frequency classifier rather than a full
//! statistical model: enough to pick {ru, uk, en} with a confidence, not to
//! do general-purpose language ID. Feeds the `language_detection_low_confidence`
//! non-fatal error kind (§7) — the pipeline proceeds with the best guess.

use crate::types::Language;

pub struct LanguageDetection {
    pub language: Language,
    pub confidence: f32,
}

/// Ukrainian-only Cyrillic letters; their presence is close to
/// unambiguous evidence for `uk` over `ru`.
const UK_ONLY: &[char] = &['і', 'ї', 'є', 'ґ', 'І', 'Ї', 'Є', 'Ґ'];
/// Russian-only Cyrillic letters (not used in modern Ukrainian).
const RU_ONLY: &[char] = &['ы', 'ъ', 'э', 'ё', 'Ы', 'Ъ', 'Э', 'Ё'];

pub fn detect(text: &str, hint: Option<Language>) -> LanguageDetection {
    if let Some(lang) = hint {
        return LanguageDetection {
            language: lang,
            confidence: 1.0,
        };
    }

    let total = text.chars().filter(|c| c.is_alphabetic()).count().max(1) as f32;
    let cyrillic = text
        .chars()
        .filter(|c| is_cyrillic(*c))
        .count() as f32;
    let latin = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .count() as f32;

    if cyrillic / total < 0.15 && latin / total > 0.5 {
        return LanguageDetection {
            language: Language::En,
            confidence: (latin / total).min(0.99),
        };
    }

    let uk_hits = text.chars().filter(|c| UK_ONLY.contains(c)).count();
    let ru_hits = text.chars().filter(|c| RU_ONLY.contains(c)).count();

    if uk_hits > ru_hits {
        LanguageDetection {
            language: Language::Uk,
            confidence: confidence_from_hits(uk_hits, ru_hits),
        }
    } else if ru_hits > uk_hits {
        LanguageDetection {
            language: Language::Ru,
            confidence: confidence_from_hits(ru_hits, uk_hits),
        }
    } else if cyrillic > 0.0 {
        // No disambiguating letters seen; default to Russian with low
        // confidence rather than refuse to proceed (non-fatal per §7).
        LanguageDetection {
            language: Language::Ru,
            confidence: 0.55,
        }
    } else {
        LanguageDetection {
            language: Language::En,
            confidence: 0.50,
        }
    }
}

fn confidence_from_hits(winner: usize, loser: usize) -> f32 {
    let total = (winner + loser).max(1) as f32;
    (0.6 + 0.4 * (winner as f32 / total)).min(0.99)
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_english() {
        let d = detect("Bill Gates", None);
        assert_eq!(d.language, Language::En);
    }

    #[test]
    fn detects_ukrainian_from_unique_letters() {
        let d = detect("Марія Іванівна Шевченко", None);
        assert_eq!(d.language, Language::Uk);
    }

    #[test]
    fn detects_russian_from_unique_letters() {
        let d = detect("Сергей Ёлкин", None);
        assert_eq!(d.language, Language::Ru);
    }

    #[test]
    fn hint_overrides_detection() {
        let d = detect("Bill Gates", Some(Language::Ru));
        assert_eq!(d.language, Language::Ru);
        assert_eq!(d.confidence, 1.0);
    }
}
