//! Layer 7 — name variant generation (spec §4.5, optional, off by default).
//!
//! A thin adapter: expands a normalized person-core into transliteration
//! and diminutive variants for downstream search recall. Deliberately
//! shallow — the heavy lifting (morphology, gender agreement) already
//! happened in layer 5; this layer only fans a canonical form out into
//! alternate surface spellings a sanctions list might use.

use crate::normalize::dictionaries::{DIMINUTIVES_RU, DIMINUTIVES_UK};
use crate::types::Language;

/// Generate alternate surface forms for a single already-normalized person
/// token run. Returns an empty vec when variant generation finds nothing to
/// add (the common case for already-canonical Western names).
pub fn expand_person(core: &[String], language: Language) -> Vec<Vec<String>> {
    let mut variants = Vec::new();

    if matches!(language, Language::Ru | Language::Uk) {
        if let Some(given) = core.first() {
            for dim in diminutives_for(given, language) {
                let mut variant = core.to_vec();
                variant[0] = dim;
                variants.push(variant);
            }
        }
        variants.push(transliterate(core));
    }

    variants
}

fn diminutives_for(full_form: &str, language: Language) -> Vec<String> {
    let table = match language {
        Language::Uk => &*DIMINUTIVES_UK,
        _ => &*DIMINUTIVES_RU,
    };
    let lower = full_form.to_lowercase();
    table
        .iter()
        .filter(|(_, full)| full.eq_ignore_ascii_case(&lower))
        .map(|(dim, _)| capitalize(dim))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Crude Cyrillic->Latin transliteration fallback using `deunicode`, useful
/// as a last-resort search variant when the sanctions list carries only
/// Latin-script entries.
fn transliterate(core: &[String]) -> Vec<String> {
    core.iter()
        .map(|tok| deunicode::deunicode(tok))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_diminutive_variant_for_russian_given_name() {
        let core = vec!["Мария".to_string(), "Сидорова".to_string()];
        let variants = expand_person(&core, Language::Ru);
        assert!(variants.iter().any(|v| v[0] == "Маша"));
    }

    #[test]
    fn non_slavic_language_yields_no_variants() {
        let core = vec!["William".to_string(), "Gates".to_string()];
        assert!(expand_person(&core, Language::En).is_empty());
    }

    #[test]
    fn transliteration_variant_present_for_slavic_name() {
        let core = vec!["Иван".to_string(), "Петров".to_string()];
        let variants = expand_person(&core, Language::Ru);
        assert!(variants.iter().any(|v| v[0] == "Ivan"));
    }
}
