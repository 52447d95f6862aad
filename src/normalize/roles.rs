//! Layer 5, step 2 — role tagging (spec §4.1.2).
//!
//! A finite-state classifier: first matching rule in the documented
//! precedence order wins. `ORG_LEGAL_FORM` tokens are always `Unknown` with
//! respect to positional defaults and must never land in `persons_core`.

use crate::config::NormalizationConfig;
use crate::normalize::dictionaries::*;
use crate::types::{Language, Role};

#[derive(Debug, Clone)]
pub struct TaggedToken {
    pub text: String,
    pub role: Role,
    pub rule: &'static str,
}

/// Tag every token in `tokens`, given surrounding context (needed for the
/// "two neutral title-cased tokens in a row" positional-default rule, and
/// for the quoted-anchor rule which looks at raw punctuation around a run).
pub fn tag_tokens(
    tokens: &[String],
    language: Language,
    config: &NormalizationConfig,
    quoted_spans: &[(usize, usize)],
) -> Vec<TaggedToken> {
    let mut tagged: Vec<TaggedToken> = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| tag_one(t, i, tokens, language, config, quoted_spans))
        .collect();

    apply_positional_defaults(&mut tagged);
    tagged
}

fn tag_one(
    token: &str,
    index: usize,
    all: &[String],
    language: Language,
    config: &NormalizationConfig,
    quoted_spans: &[(usize, usize)],
) -> TaggedToken {
    let lower = token.to_lowercase();
    let bare = lower.trim_matches(|c: char| c == '"' || c == '«' || c == '»' || c == '\'');

    // Rule 1: organisation legal form.
    if ORG_LEGAL_FORMS.contains(bare) {
        return TaggedToken {
            text: token.to_string(),
            role: Role::OrgLegalForm,
            rule: "org_legal_form",
        };
    }

    // Rule 2: quoted or explicitly anchored phrase -> org anchor.
    if quoted_spans.iter().any(|(s, e)| index >= *s && index <= *e) {
        return TaggedToken {
            text: token.to_string(),
            role: Role::OrgAnchor,
            rule: "org_anchor_quoted",
        };
    }

    // Rule 3: single alphabetic char + dot => initial, unless in the strict
    // stopwords set.
    if is_initial_shape(token) {
        let letter = token.chars().next().unwrap().to_lowercase().to_string();
        let is_strict_excluded = config.strict_stopwords
            && STRICT_STOPWORD_SINGLE_LETTERS.contains(letter.as_str());
        if !is_strict_excluded {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Initial,
                rule: "initial",
            };
        }
    }

    if matches!(language, Language::Ru | Language::Uk) {
        // Rule 4: patronymic suffix.
        if has_suffix_ci(bare, PATRONYMIC_SUFFIXES_MASC) || has_suffix_ci(bare, PATRONYMIC_SUFFIXES_FEM) {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Patronymic,
                rule: "patronymic_suffix",
            };
        }

        // Rule 5: dictionary lookup for given names (incl. diminutives and
        // oblique forms handled via suffix stripping in morphology; here we
        // match the lemma-ish nominative/oblique stem heuristically).
        if is_given_name(bare, language) {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Given,
                rule: "given_name_dictionary",
            };
        }

        // Rule 6: surname suffix pattern.
        let suffixes = match language {
            Language::Uk => SURNAME_SUFFIXES_UK,
            _ => SURNAME_SUFFIXES_RU,
        };
        if has_suffix_ci(bare, suffixes) || has_suffix_ci(bare, FEMININE_SURNAME_SUFFIXES) {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Surname,
                rule: "surname_suffix",
            };
        }
    } else {
        // English: dictionary-free heuristic; nameparser-equivalent
        // structural roles are assigned in `reconstruct` for EN instead.
        if EN_TITLES.contains(bare.as_str()) || EN_SUFFIXES.contains(bare.as_str()) {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Context,
                rule: "en_title_or_suffix",
            };
        }
        if EN_PARTICLES.contains(bare.as_str()) {
            return TaggedToken {
                text: token.to_string(),
                role: Role::Context,
                rule: "en_particle",
            };
        }
    }

    let _ = all;
    TaggedToken {
        text: token.to_string(),
        role: Role::Unknown,
        rule: "unclassified",
    }
}

fn is_given_name(bare: &str, language: Language) -> bool {
    match language {
        Language::Uk => GIVEN_NAMES_UK.contains(bare) || DIMINUTIVES_UK.contains_key(bare),
        _ => GIVEN_NAMES_RU.contains(bare) || DIMINUTIVES_RU.contains_key(bare),
    }
}

fn is_initial_shape(token: &str) -> bool {
    let chars: Vec<char> = token.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && chars[0].is_uppercase() && chars[1] == '.'
}

fn has_suffix_ci(bare: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| bare.ends_with(s) && bare.len() > s.len())
}

/// Rule 8: positional default, only for runs of >=2 neutral title-cased
/// `Unknown` tokens in the same contiguous segment: first -> Given,
/// last -> Surname, middle -> stays Unknown.
fn apply_positional_defaults(tagged: &mut [TaggedToken]) {
    let mut i = 0;
    while i < tagged.len() {
        if tagged[i].role != Role::Unknown || !is_title_cased(&tagged[i].text) {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while end + 1 < tagged.len()
            && tagged[end + 1].role == Role::Unknown
            && is_title_cased(&tagged[end + 1].text)
        {
            end += 1;
        }
        if end > start {
            tagged[start].role = Role::Given;
            tagged[start].rule = "positional_default_first";
            tagged[end].role = Role::Surname;
            tagged[end].rule = "positional_default_last";
        }
        i = end + 1;
    }
}

fn is_title_cased(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => chars.all(|c| c.is_lowercase() || !c.is_alphabetic()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalizationConfig {
        NormalizationConfig::default()
    }

    #[test]
    fn tags_patronymic_and_surname() {
        let tokens = vec!["Владимир".to_string(), "Владимирович".to_string(), "Путин".to_string()];
        let tagged = tag_tokens(&tokens, Language::Ru, &cfg(), &[]);
        assert_eq!(tagged[0].role, Role::Given);
        assert_eq!(tagged[1].role, Role::Patronymic);
        assert_eq!(tagged[2].role, Role::Surname);
    }

    #[test]
    fn org_legal_form_never_positional() {
        let tokens = vec!["ТОВ".to_string(), "Нечто".to_string()];
        let tagged = tag_tokens(&tokens, Language::Uk, &cfg(), &[]);
        assert_eq!(tagged[0].role, Role::OrgLegalForm);
    }

    #[test]
    fn quoted_span_is_org_anchor() {
        let tokens = vec!["ТОВ".to_string(), "Рога".to_string(), "і".to_string(), "Копита".to_string()];
        let tagged = tag_tokens(&tokens, Language::Uk, &cfg(), &[(1, 3)]);
        assert_eq!(tagged[1].role, Role::OrgAnchor);
        assert_eq!(tagged[2].role, Role::OrgAnchor);
        assert_eq!(tagged[3].role, Role::OrgAnchor);
    }

    #[test]
    fn positional_default_assigns_given_and_surname() {
        let tokens = vec!["Джон".to_string(), "Смитович".to_string()];
        // Use two neutral unknown EN-shaped tokens with Russian classifier off.
        let tokens2 = vec!["Zzqx".to_string(), "Wvtn".to_string()];
        let tagged = tag_tokens(&tokens2, Language::En, &cfg(), &[]);
        assert_eq!(tagged[0].role, Role::Given);
        assert_eq!(tagged[1].role, Role::Surname);
        let _ = tokens;
    }
}
