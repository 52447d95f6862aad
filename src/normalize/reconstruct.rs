//! Layer 5, steps 3b/4 — per-role normalization and reconstruction
//! (spec §4.1.3, §4.1.4).

use crate::config::NormalizationConfig;
use crate::normalize::dictionaries::*;
use crate::normalize::morphology;
use crate::normalize::roles::TaggedToken;
use crate::types::{Language, Role, TokenTrace};

pub struct NormalizedToken {
    pub output: String,
    pub role: Role,
    pub rule: &'static str,
    pub normal_form: Option<String>,
    pub morph_lang: Option<Language>,
    pub fallback: bool,
}

/// Title-case policy (`_to_title`, §4.1.3): first letter of each non-hyphen,
/// non-apostrophe segment is upper, remainder lower; letter after `'` is
/// upper.
pub fn to_title(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut cap_next = true;
    for c in segment.chars() {
        if c == '-' || c == '\'' {
            out.push(c);
            cap_next = true;
            continue;
        }
        if cap_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        cap_next = false;
    }
    out
}

/// Masculine -> feminine surname suffix rewrite, used only in the direction
/// masculine-observed-form -> feminine (spec §4.1.3 step 3: "the service
/// never converts a feminine surname to its masculine counterpart").
const MASC_TO_FEM_SURNAME: &[(&str, &str)] = &[
    ("ский", "ская"),
    ("цкий", "цкая"),
    ("ов", "ова"),
    ("ев", "ева"),
    ("ин", "ина"),
];

pub fn normalize_role_token(
    tagged: &TaggedToken,
    language: Language,
    config: &NormalizationConfig,
) -> NormalizedToken {
    match tagged.role {
        Role::Initial => {
            let letter = tagged.text.chars().next().unwrap_or('?').to_uppercase().to_string();
            NormalizedToken {
                output: format!("{letter}."),
                role: Role::Initial,
                rule: "initial_format",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            }
        }
        Role::Given | Role::Surname | Role::Patronymic => {
            if matches!(language, Language::Ru | Language::Uk) {
                normalize_slavic_person_token(tagged, language, config)
            } else {
                normalize_en_person_token(tagged, config)
            }
        }
        Role::OrgAnchor => {
            // Case is decided per whole anchor phrase, not per token — see
            // `finalize_org_phrase` in `normalize::mod`, which title-cases
            // the joined phrase only if it was entirely bare lower-case.
            let stripped = tagged
                .text
                .trim_matches(|c: char| c == '"' || c == '«' || c == '»');
            NormalizedToken {
                output: stripped.to_string(),
                role: Role::OrgAnchor,
                rule: "org_anchor_format",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            }
        }
        other => NormalizedToken {
            output: tagged.text.clone(),
            role: other,
            rule: tagged.rule,
            normal_form: None,
            morph_lang: None,
            fallback: false,
        },
    }
}

fn normalize_slavic_person_token(
    tagged: &TaggedToken,
    language: Language,
    config: &NormalizationConfig,
) -> NormalizedToken {
    if !config.enable_advanced_features {
        return NormalizedToken {
            output: to_title(&tagged.text),
            role: tagged.role,
            rule: tagged.rule,
            normal_form: None,
            morph_lang: None,
            fallback: false,
        };
    }

    let bare = tagged.text.to_lowercase();

    // Diminutive expansion runs before morphology for GIVEN (spec step 2).
    if tagged.role == Role::Given {
        let diminutives = match language {
            Language::Uk => &*DIMINUTIVES_UK,
            _ => &*DIMINUTIVES_RU,
        };
        if let Some(full) = diminutives.get(bare.as_str()) {
            return NormalizedToken {
                output: to_title(full),
                role: Role::Given,
                rule: "diminutive_expansion",
                normal_form: Some(to_title(full)),
                morph_lang: Some(language),
                fallback: false,
            };
        }
    }

    let morph = morphology::lemmatize(&tagged.text, tagged.role, language, config.morphology_cache_capacity);
    match morph.normal_form {
        Some(lemma) => NormalizedToken {
            output: to_title(&lemma),
            role: tagged.role,
            rule: "morphology_nominative",
            // §8 scenario 6 expects the title-cased lemma (`"Мария"`, not
            // `"мария"`) in the trace's `normal_form` field.
            normal_form: Some(to_title(&lemma)),
            morph_lang: Some(language),
            fallback: false,
        },
        None => NormalizedToken {
            output: to_title(&tagged.text),
            role: tagged.role,
            rule: tagged.rule,
            normal_form: None,
            morph_lang: Some(language),
            fallback: morph.fallback,
        },
    }
}

fn normalize_en_person_token(tagged: &TaggedToken, config: &NormalizationConfig) -> NormalizedToken {
    let bare = tagged.text.to_lowercase();
    if tagged.role == Role::Given && config.enable_en_nicknames {
        if let Some(full) = EN_NICKNAMES.get(bare.as_str()) {
            return NormalizedToken {
                output: full.to_string(),
                role: Role::Given,
                rule: "english_nickname",
                normal_form: Some((*full).to_string()),
                morph_lang: None,
                fallback: false,
            };
        }
    }
    NormalizedToken {
        output: to_title(&tagged.text),
        role: tagged.role,
        rule: tagged.rule,
        normal_form: None,
        morph_lang: None,
        fallback: false,
    }
}

/// Apply one-way gender agreement: a masculine-shaped surname in a group
/// that also contains a feminine patronymic or feminine given-name context
/// is rewritten to its feminine form. Never the reverse.
pub fn apply_gender_agreement(group: &mut [NormalizedToken]) {
    let has_feminine_signal = group.iter().any(|t| {
        t.role == Role::Patronymic
            && PATRONYMIC_SUFFIXES_FEM
                .iter()
                .any(|s| t.output.to_lowercase().ends_with(s))
    });
    if !has_feminine_signal {
        return;
    }
    for tok in group.iter_mut() {
        if tok.role != Role::Surname {
            continue;
        }
        let lower = tok.output.to_lowercase();
        if FEMININE_SURNAME_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            continue; // already feminine; one-way rule never touches it further.
        }
        for (masc, fem) in MASC_TO_FEM_SURNAME {
            if let Some(stem) = lower.strip_suffix(masc) {
                tok.output = to_title(&format!("{stem}{fem}"));
                tok.rule = "gender_agreement_feminine";
                break;
            }
        }
    }
}

/// Deduplicate consecutive exact-equal person tokens
/// (`dedup_consecutive_person_tokens`, spec §4.1.4).
pub fn dedup_consecutive(tokens: Vec<NormalizedToken>) -> Vec<NormalizedToken> {
    let mut out: Vec<NormalizedToken> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        if let Some(prev) = out.last() {
            if prev.role == tok.role && prev.output == tok.output && tok.role.is_person_role() {
                continue;
            }
        }
        out.push(tok);
    }
    out
}

/// Group a flat tagged/normalized token sequence into person runs. A new
/// person starts when two `Surname`-role tokens appear back to back with no
/// connector, or at a literal `|` sentinel token (spec §4.1.4).
pub fn group_persons(tokens: &[(TaggedToken, NormalizedToken)]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_role: Option<Role> = None;

    for (i, (tagged, normalized)) in tokens.iter().enumerate() {
        if tagged.text == "|" {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            last_role = None;
            continue;
        }
        if !normalized.role.is_person_role() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            last_role = None;
            continue;
        }
        if normalized.role == Role::Surname && last_role == Some(Role::Surname) {
            groups.push(std::mem::take(&mut current));
        }
        current.push(i);
        last_role = Some(normalized.role);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

pub fn build_trace(text: &str, role: Role, rule: &str, normalized: &NormalizedToken) -> TokenTrace {
    TokenTrace {
        token: text.to_string(),
        role,
        rule: rule.to_string(),
        morph_lang: normalized.morph_lang,
        normal_form: normalized.normal_form.clone(),
        output: normalized.output.clone(),
        fallback: normalized.fallback,
        notes: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_title_handles_hyphen_and_apostrophe() {
        assert_eq!(to_title("mary-jane"), "Mary-Jane");
        assert_eq!(to_title("o'connor"), "O'Connor");
    }

    #[test]
    fn gender_agreement_converts_masculine_to_feminine_only() {
        let mut group = vec![
            NormalizedToken {
                output: "Мария".into(),
                role: Role::Given,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
            NormalizedToken {
                output: "Владимировна".into(),
                role: Role::Patronymic,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
            NormalizedToken {
                output: "Сидоров".into(),
                role: Role::Surname,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
        ];
        apply_gender_agreement(&mut group);
        assert_eq!(group[2].output, "Сидорова");
    }

    #[test]
    fn gender_agreement_never_masculinizes_feminine_surname() {
        let mut group = vec![
            NormalizedToken {
                output: "Мария".into(),
                role: Role::Given,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
            NormalizedToken {
                output: "Иванович".into(), // masculine patronymic, no feminine signal
                role: Role::Patronymic,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
            NormalizedToken {
                output: "Сидорова".into(),
                role: Role::Surname,
                rule: "x",
                normal_form: None,
                morph_lang: None,
                fallback: false,
            },
        ];
        apply_gender_agreement(&mut group);
        assert_eq!(group[2].output, "Сидорова");
    }
}
