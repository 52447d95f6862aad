//! Layer 5 — Name normalization (spec §4.1). The hard core of the
//! pipeline: tokenize -> role-tag -> per-role normalize -> reconstruct.

pub mod ascii_fastpath;
pub mod dictionaries;
pub mod morphology;
pub mod reconstruct;
pub mod roles;
pub mod tokenize;

use std::time::Instant;

use crate::config::NormalizationConfig;
use crate::normalize::reconstruct::NormalizedToken;
use crate::types::{Language, NormalizationResult, Role, TokenTrace};

/// Spans `(start_index, end_index)` of tokens found inside a quoted phrase,
/// in terms of indices into the token stream — used by the role tagger's
/// rule 2 (§4.1.2).
fn find_quoted_spans(tokens: &[String]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (i, tok) in tokens.iter().enumerate() {
        let starts_quote = tok.starts_with('"') || tok.starts_with('«');
        let ends_quote = tok.ends_with('"') || tok.ends_with('»');
        match open {
            None if starts_quote => {
                if ends_quote && tok.chars().count() > 1 {
                    spans.push((i, i));
                } else {
                    open = Some(i);
                }
            }
            Some(start) if ends_quote => {
                spans.push((start, i));
                open = None;
            }
            _ => {}
        }
    }
    spans
}

/// English particles get glued onto the following surname token's output,
/// per §4.1.3 ("particle set is attached to the last-name segment").
fn attach_en_particles(tagged: &[roles::TaggedToken], normalized: &mut [NormalizedToken]) {
    for i in 0..tagged.len() {
        if tagged[i].rule == "en_particle" {
            if let Some(next) = normalized.get(i + 1..).and_then(|s| s.first()) {
                if next.role == Role::Surname {
                    let particle = tagged[i].text.to_lowercase();
                    let merged = format!("{particle} {}", next.output);
                    normalized[i + 1].output = merged;
                }
            }
        }
    }
}

pub fn normalize(text: &str, language: Language, config: &NormalizationConfig) -> NormalizationResult {
    let start = Instant::now();
    let mut errors = Vec::new();

    if ascii_fastpath::is_eligible(text, config, language) {
        let (tokens, persons_core) = ascii_fastpath::run(text);
        let normalized = tokens.join(" ");
        let trace = tokens
            .iter()
            .map(|t| {
                let mut tt = TokenTrace::new(t.clone(), Role::Given, "ascii_fastpath", t.clone());
                tt.notes = Some("ascii_fastpath".to_string());
                tt
            })
            .collect::<Vec<_>>();
        return NormalizationResult {
            token_count: tokens.len(),
            normalized,
            tokens,
            trace,
            persons_core,
            organizations_core: Vec::new(),
            organization_legal_forms: Vec::new(),
            language,
            confidence: 0.95,
            processing_time_ms: start.elapsed().as_millis() as u64,
            success: true,
            errors,
        };
    }

    let raw_tokens = tokenize::tokenize(text, config);
    let surface: Vec<String> = raw_tokens.iter().map(|t| t.text.clone()).collect();
    let quoted_spans = find_quoted_spans(&surface);
    let tagged = roles::tag_tokens(&surface, language, config, &quoted_spans);

    let mut normalized_tokens: Vec<NormalizedToken> = tagged
        .iter()
        .map(|t| reconstruct::normalize_role_token(t, language, config))
        .collect();

    if language == Language::En {
        attach_en_particles(&tagged, &mut normalized_tokens);
    }

    let paired: Vec<(roles::TaggedToken, NormalizedToken)> = tagged
        .iter()
        .cloned()
        .zip(normalized_tokens.iter().map(clone_normalized))
        .collect();
    let person_groups = reconstruct::group_persons(&paired);

    let mut persons_core: Vec<Vec<String>> = Vec::new();
    let mut trace: Vec<TokenTrace> = Vec::new();

    for group in &person_groups {
        let mut group_tokens: Vec<NormalizedToken> = group
            .iter()
            .map(|&i| clone_normalized(&normalized_tokens[i]))
            .collect();
        reconstruct::apply_gender_agreement(&mut group_tokens);

        for (&idx, tok) in group.iter().zip(group_tokens.iter()) {
            trace.push(reconstruct::build_trace(&surface[idx], tok.role, tagged[idx].rule, tok));
        }

        let deduped = reconstruct::dedup_consecutive(group_tokens);
        let person_tokens: Vec<String> = deduped
            .into_iter()
            .map(|t| reconstruct::to_title(&t.output))
            .collect();
        if !person_tokens.is_empty() {
            persons_core.push(person_tokens);
        }
    }

    // Non-person-group tokens (org anchors, legal forms, unknowns, context)
    // still get a trace entry; org anchors are also collected here.
    let mut organizations_core: Vec<String> = Vec::new();
    let mut organization_legal_forms: Vec<Option<(String, bool)>> = Vec::new();
    let person_indices: std::collections::HashSet<usize> =
        person_groups.iter().flatten().copied().collect();

    let mut i = 0;
    while i < normalized_tokens.len() {
        if person_indices.contains(&i) {
            i += 1;
            continue;
        }
        let tok = &normalized_tokens[i];
        trace.push(reconstruct::build_trace(&surface[i], tok.role, tagged[i].rule, tok));
        if tok.role == Role::OrgAnchor {
            let quoted = quoted_spans.iter().any(|(s, e)| i >= *s && i <= *e);
            let legal_form = if i > 0 && normalized_tokens[i - 1].role == Role::OrgLegalForm {
                Some(surface[i - 1].clone())
            } else {
                None
            };
            let mut phrase = vec![tok.output.clone()];
            let mut j = i + 1;
            while j < normalized_tokens.len()
                && normalized_tokens[j].role == Role::OrgAnchor
                && !person_indices.contains(&j)
            {
                phrase.push(normalized_tokens[j].output.clone());
                trace.push(reconstruct::build_trace(
                    &surface[j],
                    normalized_tokens[j].role,
                    tagged[j].rule,
                    &normalized_tokens[j],
                ));
                j += 1;
            }
            organizations_core.push(finalize_org_phrase(&phrase));
            organization_legal_forms.push(legal_form.map(|lf| (lf, quoted)));
            i = j;
            continue;
        }
        i += 1;
    }

    let normalized = persons_core
        .iter()
        .map(|p| p.join(" "))
        .collect::<Vec<_>>()
        .join(" ");
    let tokens: Vec<String> = persons_core.iter().flatten().cloned().collect();

    if tokens.is_empty() && normalized_tokens.iter().all(|t| t.role == Role::Unknown) {
        errors.push("dictionary_miss".to_string());
    }

    let token_count = tokens.len();
    let trace = dedup_trace(trace);

    NormalizationResult {
        normalized,
        tokens,
        trace,
        persons_core,
        organizations_core,
        organization_legal_forms,
        language,
        confidence: estimate_confidence(&normalized_tokens),
        token_count,
        processing_time_ms: start.elapsed().as_millis() as u64,
        success: true,
        errors,
    }
}

/// Title-case the whole anchor phrase only when it arrived entirely in
/// bare lower-case (§4.1.3 "title-case bare lower-case anchors"); otherwise
/// preserve internal case and punctuation verbatim.
fn finalize_org_phrase(words: &[String]) -> String {
    let joined = words.join(" ");
    let is_all_lower = joined.chars().all(|c| !c.is_uppercase());
    if is_all_lower {
        words
            .iter()
            .map(|w| reconstruct::to_title(w))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        joined
    }
}

fn clone_normalized(t: &NormalizedToken) -> NormalizedToken {
    NormalizedToken {
        output: t.output.clone(),
        role: t.role,
        rule: t.rule,
        normal_form: t.normal_form.clone(),
        morph_lang: t.morph_lang,
        fallback: t.fallback,
    }
}

/// Keep exactly one trace entry per surviving output token, preserving
/// first-seen order (invariant: trace.len() corresponds to emitted tokens
/// post-dedup).
fn dedup_trace(trace: Vec<TokenTrace>) -> Vec<TokenTrace> {
    let mut out: Vec<TokenTrace> = Vec::with_capacity(trace.len());
    for t in trace {
        if let Some(prev) = out.last() {
            if prev.output == t.output && prev.role == t.role && t.role.is_person_role() {
                continue;
            }
        }
        out.push(t);
    }
    out
}

fn estimate_confidence(tokens: &[NormalizedToken]) -> f32 {
    if tokens.is_empty() {
        return 0.0;
    }
    let known = tokens
        .iter()
        .filter(|t| t.role != Role::Unknown && t.role != Role::Context)
        .count() as f32;
    (known / tokens.len() as f32).max(0.3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalizationConfig {
        NormalizationConfig::default()
    }

    #[test]
    fn full_person_name_scenario() {
        let r = normalize("Владимир Владимирович Путин", Language::Ru, &cfg());
        assert_eq!(r.normalized, "Владимир Владимирович Путин");
        assert_eq!(
            r.persons_core,
            vec![vec!["Владимир".to_string(), "Владимирович".to_string(), "Путин".to_string()]]
        );
        assert!(r.trace.iter().any(|t| t.role == Role::Patronymic));
        assert!(r.trace.iter().any(|t| t.role == Role::Surname));
        assert_eq!(r.tokens.len(), r.token_count);
        assert_eq!(r.normalized, r.tokens.join(" "));
    }

    #[test]
    fn organization_only_scenario() {
        let r = normalize("ТОВ \"Рога і Копита\" отримувач", Language::Uk, &cfg());
        assert_eq!(r.normalized, "");
        assert_eq!(r.organizations_core, vec!["Рога і Копита".to_string()]);
    }

    #[test]
    fn oblique_case_reduces_to_nominative_with_feminine_surname_preserved() {
        let r = normalize("перевод Марии Сидоровой", Language::Ru, &cfg());
        assert_eq!(r.normalized, "Мария Сидорова");
        let marii = r.trace.iter().find(|t| t.token == "Марии").unwrap();
        assert_eq!(marii.normal_form.as_deref(), Some("Мария"));
        let sidorovoi = r.trace.iter().find(|t| t.token == "Сидоровой").unwrap();
        assert_eq!(sidorovoi.normal_form.as_deref(), Some("Сидорова"));
    }

    #[test]
    fn english_nickname_expansion() {
        let cfg = NormalizationConfig {
            enable_en_nicknames: true,
            ..Default::default()
        };
        let r = normalize("Bill Gates", Language::En, &cfg);
        assert_eq!(r.normalized, "William Gates");
        let bill_trace = r.trace.iter().find(|t| t.token == "Bill").unwrap();
        assert_eq!(bill_trace.rule, "english_nickname");
    }

    #[test]
    fn apostrophe_and_hyphen_preserved() {
        let r = normalize("O'Connor Mary-Jane", Language::En, &cfg());
        assert!(r.normalized.contains("O'Connor"));
        assert!(r.normalized.contains("Mary-Jane"));
    }

    #[test]
    fn org_legal_form_excluded_from_normalized_and_person_core() {
        let r = normalize("ООО Ромашка Иванов", Language::Ru, &cfg());
        assert!(!r.normalized.to_lowercase().contains("ооо"));
        assert!(r.persons_core.iter().flatten().all(|t| t.to_lowercase() != "ооо"));
    }
}
