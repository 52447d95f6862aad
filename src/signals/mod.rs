//! Layer 6 — signals extraction (spec §4.2). Consumes the layer-5
//! `NormalizationResult` plus the raw narrative text and assembles
//! identifiers, dates of birth, and per-entity signal records.

pub mod dob;
pub mod identifiers;
pub mod sanctioned_cache;

use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::types::{
    DateSignals, NormalizationResult, OrganizationSignal, PersonSignal, SignalsResult,
};

/// Assemble layer-6 signals. `raw_text` is the post-normalization-input
/// narrative (pre-tokenization) so identifier/date regexes see the
/// original punctuation and digit runs the tokenizer may have split apart.
pub fn extract(
    raw_text: &str,
    normalization: &NormalizationResult,
    sanctioned: &sanctioned_cache::SanctionedIdCache,
    _config: &PipelineConfig,
) -> SignalsResult {
    let mut ids = identifiers::extract(raw_text);
    sanctioned.annotate(&mut ids);
    let dates = dob::extract(raw_text);

    let mut numbers: BTreeMap<String, Vec<crate::types::Id>> = BTreeMap::new();
    for id in &ids {
        numbers
            .entry(format!("{:?}", id.kind).to_lowercase())
            .or_default()
            .push(id.clone());
    }

    let persons: Vec<PersonSignal> = normalization
        .persons_core
        .iter()
        .enumerate()
        .map(|(i, core)| {
            let full_name = core.join(" ");
            let mut evidence = vec!["name_normalization".to_string()];
            let dob = if normalization.persons_core.len() == 1 {
                dates.first().cloned()
            } else {
                None
            };
            if dob.is_some() {
                evidence.push("dob_anchor".to_string());
            }
            // Single-person narratives inherit every extracted ID; with
            // multiple persons there is no positional linkage available at
            // this layer, so only the first person claims them (§4.2 notes
            // this as an accepted limitation absent NER-level span linking).
            let person_ids = if i == 0 { ids.clone() } else { Vec::new() };
            if !person_ids.is_empty() {
                evidence.push("identifier_match".to_string());
            }
            let confidence = confidence_for(&person_ids, &dob, normalization.confidence);
            PersonSignal {
                core: core.clone(),
                full_name,
                dob,
                ids: person_ids,
                confidence,
                evidence,
            }
        })
        .collect();

    let organizations: Vec<OrganizationSignal> = normalization
        .organizations_core
        .iter()
        .enumerate()
        .map(|(i, core)| {
            let org_ids = if persons.is_empty() && i == 0 {
                ids.clone()
            } else {
                Vec::new()
            };
            let mut evidence = vec!["org_anchor".to_string()];
            if !org_ids.is_empty() {
                evidence.push("identifier_match".to_string());
            }
            let confidence = confidence_for(&org_ids, &None, normalization.confidence);
            let legal_form_entry = normalization.organization_legal_forms.get(i).cloned().flatten();
            let legal_form = legal_form_entry.as_ref().map(|(lf, _)| lf.clone());
            let full_name = match &legal_form_entry {
                Some((lf, true)) => format!("{lf} \"{core}\""),
                Some((lf, false)) => format!("{lf} {core}"),
                None => core.clone(),
            };
            OrganizationSignal {
                legal_form,
                core: core.clone(),
                full_name,
                ids: org_ids,
                confidence,
                evidence,
            }
        })
        .collect();

    let overall_confidence = if persons.is_empty() && organizations.is_empty() {
        normalization.confidence * 0.5
    } else {
        normalization.confidence
    };

    SignalsResult {
        persons,
        organizations,
        numbers,
        dates: DateSignals {
            birth: dates,
            other: Vec::new(),
        },
        confidence: overall_confidence,
    }
}

fn confidence_for(
    ids: &[crate::types::Id],
    dob: &Option<crate::types::DateOfBirth>,
    base: f32,
) -> f32 {
    let mut c = base;
    if ids.iter().any(|i| i.sanctioned) {
        c = c.max(0.95);
    }
    if dob.as_ref().is_some_and(|d| d.confidence >= 0.9) {
        c = (c + 0.05).min(1.0);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NormalizationConfig;
    use crate::normalize;
    use crate::types::Language;

    #[test]
    fn single_person_narrative_claims_identifiers_and_dob() {
        let cfg = NormalizationConfig::default();
        let norm = normalize::normalize("перевод Марии Сидоровой", Language::Ru, &cfg);
        let cache = sanctioned_cache::SanctionedIdCache::new();
        let pipeline_cfg = PipelineConfig::default();
        let result = extract(
            "перевод Марии Сидоровой д.р. 15.03.1980 ИНН 2839403975",
            &norm,
            &cache,
            &pipeline_cfg,
        );
        assert_eq!(result.persons.len(), 1);
        assert!(result.persons[0].dob.is_some());
        assert!(!result.persons[0].ids.is_empty());
    }

    #[test]
    fn no_entities_lowers_overall_confidence() {
        let cfg = NormalizationConfig::default();
        let norm = normalize::normalize("оплата услуг", Language::Ru, &cfg);
        let cache = sanctioned_cache::SanctionedIdCache::new();
        let pipeline_cfg = PipelineConfig::default();
        let result = extract("оплата услуг", &norm, &cache, &pipeline_cfg);
        assert!(result.confidence <= norm.confidence);
    }
}
