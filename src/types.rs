//! Shared data contracts (spec §3). These records are per-request and
//! immutable after assembly; nothing here is mutated once built.

use serde::{Deserialize, Serialize};

/// Supported narrative languages (spec §2 layer 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ru,
    Uk,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::Uk => "uk",
            Language::En => "en",
        }
    }
}

/// Per-token role assigned by the layer-5 finite-state classifier (§4.1.2).
///
/// `ORG_LEGAL_FORM` and `STOP` are never emitted into `normalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Initial,
    Given,
    Patronymic,
    Surname,
    OrgLegalForm,
    OrgAnchor,
    Context,
    Stop,
    Unknown,
}

impl Role {
    /// Roles that compose a person's canonical token run.
    pub fn is_person_role(self) -> bool {
        matches!(
            self,
            Role::Initial | Role::Given | Role::Patronymic | Role::Surname
        )
    }
}

/// Per-output-token provenance record (spec §3 `TokenTrace`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTrace {
    pub token: String,
    pub role: Role,
    pub rule: String,
    pub morph_lang: Option<Language>,
    pub normal_form: Option<String>,
    pub output: String,
    pub fallback: bool,
    pub notes: Option<String>,
}

impl TokenTrace {
    pub fn new(token: impl Into<String>, role: Role, rule: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role,
            rule: rule.into(),
            morph_lang: None,
            normal_form: None,
            output: output.into(),
            fallback: false,
            notes: None,
        }
    }
}

/// Result of layer 5 (spec §3 `NormalizationResult`).
///
/// Invariants: `tokens.len() == token_count`; `normalized == tokens.join(" ")`;
/// each element of `trace` corresponds to exactly one output token
/// (post-deduplication).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub normalized: String,
    pub tokens: Vec<String>,
    pub trace: Vec<TokenTrace>,
    pub persons_core: Vec<Vec<String>>,
    pub organizations_core: Vec<String>,
    /// One entry per `organizations_core` slot: the legal-form token
    /// (e.g. `"ТОВ"`) immediately preceding that anchor phrase, if any, and
    /// whether the anchor phrase was quoted in the source text (spec §4.2
    /// "full_name" reconstruction needs both to recompose the original
    /// surface form).
    pub organization_legal_forms: Vec<Option<(String, bool)>>,
    pub language: Language,
    pub confidence: f32,
    pub token_count: usize,
    pub processing_time_ms: u64,
    pub success: bool,
    pub errors: Vec<String>,
}

/// A single extracted identifier (spec §3 `ID`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Id {
    pub kind: IdKind,
    pub value: String,
    pub raw: String,
    pub confidence: f32,
    pub valid: bool,
    pub sanctioned: bool,
    pub sanctioned_name: Option<String>,
    pub sanctioned_source: Option<String>,
    pub position: Option<(usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdKind {
    Inn,
    InnUa,
    InnRu,
    Edrpou,
    Ogrn,
    Iban,
    Swift,
    Passport,
    /// Digit run extracted by the tokenizer before a type is known.
    NumericId,
}

impl IdKind {
    /// Total order used to resolve duplicate candidates for the same value
    /// proposed under different types (spec §4.2 "ID deduplication").
    /// Lower rank wins.
    fn family_rank(self) -> u8 {
        match self {
            IdKind::Inn | IdKind::InnUa | IdKind::InnRu => 0,
            IdKind::Edrpou | IdKind::Ogrn | IdKind::Iban | IdKind::Swift | IdKind::Passport => 1,
            IdKind::NumericId => 2,
        }
    }

    pub fn is_inn_family(self) -> bool {
        matches!(self, IdKind::Inn | IdKind::InnUa | IdKind::InnRu)
    }
}

/// Resolve two candidate `Id`s for the same value: keep INN-family over
/// generic numeric, keep explicit extractor over trace-derived, keep higher
/// confidence (spec §4.2).
pub fn resolve_duplicate_id(a: &Id, b: &Id) -> bool {
    // Returns true if `a` should be kept over `b`.
    let rank_a = a.kind.family_rank();
    let rank_b = b.kind.family_rank();
    if rank_a != rank_b {
        return rank_a < rank_b;
    }
    a.confidence >= b.confidence
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrecision {
    Day,
    Month,
    Year,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateOfBirth {
    /// ISO `YYYY-MM-DD`; unknown components are zero-filled per `precision`.
    pub value: String,
    pub precision: DatePrecision,
    /// 0.9 when found near a DOB marker token, 0.4 for a bare date
    /// (spec §4.2 "a bare date is weak evidence").
    pub confidence: f32,
    pub raw: String,
}

/// Spec §3 `PersonSignal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonSignal {
    pub core: Vec<String>,
    pub full_name: String,
    pub dob: Option<DateOfBirth>,
    pub ids: Vec<Id>,
    pub confidence: f32,
    pub evidence: Vec<String>,
}

/// Spec §3 `OrganizationSignal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSignal {
    pub legal_form: Option<String>,
    pub core: String,
    pub full_name: String,
    pub ids: Vec<Id>,
    pub confidence: f32,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DateSignals {
    pub birth: Vec<DateOfBirth>,
    pub other: Vec<String>,
}

/// Spec §3 `SignalsResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsResult {
    pub persons: Vec<PersonSignal>,
    pub organizations: Vec<OrganizationSignal>,
    pub numbers: std::collections::BTreeMap<String, Vec<Id>>,
    pub dates: DateSignals,
    pub confidence: f32,
}

/// Nominal quality band of a hybrid-search candidate (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    T0,
    T1,
    T2,
    T3,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateTrace {
    pub reason: Option<String>,
    pub cosine: Option<f32>,
    pub fuzz: Option<f32>,
    pub anchors: Vec<String>,
}

/// Spec §3 / §4.3 `SearchCandidate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub score: f32,
    pub meta: serde_json::Value,
    pub trace: Option<CandidateTrace>,
}

impl SearchCandidate {
    /// §4.3 strict high-confidence classification: tier∈{T0,T1} and
    /// score≥0.80, OR tier=T3 and score≥0.90. No other tier/score
    /// combination counts, including T2 at any score.
    pub fn is_high_confidence(&self) -> bool {
        match self.tier {
            Tier::T0 | Tier::T1 => self.score >= 0.80,
            Tier::T3 => self.score >= 0.90,
            Tier::T2 => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    High,
    Medium,
    Low,
    Skip,
}

/// Spec §4.4 `DecisionOutput`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOutput {
    pub risk: Risk,
    pub score: f32,
    pub reasons: Vec<String>,
    pub details: serde_json::Value,
    pub review_required: bool,
    pub required_additional_fields: Vec<String>,
}
