//! Layer 5, step 1 — tokenize & noise-strip (spec §4.1.1).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::NormalizationConfig;

#[derive(Debug, Clone)]
pub struct RawToken {
    pub text: String,
    /// Notes accumulated during tokenization (e.g. `collapse_double_dots`,
    /// `marker_inn_nearby`) surfaced later into the token's trace.
    pub notes: Vec<&'static str>,
}

static ANCHOR_INN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bинн\b|\binn\b|\bіпн\b").unwrap());
static CAPITAL_DOT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\p{Lu}\.){2,}").unwrap());
static SPLIT_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;:()\[\]{}!?]+").unwrap());

/// Tokenize sanitized, language-tagged text into surface tokens with
/// provenance notes.
pub fn tokenize(text: &str, config: &NormalizationConfig) -> Vec<RawToken> {
    let pre_split = collapse_capital_dot_runs(text);

    let whitespace_tokens: Vec<&str> = pre_split.split_whitespace().collect();
    let mut tokens: Vec<RawToken> = Vec::new();

    for (i, raw) in whitespace_tokens.iter().enumerate() {
        for piece in split_token(raw, config.preserve_names) {
            let (collapsed, had_double_dot) = collapse_double_dots(&piece);
            if collapsed.is_empty() {
                continue;
            }
            let mut notes = Vec::new();
            if had_double_dot {
                notes.push("collapse_double_dots");
            }

            if config.remove_stop_words && !config.strict_stopwords {
                if crate::normalize::dictionaries::STOP_WORDS
                    .contains(collapsed.to_lowercase().as_str())
                {
                    continue;
                }
            }

            tokens.push(RawToken {
                text: collapsed,
                notes,
            });
        }

        // Digit-only tokens of length >=10 get a proximity marker on the
        // preceding alphabetic token when an INN/ИПН anchor is nearby.
        if is_long_digit_run(raw) {
            let window_start = i.saturating_sub(3);
            let window_end = (i + 3).min(whitespace_tokens.len().saturating_sub(1));
            let nearby_anchor = whitespace_tokens[window_start..=window_end]
                .iter()
                .any(|t| ANCHOR_INN.is_match(t));
            if nearby_anchor {
                if let Some(last) = tokens
                    .iter_mut()
                    .rev()
                    .find(|t| t.text.chars().any(|c| c.is_alphabetic()))
                {
                    last.notes.push("marker_inn_nearby");
                }
            }
        }
    }

    tokens
}

fn is_long_digit_run(token: &str) -> bool {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.len() >= 10 && digits.len() == token.chars().filter(|c| !c.is_whitespace()).count()
}

/// Recognise adjacent capital-letter-plus-dot runs like `"П.І."` and force a
/// space between each initial so later whitespace splitting yields
/// `["П.", "І."]` per spec §4.1.1.
fn collapse_capital_dot_runs(text: &str) -> String {
    CAPITAL_DOT_RUN
        .replace_all(text, |caps: &regex::Captures| {
            let m = caps.get(0).unwrap().as_str();
            m.chars()
                .collect::<Vec<_>>()
                .chunks(2)
                .map(|chunk| chunk.iter().collect::<String>())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .into_owned()
}

fn collapse_double_dots(token: &str) -> (String, bool) {
    if token.contains("..") {
        let mut collapsed = String::with_capacity(token.len());
        let mut prev_dot = false;
        for c in token.chars() {
            if c == '.' {
                if prev_dot {
                    continue;
                }
                prev_dot = true;
            } else {
                prev_dot = false;
            }
            collapsed.push(c);
        }
        (collapsed, true)
    } else {
        (token.to_string(), false)
    }
}

/// Split a whitespace-delimited token on a hard-coded punctuation set,
/// except `-`, `'`, `.` when `preserve_names=true`.
fn split_token(token: &str, preserve_names: bool) -> Vec<String> {
    let stripped = SPLIT_PUNCT.replace_all(token, " ");
    if preserve_names {
        stripped
            .split_whitespace()
            .map(|s| s.to_string())
            .collect()
    } else {
        stripped
            .split(|c: char| c == '-' || c == '\'' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> NormalizationConfig {
        NormalizationConfig {
            remove_stop_words: false,
            ..Default::default()
        }
    }

    #[test]
    fn splits_initials_collapsed_run() {
        let toks = tokenize("П.І. Іванов", &cfg());
        let texts: Vec<_> = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["П.", "І.", "Іванов"]);
    }

    #[test]
    fn collapses_double_dots() {
        let toks = tokenize("Иванов И..И.", &cfg());
        assert!(toks.iter().any(|t| t.text == "И.И." && t.notes.contains(&"collapse_double_dots")));
    }

    #[test]
    fn preserves_hyphen_and_apostrophe_when_requested() {
        let toks = tokenize("Mary-Jane O'Connor", &cfg());
        let texts: Vec<_> = toks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Mary-Jane", "O'Connor"]);
    }

    #[test]
    fn marks_inn_proximity_on_preceding_token() {
        let toks = tokenize("Дарья Павлова ИНН 2839403975", &cfg());
        let marked = toks
            .iter()
            .find(|t| t.text == "Павлова")
            .expect("surname token present");
        assert!(marked.notes.contains(&"marker_inn_nearby"));
    }
}
