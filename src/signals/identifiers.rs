//! Layer 6 — identifier extraction and validation (spec §4.2).
//!
//! Regex-driven candidate extraction, then per-type formal validation. A
//! candidate may be `valid=false` and still be emitted — checksum failure
//! is the `identifier_checksum_failed` non-fatal error kind (§7), and
//! invalid candidates remain eligible for the sanctioned-ID fast path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Id, IdKind};

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d ]{7,}\d|\d{8,}").unwrap());
static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[A-Z]{2}\d{2}[A-Z0-9]{10,30}\b").unwrap());
static SWIFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}(?:[A-Z0-9]{3})?\b").unwrap());
static PASSPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:passport|паспорт)\s*[:#]?\s*([A-ZА-Я0-9]{6,12})\b").unwrap());

/// Extract every identifier candidate from `text`, typed and validated.
/// Ordering: digit runs first (INN/EDRPOU/OGRN family, disambiguated by
/// length), then IBAN, then SWIFT, then passport markers.
pub fn extract(text: &str) -> Vec<Id> {
    let mut out = Vec::new();

    for m in DIGIT_RUN.find_iter(text) {
        let raw = m.as_str();
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        let kind = classify_digit_run(&digits);
        let valid = validate_digit_run(&digits, kind);
        out.push(Id {
            kind,
            value: digits,
            raw: raw.to_string(),
            confidence: 0.7,
            valid,
            sanctioned: false,
            sanctioned_name: None,
            sanctioned_source: None,
            position: Some((m.start(), m.end())),
        });
    }

    for m in IBAN_RE.find_iter(text) {
        let raw = m.as_str();
        let value = raw.replace(' ', "").to_uppercase();
        out.push(Id {
            kind: IdKind::Iban,
            valid: validate_iban(&value),
            value,
            raw: raw.to_string(),
            confidence: 0.8,
            sanctioned: false,
            sanctioned_name: None,
            sanctioned_source: None,
            position: Some((m.start(), m.end())),
        });
    }

    for m in SWIFT_RE.find_iter(text) {
        let raw = m.as_str();
        // Avoid double-counting alphabetic spans already consumed by IBAN.
        if out.iter().any(|id| id.kind == IdKind::Iban && id.raw.contains(raw)) {
            continue;
        }
        let value = raw.to_uppercase();
        out.push(Id {
            kind: IdKind::Swift,
            valid: matches!(value.len(), 8 | 11),
            value,
            raw: raw.to_string(),
            confidence: 0.6,
            sanctioned: false,
            sanctioned_name: None,
            sanctioned_source: None,
            position: Some((m.start(), m.end())),
        });
    }

    for caps in PASSPORT_RE.captures_iter(text) {
        let m = caps.get(1).unwrap();
        out.push(Id {
            kind: IdKind::Passport,
            value: m.as_str().to_uppercase(),
            raw: m.as_str().to_string(),
            confidence: 0.6,
            valid: true,
            sanctioned: false,
            sanctioned_name: None,
            sanctioned_source: None,
            position: Some((m.start(), m.end())),
        });
    }

    out
}

fn classify_digit_run(digits: &str) -> IdKind {
    match digits.len() {
        8 => IdKind::Edrpou,
        10 => IdKind::Inn, // generic INN; caller may refine to inn_ru/inn_ua by language
        12 => IdKind::InnUa,
        13 | 15 => IdKind::Ogrn,
        _ => IdKind::NumericId,
    }
}

fn validate_digit_run(digits: &str, kind: IdKind) -> bool {
    match kind {
        IdKind::Inn | IdKind::InnRu => validate_inn(digits),
        IdKind::InnUa => validate_inn(digits),
        IdKind::Edrpou => validate_edrpou(digits),
        IdKind::Ogrn => validate_ogrn(digits),
        IdKind::NumericId => false,
        _ => false,
    }
}

/// Published INN check-digit formula (RU/UA): weighted mod-11 over all but
/// the last one (10-digit, legal entity) or two (12-digit, individual)
/// digits.
pub fn validate_inn(digits: &str) -> bool {
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    match d.len() {
        10 => {
            const W: [u32; 9] = [2, 4, 10, 3, 5, 9, 4, 6, 8];
            let check = inn_checksum(&d[..9], &W) % 11 % 10;
            check == d[9]
        }
        12 => {
            const W1: [u32; 10] = [7, 2, 4, 10, 3, 5, 9, 4, 6, 8];
            const W2: [u32; 11] = [3, 7, 2, 4, 10, 3, 5, 9, 4, 6, 8];
            let check1 = inn_checksum(&d[..10], &W1) % 11 % 10;
            let check2 = inn_checksum(&d[..11], &W2) % 11 % 10;
            check1 == d[10] && check2 == d[11]
        }
        _ => false,
    }
}

fn inn_checksum(digits: &[u32], weights: &[u32]) -> u32 {
    digits.iter().zip(weights.iter()).map(|(d, w)| d * w).sum()
}

/// EDRPOU (Ukraine, 8 digits): weighted mod-11 check digit.
pub fn validate_edrpou(digits: &str) -> bool {
    let d: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
    if d.len() != 8 {
        return false;
    }
    let weights = [1, 2, 3, 4, 5, 6, 7];
    let mut sum: u32 = d[..7].iter().zip(weights.iter()).map(|(x, w)| x * w).sum();
    let mut check = sum % 11;
    if check == 10 {
        let weights2 = [3, 4, 5, 6, 7, 8, 9];
        sum = d[..7].iter().zip(weights2.iter()).map(|(x, w)| x * w).sum();
        check = sum % 11;
        if check == 10 {
            check = 0;
        }
    }
    check == d[7]
}

/// OGRN (Russia, 13 or 15 digits): remainder of the leading digits modulo
/// 11 (13-digit) or modulo 13 (15-digit, OGRNIP) must equal the check digit.
pub fn validate_ogrn(digits: &str) -> bool {
    let d: Vec<u64> = digits.chars().filter_map(|c| c.to_digit(10)).map(u64::from).collect();
    match d.len() {
        13 => {
            let n: u64 = digits[..12].parse().unwrap_or(0);
            let check = (n % 11) % 10;
            check == d[12]
        }
        15 => {
            let n: u64 = digits[..14].parse().unwrap_or(0);
            let check = (n % 13) % 10;
            check == d[14]
        }
        _ => false,
    }
}

/// IBAN mod-97 checksum (ISO 7064).
pub fn validate_iban(value: &str) -> bool {
    if value.len() < 15 || value.len() > 34 {
        return false;
    }
    if !value.chars().take(2).all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let rearranged = format!("{}{}", &value[4..], &value[..4]);
    let mut numeric = String::with_capacity(rearranged.len() * 2);
    for c in rearranged.chars() {
        if c.is_ascii_digit() {
            numeric.push(c);
        } else if c.is_ascii_alphabetic() {
            numeric.push_str(&(c.to_ascii_uppercase() as u32 - 'A' as u32 + 10).to_string());
        } else {
            return false;
        }
    }
    mod97(&numeric) == 1
}

fn mod97(numeric: &str) -> u32 {
    let mut remainder: u64 = 0;
    for c in numeric.chars() {
        let digit = c.to_digit(10).unwrap_or(0) as u64;
        remainder = (remainder * 10 + digit) % 97;
    }
    remainder as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_inn_candidate_regardless_of_checksum() {
        let ids = extract("ИНН 2839403975 перевод");
        let inn = ids.iter().find(|i| i.value == "2839403975").unwrap();
        assert!(matches!(inn.kind, IdKind::Inn));
    }

    #[test]
    fn iban_checksum_validates_known_good_example() {
        // Well-known IBAN validity test vector.
        assert!(validate_iban("GB29NWBK60161331926819"));
    }

    #[test]
    fn iban_checksum_rejects_corrupted_example() {
        assert!(!validate_iban("GB29NWBK60161331926818"));
    }

    #[test]
    fn edrpou_length_gate() {
        assert!(!validate_edrpou("123"));
    }
}
