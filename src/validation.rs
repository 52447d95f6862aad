//! Layer 1 — Validation (spec §2, §7 `input_invalid`).
//!
//! Trims, length-bounds, and rejects binary garbage before anything else
//! touches the text. This is the only layer whose errors are surfaced
//! directly to the caller rather than recovered locally.

use crate::error::PipelineError;

/// Trim and length-bound `text`, rejecting control characters that indicate
/// binary/garbage input (anything below 0x20 other than common whitespace).
pub fn validate(text: &str, max_len: usize) -> Result<String, PipelineError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(PipelineError::InputInvalid("empty text".into()));
    }

    if trimmed.chars().count() > max_len {
        return Err(PipelineError::InputInvalid(format!(
            "text exceeds max length of {max_len} characters"
        )));
    }

    if has_binary_garbage(trimmed) {
        return Err(PipelineError::InputInvalid(
            "text contains non-printable control characters".into(),
        ));
    }

    Ok(trimmed.to_string())
}

fn has_binary_garbage(text: &str) -> bool {
    text.chars().any(|c| {
        let is_allowed_whitespace = matches!(c, '\n' | '\r' | '\t');
        c.is_control() && !is_allowed_whitespace
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_plain_text() {
        let out = validate("  Иванов Иван Иванович  ", 10_000).unwrap();
        assert_eq!(out, "Иванов Иван Иванович");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(validate("   ", 10_000).is_err());
    }

    #[test]
    fn rejects_over_length_input() {
        let long = "a".repeat(10_001);
        assert!(validate(&long, 10_000).is_err());
    }

    #[test]
    fn rejects_control_characters() {
        let bad = "Иванов\u{0000}Иван";
        assert!(validate(bad, 10_000).is_err());
    }

    #[test]
    fn allows_newlines_and_tabs() {
        let ok = validate("line one\nline two\ttabbed", 10_000).unwrap();
        assert_eq!(ok, "line one\nline two\ttabbed");
    }
}
