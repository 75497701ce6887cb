//! Prompt normalization and the stable fingerprint used as the exact-match key.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static::lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9\s]")
        .expect("Failed to compile prompt filter regex - this is a bug in the code");
    static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("Failed to compile whitespace regex - this is a bug in the code");
}

/// Lowercases, drops everything outside `[a-z0-9\s]`, collapses whitespace and trims.
///
/// Total and idempotent: `normalize(&normalize(p)) == normalize(p)`.
pub fn normalize(prompt: &str) -> String {
    let lowered = prompt.to_lowercase();
    let filtered = NON_ALPHANUMERIC.replace_all(&lowered, "");
    WHITESPACE_RUN
        .replace_all(&filtered, " ")
        .trim()
        .to_string()
}

/// Eight hex digit fingerprint of a normalized prompt.
///
/// Not collision free. It is a lookup key for the exact tier, never an
/// identity: two prompts with the same hash are only treated as the same
/// prompt when their normalized text matches too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptHash(String);

impl PromptHash {
    /// Normalizes `prompt` and hashes the result.
    pub fn of(prompt: &str) -> Self {
        Self::of_normalized(&normalize(prompt))
    }

    /// Hashes text that is already normalized.
    ///
    /// Rolling `h = h * 31 + unit` over UTF-16 code units in wrapping i32
    /// arithmetic, rendered as the absolute value in zero padded hex.
    pub fn of_normalized(normalized: &str) -> Self {
        let hash = normalized
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self(format!("{:08x}", i64::from(hash).abs()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("  Habit   Tracker!!  "), "habit tracker");
        assert_eq!(normalize("CRM / Sales-Pipeline\t2024"), "crm salespipeline 2024");
        assert_eq!(normalize("Café ☕ planner"), "caf planner");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for prompt in [
            "Track my DAILY habits...",
            "  a  b\n\nc ",
            "Ünïcödé — dashes – and “quotes”",
            "",
        ] {
            let once = normalize(prompt);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn equal_normalizations_hash_equally() {
        assert_eq!(PromptHash::of("Habit Tracker"), PromptHash::of("habit   tracker!"));
        assert_ne!(PromptHash::of("habit tracker"), PromptHash::of("budget tracker"));
    }

    #[test]
    fn hash_matches_rolling_reference_values() {
        assert_eq!(PromptHash::of("").as_str(), "00000000");
        // 'a' = 97
        assert_eq!(PromptHash::of("a").as_str(), "00000061");
        // 97 * 31 + 98
        assert_eq!(PromptHash::of("ab").as_str(), format!("{:08x}", 97 * 31 + 98));
    }

    #[test]
    fn hash_is_always_eight_non_negative_hex_digits() {
        let long = "project management system for my whole engineering team".repeat(4);
        let hash = PromptHash::of(&long);
        assert_eq!(hash.as_str().len(), 8);
        assert!(hash.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
