//! Identity number extraction from free-form transcript text.
//!
//! Extraction runs an ordered chain of strategies and stops at the first one
//! that yields both segments:
//!
//! 1. **Labeled**: a 6-digit run after a "front six digits" marker and a
//!    1-digit run after a "back digit" marker, searched independently.
//! 2. **Digit runs**: the first run of exactly 6 digits and the first run of
//!    exactly 1 digit anywhere in the text.
//!
//! A labeled match for only one of the two markers is discarded, never a
//! failure: the chain falls through to the next strategy.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// A birth-date segment and a century/gender code captured from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentityPair {
    /// Six ASCII digits: `yymmdd`.
    pub front6: String,
    /// One ASCII digit: the century/gender code.
    pub back1: String,
}

impl RawIdentityPair {
    pub fn new(front6: impl Into<String>, back1: impl Into<String>) -> Self {
        Self {
            front6: front6.into(),
            back1: back1.into(),
        }
    }
}

// ── Patterns ──

// Markers: "앞 6자리", "앞자리", "생년월일", "front 6 digits".
static RE_LABELED_FRONT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:앞\s*(?:6\s*)?자리|생년월일|front\s*(?:6\s*)?digits?)[^0-9]{0,20}?([0-9]{6})(?:[^0-9]|$)",
    )
    .unwrap()
});

// Markers: "뒷자리", "뒤 1자리", "back 1 digit".
static RE_LABELED_BACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:뒷\s*자리|뒤\s*(?:1\s*)?자리|back\s*(?:1\s*)?digits?)[^0-9]{0,20}?([0-9])(?:[^0-9]|$)",
    )
    .unwrap()
});

static RE_DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

// ── Strategy chain ──

type Strategy = fn(&str) -> Option<RawIdentityPair>;

/// Strategies in priority order.
const STRATEGIES: &[(&str, Strategy)] = &[("labeled", labeled_pair), ("digit_runs", digit_run_pair)];

/// Extract the first structurally plausible identity pair from `text`.
///
/// Returns `None` when no strategy finds both segments.
pub fn extract_identity(text: &str) -> Option<RawIdentityPair> {
    STRATEGIES.iter().find_map(|&(name, strategy)| {
        let pair = strategy(text)?;
        debug!(strategy = name, "identity pair extracted");
        Some(pair)
    })
}

fn labeled_pair(text: &str) -> Option<RawIdentityPair> {
    let front6 = RE_LABELED_FRONT.captures(text)?.get(1)?.as_str();
    let back1 = RE_LABELED_BACK.captures(text)?.get(1)?.as_str();
    Some(RawIdentityPair::new(front6, back1))
}

fn digit_run_pair(text: &str) -> Option<RawIdentityPair> {
    let mut front6 = None;
    let mut back1 = None;

    for run in RE_DIGIT_RUN.find_iter(text).map(|m| m.as_str()) {
        match run.len() {
            6 if front6.is_none() => front6 = Some(run),
            1 if back1.is_none() => back1 = Some(run),
            _ => {}
        }
        if front6.is_some() && back1.is_some() {
            break;
        }
    }

    Some(RawIdentityPair::new(front6?, back1?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn labeled_korean_pair() {
        let text = "상담원: 주민번호 앞 6자리 말씀해 주세요\n고객: 앞 6자리는 900515이고 뒷자리는 2로 시작해요";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("900515", "2"))
        );
    }

    #[test]
    fn labeled_english_pair() {
        let text = "front 6 digits: 850101, back 1 digit: 1";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("850101", "1"))
        );
    }

    #[test]
    fn labeled_wins_over_earlier_digit_runs() {
        // The bare scan would pick 123456 and 7.
        let text = "주문번호 123456 상품 7개. 앞 6자리 880202, 뒷자리 1";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("880202", "1"))
        );
    }

    #[test]
    fn partial_label_falls_through_to_digit_runs() {
        // Only the front marker is present; digit runs decide. The digit
        // scan does not skip marker text, so the "6" of "6자리" is the first
        // single-digit run and wins over the trailing "3".
        let text = "고객: 앞 6자리는 770707 입니다. 그리고 3";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("770707", "6"))
        );
    }

    #[test]
    fn digit_runs_pick_first_of_each_length() {
        let text = "990101 - 1, 그리고 880808 - 2";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("990101", "1"))
        );
    }

    #[test]
    fn digit_runs_ignore_other_lengths() {
        let text = "전화 01012345678, 생일은 000229, 코드 4, 카드 1234";
        assert_eq!(
            extract_identity(text),
            Some(RawIdentityPair::new("000229", "4"))
        );
    }

    #[test]
    fn seven_digit_back_run_is_not_a_code() {
        assert_eq!(extract_identity("900515-1234567"), None);
    }

    #[test]
    fn missing_code_is_not_found() {
        assert_eq!(extract_identity("생일은 900515 입니다"), None);
    }

    #[test]
    fn empty_text_is_not_found() {
        assert_eq!(extract_identity(""), None);
    }

    #[test]
    fn non_ascii_digits_are_ignored() {
        assert_eq!(extract_identity("９００５１５ ２"), None);
    }

    proptest! {
        #[test]
        fn labeled_pair_survives_decoys(
            front in "[0-9]{6}",
            back in "[0-9]",
            decoy6 in "[0-9]{6}",
            decoy1 in "[0-9]",
            tail in "[0-9]{1,8}",
        ) {
            let text = format!(
                "참고 {decoy6} 그리고 {decoy1}. 주민번호 앞 6자리는 {front}이고 뒷자리는 {back}입니다. 기타 {tail}"
            );
            prop_assert_eq!(extract_identity(&text), Some(RawIdentityPair::new(front, back)));
        }

        #[test]
        fn lone_runs_are_found_without_labels(
            front in "[0-9]{6}",
            back in "[0-9]",
            a in "[a-z ,.]{0,12}",
            b in "[a-z ,.]{0,12}",
            c in "[a-z ,.]{0,12}",
        ) {
            let text = format!("{a} {front} {b} {back} {c}");
            prop_assert_eq!(extract_identity(&text), Some(RawIdentityPair::new(front, back)));
        }

        #[test]
        fn digitless_text_is_not_found(text in "[^0-9]{0,64}") {
            prop_assert_eq!(extract_identity(&text), None);
        }
    }
}
