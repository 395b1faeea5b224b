//! Keyword-rule intent classification
//!
//! Deterministic substring matching over the lower-cased request text plus
//! the has-image flag. An LLM classifier may replace this eventually; the
//! rule set below is the behavior the rest of the pipeline is tuned
//! against.

use tracing::debug;

use crate::domain::{Intent, IntentKind};

/// Phrases that signal a virtual try-on request
const TRY_ON_PHRASES: &[&str] = &["입혀줘", "가상 피팅"];

/// Phrases that signal a recommendation request
const RECOMMEND_PHRASES: &[&str] = &["추천", "찾아줘"];

/// The rule does not compute confidence; it asserts it.
const RULE_CONFIDENCE: f64 = 0.9;

/// Classify one request
///
/// Try-on phrases or an attached image win over everything; recommendation
/// phrases come second; anything else defaults to generation.
pub fn classify_intent(text: &str, has_image: bool) -> Intent {
    let raw_text = text.to_lowercase();
    debug!(text_len = raw_text.len(), has_image, "classify_intent: called");

    let kind = if TRY_ON_PHRASES.iter().any(|p| raw_text.contains(p)) || has_image {
        IntentKind::Generation
    } else if RECOMMEND_PHRASES.iter().any(|p| raw_text.contains(p)) {
        IntentKind::Recommendation
    } else {
        IntentKind::Generation
    };

    debug!(%kind, "classify_intent: classified");
    Intent {
        kind,
        confidence: RULE_CONFIDENCE,
        raw_text,
        has_image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_on_phrase_is_generation() {
        let intent = classify_intent("이 셔츠 입혀줘", false);
        assert_eq!(intent.kind, IntentKind::Generation);
        assert_eq!(intent.confidence, 0.9);
    }

    #[test]
    fn test_virtual_fitting_phrase_is_generation() {
        let intent = classify_intent("가상 피팅 해보고 싶어", false);
        assert_eq!(intent.kind, IntentKind::Generation);
    }

    #[test]
    fn test_image_alone_is_generation() {
        let intent = classify_intent("", true);
        assert_eq!(intent.kind, IntentKind::Generation);
        assert!(intent.has_image);
    }

    #[test]
    fn test_recommend_phrase_is_recommendation() {
        let intent = classify_intent("빨간색 원피스 추천해줘", false);
        assert_eq!(intent.kind, IntentKind::Recommendation);
    }

    #[test]
    fn test_find_phrase_is_recommendation() {
        let intent = classify_intent("청바지 좀 찾아줘", false);
        assert_eq!(intent.kind, IntentKind::Recommendation);
    }

    #[test]
    fn test_image_overrides_recommend_phrase() {
        // Try-on/image checks run first, so an attached image wins even
        // when the text asks for a recommendation.
        let intent = classify_intent("추천해줘", true);
        assert_eq!(intent.kind, IntentKind::Generation);
    }

    #[test]
    fn test_unmatched_text_defaults_to_generation() {
        let intent = classify_intent("안녕하세요", false);
        assert_eq!(intent.kind, IntentKind::Generation);
    }

    #[test]
    fn test_text_is_lowercased() {
        let intent = classify_intent("RECOMMEND ME Something", false);
        assert_eq!(intent.raw_text, "recommend me something");
    }

    proptest::proptest! {
        /// Any text carrying a recommend phrase (and no image, no try-on
        /// phrase) classifies as recommendation regardless of surroundings.
        #[test]
        fn prop_recommend_phrase_wins_without_image(
            prefix in "[a-z0-9 ]{0,20}",
            suffix in "[a-z0-9 ]{0,20}",
        ) {
            let text = format!("{}추천{}", prefix, suffix);
            let intent = classify_intent(&text, false);
            proptest::prop_assert_eq!(intent.kind, IntentKind::Recommendation);
        }

        /// An image forces generation no matter what the text says.
        #[test]
        fn prop_image_always_generates(text in ".{0,40}") {
            let intent = classify_intent(&text, true);
            proptest::prop_assert_eq!(intent.kind, IntentKind::Generation);
        }
    }
}
