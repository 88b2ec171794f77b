//! Narrative-to-score extraction shared by every agent.

use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when a narrative omits the requested scoring convention.
///
/// Kept at 7.5 so an agent that answers well but skips the "X/10" line is not
/// zero-scored; changing this value changes every aggregate downstream.
pub const SCORE_FALLBACK: f32 = 7.5;

static SCORE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"score[:\s]+(\d+(?:\.\d+)?)/10").expect("invalid score pattern"),
        Regex::new(r"rate[:\s]+(\d+(?:\.\d+)?)/10").expect("invalid rate pattern"),
        Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*10").expect("invalid bare pattern"),
    ]
});

/// Derive a numeric score from free-form narrative text.
///
/// Matchers are tried in priority order against the lower-cased text: an
/// explicit `score: X/10` label, then `rate: X/10`, then any bare `X/10`.
/// The first matcher that hits wins, taking its leftmost match. Values
/// outside the 0-10 scale are clamped.
pub fn extract_score(text: &str) -> f32 {
    let lowered = text.to_lowercase();
    for pattern in SCORE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&lowered) {
            if let Ok(value) = caps[1].parse::<f32>() {
                return value.clamp(0.0, 10.0);
            }
        }
    }
    SCORE_FALLBACK
}
