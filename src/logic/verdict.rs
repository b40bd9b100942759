//! Verdict provider
//!
//! The provider trait is the substitution point for a real inference
//! service. The shipped implementation is a mock: it inspects no media
//! bytes and draws randomized verdicts.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::models::{DetectionResult, MediaKind, Verdict};

/// Explanation attached to deepfake verdicts.
pub const DEEPFAKE_DETAILS: &str =
    "Detected facial inconsistencies and lighting anomalies typical of deepfake generation";

/// Explanation attached to authentic verdicts.
pub const AUTHENTIC_DETAILS: &str =
    "No significant anomalies detected. Content appears authentic.";

/// Produces the verdict for a completed analysis.
///
/// Implementations must not fail: given a valid media kind there is always
/// a verdict.
pub trait VerdictProvider: Send + Sync {
    fn evaluate(&self, filename: &str, media_kind: MediaKind) -> DetectionResult;
}

/// Mock provider: deepfake with probability 0.5, confidence uniform in
/// [65, 99], details keyed by verdict polarity.
///
/// Never emits `Verdict::Uncertain` even though the verdict type models it.
#[derive(Debug, Default)]
pub struct MockVerdictProvider;

impl VerdictProvider for MockVerdictProvider {
    fn evaluate(&self, filename: &str, media_kind: MediaKind) -> DetectionResult {
        let mut rng = rand::thread_rng();

        let verdict = if rng.gen_bool(0.5) {
            Verdict::Deepfake
        } else {
            Verdict::Real
        };

        let details = match verdict {
            Verdict::Deepfake => DEEPFAKE_DETAILS,
            _ => AUTHENTIC_DETAILS,
        };

        DetectionResult {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            media_kind,
            verdict,
            confidence: rng.gen_range(65..=99),
            timestamp: Utc::now(),
            details: details.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_stays_in_bounds() {
        let provider = MockVerdictProvider;
        for _ in 0..256 {
            let result = provider.evaluate("clip.mp4", MediaKind::Video);
            assert!(
                (65..=99).contains(&result.confidence),
                "confidence {} out of bounds",
                result.confidence
            );
        }
    }

    #[test]
    fn test_never_emits_uncertain() {
        let provider = MockVerdictProvider;
        for _ in 0..256 {
            let result = provider.evaluate("voice.mp3", MediaKind::Audio);
            assert_ne!(result.verdict, Verdict::Uncertain);
        }
    }

    #[test]
    fn test_details_match_verdict_polarity() {
        let provider = MockVerdictProvider;
        for _ in 0..64 {
            let result = provider.evaluate("photo.png", MediaKind::Image);
            match result.verdict {
                Verdict::Deepfake => assert_eq!(result.details, DEEPFAKE_DETAILS),
                Verdict::Real => assert_eq!(result.details, AUTHENTIC_DETAILS),
                Verdict::Uncertain => unreachable!(),
            }
        }
    }

    #[test]
    fn test_result_carries_submission_metadata() {
        let provider = MockVerdictProvider;
        let result = provider.evaluate("clip.mp4", MediaKind::Video);
        assert_eq!(result.filename, "clip.mp4");
        assert_eq!(result.media_kind, MediaKind::Video);

        // Per-session uniqueness of ids
        let other = provider.evaluate("clip.mp4", MediaKind::Video);
        assert_ne!(result.id, other.id);
    }
}
