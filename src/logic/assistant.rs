//! Rule-based assistant replies
//!
//! Keyword lookup over canned responses. The first matching keyword wins,
//! in table order.

/// Simulated think time before a reply is produced.
pub const THINK_DELAY_MS: u64 = 500;

const RESPONSES: [(&str, &str); 6] = [
    (
        "detect",
        "I can help you detect deepfakes! You can upload a video, image, or audio file and I'll analyze it for signs of AI manipulation.",
    ),
    (
        "deepfake",
        "Deepfakes are synthetic media created using deep learning technology. They can be videos, images, or audio that have been manipulated or fabricated.",
    ),
    (
        "video",
        "For video analysis, I check for facial inconsistencies, lighting anomalies, and audio-visual mismatches.",
    ),
    (
        "image",
        "For image detection, I analyze pixel patterns, metadata, and signs of digital manipulation.",
    ),
    (
        "audio",
        "For audio analysis, I look for voice cloning artifacts and synthetic speech patterns.",
    ),
    (
        "help",
        "I'm your AI assistant here to help you understand deepfakes and how to use our platform. What would you like to know?",
    ),
];

const FALLBACK: &str =
    "I can help you with deepfake detection! Ask me anything about how to use the platform or understanding AI-generated content.";

/// Pick the canned reply for a user message.
pub fn reply_for(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, response)| *response)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_selects_response() {
        assert!(reply_for("how do I detect a fake?").contains("upload a video"));
        assert!(reply_for("what is a DEEPFAKE?").contains("synthetic media"));
        assert!(reply_for("analyze my audio file").contains("voice cloning"));
    }

    #[test]
    fn test_first_keyword_in_table_order_wins() {
        // Contains both "video" and "detect"; "detect" comes first in the table.
        let reply = reply_for("can you detect manipulation in this video?");
        assert!(reply.contains("upload a video, image, or audio file"));
    }

    #[test]
    fn test_unknown_message_gets_fallback() {
        assert_eq!(reply_for("what's the weather like?"), FALLBACK);
        assert_eq!(reply_for(""), FALLBACK);
    }
}
