//! Media kind classification
//!
//! The media kind is derived exactly once, at submission, from the declared
//! content type. Anything outside video/image/audio is rejected outright
//! rather than silently bucketed.

use crate::error::DetectError;
use crate::models::MediaKind;

/// Derive the media kind for a submission.
///
/// Uses the declared content type when present; otherwise guesses from the
/// filename extension before applying the same accept/reject policy.
pub fn classify(declared: Option<&str>, filename: &str) -> Result<MediaKind, DetectError> {
    match declared {
        Some(mime) if !mime.trim().is_empty() => from_mime(mime),
        _ => from_filename(filename),
    }
}

fn from_mime(mime: &str) -> Result<MediaKind, DetectError> {
    let prefix = mime.split('/').next().unwrap_or_default();
    match prefix {
        "video" => Ok(MediaKind::Video),
        "image" => Ok(MediaKind::Image),
        "audio" => Ok(MediaKind::Audio),
        _ => Err(DetectError::UnsupportedMedia {
            mime: mime.to_string(),
        }),
    }
}

fn from_filename(filename: &str) -> Result<MediaKind, DetectError> {
    match mime_guess::from_path(filename).first() {
        Some(mime) => from_mime(mime.essence_str()),
        None => Err(DetectError::UnsupportedMedia {
            mime: format!("unknown ({})", filename),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_prefix_is_deterministic() {
        assert_eq!(classify(Some("video/mp4"), "clip.mp4").unwrap(), MediaKind::Video);
        assert_eq!(classify(Some("image/png"), "photo.png").unwrap(), MediaKind::Image);
        assert_eq!(classify(Some("audio/mpeg"), "voice.mp3").unwrap(), MediaKind::Audio);
    }

    #[test]
    fn test_unsupported_prefix_is_rejected() {
        let err = classify(Some("application/pdf"), "report.pdf").unwrap_err();
        assert_eq!(
            err,
            DetectError::UnsupportedMedia {
                mime: "application/pdf".to_string()
            }
        );
    }

    #[test]
    fn test_fallback_guesses_from_extension() {
        assert_eq!(classify(None, "clip.mp4").unwrap(), MediaKind::Video);
        assert_eq!(classify(None, "photo.jpg").unwrap(), MediaKind::Image);
        assert_eq!(classify(None, "voice.wav").unwrap(), MediaKind::Audio);
    }

    #[test]
    fn test_fallback_rejects_unknown_extension() {
        assert!(classify(None, "notes.txt").is_err());
        assert!(classify(None, "mystery").is_err());
    }

    #[test]
    fn test_blank_declared_type_falls_back_to_filename() {
        assert_eq!(classify(Some(""), "clip.webm").unwrap(), MediaKind::Video);
    }
}
