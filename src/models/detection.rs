//! Detection result model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of media submitted for analysis.
///
/// Derived once from the declared content type at submission and immutable
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

/// Classification outcome of a detection session.
///
/// `Uncertain` only ever appears in seeded demo history; the mock provider
/// draws from {Real, Deepfake}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Real,
    Deepfake,
    Uncertain,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Deepfake => "deepfake",
            Self::Uncertain => "uncertain",
        }
    }
}

/// Completed analysis record. Created exactly once per completed session,
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    pub id: Uuid,
    pub filename: String,
    pub media_kind: MediaKind,
    pub verdict: Verdict,
    /// Always within [65, 99].
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
    pub details: String,
}
