//! Regional analytics model

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derive the risk level from the share of analyzed media flagged as
    /// deepfakes (percentage points).
    pub fn from_share(percentage: f32) -> Self {
        if percentage > 20.0 {
            Self::High
        } else if percentage > 19.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionStats {
    pub id: String,
    pub name: String,
    pub deepfakes_detected: u32,
    pub total_analyzed: u32,
    pub percentage: f32,
    pub risk_level: RiskLevel,
}

impl RegionStats {
    pub fn new(id: &str, name: &str, deepfakes: u32, analyzed: u32, percentage: f32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            deepfakes_detected: deepfakes,
            total_analyzed: analyzed,
            percentage,
            risk_level: RiskLevel::from_share(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_derivation() {
        assert_eq!(RiskLevel::from_share(20.4), RiskLevel::High);
        assert_eq!(RiskLevel::from_share(19.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_share(18.8), RiskLevel::Low);
        assert_eq!(RiskLevel::from_share(20.0), RiskLevel::Medium);
    }
}
