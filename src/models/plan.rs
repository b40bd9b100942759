//! Subscription plan catalog model

use serde::Serialize;

use super::SubscriptionPlan;

#[derive(Debug, Clone, Serialize)]
pub struct PlanFeature {
    pub name: String,
    pub included: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanInfo {
    pub id: SubscriptionPlan,
    pub name: String,
    /// USD per month
    pub monthly_price: u32,
    /// USD per year
    pub yearly_price: u32,
    /// `None` means unlimited.
    pub detections_per_month: Option<u32>,
    pub features: Vec<PlanFeature>,
}

impl PlanInfo {
    pub fn new(
        id: SubscriptionPlan,
        name: &str,
        monthly_price: u32,
        yearly_price: u32,
        features: &[(&str, bool)],
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            monthly_price,
            yearly_price,
            detections_per_month: id.monthly_quota(),
            features: features
                .iter()
                .map(|(name, included)| PlanFeature {
                    name: name.to_string(),
                    included: *included,
                })
                .collect(),
        }
    }
}
